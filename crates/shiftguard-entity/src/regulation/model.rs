//! Regulation and break rule models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;
use uuid::Uuid;

/// A named set of labor-time limits and break rules.
///
/// Break rules are stored as a JSONB column, ordered by threshold. Within
/// one regulation the thresholds are distinct; the applicable rule for a
/// worked-minutes value is the rule with the highest threshold strictly
/// below that value.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Regulation {
    /// Unique regulation identifier.
    pub id: Uuid,
    /// Human-readable regulation name (e.g., `"German ArbZG"`).
    pub name: String,
    /// Maximum worked minutes per calendar day, if capped.
    pub max_daily_minutes: Option<i32>,
    /// Maximum worked minutes per calendar week, if capped.
    pub max_weekly_minutes: Option<i32>,
    /// Maximum minutes of uninterrupted work, if capped.
    pub max_uninterrupted_minutes: Option<i32>,
    /// Break rules, ordered by ascending threshold.
    pub break_rules: Json<Vec<BreakRule>>,
}

/// A worked-minutes threshold and the break required once exceeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakRule {
    /// Worked minutes above which this rule applies.
    pub working_minutes_threshold: i32,
    /// Total break minutes required once the threshold is exceeded.
    pub required_break_minutes: i32,
    /// Permitted ways of splitting the required break.
    #[serde(default)]
    pub options: Vec<BreakOption>,
}

/// A permitted way of splitting a rule's required break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BreakOption {
    /// The full break taken as one block.
    SingleBlock,
    /// The break split into `count` equal parts.
    EqualSplits {
        /// Number of equal parts.
        count: u32,
    },
    /// Any number of splits, as long as one is at least `minimum_minutes`.
    AnySplitWithMinimum {
        /// Minimum length of the largest split.
        minimum_minutes: i32,
    },
}
