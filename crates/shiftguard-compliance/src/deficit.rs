//! Break-deficit calculation.
//!
//! Pure functions, no I/O. A regulation's break rules are ordered by
//! threshold; the applicable rule for a worked-minutes value is the rule
//! with the highest threshold strictly below that value.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shiftguard_entity::period::model::WorkPeriod;
use shiftguard_entity::regulation::model::{BreakRule, Regulation};

/// Gaps of at most this many minutes between periods are rounding noise
/// from clock events, not breaks.
const BREAK_GAP_NOISE_MINUTES: i64 = 1;

/// The outcome of a break-deficit calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreakDeficit {
    /// Break minutes still owed (zero when satisfied or no rule applies).
    pub deficit_minutes: i32,
    /// The rule that applied, if the worked time exceeded any threshold.
    pub applicable_rule: Option<BreakRule>,
    /// The regulation evaluated.
    pub regulation_id: Uuid,
    /// The regulation's name, for adjustment records and warnings.
    pub regulation_name: String,
    /// The regulation's uninterrupted-work cap, if set.
    pub max_uninterrupted_minutes: Option<i32>,
}

impl BreakDeficit {
    /// Whether any break time is still owed.
    pub fn is_owed(&self) -> bool {
        self.deficit_minutes > 0
    }
}

/// Select the applicable break rule for a worked-minutes value.
///
/// Returns the rule with the highest threshold strictly below
/// `worked_minutes`, or `None` when the worked time is at or below every
/// threshold.
pub fn applicable_rule(rules: &[BreakRule], worked_minutes: i32) -> Option<&BreakRule> {
    rules
        .iter()
        .filter(|r| r.working_minutes_threshold < worked_minutes)
        .max_by_key(|r| r.working_minutes_threshold)
}

/// Compute the break deficit for a regulation.
pub fn break_deficit(
    regulation: &Regulation,
    worked_minutes: i32,
    breaks_taken_minutes: i32,
) -> BreakDeficit {
    let rule = applicable_rule(&regulation.break_rules, worked_minutes);
    let deficit_minutes = rule
        .map(|r| (r.required_break_minutes - breaks_taken_minutes).max(0))
        .unwrap_or(0);

    BreakDeficit {
        deficit_minutes,
        applicable_rule: rule.cloned(),
        regulation_id: regulation.id,
        regulation_name: regulation.name.clone(),
        max_uninterrupted_minutes: regulation.max_uninterrupted_minutes,
    }
}

/// Sum the break minutes taken between consecutive closed periods.
///
/// `periods` must be the day's closed periods ordered by start time. Gaps
/// strictly longer than one minute count as breaks; shorter gaps are
/// clock-event rounding noise.
pub fn breaks_taken_minutes(periods: &[WorkPeriod]) -> i64 {
    periods
        .windows(2)
        .filter_map(|pair| {
            let prev_end = pair[0].end_time?;
            let gap = pair[1].start_time - prev_end;
            (gap > Duration::minutes(BREAK_GAP_NOISE_MINUTES)).then(|| gap.num_minutes())
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use sqlx::types::Json;

    fn rule(threshold: i32, required: i32) -> BreakRule {
        BreakRule {
            working_minutes_threshold: threshold,
            required_break_minutes: required,
            options: Vec::new(),
        }
    }

    fn regulation(rules: Vec<BreakRule>) -> Regulation {
        Regulation {
            id: Uuid::new_v4(),
            name: "Test regulation".to_string(),
            max_daily_minutes: Some(600),
            max_weekly_minutes: Some(2880),
            max_uninterrupted_minutes: Some(360),
            break_rules: Json(rules),
        }
    }

    fn ts(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, h, m, 0).unwrap()
    }

    fn closed_period(start: DateTime<Utc>, end: DateTime<Utc>) -> WorkPeriod {
        WorkPeriod {
            id: Uuid::new_v4(),
            employee_id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            clock_in_entry_id: Uuid::new_v4(),
            clock_out_entry_id: Some(Uuid::new_v4()),
            start_time: start,
            end_time: Some(end),
            duration_minutes: Some((end - start).num_minutes() as i32),
            is_active: false,
            was_auto_adjusted: false,
            auto_adjustment_reason: None,
            auto_adjusted_at: None,
            original_end_time: None,
            original_duration_minutes: None,
            created_at: start,
        }
    }

    #[test]
    fn test_no_rule_below_every_threshold() {
        let rules = vec![rule(360, 30), rule(540, 45)];
        assert!(applicable_rule(&rules, 300).is_none());
        // Threshold must be strictly below the worked time.
        assert!(applicable_rule(&rules, 360).is_none());
    }

    #[test]
    fn test_highest_threshold_strictly_below_wins() {
        let rules = vec![rule(360, 30), rule(540, 45)];
        assert_eq!(
            applicable_rule(&rules, 400).unwrap().required_break_minutes,
            30
        );
        assert_eq!(
            applicable_rule(&rules, 541).unwrap().required_break_minutes,
            45
        );
    }

    #[test]
    fn test_deficit_subtracts_breaks_taken() {
        let reg = regulation(vec![rule(360, 30)]);
        assert_eq!(break_deficit(&reg, 420, 0).deficit_minutes, 30);
        assert_eq!(break_deficit(&reg, 420, 10).deficit_minutes, 20);
        assert_eq!(break_deficit(&reg, 420, 30).deficit_minutes, 0);
        assert_eq!(break_deficit(&reg, 420, 45).deficit_minutes, 0);
    }

    #[test]
    fn test_deficit_zero_when_no_rule_applies() {
        let reg = regulation(vec![rule(360, 30)]);
        let result = break_deficit(&reg, 300, 0);
        assert_eq!(result.deficit_minutes, 0);
        assert!(result.applicable_rule.is_none());
    }

    #[test]
    fn test_deficit_monotonicity() {
        let reg = regulation(vec![rule(360, 30), rule(540, 45)]);
        // Non-increasing in breaks taken.
        let mut last = i32::MAX;
        for taken in 0..=50 {
            let d = break_deficit(&reg, 420, taken).deficit_minutes;
            assert!(d <= last);
            last = d;
        }
        // Non-decreasing in worked minutes.
        let mut last = 0;
        for worked in 300..=600 {
            let d = break_deficit(&reg, worked, 0).deficit_minutes;
            assert!(d >= last);
            last = d;
        }
    }

    #[test]
    fn test_breaks_taken_sums_real_gaps_only() {
        let periods = vec![
            closed_period(ts(9, 0), ts(12, 0)),
            // 30 minute lunch gap.
            closed_period(ts(12, 30), ts(15, 0)),
            // 1 minute gap is rounding noise.
            closed_period(ts(15, 1), ts(17, 0)),
        ];
        assert_eq!(breaks_taken_minutes(&periods), 30);
    }

    #[test]
    fn test_breaks_taken_empty_and_single() {
        assert_eq!(breaks_taken_minutes(&[]), 0);
        assert_eq!(breaks_taken_minutes(&[closed_period(ts(9, 0), ts(17, 0))]), 0);
    }
}
