//! Break enforcement configuration.

use serde::{Deserialize, Serialize};

/// Compliance enforcement settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementConfig {
    /// Whether the synchronous clock-out enforcement trigger is enabled.
    ///
    /// When disabled, adjustments still happen through the safety-net pass.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// IANA timezone used when an employee has no timezone on record.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

impl Default for EnforcementConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            default_timezone: default_timezone(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_timezone() -> String {
    "UTC".to_string()
}
