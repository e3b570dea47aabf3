//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Scheduled worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the scheduled worker is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the safety-net enforcement pass.
    ///
    /// Six-field cron (seconds first), default: five minutes past every hour.
    #[serde(default = "default_safety_net_cron")]
    pub safety_net_cron: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            safety_net_cron: default_safety_net_cron(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_safety_net_cron() -> String {
    "0 5 * * * *".to_string()
}
