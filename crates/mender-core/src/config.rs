//! Tuning knobs for the execution pipeline.

use std::time::Duration;

/// Default number of repair iterations per failing command.
pub const DEFAULT_MAX_REPAIR_ATTEMPTS: u32 = 5;
/// Default number of reformat queries per synthesis.
pub const DEFAULT_MAX_REFORMAT_ATTEMPTS: u32 = 3;
/// Default wall-clock limit for one command.
pub const DEFAULT_COMMAND_TIMEOUT: Duration = Duration::from_secs(600);

/// Budgets and environment for the synthesizer and execution engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Repair iterations allowed for each failing command
    pub max_repair_attempts: u32,
    /// Reformat queries allowed before a synthesis response is rejected
    pub max_reformat_attempts: u32,
    /// Wall-clock limit for a single command
    pub command_timeout: Duration,
    /// Operating system name shown to the model when it picks commands
    pub target_os: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_repair_attempts: DEFAULT_MAX_REPAIR_ATTEMPTS,
            max_reformat_attempts: DEFAULT_MAX_REFORMAT_ATTEMPTS,
            command_timeout: DEFAULT_COMMAND_TIMEOUT,
            target_os: std::env::consts::OS.to_string(),
        }
    }
}
