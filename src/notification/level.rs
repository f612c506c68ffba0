//! Notification severity level
//!
//! The level is derived from an exit code:
//! - `0` → SUCCESS
//! - non-zero → FAILURE
//! - unknown (e.g. a watched PID that is not our child) → INFO

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Severity level for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    #[default]
    Info,
    Success,
    Failure,
}

impl std::fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl NotificationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "info",
            NotificationLevel::Success => "success",
            NotificationLevel::Failure => "failure",
        }
    }

    /// Classify a (possibly unknown) exit code
    pub fn from_exit_code(exit_code: Option<i32>) -> Self {
        match exit_code {
            Some(0) => NotificationLevel::Success,
            Some(_) => NotificationLevel::Failure,
            None => NotificationLevel::Info,
        }
    }
}
