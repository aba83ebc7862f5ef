//! Configuration and schedule errors.

use chrono::NaiveTime;
use thiserror::Error;

use crate::types::Phase;

/// Errors raised while loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required schedule value: {0}")]
    MissingSchedule(&'static str),

    #[error("invalid schedule value for {field}: {value}")]
    InvalidSchedule { field: &'static str, value: u32 },

    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// The invocation arrived before the window for its phase opened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("executing {phase} before scheduled time {opens_at} (now {now})")]
    OutOfWindow {
        phase: Phase,
        opens_at: NaiveTime,
        now: NaiveTime,
    },
}
