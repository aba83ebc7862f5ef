pub mod config;
pub mod error;
pub mod schedule;
pub mod types;

pub use config::EconomaticConfig;
pub use error::{ConfigError, ScheduleError};
pub use schedule::ScheduleWindows;
pub use types::*;
