//! economatic.toml configuration parser.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::schedule::ScheduleWindows;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EconomaticConfig {
    #[serde(default)]
    pub schedule: ScheduleConfig,
    pub state: Option<StateConfig>,
    pub fleet: Option<FleetConfig>,
}

/// Raw schedule values. Every field is required once all sources are merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    pub scale_up_hour: Option<u32>,
    pub scale_up_minute: Option<u32>,
    pub scale_down_hour: Option<u32>,
    pub scale_down_minute: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Path to a TOML fleet manifest.
    pub manifest: Option<PathBuf>,
    pub page_size: Option<usize>,
}

impl EconomaticConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

impl ScheduleConfig {
    /// Layer `overrides` on top of `self`; set values in `overrides` win.
    pub fn with_overrides(self, overrides: ScheduleConfig) -> Self {
        Self {
            scale_up_hour: overrides.scale_up_hour.or(self.scale_up_hour),
            scale_up_minute: overrides.scale_up_minute.or(self.scale_up_minute),
            scale_down_hour: overrides.scale_down_hour.or(self.scale_down_hour),
            scale_down_minute: overrides.scale_down_minute.or(self.scale_down_minute),
        }
    }

    /// Resolve into validated windows. There are no defaults.
    pub fn resolve(&self) -> Result<ScheduleWindows, ConfigError> {
        let scale_up_hour = self
            .scale_up_hour
            .ok_or(ConfigError::MissingSchedule("scale_up_hour"))?;
        let scale_up_minute = self
            .scale_up_minute
            .ok_or(ConfigError::MissingSchedule("scale_up_minute"))?;
        let scale_down_hour = self
            .scale_down_hour
            .ok_or(ConfigError::MissingSchedule("scale_down_hour"))?;
        let scale_down_minute = self
            .scale_down_minute
            .ok_or(ConfigError::MissingSchedule("scale_down_minute"))?;
        ScheduleWindows::new(
            scale_up_hour,
            scale_up_minute,
            scale_down_hour,
            scale_down_minute,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    #[test]
    fn test_parse_full() {
        let config = EconomaticConfig::parse(
            r#"
[schedule]
scale_up_hour = 8
scale_up_minute = 0
scale_down_hour = 2
scale_down_minute = 55

[state]
path = "/var/lib/economatic/economatic.redb"

[fleet]
manifest = "fleet.toml"
page_size = 50
"#,
        )
        .unwrap();

        let windows = config.schedule.resolve().unwrap();
        assert_eq!(windows.scale_up, NaiveTime::from_hms_opt(8, 0, 0).unwrap());
        assert_eq!(windows.scale_down, NaiveTime::from_hms_opt(2, 55, 0).unwrap());
        assert_eq!(config.fleet.unwrap().page_size, Some(50));
    }

    #[test]
    fn test_parse_empty() {
        let config = EconomaticConfig::parse("").unwrap();
        assert_eq!(config.schedule, ScheduleConfig::default());
        assert!(config.state.is_none());
    }

    #[test]
    fn missing_value_is_reported_by_name() {
        let schedule = ScheduleConfig {
            scale_up_hour: Some(8),
            scale_up_minute: Some(0),
            scale_down_hour: Some(19),
            scale_down_minute: None,
        };
        assert!(matches!(
            schedule.resolve(),
            Err(ConfigError::MissingSchedule("scale_down_minute"))
        ));
    }

    #[test]
    fn overrides_take_precedence() {
        let file = ScheduleConfig {
            scale_up_hour: Some(8),
            scale_up_minute: Some(0),
            scale_down_hour: Some(19),
            scale_down_minute: Some(0),
        };
        let env = ScheduleConfig {
            scale_up_hour: Some(7),
            ..Default::default()
        };

        let merged = file.with_overrides(env);
        assert_eq!(merged.scale_up_hour, Some(7));
        assert_eq!(merged.scale_down_hour, Some(19));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(
            EconomaticConfig::parse("[schedule\nscale_up_hour = 8"),
            Err(ConfigError::Parse(_))
        ));
    }
}
