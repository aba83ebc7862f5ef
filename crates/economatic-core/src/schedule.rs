//! Daily scale-up and scale-down windows.
//!
//! Each phase has a time of day before which it must not run. The check is a
//! coarse guard against a trigger firing early: a late trigger, or several
//! triggers after the window opens, all proceed.

use chrono::{DateTime, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ScheduleError};
use crate::types::Phase;

/// The time of day each phase becomes eligible to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindows {
    pub scale_up: NaiveTime,
    pub scale_down: NaiveTime,
}

impl ScheduleWindows {
    /// Build windows from hour/minute pairs, rejecting out-of-range values.
    pub fn new(
        scale_up_hour: u32,
        scale_up_minute: u32,
        scale_down_hour: u32,
        scale_down_minute: u32,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            scale_up: time_of_day(
                ("scale_up_hour", scale_up_hour),
                ("scale_up_minute", scale_up_minute),
            )?,
            scale_down: time_of_day(
                ("scale_down_hour", scale_down_hour),
                ("scale_down_minute", scale_down_minute),
            )?,
        })
    }

    pub fn opens_at(&self, phase: Phase) -> NaiveTime {
        match phase {
            Phase::Up => self.scale_up,
            Phase::Down => self.scale_down,
        }
    }

    /// Fail if `now` is strictly before the window for `phase` on the same
    /// calendar day, in `now`'s own time zone.
    pub fn check<Tz: TimeZone>(&self, phase: Phase, now: &DateTime<Tz>) -> Result<(), ScheduleError> {
        let opens_at = self.opens_at(phase);
        let now = now.time();
        if now < opens_at {
            return Err(ScheduleError::OutOfWindow {
                phase,
                opens_at,
                now,
            });
        }
        Ok(())
    }
}

fn time_of_day(
    (hour_field, hour): (&'static str, u32),
    (minute_field, minute): (&'static str, u32),
) -> Result<NaiveTime, ConfigError> {
    if hour > 23 {
        return Err(ConfigError::InvalidSchedule {
            field: hour_field,
            value: hour,
        });
    }
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or(ConfigError::InvalidSchedule {
        field: minute_field,
        value: minute,
    })
}
