//! Shared types used across Economatic crates.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Label key operators set on a group to opt it out of scaling.
pub const EXCLUSION_LABEL: &str = "economatic";

/// Which half of the cycle runs next.
///
/// A fleet with no recorded run-state starts on the scale-up half.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Phase {
    /// Restore stored capacity and clear the snapshots.
    #[default]
    Up,
    /// Snapshot current capacity and scale to zero.
    Down,
}

impl Phase {
    /// The phase that follows this one.
    pub fn flip(self) -> Self {
        match self {
            Phase::Up => Phase::Down,
            Phase::Down => Phase::Up,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Phase::Up => "UP",
            Phase::Down => "DOWN",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A managed group as reported by the fleet provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub minimum: u32,
    pub desired: u32,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl Group {
    pub fn new(name: &str, minimum: u32, desired: u32) -> Self {
        Self {
            name: name.to_string(),
            minimum,
            desired,
            labels: HashMap::new(),
        }
    }

    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }

    /// True when the group carries `economatic=false`, compared without
    /// regard to letter case on either side.
    pub fn is_opted_out(&self) -> bool {
        self.labels.iter().any(|(key, value)| {
            key.eq_ignore_ascii_case(EXCLUSION_LABEL) && value.eq_ignore_ascii_case("false")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_alternates() {
        assert_eq!(Phase::Up.flip(), Phase::Down);
        assert_eq!(Phase::Down.flip(), Phase::Up);
        assert_eq!(Phase::Up.flip().flip(), Phase::Up);
    }

    #[test]
    fn phase_defaults_to_up() {
        assert_eq!(Phase::default(), Phase::Up);
    }

    #[test]
    fn phase_display_matches_label() {
        assert_eq!(Phase::Up.to_string(), "UP");
        assert_eq!(Phase::Down.to_string(), "DOWN");
    }

    #[test]
    fn opt_out_ignores_case() {
        for (key, value) in [
            ("economatic", "false"),
            ("Economatic", "FALSE"),
            ("ECONOMATIC", "False"),
        ] {
            let group = Group::new("web", 2, 4).with_label(key, value);
            assert!(group.is_opted_out(), "{key}={value} should opt out");
        }
    }

    #[test]
    fn other_labels_do_not_opt_out() {
        let unlabelled = Group::new("web", 2, 4);
        assert!(!unlabelled.is_opted_out());

        let enabled = Group::new("web", 2, 4).with_label("economatic", "true");
        assert!(!enabled.is_opted_out());

        let unrelated = Group::new("web", 2, 4).with_label("team", "false");
        assert!(!unrelated.is_opted_out());

        let mangled = Group::new("web", 2, 4).with_label("economatic ", "false");
        assert!(!mangled.is_opted_out());
    }
}
