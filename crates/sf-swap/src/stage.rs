//! Run state machine: `Start -> Staged -> Validated -> Provisioned -> Swapped`.

use serde::Serialize;
use std::fmt;

/// A state in the lifecycle of one run.
///
/// A failed run is described by the last state it reached together with the
/// state it was trying to enter (see [`Stage::next`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Nothing has happened yet
    Start,
    /// Staging relation materialized
    Staged,
    /// Staged rows passed every integrity check
    Validated,
    /// Target relation exists with the staged shape
    Provisioned,
    /// Target and staging exchanged; terminal success
    Swapped,
}

impl Stage {
    /// The state that follows this one, `None` after `Swapped`
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Start => Some(Stage::Staged),
            Stage::Staged => Some(Stage::Validated),
            Stage::Validated => Some(Stage::Provisioned),
            Stage::Provisioned => Some(Stage::Swapped),
            Stage::Swapped => None,
        }
    }

    /// Name of the component that moves a run into this state
    pub fn component(self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Staged => "staging builder",
            Stage::Validated => "integrity validator",
            Stage::Provisioned => "target provisioner",
            Stage::Swapped => "atomic swapper",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Start => write!(f, "start"),
            Stage::Staged => write!(f, "staged"),
            Stage::Validated => write!(f, "validated"),
            Stage::Provisioned => write!(f, "provisioned"),
            Stage::Swapped => write!(f, "swapped"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_advance_in_order() {
        let mut stage = Stage::Start;
        let mut seen = vec![stage];
        while let Some(next) = stage.next() {
            assert!(next > stage);
            seen.push(next);
            stage = next;
        }
        assert_eq!(
            seen,
            vec![
                Stage::Start,
                Stage::Staged,
                Stage::Validated,
                Stage::Provisioned,
                Stage::Swapped
            ]
        );
    }

    #[test]
    fn test_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Stage::Provisioned).unwrap(),
            "\"provisioned\""
        );
    }
}
