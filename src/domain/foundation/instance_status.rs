//! Lifecycle status shared by work period instances and task instances.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{StateMachine, ValidationError};

/// Status of a generated instance.
///
/// ```text
/// pending --> in_progress --> completed
///    \
///     `----> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InstanceStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl InstanceStatus {
    /// Storage/wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            InstanceStatus::Pending => "pending",
            InstanceStatus::InProgress => "in_progress",
            InstanceStatus::Completed => "completed",
            InstanceStatus::Cancelled => "cancelled",
        }
    }
}

impl StateMachine for InstanceStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use InstanceStatus::*;
        matches!(
            (self, target),
            (Pending, InProgress) | (InProgress, Completed) | (Pending, Cancelled)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use InstanceStatus::*;
        match self {
            Pending => vec![InProgress, Cancelled],
            InProgress => vec![Completed],
            Completed | Cancelled => vec![],
        }
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstanceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InstanceStatus::Pending),
            "in_progress" => Ok(InstanceStatus::InProgress),
            "completed" => Ok(InstanceStatus::Completed),
            "cancelled" => Ok(InstanceStatus::Cancelled),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown instance status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [InstanceStatus; 4] = [
        InstanceStatus::Pending,
        InstanceStatus::InProgress,
        InstanceStatus::Completed,
        InstanceStatus::Cancelled,
    ];

    #[test]
    fn default_is_pending() {
        assert_eq!(InstanceStatus::default(), InstanceStatus::Pending);
    }

    #[test]
    fn pending_can_start_or_cancel() {
        assert_eq!(
            InstanceStatus::Pending.transition_to(InstanceStatus::InProgress),
            Ok(InstanceStatus::InProgress)
        );
        assert_eq!(
            InstanceStatus::Pending.transition_to(InstanceStatus::Cancelled),
            Ok(InstanceStatus::Cancelled)
        );
    }

    #[test]
    fn in_progress_can_only_complete() {
        assert!(InstanceStatus::InProgress.can_transition_to(&InstanceStatus::Completed));
        assert!(!InstanceStatus::InProgress.can_transition_to(&InstanceStatus::Cancelled));
        assert!(!InstanceStatus::InProgress.can_transition_to(&InstanceStatus::Pending));
    }

    #[test]
    fn pending_cannot_jump_to_completed() {
        assert!(InstanceStatus::Pending
            .transition_to(InstanceStatus::Completed)
            .is_err());
    }

    #[test]
    fn completed_and_cancelled_are_terminal() {
        assert!(InstanceStatus::Completed.is_terminal());
        assert!(InstanceStatus::Cancelled.is_terminal());
        for target in ALL {
            assert!(!InstanceStatus::Completed.can_transition_to(&target));
            assert!(!InstanceStatus::Cancelled.can_transition_to(&target));
        }
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{:?} -> {:?}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn round_trips_through_storage_string() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<InstanceStatus>(), Ok(status));
        }
        assert!("archived".parse::<InstanceStatus>().is_err());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&InstanceStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
