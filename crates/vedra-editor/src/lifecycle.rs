//! Editing session state machine
//!
//! State transitions:
//! ```text
//! Editing ↔ Previewing
//!    ↓          ↓
//! Publishing(Validating) → Editing (validation errors)
//!    ↓
//! Publishing(Submitting) → Editing (transport failure, cancelled)
//!    ↓
//! Published
//! ```

use serde::{Deserialize, Serialize};

/// Step of an in-flight publish
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishPhase {
    /// Checking the record against the publish rules
    Validating,
    /// Waiting for the metadata repository
    Submitting,
}

/// The state of an editing session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleState {
    /// The record accepts edits
    #[default]
    Editing,
    /// Read-only preview overlay
    Previewing,
    /// A publish is in flight
    Publishing(PublishPhase),
    /// Handed to the repository; terminal
    Published,
}

impl LifecycleState {
    /// Check if a state transition is valid
    pub fn can_transition_to(&self, target: &LifecycleState) -> bool {
        use LifecycleState::*;
        use PublishPhase::*;
        match (self, target) {
            (Editing, Previewing) => true,
            (Editing, Publishing(Validating)) => true,

            (Previewing, Editing) => true,
            (Previewing, Publishing(Validating)) => true,

            // Validation failed, or passed and the record goes out
            (Publishing(Validating), Editing) => true,
            (Publishing(Validating), Publishing(Submitting)) => true,

            (Publishing(Submitting), Published) => true,
            (Publishing(Submitting), Editing) => true,

            // Published is terminal
            (Published, _) => false,

            _ => false,
        }
    }

    /// Get valid next states from current state
    pub fn valid_transitions(&self) -> Vec<LifecycleState> {
        use LifecycleState::*;
        use PublishPhase::*;
        match self {
            Editing => vec![Previewing, Publishing(Validating)],
            Previewing => vec![Editing, Publishing(Validating)],
            Publishing(Validating) => vec![Editing, Publishing(Submitting)],
            Publishing(Submitting) => vec![Published, Editing],
            Published => vec![],
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Published)
    }

    /// A publish is in flight; controls that start another should be disabled
    pub fn is_busy(&self) -> bool {
        matches!(self, LifecycleState::Publishing(_))
    }

    /// The record accepts mutations
    pub fn is_editable(&self) -> bool {
        matches!(self, LifecycleState::Editing)
    }

    pub fn description(&self) -> &'static str {
        match self {
            LifecycleState::Editing => "editing",
            LifecycleState::Previewing => "previewing",
            LifecycleState::Publishing(PublishPhase::Validating) => "validating",
            LifecycleState::Publishing(PublishPhase::Submitting) => "submitting",
            LifecycleState::Published => "published",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LifecycleState::Editing => write!(f, "EDITING"),
            LifecycleState::Previewing => write!(f, "PREVIEWING"),
            LifecycleState::Publishing(PublishPhase::Validating) => write!(f, "PUBLISHING(VALIDATING)"),
            LifecycleState::Publishing(PublishPhase::Submitting) => write!(f, "PUBLISHING(SUBMITTING)"),
            LifecycleState::Published => write!(f, "PUBLISHED"),
        }
    }
}
