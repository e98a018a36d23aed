//! Files attached to a record
//!
//! Upload state transitions:
//! ```text
//! Queued → Uploading → Done
//!    ↓         ↓
//!  Error ←─────┘
//!    ↓
//!  Queued (retry)
//! ```

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Upload status of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Accepted into the record, waiting for the transport
    #[default]
    Queued,
    /// Bytes are being transferred
    Uploading,
    /// Transfer finished
    Done,
    /// Transfer failed
    Error,
}

impl FileStatus {
    /// Check if a status transition is valid
    pub fn can_transition_to(&self, target: &FileStatus) -> bool {
        match (self, target) {
            // Progress updates within the same status are always accepted
            (a, b) if a == b => !matches!(a, FileStatus::Done),

            (FileStatus::Queued, FileStatus::Uploading) => true,
            (FileStatus::Queued, FileStatus::Error) => true,

            (FileStatus::Uploading, FileStatus::Done) => true,
            (FileStatus::Uploading, FileStatus::Error) => true,

            // A failed upload may be queued again
            (FileStatus::Error, FileStatus::Queued) => true,

            _ => false,
        }
    }

    /// Done is the only terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(self, FileStatus::Done)
    }
}

impl std::fmt::Display for FileStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileStatus::Queued => write!(f, "queued"),
            FileStatus::Uploading => write!(f, "uploading"),
            FileStatus::Done => write!(f, "done"),
            FileStatus::Error => write!(f, "error"),
        }
    }
}

/// A file attached to the record
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: ItemId,
    pub name: String,
    /// Size in bytes
    pub size: u64,
    pub status: FileStatus,
    /// Upload progress, 0-100
    pub progress: u8,
}

impl FileEntry {
    /// A freshly accepted file, queued with no progress
    pub fn queued(name: impl Into<String>, size: u64) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            size,
            status: FileStatus::Queued,
            progress: 0,
        }
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queued_transitions() {
        let s = FileStatus::Queued;
        assert!(s.can_transition_to(&FileStatus::Uploading));
        assert!(s.can_transition_to(&FileStatus::Error));
        assert!(!s.can_transition_to(&FileStatus::Done));
    }

    #[test]
    fn test_uploading_transitions() {
        let s = FileStatus::Uploading;
        assert!(s.can_transition_to(&FileStatus::Uploading));
        assert!(s.can_transition_to(&FileStatus::Done));
        assert!(s.can_transition_to(&FileStatus::Error));
        assert!(!s.can_transition_to(&FileStatus::Queued));
    }

    #[test]
    fn test_done_is_terminal() {
        let s = FileStatus::Done;
        assert!(s.is_terminal());
        assert!(!s.can_transition_to(&FileStatus::Done));
        assert!(!s.can_transition_to(&FileStatus::Error));
        assert!(!s.can_transition_to(&FileStatus::Queued));
    }

    #[test]
    fn test_error_can_retry() {
        assert!(FileStatus::Error.can_transition_to(&FileStatus::Queued));
        assert!(!FileStatus::Error.can_transition_to(&FileStatus::Done));
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&FileStatus::Uploading).unwrap();
        assert_eq!(json, "\"uploading\"");
    }

    #[test]
    fn test_queued_entry() {
        let f = FileEntry::queued("data.csv", 42);
        assert_eq!(f.status, FileStatus::Queued);
        assert_eq!(f.progress, 0);
        assert_eq!(f.size, 42);
    }
}
