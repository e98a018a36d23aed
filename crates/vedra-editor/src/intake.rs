//! File intake and upload progress
//!
//! Batches of dropped files are accepted all-or-nothing against
//! [`CapacityLimits`]. Upload progress arrives as [`UploadEvent`]s from the
//! transport and is turned into a [`FilePatch`] for the matching entry.

use serde::{Deserialize, Serialize};

use vedra_domain::{FileEntry, FileStatus};

use crate::error::CapacityError;
use crate::patch::FilePatch;

/// Default maximum number of files per record
pub const MAX_FILES: usize = 100;

/// Default maximum total size of all files, 50 GiB
pub const MAX_TOTAL_BYTES: u64 = 50 * 1024 * 1024 * 1024;

/// Per-record file limits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CapacityLimits {
    pub max_files: usize,
    pub max_total_bytes: u64,
}

impl Default for CapacityLimits {
    fn default() -> Self {
        Self {
            max_files: MAX_FILES,
            max_total_bytes: MAX_TOTAL_BYTES,
        }
    }
}

/// A file offered for intake
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileCandidate {
    pub name: String,
    pub size: u64,
}

impl FileCandidate {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Non-empty and free of path separators
pub fn is_valid_filename(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains('/')
}

/// Check a whole batch against the files already attached
pub fn check_batch(
    existing: &[FileEntry],
    batch: &[FileCandidate],
    limits: &CapacityLimits,
) -> Result<(), CapacityError> {
    if let Some(bad) = batch.iter().find(|c| !is_valid_filename(&c.name)) {
        return Err(CapacityError::InvalidFilename(bad.name.clone()));
    }

    let current = existing.len();
    if current + batch.len() > limits.max_files {
        return Err(CapacityError::TooManyFiles {
            current,
            incoming: batch.len(),
            max: limits.max_files,
        });
    }

    let current_bytes = existing
        .iter()
        .fold(0u64, |acc, f| acc.saturating_add(f.size));
    let incoming_bytes = batch
        .iter()
        .fold(0u64, |acc, c| acc.saturating_add(c.size));
    if current_bytes.saturating_add(incoming_bytes) > limits.max_total_bytes {
        return Err(CapacityError::TooLarge {
            current_bytes,
            incoming_bytes,
            max_bytes: limits.max_total_bytes,
        });
    }

    Ok(())
}

/// Status or progress report from the upload transport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadEvent {
    pub file_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FileStatus>,
    /// Percent complete; clamped to 0-100 when merged
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<f64>,
}

impl UploadEvent {
    pub fn status(file_id: impl Into<String>, status: FileStatus) -> Self {
        Self {
            file_id: file_id.into(),
            status: Some(status),
            progress: None,
        }
    }

    pub fn progress(file_id: impl Into<String>, progress: f64) -> Self {
        Self {
            file_id: file_id.into(),
            status: None,
            progress: Some(progress),
        }
    }

    /// Patch to merge into `current`, or `None` when the status change is
    /// not a valid transition
    pub fn to_patch(&self, current: &FileEntry) -> Option<FilePatch> {
        let target = self.status.unwrap_or(current.status);
        if !current.status.can_transition_to(&target) {
            return None;
        }

        let progress = match target {
            FileStatus::Done => Some(100),
            // A retried file starts over unless the event says otherwise
            FileStatus::Queued if current.status == FileStatus::Error => {
                Some(self.progress.map(clamp_percent).unwrap_or(0))
            }
            _ => self.progress.map(clamp_percent),
        };

        Some(FilePatch {
            name: None,
            status: self.status,
            progress,
        })
    }
}

fn clamp_percent(value: f64) -> u8 {
    if value.is_nan() {
        0
    } else {
        value.clamp(0.0, 100.0).round() as u8
    }
}

/// Human-readable size: `"0 Bytes"`, `"1.5 KB"`, `"2 MB"`, ... up to GB
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}
