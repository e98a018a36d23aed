//! Visibility level and embargo

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Who can see the published record and its files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VisibilityLevel {
    /// Metadata is public, files are restricted
    #[serde(rename = "Files only")]
    FilesOnly,
    /// Everything is public
    #[default]
    Public,
    /// Everything is restricted; the only level that allows an embargo
    Restricted,
}

impl VisibilityLevel {
    pub fn all() -> &'static [VisibilityLevel] {
        &[
            VisibilityLevel::FilesOnly,
            VisibilityLevel::Public,
            VisibilityLevel::Restricted,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            VisibilityLevel::FilesOnly => "Files only",
            VisibilityLevel::Public => "Public",
            VisibilityLevel::Restricted => "Restricted",
        }
    }

    pub fn allows_embargo(&self) -> bool {
        matches!(self, VisibilityLevel::Restricted)
    }
}

impl std::fmt::Display for VisibilityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error parsing a visibility level label
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown visibility level: {0}")]
pub struct UnknownVisibilityLevel(pub String);

impl FromStr for VisibilityLevel {
    type Err = UnknownVisibilityLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "files only" | "files-only" | "files_only" => Ok(VisibilityLevel::FilesOnly),
            "public" => Ok(VisibilityLevel::Public),
            "restricted" => Ok(VisibilityLevel::Restricted),
            _ => Err(UnknownVisibilityLevel(s.to_string())),
        }
    }
}

/// Time-delayed release of a restricted record
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Embargo {
    pub enabled: bool,
    /// ISO date on which the embargo lifts
    pub until: String,
    pub reason: String,
}

impl Embargo {
    /// Disabled with no date or reason
    pub fn is_cleared(&self) -> bool {
        !self.enabled && self.until.is_empty() && self.reason.is_empty()
    }
}

/// The visibility section
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Visibility {
    pub level: VisibilityLevel,
    pub embargo: Embargo,
}

impl Visibility {
    /// An enabled embargo requires the Restricted level
    pub fn is_consistent(&self) -> bool {
        !self.embargo.enabled || self.level.allows_embargo()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_labels_round_trip() {
        for level in VisibilityLevel::all() {
            let json = serde_json::to_string(level).unwrap();
            assert_eq!(json, format!("\"{}\"", level.as_str()));
            let back: VisibilityLevel = serde_json::from_str(&json).unwrap();
            assert_eq!(*level, back);
            assert_eq!(level.as_str().parse::<VisibilityLevel>().unwrap(), *level);
        }
    }

    #[test]
    fn test_parse_unknown_level() {
        assert!("secret".parse::<VisibilityLevel>().is_err());
    }

    #[test]
    fn test_consistency() {
        let mut v = Visibility::default();
        assert!(v.is_consistent());
        v.embargo.enabled = true;
        assert!(!v.is_consistent());
        v.level = VisibilityLevel::Restricted;
        assert!(v.is_consistent());
    }
}
