//! The publication record being edited

use serde::{Deserialize, Serialize};

use crate::{
    BasicInformation, Creator, Description, FileEntry, Funding, License, PublishingInformation,
    RecommendedInformation, Reference, Title, Visibility,
};

/// Version of the serialized record layout written by this crate
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

fn default_schema_version() -> u32 {
    CURRENT_SCHEMA_VERSION
}

/// Errors reading or writing a serialized record
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("Invalid record JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported record schema version {found} (this build reads up to {supported})")]
    UnsupportedSchemaVersion { found: u32, supported: u32 },
}

/// One publication-in-progress
///
/// The JSON form of this struct is the contract with the metadata repository.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub basic_information: BasicInformation,
    #[serde(default)]
    pub recommended_information: RecommendedInformation,
    #[serde(default)]
    pub funding: Funding,
    #[serde(default)]
    pub references: Vec<Reference>,
    #[serde(default)]
    pub publishing_information: PublishingInformation,
    #[serde(default)]
    pub visibility: Visibility,
}

impl Default for Record {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            files: Vec::new(),
            basic_information: BasicInformation::default(),
            recommended_information: RecommendedInformation::default(),
            funding: Funding::default(),
            references: Vec::new(),
            publishing_information: PublishingInformation::default(),
            visibility: Visibility::default(),
        }
    }
}

impl Record {
    /// A record prefilled the way a new editing session starts: one empty
    /// main title, one empty creator, one empty abstract, CC-BY-4.0, English.
    pub fn new() -> Self {
        let mut record = Self::empty();
        let basic = &mut record.basic_information;
        basic.titles.push(Title::new("").with_id("1").with_type("main"));
        basic.creators.push(Creator::new("").with_id("1"));
        basic
            .descriptions
            .push(Description::new("").with_id("1").with_type("abstract"));
        basic.licenses.push(License::cc_by_4().with_id("1"));
        record
            .recommended_information
            .languages
            .push("eng".to_string());
        record
    }

    /// A record with no entries in any collection
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a record, rejecting layouts newer than this build understands
    pub fn from_json(json: &str) -> Result<Self, RecordError> {
        let record: Record = serde_json::from_str(json)?;
        if record.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(RecordError::UnsupportedSchemaVersion {
                found: record.schema_version,
                supported: CURRENT_SCHEMA_VERSION,
            });
        }
        Ok(record)
    }

    pub fn to_json(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, RecordError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Sum of all attached file sizes in bytes
    pub fn total_file_bytes(&self) -> u64 {
        self.files
            .iter()
            .fold(0u64, |acc, f| acc.saturating_add(f.size))
    }

    /// First title with non-blank text
    pub fn primary_title(&self) -> Option<&str> {
        self.basic_information
            .titles
            .iter()
            .find(|t| !t.is_blank())
            .map(|t| t.title.trim())
    }
}
