//! Request and response bodies of the repository API

use serde::{Deserialize, Serialize};

use vedra_domain::{Record, VisibilityLevel};

/// Who may see a record or its files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessLevel {
    Public,
    Restricted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbargoAccess {
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub record: AccessLevel,
    pub files: AccessLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embargo: Option<EmbargoAccess>,
}

impl Access {
    pub fn from_record(record: &Record) -> Self {
        let visibility = &record.visibility;
        let (record_level, files_level) = match visibility.level {
            VisibilityLevel::Public => (AccessLevel::Public, AccessLevel::Public),
            VisibilityLevel::FilesOnly => (AccessLevel::Public, AccessLevel::Restricted),
            VisibilityLevel::Restricted => (AccessLevel::Restricted, AccessLevel::Restricted),
        };
        let embargo = &visibility.embargo;
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.trim().to_string());
        Self {
            record: record_level,
            files: files_level,
            embargo: embargo.enabled.then(|| EmbargoAccess {
                active: true,
                until: non_empty(&embargo.until),
                reason: non_empty(&embargo.reason),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilesOptions {
    pub enabled: bool,
}

/// Body of draft create and update requests
#[derive(Debug, Clone, Serialize)]
pub struct DraftPayload<'a> {
    pub access: Access,
    pub files: FilesOptions,
    pub metadata: &'a Record,
}

impl<'a> DraftPayload<'a> {
    pub fn new(record: &'a Record) -> Self {
        Self {
            access: Access::from_record(record),
            files: FilesOptions {
                enabled: !record.files.is_empty(),
            },
            metadata: record,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DoiPid {
    #[serde(default)]
    pub identifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Pids {
    #[serde(default)]
    pub doi: Option<DoiPid>,
}

/// Draft or record as returned by create, update and publish
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DraftResponse {
    pub id: String,
    #[serde(default)]
    pub pids: Pids,
    #[serde(default)]
    pub is_published: bool,
}

impl DraftResponse {
    pub fn doi(&self) -> Option<&str> {
        self.pids
            .doi
            .as_ref()
            .map(|d| d.identifier.as_str())
            .filter(|d| !d.is_empty())
    }
}

/// One hit of a record search
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordHit {
    pub id: String,
    #[serde(default)]
    pub created: Option<String>,
    #[serde(default)]
    pub metadata: serde_json::Value,
}

impl RecordHit {
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub hits: Vec<RecordHit>,
    #[serde(default)]
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub hits: SearchHits,
    #[serde(default)]
    pub aggregations: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileInfo {
    pub key: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub checksum: Option<String>,
    #[serde(default)]
    pub mimetype: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FileListing {
    #[serde(default)]
    pub entries: Vec<FileInfo>,
}

impl FileListing {
    pub fn total_size(&self) -> u64 {
        self.entries.iter().map(|f| f.size).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadRequest<'a> {
    pub filename: &'a str,
    pub content_type: &'a str,
}

/// Pre-signed slot returned by `POST /papers/uploads`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSlot {
    pub upload_url: String,
    pub object_key: String,
    #[serde(default)]
    pub uploader_id: Option<serde_json::Value>,
    #[serde(default)]
    pub uploader_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub scope_code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
