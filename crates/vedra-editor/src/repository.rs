//! The metadata repository collaborator

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use vedra_domain::Record;

use crate::cancel::CancelToken;
use crate::error::EditorError;
use crate::identity::Identity;

/// Server-side draft saved by [`MetadataRepository::save_draft`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftReceipt {
    pub draft_id: String,
}

/// Outcome of a successful publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishReceipt {
    /// Repository id of the published record
    pub record_id: String,
    /// DOI registered for the record, when the repository returns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

impl PublishReceipt {
    pub fn new(record_id: impl Into<String>) -> Self {
        Self {
            record_id: record_id.into(),
            doi: None,
        }
    }

    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    /// Resolver URL for the registered DOI
    pub fn doi_url(&self) -> Option<String> {
        self.doi.as_deref().and_then(vedra_identifiers::doi_url)
    }
}

/// Errors from the metadata repository
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("Request timed out")]
    Timeout,

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Repository returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Could not parse repository response: {0}")]
    Parse(String),

    #[error("Not authorized")]
    Unauthorized,
}

impl RepositoryError {
    /// Whether retrying the same call may succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            RepositoryError::Timeout | RepositoryError::RequestFailed(_) => true,
            RepositoryError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

/// Where drafts are saved and records are published
pub trait MetadataRepository {
    /// Create (`draft_id == None`) or update a server-side draft
    fn save_draft(
        &self,
        record: &Record,
        draft_id: Option<&str>,
        identity: &Identity,
    ) -> impl Future<Output = Result<DraftReceipt, RepositoryError>> + Send;

    /// Publish the record, reusing the draft when one exists
    fn publish(
        &self,
        record: &Record,
        draft_id: Option<&str>,
        identity: &Identity,
    ) -> impl Future<Output = Result<PublishReceipt, RepositoryError>> + Send;
}

/// Run a repository call under a timeout and a cancellation token
pub async fn guarded<T, F>(call: F, timeout: Duration, cancel: &CancelToken) -> Result<T, EditorError>
where
    F: Future<Output = Result<T, RepositoryError>>,
{
    if cancel.is_cancelled() {
        return Err(EditorError::Cancelled);
    }
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(EditorError::Cancelled),
        outcome = tokio::time::timeout(timeout, call) => match outcome {
            Ok(result) => result.map_err(EditorError::Transport),
            Err(_) => Err(EditorError::Transport(RepositoryError::Timeout)),
        },
    }
}
