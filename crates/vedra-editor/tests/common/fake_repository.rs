//! In-memory metadata repository

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vedra_domain::Record;
use vedra_editor::{DraftReceipt, Identity, MetadataRepository, PublishReceipt, RepositoryError};

/// Records every call; can be told to fail or stall
#[derive(Debug, Clone, Default)]
pub struct FakeRepository {
    drafts_saved: Arc<AtomicUsize>,
    published: Arc<Mutex<Vec<Record>>>,
    failure: Option<RepositoryError>,
    publish_failure: Option<RepositoryError>,
    delay: Option<Duration>,
    doi: Option<String>,
}

impl FakeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with `error`
    pub fn failing(error: RepositoryError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    /// Drafts save fine; every publish fails with `error`
    pub fn failing_publish(error: RepositoryError) -> Self {
        Self {
            publish_failure: Some(error),
            ..Self::default()
        }
    }

    /// Every call sleeps for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Publish receipts carry `doi`
    pub fn with_doi(mut self, doi: impl Into<String>) -> Self {
        self.doi = Some(doi.into());
        self
    }

    pub fn drafts_saved(&self) -> usize {
        self.drafts_saved.load(Ordering::SeqCst)
    }

    /// Records handed over by successful publishes
    pub fn published(&self) -> Vec<Record> {
        self.published.lock().unwrap().clone()
    }

    async fn pause(&self) {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl MetadataRepository for FakeRepository {
    async fn save_draft(
        &self,
        _record: &Record,
        draft_id: Option<&str>,
        _identity: &Identity,
    ) -> Result<DraftReceipt, RepositoryError> {
        self.pause().await;
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        let n = self.drafts_saved.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(DraftReceipt {
            draft_id: draft_id
                .map(str::to_string)
                .unwrap_or_else(|| format!("draft-{}", n)),
        })
    }

    async fn publish(
        &self,
        record: &Record,
        draft_id: Option<&str>,
        _identity: &Identity,
    ) -> Result<PublishReceipt, RepositoryError> {
        self.pause().await;
        if let Some(err) = self.failure.as_ref().or(self.publish_failure.as_ref()) {
            return Err(err.clone());
        }
        let record_id = draft_id.unwrap_or("rec-1").to_string();
        self.published.lock().unwrap().push(record.clone());
        let receipt = PublishReceipt::new(record_id);
        Ok(match &self.doi {
            Some(doi) => receipt.with_doi(doi.clone()),
            None => receipt,
        })
    }
}
