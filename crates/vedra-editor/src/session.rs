//! The editing session
//!
//! [`EditingSession`] owns one record and is the only place it changes. Every
//! edit goes through the [`MutationEngine`]; publish and save-draft talk to the
//! injected [`MetadataRepository`] under the configured timeout and a
//! caller-supplied [`CancelToken`].

use std::sync::mpsc::Receiver;
use tracing::{debug, error, info, warn};

use vedra_domain::{
    error_messages, validate_for_publish, FileEntry, ItemId, Record, ValidationError,
    VisibilityLevel,
};
use vedra_identifiers::{ItemIdGenerator, RandomIdGenerator};

use crate::cancel::CancelToken;
use crate::completeness::Section;
use crate::config::{EditorConfig, MisusePolicy};
use crate::error::{EditorError, LifecycleError, MutationError, Result};
use crate::history::History;
use crate::identity::IdentityProvider;
use crate::intake::{check_batch, FileCandidate, UploadEvent};
use crate::lifecycle::{LifecycleState, PublishPhase};
use crate::mutation::{Item, Mutation, MutationEngine};
use crate::patch::ItemPatch;
use crate::path::{CollectionPath, FieldPath, FieldValue};
use crate::preview::PreviewSummary;
use crate::repository::{guarded, DraftReceipt, MetadataRepository, PublishReceipt};

/// One record being prepared for publication
pub struct EditingSession<R, P, G = RandomIdGenerator> {
    record: Record,
    state: LifecycleState,
    engine: MutationEngine<G>,
    history: History,
    repository: R,
    identity: P,
    config: EditorConfig,
    draft_id: Option<String>,
    last_errors: Vec<String>,
    published: Option<PublishReceipt>,
}

impl<R, P> EditingSession<R, P, RandomIdGenerator>
where
    R: MetadataRepository,
    P: IdentityProvider,
{
    /// Start a session on a fresh, prefilled record
    pub fn new(repository: R, identity: P, config: EditorConfig) -> Self {
        Self::with_id_generator(repository, identity, config, RandomIdGenerator)
    }
}

impl<R, P, G> EditingSession<R, P, G>
where
    R: MetadataRepository,
    P: IdentityProvider,
    G: ItemIdGenerator,
{
    pub fn with_id_generator(repository: R, identity: P, config: EditorConfig, ids: G) -> Self {
        Self {
            record: Record::new(),
            state: LifecycleState::Editing,
            engine: MutationEngine::new(ids),
            history: History::default(),
            repository,
            identity,
            config,
            draft_id: None,
            last_errors: Vec::new(),
            published: None,
        }
    }

    /// Replace the starting record, e.g. one loaded from disk
    pub fn with_record(mut self, record: Record) -> Self {
        self.record = record;
        self.history.clear();
        self
    }

    /// Resume an existing server-side draft
    pub fn with_draft_id(mut self, draft_id: impl Into<String>) -> Self {
        self.draft_id = Some(draft_id.into());
        self
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn into_record(self) -> Record {
        self.record
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn draft_id(&self) -> Option<&str> {
        self.draft_id.as_deref()
    }

    /// Messages from the last failed publish or save
    pub fn last_errors(&self) -> &[String] {
        &self.last_errors
    }

    pub fn published(&self) -> Option<&PublishReceipt> {
        self.published.as_ref()
    }

    /// A publish is in flight
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    pub fn set(&mut self, path: FieldPath, value: impl Into<FieldValue>) -> Result<()> {
        self.ensure_editable()?;
        let next = self
            .engine
            .set(&self.record, path, value.into())
            .map_err(|e| self.mutation_failed(e))?;
        self.commit(next);
        Ok(())
    }

    /// Set a field addressed by its dot path
    pub fn set_path(&mut self, path: &str, value: impl Into<FieldValue>) -> Result<()> {
        let path = path.parse::<FieldPath>().map_err(|e| self.mutation_failed(e))?;
        self.set(path, value)
    }

    pub fn add_item(&mut self, path: CollectionPath, item: impl Into<Item>) -> Result<ItemId> {
        self.ensure_editable()?;
        let (next, id) = self
            .engine
            .add_item(&self.record, path, item.into())
            .map_err(|e| self.mutation_failed(e))?;
        self.commit(next);
        Ok(id)
    }

    /// Remove an entry; unknown ids leave the record as it is
    pub fn remove_item(&mut self, path: CollectionPath, id: &str) -> Result<()> {
        self.ensure_editable()?;
        let next = self.engine.remove_item(&self.record, path, id);
        self.commit(next);
        Ok(())
    }

    pub fn update_item(
        &mut self,
        path: CollectionPath,
        id: &str,
        patch: impl Into<ItemPatch>,
    ) -> Result<()> {
        self.ensure_editable()?;
        let next = self
            .engine
            .update_item(&self.record, path, id, &patch.into())
            .map_err(|e| self.mutation_failed(e))?;
        self.commit(next);
        Ok(())
    }

    /// Apply a serialized mutation
    pub fn apply(&mut self, mutation: &Mutation) -> Result<Option<ItemId>> {
        self.ensure_editable()?;
        let (next, id) = self
            .engine
            .apply(&self.record, mutation)
            .map_err(|e| self.mutation_failed(e))?;
        self.commit(next);
        Ok(id)
    }

    pub fn set_visibility_level(&mut self, level: VisibilityLevel) -> Result<()> {
        self.set(FieldPath::Level, level)
    }

    pub fn set_embargo_enabled(&mut self, enabled: bool) -> Result<()> {
        self.set(FieldPath::EmbargoEnabled, enabled)
    }

    pub fn set_embargo_until(&mut self, until: impl Into<String>) -> Result<()> {
        self.set(FieldPath::EmbargoUntil, until.into())
    }

    pub fn set_embargo_reason(&mut self, reason: impl Into<String>) -> Result<()> {
        self.set(FieldPath::EmbargoReason, reason.into())
    }

    /// Add a keyword. Returns false when it is blank or already present.
    pub fn add_keyword(&mut self, keyword: &str) -> Result<bool> {
        self.add_to_list(FieldPath::Keywords, keyword)
    }

    pub fn remove_keyword(&mut self, keyword: &str) -> Result<bool> {
        self.remove_from_list(FieldPath::Keywords, keyword)
    }

    /// Add a language code. Returns false when it is blank or already present.
    pub fn add_language(&mut self, code: &str) -> Result<bool> {
        self.add_to_list(FieldPath::Languages, code)
    }

    pub fn remove_language(&mut self, code: &str) -> Result<bool> {
        self.remove_from_list(FieldPath::Languages, code)
    }

    fn list(&self, path: FieldPath) -> &[String] {
        match path {
            FieldPath::Languages => &self.record.recommended_information.languages,
            _ => &self.record.recommended_information.keywords,
        }
    }

    fn add_to_list(&mut self, path: FieldPath, value: &str) -> Result<bool> {
        let value = value.trim();
        if value.is_empty() || self.list(path).iter().any(|v| v == value) {
            return Ok(false);
        }
        let mut list = self.list(path).to_vec();
        list.push(value.to_string());
        self.set(path, list)?;
        Ok(true)
    }

    fn remove_from_list(&mut self, path: FieldPath, value: &str) -> Result<bool> {
        let value = value.trim();
        let list: Vec<String> = self
            .list(path)
            .iter()
            .filter(|v| v.as_str() != value)
            .cloned()
            .collect();
        if list.len() == self.list(path).len() {
            return Ok(false);
        }
        self.set(path, list)?;
        Ok(true)
    }

    pub fn undo(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        match self.history.undo(&self.record) {
            Some(previous) => {
                self.record = previous;
                debug!("undo");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn redo(&mut self) -> Result<bool> {
        self.ensure_editable()?;
        match self.history.redo(&self.record) {
            Some(next) => {
                self.record = next;
                debug!("redo");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // =========================================================================
    // File intake
    // =========================================================================

    /// Attach a batch of files as queued entries, all or nothing
    pub fn add_files(&mut self, batch: &[FileCandidate]) -> Result<Vec<ItemId>> {
        self.ensure_editable()?;
        if let Err(err) = check_batch(&self.record.files, batch, &self.config.limits) {
            warn!(files = batch.len(), error = %err, "rejected file batch");
            return Err(err.into());
        }

        let mut next = self.record.clone();
        let mut ids = Vec::with_capacity(batch.len());
        for candidate in batch {
            let entry = FileEntry::queued(candidate.name.clone(), candidate.size);
            let (added, id) = self
                .engine
                .add_item(&next, CollectionPath::Files, entry.into())
                .map_err(|e| self.mutation_failed(e))?;
            next = added;
            ids.push(id);
        }
        self.commit(next);
        info!(files = ids.len(), total = self.record.file_count(), "accepted file batch");
        Ok(ids)
    }

    /// Merge an upload progress report. Returns false when the event was
    /// dropped (unknown file or invalid status transition).
    pub fn apply_upload_event(&mut self, event: &UploadEvent) -> bool {
        let Some(current) = self.record.files.iter().find(|f| f.id == event.file_id) else {
            warn!(file_id = %event.file_id, "dropped upload event for unknown file");
            return false;
        };
        let Some(patch) = event.to_patch(current) else {
            warn!(
                file_id = %event.file_id,
                from = %current.status,
                to = ?event.status,
                "dropped upload event with invalid status transition"
            );
            return false;
        };

        match self
            .engine
            .update_item(&self.record, CollectionPath::Files, &event.file_id, &patch.into())
        {
            // Progress is not an undoable edit
            Ok(next) => {
                self.record = next;
                true
            }
            Err(err) => {
                warn!(file_id = %event.file_id, error = %err, "dropped upload event");
                false
            }
        }
    }

    /// Merge every event currently waiting on `events`; returns how many applied
    pub fn drain_upload_events(&mut self, events: &Receiver<UploadEvent>) -> usize {
        events
            .try_iter()
            .filter(|event| self.apply_upload_event(event))
            .count()
    }

    // =========================================================================
    // Completeness and validation
    // =========================================================================

    pub fn is_complete(&self, section: Section) -> bool {
        self.config.completeness.is_complete(&self.record, section)
    }

    pub fn incomplete_sections(&self) -> Vec<Section> {
        self.config.completeness.incomplete_sections(&self.record)
    }

    /// Publish-time checks on the current record, warnings included
    pub fn validate(&self) -> Vec<ValidationError> {
        validate_for_publish(&self.record)
    }

    pub fn summary(&self) -> PreviewSummary {
        PreviewSummary::from_record(&self.record)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Enter the read-only preview
    pub fn preview(&mut self) -> Result<PreviewSummary> {
        self.transition(LifecycleState::Previewing)?;
        Ok(self.summary())
    }

    pub fn close_preview(&mut self) -> Result<()> {
        self.transition(LifecycleState::Editing)
    }

    /// Public link to the published record
    pub fn share_link(&self) -> Option<String> {
        self.published.as_ref().map(|receipt| {
            format!(
                "{}/records/{}",
                self.config.api.share_base_url.trim_end_matches('/'),
                receipt.record_id
            )
        })
    }

    /// Create or update the server-side draft. The lifecycle state does not change.
    pub async fn save_draft(&mut self, cancel: &CancelToken) -> Result<DraftReceipt> {
        if self.state.is_busy() {
            return Err(LifecycleError::Busy.into());
        }
        if self.state.is_terminal() {
            return Err(self.not_editable());
        }
        let identity = self
            .identity
            .current_identity()
            .ok_or(EditorError::NotAuthenticated)?;

        let call = self
            .repository
            .save_draft(&self.record, self.draft_id.as_deref(), &identity);
        match guarded(call, self.config.api.timeout(), cancel).await {
            Ok(receipt) => {
                info!(draft_id = %receipt.draft_id, "saved draft");
                self.draft_id = Some(receipt.draft_id.clone());
                self.last_errors.clear();
                Ok(receipt)
            }
            Err(err) => {
                warn!(error = %err, retryable = err.is_retryable(), "save draft failed");
                self.last_errors = vec![err.to_string()];
                Err(err)
            }
        }
    }

    /// Validate and publish. On any failure the session returns to Editing
    /// with the record untouched and the reasons in [`Self::last_errors`].
    ///
    /// Without a draft id one is saved first and kept, so a retry after a
    /// failed submit reuses that draft instead of creating another.
    /// Dropping the returned future mid-flight also returns to Editing.
    pub async fn publish(&mut self, cancel: &CancelToken) -> Result<PublishReceipt> {
        if self.state.is_busy() {
            return Err(LifecycleError::Busy.into());
        }
        let mut in_flight = InFlight { session: self };
        let outcome = in_flight.session.run_publish(cancel).await;
        outcome
    }

    async fn run_publish(&mut self, cancel: &CancelToken) -> Result<PublishReceipt> {
        self.transition(LifecycleState::Publishing(PublishPhase::Validating))?;

        let issues = validate_for_publish(&self.record);
        if issues.iter().any(ValidationError::is_error) {
            self.last_errors = error_messages(&issues);
            info!(errors = self.last_errors.len(), "publish refused by validation");
            self.transition(LifecycleState::Editing)?;
            return Err(EditorError::Validation(issues));
        }

        let Some(identity) = self.identity.current_identity() else {
            self.last_errors = vec![EditorError::NotAuthenticated.to_string()];
            self.transition(LifecycleState::Editing)?;
            return Err(EditorError::NotAuthenticated);
        };

        self.transition(LifecycleState::Publishing(PublishPhase::Submitting))?;
        let submitted = match self.draft_id.clone() {
            Some(draft_id) => Ok(draft_id),
            None => {
                let call = self.repository.save_draft(&self.record, None, &identity);
                let saved = guarded(call, self.config.api.timeout(), cancel).await;
                saved.map(|receipt| {
                    info!(draft_id = %receipt.draft_id, "saved draft before publish");
                    self.draft_id = Some(receipt.draft_id.clone());
                    receipt.draft_id
                })
            }
        };
        let outcome = match submitted {
            Ok(draft_id) => {
                let call = self
                    .repository
                    .publish(&self.record, Some(draft_id.as_str()), &identity);
                guarded(call, self.config.api.timeout(), cancel).await
            }
            Err(err) => Err(err),
        };

        match outcome {
            Ok(receipt) => {
                self.transition(LifecycleState::Published)?;
                info!(record_id = %receipt.record_id, doi = ?receipt.doi, "published record");
                self.last_errors.clear();
                self.published = Some(receipt.clone());
                Ok(receipt)
            }
            Err(err) => {
                warn!(error = %err, retryable = err.is_retryable(), "publish failed");
                self.last_errors = vec![err.to_string()];
                self.transition(LifecycleState::Editing)?;
                Err(err)
            }
        }
    }

    fn transition(&mut self, to: LifecycleState) -> Result<()> {
        if !self.state.can_transition_to(&to) {
            return Err(LifecycleError::InvalidTransition {
                from: self.state.to_string(),
                to: to.to_string(),
            }
            .into());
        }
        info!(from = %self.state, to = %to, "lifecycle transition");
        self.state = to;
        Ok(())
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.state.is_editable() {
            Ok(())
        } else {
            Err(self.not_editable())
        }
    }

    fn not_editable(&self) -> EditorError {
        LifecycleError::NotEditable {
            state: self.state.description().to_string(),
        }
        .into()
    }

    fn commit(&mut self, next: Record) {
        if next != self.record {
            let previous = std::mem::replace(&mut self.record, next);
            self.history.record(previous);
        }
    }

    /// Visibility rejections are user-facing; anything else is a programmer
    /// error handled per [`MisusePolicy`].
    fn mutation_failed(&self, err: MutationError) -> EditorError {
        match err {
            MutationError::Visibility(err) => EditorError::Visibility(err),
            misuse => match self.config.misuse {
                MisusePolicy::Panic => panic!("{}", misuse),
                MisusePolicy::Ignore => {
                    error!(error = %misuse, "ignored invalid mutation");
                    EditorError::Mutation(misuse)
                }
            },
        }
    }
}

/// Held for the duration of a publish; a session left mid-publish by a
/// dropped future goes back to Editing
struct InFlight<'a, R, P, G> {
    session: &'a mut EditingSession<R, P, G>,
}

impl<R, P, G> Drop for InFlight<'_, R, P, G> {
    fn drop(&mut self) {
        let session = &mut *self.session;
        if session.state.is_busy() {
            warn!(state = %session.state, "publish abandoned, back to editing");
            session.state = LifecycleState::Editing;
            session.last_errors = vec![EditorError::Cancelled.to_string()];
        }
    }
}
