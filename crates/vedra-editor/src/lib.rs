//! Headless editing session for vedra publication records
//!
//! vedra-editor drives one [`Record`](vedra_domain::Record) from first keystroke
//! to a published DOI:
//!
//! - **Mutation engine**: typed paths, set / add / remove / update on a record
//! - **Visibility reducer**: keeps the embargo consistent with the level
//! - **Completeness**: a declared per-section requirement table
//! - **Lifecycle**: Editing, Previewing, Publishing, Published
//! - **File intake**: capacity-checked batches and merged upload events
//!
//! Network access goes through the [`MetadataRepository`] trait; identity is
//! injected through [`IdentityProvider`].

pub mod cancel;
pub mod completeness;
pub mod config;
pub mod error;
pub mod history;
pub mod identity;
pub mod intake;
pub mod lifecycle;
pub mod mutation;
pub mod patch;
pub mod path;
pub mod preview;
pub mod repository;
pub mod session;
pub mod visibility;

pub use cancel::CancelToken;
pub use completeness::{CompletenessTable, Requirement, Section, SectionRequirements};
pub use config::{ApiConfig, ConfigError, EditorConfig, MisusePolicy};
pub use error::{
    CapacityError, EditorError, LifecycleError, MutationError, Result, VisibilityError,
};
pub use history::History;
pub use identity::{Identity, IdentityProvider, StaticIdentity};
pub use intake::{format_file_size, CapacityLimits, FileCandidate, UploadEvent};
pub use lifecycle::{LifecycleState, PublishPhase};
pub use mutation::{Item, Mutation, MutationEngine};
pub use patch::*;
pub use path::{CollectionPath, FieldPath, FieldValue, ValueKind};
pub use preview::PreviewSummary;
pub use repository::{DraftReceipt, MetadataRepository, PublishReceipt, RepositoryError};
pub use session::EditingSession;
