//! HTTP client for the vedra metadata repository
//!
//! [`RdmClient`] speaks an InvenioRDM-style REST API:
//! - draft create / update / publish, implementing
//!   [`MetadataRepository`](vedra_editor::MetadataRepository)
//! - record search, record and file lookup, file download, facets
//! - pre-signed upload slots

pub mod client;
pub mod error;
pub mod types;

pub use client::RdmClient;
pub use error::{check_status, HttpError};
pub use types::*;
