//! Publication record model for the vedra metadata editor
//!
//! This crate provides the canonical data model for one publication being
//! prepared for DOI registration:
//! - Record: the whole nested publication-in-progress
//! - Basic information: DOI ownership, titles, creators, descriptions, licenses
//! - Recommended information: contributors, keywords, languages, dates
//! - Funding awards, references, publishing venue (journal, imprint, thesis)
//! - Visibility and embargo
//! - Files attached to the record
//! - Controlled vocabularies and publish-time validation

pub mod basic;
pub mod collection;
pub mod file;
pub mod funding;
pub mod publishing;
pub mod recommended;
pub mod record;
pub mod reference;
pub mod validation;
pub mod visibility;
pub mod vocabulary;

pub use basic::*;
pub use collection::*;
pub use file::*;
pub use funding::*;
pub use publishing::*;
pub use recommended::*;
pub use record::*;
pub use reference::*;
pub use validation::*;
pub use visibility::*;
