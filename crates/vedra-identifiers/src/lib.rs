//! Identifier handling for vedra publication records
//!
//! This crate provides tools for working with the identifiers that appear in
//! a publication record:
//! - DOI shape validation, normalization and extraction
//! - ORCID, ISSN and ISBN checksum validation
//! - Item id generation for repeatable record entries

pub mod doi;
pub mod item_id;
pub mod validators;

pub use doi::*;
pub use item_id::*;
pub use validators::*;
