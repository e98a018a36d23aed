//! Publish-time validation for records

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Record;
use crate::vocabulary;

/// Severity of a validation error
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationSeverity {
    /// Blocks publishing
    Error,
    /// Shown to the user, never blocks publishing
    Warning,
}

/// A validation error or warning
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// Dot path of the offending field, e.g. `basicInformation.doi.value`
    pub field: String,
    pub message: String,
    pub severity: ValidationSeverity,
}

impl ValidationError {
    fn error(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Error,
        }
    }

    fn warning(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: ValidationSeverity::Warning,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.severity, ValidationSeverity::Error)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// At least one title has non-blank text
pub fn has_title(record: &Record) -> bool {
    record
        .basic_information
        .titles
        .iter()
        .any(|t| !t.is_blank())
}

/// At least one creator has a non-blank name
pub fn has_creator(record: &Record) -> bool {
    record
        .basic_information
        .creators
        .iter()
        .any(|c| !c.is_blank())
}

/// A declared existing DOI has a non-blank value
pub fn has_required_doi(record: &Record) -> bool {
    let doi = &record.basic_information.doi;
    !doi.has_existing || !doi.value.trim().is_empty()
}

/// Validate a record before it is handed to the repository.
///
/// Entries with [`ValidationSeverity::Error`] block publishing; warnings are
/// informational.
pub fn validate_for_publish(record: &Record) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let basic = &record.basic_information;

    // Required fields
    if !has_title(record) {
        errors.push(ValidationError::error(
            "basicInformation.titles",
            "At least one title is required",
        ));
    }

    if !has_creator(record) {
        errors.push(ValidationError::error(
            "basicInformation.creators",
            "At least one creator is required",
        ));
    }

    if !has_required_doi(record) {
        errors.push(ValidationError::error(
            "basicInformation.doi.value",
            "DOI is required when an existing DOI is declared",
        ));
    } else if basic.doi.has_existing && !vedra_identifiers::is_valid_doi(&basic.doi.value) {
        errors.push(ValidationError::error(
            "basicInformation.doi.value",
            format!(
                "DOI \"{}\" must have the form 10.xxxx/suffix",
                basic.doi.value.trim()
            ),
        ));
    }

    if !record.visibility.is_consistent() {
        errors.push(ValidationError::error(
            "visibility.embargo.enabled",
            "An embargo requires Restricted visibility",
        ));
    }

    // Warnings for recommended fields
    if !vocabulary::is_known_resource_type(&basic.resource_type) {
        errors.push(ValidationError::warning(
            "basicInformation.resourceType",
            format!("Unknown resource type \"{}\"", basic.resource_type),
        ));
    }

    if !basic.publication_date.trim().is_empty()
        && !is_valid_date_or_interval(&basic.publication_date)
    {
        errors.push(ValidationError::warning(
            "basicInformation.publicationDate",
            "Publication date should be an ISO date (YYYY, YYYY-MM or YYYY-MM-DD)",
        ));
    }

    for creator in &basic.creators {
        if let Some(orcid) = creator.orcid.as_deref().filter(|o| !o.trim().is_empty()) {
            if !vedra_identifiers::is_valid_orcid(orcid) {
                errors.push(ValidationError::warning(
                    format!("basicInformation.creators.{}.orcid", creator.id),
                    format!("ORCID \"{}\" is not valid", orcid),
                ));
            }
        }
    }

    for date in &record.recommended_information.dates {
        if !is_valid_date_or_interval(&date.value) {
            errors.push(ValidationError::warning(
                format!("recommendedInformation.dates.{}.value", date.id),
                format!("Date \"{}\" is not an ISO date or interval", date.value),
            ));
        }
    }

    // Publishing venue identifiers
    let journal = &record.publishing_information.journal;
    if !journal.issn.trim().is_empty() && !vedra_identifiers::is_valid_issn(&journal.issn) {
        errors.push(ValidationError::warning(
            "publishingInformation.journal.issn",
            format!("ISSN \"{}\" is not valid", journal.issn),
        ));
    }

    let imprint = &record.publishing_information.imprint;
    if !imprint.isbn.trim().is_empty() && !vedra_identifiers::is_valid_isbn(&imprint.isbn) {
        errors.push(ValidationError::warning(
            "publishingInformation.imprint.isbn",
            format!("ISBN \"{}\" is not valid", imprint.isbn),
        ));
    }

    // Embargo details
    let embargo = &record.visibility.embargo;
    if embargo.enabled {
        if embargo.until.trim().is_empty() {
            errors.push(ValidationError::warning(
                "visibility.embargo.until",
                "An embargo end date is recommended",
            ));
        } else if parse_partial_date(&embargo.until).is_none() {
            errors.push(ValidationError::warning(
                "visibility.embargo.until",
                format!("Embargo date \"{}\" is not an ISO date", embargo.until),
            ));
        }
    }

    errors
}

/// Check if a record can be published (no errors)
pub fn is_publishable(record: &Record) -> bool {
    validate_for_publish(record).iter().all(|e| !e.is_error())
}

/// Messages of the blocking entries only
pub fn error_messages(errors: &[ValidationError]) -> Vec<String> {
    errors
        .iter()
        .filter(|e| e.is_error())
        .map(|e| e.message.clone())
        .collect()
}

/// Parse `YYYY`, `YYYY-MM` or `YYYY-MM-DD` to the first day it covers
pub fn parse_partial_date(value: &str) -> Option<NaiveDate> {
    let v = value.trim();
    let all_digits = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    match v.len() {
        4 if all_digits(v) => v
            .parse::<i32>()
            .ok()
            .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1)),
        7 => NaiveDate::parse_from_str(&format!("{}-01", v), "%Y-%m-%d").ok(),
        10 => NaiveDate::parse_from_str(v, "%Y-%m-%d").ok(),
        _ => None,
    }
}

/// A single partial date or a `start/end` interval with start not after end
pub fn is_valid_date_or_interval(value: &str) -> bool {
    match value.split_once('/') {
        Some((start, end)) => match (parse_partial_date(start), parse_partial_date(end)) {
            (Some(s), Some(e)) => s <= e,
            _ => false,
        },
        None => parse_partial_date(value).is_some(),
    }
}
