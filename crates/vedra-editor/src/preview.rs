//! Read-only summary of a record, shown while previewing

use serde::Serialize;
use std::fmt;

use vedra_domain::{Record, VisibilityLevel};

use crate::intake::format_file_size;

/// What the depositor sees before publishing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewSummary {
    pub title: Option<String>,
    pub creators: Vec<String>,
    pub resource_type: String,
    pub publication_date: Option<String>,
    pub doi: Option<String>,
    pub licenses: Vec<String>,
    pub keywords: Vec<String>,
    pub file_count: usize,
    pub total_size: String,
    pub visibility: VisibilityLevel,
    pub embargo_until: Option<String>,
    pub award_count: usize,
    pub reference_count: usize,
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl PreviewSummary {
    pub fn from_record(record: &Record) -> Self {
        let basic = &record.basic_information;
        let embargo = &record.visibility.embargo;
        Self {
            title: record.primary_title().map(str::to_string),
            creators: basic
                .creators
                .iter()
                .filter_map(|c| non_blank(&c.name))
                .collect(),
            resource_type: basic.resource_type.clone(),
            publication_date: non_blank(&basic.publication_date),
            doi: if basic.doi.has_existing {
                non_blank(&basic.doi.value)
            } else {
                None
            },
            licenses: basic
                .licenses
                .iter()
                .filter_map(|l| non_blank(&l.name))
                .collect(),
            keywords: record.recommended_information.keywords.clone(),
            file_count: record.file_count(),
            total_size: format_file_size(record.total_file_bytes()),
            visibility: record.visibility.level,
            embargo_until: if embargo.enabled {
                non_blank(&embargo.until)
            } else {
                None
            },
            award_count: record.funding.awards.len(),
            reference_count: record.references.len(),
        }
    }
}

impl fmt::Display for PreviewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.title.as_deref().unwrap_or("(untitled)"))?;
        if self.creators.is_empty() {
            writeln!(f, "  Creators:   (none)")?;
        } else {
            writeln!(f, "  Creators:   {}", self.creators.join("; "))?;
        }
        writeln!(f, "  Type:       {}", self.resource_type)?;
        if let Some(date) = &self.publication_date {
            writeln!(f, "  Published:  {}", date)?;
        }
        if let Some(doi) = &self.doi {
            writeln!(f, "  DOI:        {}", doi)?;
        }
        if !self.licenses.is_empty() {
            writeln!(f, "  License:    {}", self.licenses.join(", "))?;
        }
        if !self.keywords.is_empty() {
            writeln!(f, "  Keywords:   {}", self.keywords.join(", "))?;
        }
        writeln!(f, "  Files:      {} ({})", self.file_count, self.total_size)?;
        match &self.embargo_until {
            Some(until) => writeln!(f, "  Visibility: {} (embargoed until {})", self.visibility, until)?,
            None => writeln!(f, "  Visibility: {}", self.visibility)?,
        }
        write!(
            f,
            "  Funding:    {} award(s), {} reference(s)",
            self.award_count, self.reference_count
        )
    }
}
