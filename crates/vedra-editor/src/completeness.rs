//! Section completeness
//!
//! Which sections must be filled in is declared, not implied: a
//! [`CompletenessTable`] lists every [`Section`] with the [`Requirement`]s it
//! has. A section declared with no requirements is complete.

use serde::{Deserialize, Serialize};
use std::fmt;

use vedra_domain::{has_creator, has_required_doi, has_title, Record};

use crate::config::ConfigError;

/// One logical group of fields in a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    Files,
    BasicInformation,
    RecommendedInformation,
    Funding,
    References,
    PublishingInformation,
    Visibility,
}

impl Section {
    /// Sections in form order
    pub fn all() -> &'static [Section] {
        &[
            Section::Files,
            Section::BasicInformation,
            Section::RecommendedInformation,
            Section::Funding,
            Section::References,
            Section::PublishingInformation,
            Section::Visibility,
        ]
    }

    /// Heading shown by the form
    pub fn title(&self) -> &'static str {
        match self {
            Section::Files => "Files",
            Section::BasicInformation => "Basic Information",
            Section::RecommendedInformation => "Recommended Information",
            Section::Funding => "Funding",
            Section::References => "References",
            Section::PublishingInformation => "Publishing Information",
            Section::Visibility => "Visibility",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A required-field rule a section can declare
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Requirement {
    /// At least one title with non-blank text
    AtLeastOneTitle,
    /// At least one creator with a non-blank name
    AtLeastOneCreator,
    /// A declared existing DOI has a value
    DoiValueWhenExisting,
}

impl Requirement {
    pub fn is_met(&self, record: &Record) -> bool {
        match self {
            Requirement::AtLeastOneTitle => has_title(record),
            Requirement::AtLeastOneCreator => has_creator(record),
            Requirement::DoiValueWhenExisting => has_required_doi(record),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Requirement::AtLeastOneTitle => "At least one title is required",
            Requirement::AtLeastOneCreator => "At least one creator is required",
            Requirement::DoiValueWhenExisting => "DOI is required when an existing DOI is declared",
        }
    }
}

/// Requirements declared for one section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRequirements {
    pub section: Section,
    #[serde(default)]
    pub requires: Vec<Requirement>,
}

/// The declared section → requirements table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletenessTable {
    pub sections: Vec<SectionRequirements>,
}

impl Default for CompletenessTable {
    fn default() -> Self {
        let sections = Section::all()
            .iter()
            .map(|&section| SectionRequirements {
                section,
                requires: match section {
                    Section::BasicInformation => vec![
                        Requirement::AtLeastOneTitle,
                        Requirement::AtLeastOneCreator,
                        Requirement::DoiValueWhenExisting,
                    ],
                    _ => Vec::new(),
                },
            })
            .collect();
        Self { sections }
    }
}

impl CompletenessTable {
    /// Requirements declared for a section
    pub fn requirements(&self, section: Section) -> &[Requirement] {
        self.sections
            .iter()
            .find(|s| s.section == section)
            .map(|s| s.requires.as_slice())
            .unwrap_or(&[])
    }

    /// Add a requirement to a section, declaring the section if needed
    pub fn with_requirement(mut self, section: Section, requirement: Requirement) -> Self {
        match self.sections.iter_mut().find(|s| s.section == section) {
            Some(entry) => {
                if !entry.requires.contains(&requirement) {
                    entry.requires.push(requirement);
                }
            }
            None => self.sections.push(SectionRequirements {
                section,
                requires: vec![requirement],
            }),
        }
        self
    }

    pub fn is_complete(&self, record: &Record, section: Section) -> bool {
        self.requirements(section).iter().all(|r| r.is_met(record))
    }

    /// Requirements of a section the record does not meet
    pub fn unmet(&self, record: &Record, section: Section) -> Vec<Requirement> {
        self.requirements(section)
            .iter()
            .copied()
            .filter(|r| !r.is_met(record))
            .collect()
    }

    /// Incomplete sections in form order
    pub fn incomplete_sections(&self, record: &Record) -> Vec<Section> {
        Section::all()
            .iter()
            .copied()
            .filter(|&s| !self.is_complete(record, s))
            .collect()
    }

    /// Every section declared exactly once
    pub fn validate(&self) -> Result<(), ConfigError> {
        for section in Section::all() {
            let count = self.sections.iter().filter(|s| s.section == *section).count();
            match count {
                0 => {
                    return Err(ConfigError::MissingField(format!(
                        "completeness table does not declare section {}",
                        section
                    )))
                }
                1 => {}
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "completeness table declares section {} {} times",
                        section, count
                    )))
                }
            }
        }
        Ok(())
    }
}
