//! Typed addresses into a record
//!
//! [`FieldPath`] names a single-valued field, [`CollectionPath`] an ordered,
//! id-addressed collection. Both parse from and print as the dot paths the
//! web form used (`"basicInformation.doi.value"`, `"funding.awards"`, ...).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use vedra_domain::VisibilityLevel;

use crate::completeness::Section;
use crate::error::MutationError;

/// Kind of value a [`FieldPath`] accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Text,
    Bool,
    List,
    Level,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Text => write!(f, "text"),
            ValueKind::Bool => write!(f, "bool"),
            ValueKind::List => write!(f, "list"),
            ValueKind::Level => write!(f, "visibility level"),
        }
    }
}

/// Value written by a set mutation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    List(Vec<String>),
    Level(VisibilityLevel),
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::Bool(_) => ValueKind::Bool,
            FieldValue::List(_) => ValueKind::List,
            FieldValue::Level(_) => ValueKind::Level,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(value: Vec<String>) -> Self {
        FieldValue::List(value)
    }
}

impl From<VisibilityLevel> for FieldValue {
    fn from(value: VisibilityLevel) -> Self {
        FieldValue::Level(value)
    }
}

/// Single-valued fields of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldPath {
    DoiHasExisting,
    DoiValue,
    ResourceType,
    PublicationDate,
    Copyright,
    Keywords,
    Languages,
    Version,
    Publisher,
    JournalTitle,
    JournalIssn,
    JournalVolume,
    JournalIssue,
    JournalPages,
    ImprintTitle,
    ImprintIsbn,
    ImprintPlace,
    ImprintPagination,
    ImprintEdition,
    ThesisUniversity,
    ThesisDepartment,
    ThesisType,
    ThesisSubmissionDate,
    ThesisDefenseDate,
    Level,
    EmbargoEnabled,
    EmbargoUntil,
    EmbargoReason,
}

impl FieldPath {
    pub fn all() -> &'static [FieldPath] {
        use FieldPath::*;
        &[
            DoiHasExisting,
            DoiValue,
            ResourceType,
            PublicationDate,
            Copyright,
            Keywords,
            Languages,
            Version,
            Publisher,
            JournalTitle,
            JournalIssn,
            JournalVolume,
            JournalIssue,
            JournalPages,
            ImprintTitle,
            ImprintIsbn,
            ImprintPlace,
            ImprintPagination,
            ImprintEdition,
            ThesisUniversity,
            ThesisDepartment,
            ThesisType,
            ThesisSubmissionDate,
            ThesisDefenseDate,
            Level,
            EmbargoEnabled,
            EmbargoUntil,
            EmbargoReason,
        ]
    }

    /// Dot path used by the JSON record
    pub fn as_str(&self) -> &'static str {
        use FieldPath::*;
        match self {
            DoiHasExisting => "basicInformation.doi.hasExisting",
            DoiValue => "basicInformation.doi.value",
            ResourceType => "basicInformation.resourceType",
            PublicationDate => "basicInformation.publicationDate",
            Copyright => "basicInformation.copyright",
            Keywords => "recommendedInformation.keywords",
            Languages => "recommendedInformation.languages",
            Version => "recommendedInformation.version",
            Publisher => "recommendedInformation.publisher",
            JournalTitle => "publishingInformation.journal.title",
            JournalIssn => "publishingInformation.journal.issn",
            JournalVolume => "publishingInformation.journal.volume",
            JournalIssue => "publishingInformation.journal.issue",
            JournalPages => "publishingInformation.journal.pagesOrArticleNumber",
            ImprintTitle => "publishingInformation.imprint.title",
            ImprintIsbn => "publishingInformation.imprint.isbn",
            ImprintPlace => "publishingInformation.imprint.place",
            ImprintPagination => "publishingInformation.imprint.pagination",
            ImprintEdition => "publishingInformation.imprint.edition",
            ThesisUniversity => "publishingInformation.thesis.awardingUniversity",
            ThesisDepartment => "publishingInformation.thesis.awardingDepartment",
            ThesisType => "publishingInformation.thesis.type",
            ThesisSubmissionDate => "publishingInformation.thesis.submissionDate",
            ThesisDefenseDate => "publishingInformation.thesis.defenseDate",
            Level => "visibility.level",
            EmbargoEnabled => "visibility.embargo.enabled",
            EmbargoUntil => "visibility.embargo.until",
            EmbargoReason => "visibility.embargo.reason",
        }
    }

    /// Kind of value this field accepts
    pub fn kind(&self) -> ValueKind {
        use FieldPath::*;
        match self {
            DoiHasExisting | EmbargoEnabled => ValueKind::Bool,
            Keywords | Languages => ValueKind::List,
            Level => ValueKind::Level,
            _ => ValueKind::Text,
        }
    }

    pub fn section(&self) -> Section {
        use FieldPath::*;
        match self {
            DoiHasExisting | DoiValue | ResourceType | PublicationDate | Copyright => {
                Section::BasicInformation
            }
            Keywords | Languages | Version | Publisher => Section::RecommendedInformation,
            Level | EmbargoEnabled | EmbargoUntil | EmbargoReason => Section::Visibility,
            _ => Section::PublishingInformation,
        }
    }

    /// Writes to this field go through the visibility reducer
    pub fn is_visibility(&self) -> bool {
        matches!(self.section(), Section::Visibility)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldPath {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| MutationError::misuse(s, "unknown field path"))
    }
}

impl TryFrom<String> for FieldPath {
    type Error = MutationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.as_str().to_string()
    }
}

/// Ordered, id-addressed collections of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CollectionPath {
    Files,
    Titles,
    Creators,
    Descriptions,
    Licenses,
    Contributors,
    Dates,
    Awards,
    References,
}

impl CollectionPath {
    pub fn all() -> &'static [CollectionPath] {
        &[
            CollectionPath::Files,
            CollectionPath::Titles,
            CollectionPath::Creators,
            CollectionPath::Descriptions,
            CollectionPath::Licenses,
            CollectionPath::Contributors,
            CollectionPath::Dates,
            CollectionPath::Awards,
            CollectionPath::References,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionPath::Files => "files",
            CollectionPath::Titles => "basicInformation.titles",
            CollectionPath::Creators => "basicInformation.creators",
            CollectionPath::Descriptions => "basicInformation.descriptions",
            CollectionPath::Licenses => "basicInformation.licenses",
            CollectionPath::Contributors => "recommendedInformation.contributors",
            CollectionPath::Dates => "recommendedInformation.dates",
            CollectionPath::Awards => "funding.awards",
            CollectionPath::References => "references",
        }
    }

    pub fn section(&self) -> Section {
        match self {
            CollectionPath::Files => Section::Files,
            CollectionPath::Titles
            | CollectionPath::Creators
            | CollectionPath::Descriptions
            | CollectionPath::Licenses => Section::BasicInformation,
            CollectionPath::Contributors | CollectionPath::Dates => {
                Section::RecommendedInformation
            }
            CollectionPath::Awards => Section::Funding,
            CollectionPath::References => Section::References,
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionPath {
    type Err = MutationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionPath::all()
            .iter()
            .copied()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| MutationError::misuse(s, "unknown collection path"))
    }
}

impl TryFrom<String> for CollectionPath {
    type Error = MutationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CollectionPath> for String {
    fn from(path: CollectionPath) -> Self {
        path.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_every_field_path_parses_back() {
        for path in FieldPath::all() {
            assert_eq!(path.as_str().parse::<FieldPath>().unwrap(), *path);
        }
        for path in CollectionPath::all() {
            assert_eq!(path.as_str().parse::<CollectionPath>().unwrap(), *path);
        }
    }

    #[rstest]
    #[case("basicInformation.doi.value", FieldPath::DoiValue)]
    #[case("visibility.embargo.enabled", FieldPath::EmbargoEnabled)]
    #[case("publishingInformation.thesis.type", FieldPath::ThesisType)]
    fn test_parse_form_paths(#[case] raw: &str, #[case] expected: FieldPath) {
        assert_eq!(raw.parse::<FieldPath>().unwrap(), expected);
    }

    #[test]
    fn test_unknown_path_is_misuse() {
        let err = "basicInformation.doi.nope".parse::<FieldPath>().unwrap_err();
        assert!(matches!(err, MutationError::Misuse { .. }));
        assert!("funding".parse::<CollectionPath>().is_err());
    }

    #[test]
    fn test_path_serde_uses_dot_strings() {
        let json = serde_json::to_string(&CollectionPath::Awards).unwrap();
        assert_eq!(json, "\"funding.awards\"");
        let back: FieldPath = serde_json::from_str("\"visibility.level\"").unwrap();
        assert_eq!(back, FieldPath::Level);
        assert!(serde_json::from_str::<FieldPath>("\"visibility\"").is_err());
    }

    #[test]
    fn test_kinds_and_sections() {
        assert_eq!(FieldPath::DoiHasExisting.kind(), ValueKind::Bool);
        assert_eq!(FieldPath::Keywords.kind(), ValueKind::List);
        assert_eq!(FieldPath::JournalIssn.kind(), ValueKind::Text);
        assert!(FieldPath::EmbargoUntil.is_visibility());
        assert!(!FieldPath::DoiValue.is_visibility());
        assert_eq!(CollectionPath::Awards.section(), Section::Funding);
    }

    #[test]
    fn test_field_value_kinds() {
        assert_eq!(FieldValue::from("x").kind(), ValueKind::Text);
        assert_eq!(FieldValue::from(true).kind(), ValueKind::Bool);
        assert_eq!(
            FieldValue::from(VisibilityLevel::Restricted).kind(),
            ValueKind::Level
        );
    }
}
