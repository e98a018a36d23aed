//! Recommended information: contributors, keywords, languages, dates

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Contributor role vocabulary (DataCite contributorType)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ContributorRole {
    ContactPerson,
    DataCollector,
    DataCurator,
    DataManager,
    Distributor,
    Editor,
    Funder,
    HostingInstitution,
    Producer,
    ProjectLeader,
    ProjectManager,
    ProjectMember,
    RegistrationAgency,
    RegistrationAuthority,
    RelatedPerson,
    ResearchGroup,
    RightsHolder,
    Sponsor,
    Supervisor,
    WorkPackageLeader,
    #[default]
    Other,
}

impl ContributorRole {
    /// Get all roles in display order
    pub fn all() -> &'static [ContributorRole] {
        &[
            ContributorRole::ContactPerson,
            ContributorRole::DataCollector,
            ContributorRole::DataCurator,
            ContributorRole::DataManager,
            ContributorRole::Distributor,
            ContributorRole::Editor,
            ContributorRole::Funder,
            ContributorRole::HostingInstitution,
            ContributorRole::Producer,
            ContributorRole::ProjectLeader,
            ContributorRole::ProjectManager,
            ContributorRole::ProjectMember,
            ContributorRole::RegistrationAgency,
            ContributorRole::RegistrationAuthority,
            ContributorRole::RelatedPerson,
            ContributorRole::ResearchGroup,
            ContributorRole::RightsHolder,
            ContributorRole::Sponsor,
            ContributorRole::Supervisor,
            ContributorRole::WorkPackageLeader,
            ContributorRole::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContributorRole::ContactPerson => "ContactPerson",
            ContributorRole::DataCollector => "DataCollector",
            ContributorRole::DataCurator => "DataCurator",
            ContributorRole::DataManager => "DataManager",
            ContributorRole::Distributor => "Distributor",
            ContributorRole::Editor => "Editor",
            ContributorRole::Funder => "Funder",
            ContributorRole::HostingInstitution => "HostingInstitution",
            ContributorRole::Producer => "Producer",
            ContributorRole::ProjectLeader => "ProjectLeader",
            ContributorRole::ProjectManager => "ProjectManager",
            ContributorRole::ProjectMember => "ProjectMember",
            ContributorRole::RegistrationAgency => "RegistrationAgency",
            ContributorRole::RegistrationAuthority => "RegistrationAuthority",
            ContributorRole::RelatedPerson => "RelatedPerson",
            ContributorRole::ResearchGroup => "ResearchGroup",
            ContributorRole::RightsHolder => "RightsHolder",
            ContributorRole::Sponsor => "Sponsor",
            ContributorRole::Supervisor => "Supervisor",
            ContributorRole::WorkPackageLeader => "WorkPackageLeader",
            ContributorRole::Other => "Other",
        }
    }
}

impl std::fmt::Display for ContributorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date type vocabulary (DataCite dateType)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DateType {
    Accepted,
    Available,
    Collected,
    Copyrighted,
    #[default]
    Created,
    Issued,
    Other,
    Submitted,
    Updated,
    Valid,
    Withdrawn,
}

impl DateType {
    pub fn all() -> &'static [DateType] {
        &[
            DateType::Accepted,
            DateType::Available,
            DateType::Collected,
            DateType::Copyrighted,
            DateType::Created,
            DateType::Issued,
            DateType::Other,
            DateType::Submitted,
            DateType::Updated,
            DateType::Valid,
            DateType::Withdrawn,
        ]
    }
}

/// A person or organisation that contributed without being a creator
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub id: ItemId,
    pub name: String,
    #[serde(default)]
    pub role: ContributorRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
}

impl Contributor {
    pub fn new(name: impl Into<String>, role: ContributorRole) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            role,
            identifier: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }
}

/// A dated event in the life of the publication
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateEntry {
    pub id: ItemId,
    /// ISO 8601 date (`2024`, `2024-05`, `2024-05-01`) or interval (`start/end`)
    pub value: String,
    #[serde(rename = "type", default)]
    pub date_type: DateType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DateEntry {
    pub fn new(value: impl Into<String>, date_type: DateType) -> Self {
        Self {
            id: ItemId::new(),
            value: value.into(),
            date_type,
            description: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The "Recommended Information" section
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedInformation {
    #[serde(default)]
    pub contributors: Vec<Contributor>,
    /// Free keywords, trimmed and without duplicates
    #[serde(default)]
    pub keywords: Vec<String>,
    /// ISO 639-3 language codes, without duplicates
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub dates: Vec<DateEntry>,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub publisher: String,
}
