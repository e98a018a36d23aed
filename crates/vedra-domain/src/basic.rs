//! Basic information: DOI ownership, titles, creators, descriptions, licenses

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// A title of the publication
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
    pub id: ItemId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Title type from [`crate::vocabulary::TITLE_TYPES`], lowercase
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub title_type: Option<String>,
}

impl Title {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            title: title.into(),
            language: None,
            title_type: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_type(mut self, title_type: impl Into<String>) -> Self {
        self.title_type = Some(title_type.into());
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// True when the title text is blank
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty()
    }
}

/// A creator (author) of the publication
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    pub id: ItemId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orcid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Creator {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            name: name.into(),
            affiliation: None,
            orcid: None,
            role: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = Some(affiliation.into());
        self
    }

    pub fn with_orcid(mut self, orcid: impl Into<String>) -> Self {
        self.orcid = Some(orcid.into());
        self
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    /// True when the creator name is blank
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}

/// A description (abstract, methods, ...) of the publication
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Description {
    pub id: ItemId,
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub description_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Description {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            text: text.into(),
            description_type: None,
            language: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_type(mut self, description_type: impl Into<String>) -> Self {
        self.description_type = Some(description_type.into());
        self
    }
}

/// A license under which the publication is released
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct License {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    /// Identifier within the scheme, e.g. the SPDX id `CC-BY-4.0`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_license: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl License {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            scheme: None,
            id_license: None,
            name: name.into(),
            url: None,
        }
    }

    /// Creative Commons Attribution 4.0, the license preselected for new records
    pub fn cc_by_4() -> Self {
        Self {
            id: ItemId::new(),
            scheme: Some("spdx".to_string()),
            id_license: Some("CC-BY-4.0".to_string()),
            name: "Creative Commons Attribution 4.0 International".to_string(),
            url: Some("https://creativecommons.org/licenses/by/4.0/".to_string()),
        }
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }
}

/// Whether the depositor already holds a DOI for this publication
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DoiOwnership {
    pub has_existing: bool,
    /// The existing DOI; only meaningful when `has_existing` is set
    pub value: String,
}

/// The "Basic Information" section
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BasicInformation {
    pub doi: DoiOwnership,
    /// Resource type from [`crate::vocabulary::resource_type_options`]
    pub resource_type: String,
    pub titles: Vec<Title>,
    pub publication_date: String,
    pub creators: Vec<Creator>,
    pub descriptions: Vec<Description>,
    pub licenses: Vec<License>,
    pub copyright: String,
}

impl Default for BasicInformation {
    fn default() -> Self {
        Self {
            doi: DoiOwnership::default(),
            resource_type: crate::vocabulary::DEFAULT_RESOURCE_TYPE.to_string(),
            titles: Vec::new(),
            publication_date: String::new(),
            creators: Vec::new(),
            descriptions: Vec::new(),
            licenses: Vec::new(),
            copyright: String::new(),
        }
    }
}
