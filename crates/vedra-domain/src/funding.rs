//! Funding awards

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// Which form an award entry takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AwardMode {
    Standard,
    Custom,
}

/// Award payload, tagged by `mode` in JSON
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum AwardKind {
    /// A structured grant reference
    #[serde(rename_all = "camelCase")]
    Standard {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        funder_name: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        award_number: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        award_title: Option<String>,
    },
    /// A free-text acknowledgement
    Custom {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<String>,
    },
}

impl AwardKind {
    /// An empty payload of the given mode
    pub fn empty(mode: AwardMode) -> Self {
        match mode {
            AwardMode::Standard => AwardKind::Standard {
                funder_name: None,
                award_number: None,
                award_title: None,
            },
            AwardMode::Custom => AwardKind::Custom { text: None },
        }
    }
}

/// A funding award or acknowledgement
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub id: ItemId,
    #[serde(flatten)]
    pub kind: AwardKind,
}

impl Award {
    /// A structured award naming its funder
    pub fn standard(funder_name: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            kind: AwardKind::Standard {
                funder_name: Some(funder_name.into()),
                award_number: None,
                award_title: None,
            },
        }
    }

    /// A free-text acknowledgement
    pub fn custom(text: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            kind: AwardKind::Custom {
                text: Some(text.into()),
            },
        }
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn mode(&self) -> AwardMode {
        match self.kind {
            AwardKind::Standard { .. } => AwardMode::Standard,
            AwardKind::Custom { .. } => AwardMode::Custom,
        }
    }
}

/// The "Funding" section
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Funding {
    #[serde(default)]
    pub awards: Vec<Award>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_standard_award_json_shape() {
        let award = Award::standard("NSF").with_id("a1");
        let json = serde_json::to_value(&award).unwrap();
        assert_eq!(json, json!({"id": "a1", "mode": "standard", "funderName": "NSF"}));
    }

    #[test]
    fn test_custom_award_from_json() {
        let award: Award =
            serde_json::from_value(json!({"id": "x", "mode": "custom", "text": "Supported by X"}))
                .unwrap();
        assert_eq!(award.mode(), AwardMode::Custom);
        assert_eq!(award, Award::custom("Supported by X").with_id("x"));
    }

    #[test]
    fn test_unknown_mode_rejected() {
        let result: Result<Award, _> =
            serde_json::from_value(json!({"id": "x", "mode": "other"}));
        assert!(result.is_err());
    }
}
