//! Publishing venue: journal, imprint, thesis
//!
//! All three sub-records are independently optional; an all-empty
//! sub-record means "not applicable".

use serde::{Deserialize, Serialize};

/// Journal in which the work appeared
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Journal {
    pub title: String,
    pub issn: String,
    pub volume: String,
    pub issue: String,
    pub pages_or_article_number: String,
}

impl Journal {
    pub fn is_empty(&self) -> bool {
        [
            &self.title,
            &self.issn,
            &self.volume,
            &self.issue,
            &self.pages_or_article_number,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }
}

/// Book or report imprint
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Imprint {
    pub title: String,
    pub isbn: String,
    pub place: String,
    pub pagination: String,
    pub edition: String,
}

impl Imprint {
    pub fn is_empty(&self) -> bool {
        [
            &self.title,
            &self.isbn,
            &self.place,
            &self.pagination,
            &self.edition,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }
}

/// Thesis details
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thesis {
    pub awarding_university: String,
    pub awarding_department: String,
    /// Thesis type from [`crate::vocabulary::THESIS_TYPES`]
    #[serde(rename = "type")]
    pub thesis_type: String,
    pub submission_date: String,
    pub defense_date: String,
}

impl Thesis {
    pub fn is_empty(&self) -> bool {
        [
            &self.awarding_university,
            &self.awarding_department,
            &self.thesis_type,
            &self.submission_date,
            &self.defense_date,
        ]
        .iter()
        .all(|s| s.trim().is_empty())
    }
}

/// The "Publishing Information" section
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishingInformation {
    pub journal: Journal,
    pub imprint: Imprint,
    pub thesis: Thesis,
}

impl PublishingInformation {
    pub fn is_empty(&self) -> bool {
        self.journal.is_empty() && self.imprint.is_empty() && self.thesis.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        assert!(PublishingInformation::default().is_empty());
    }

    #[test]
    fn test_journal_keys() {
        let journal = Journal {
            title: "J. Data".to_string(),
            pages_or_article_number: "e42".to_string(),
            ..Default::default()
        };
        let json = serde_json::to_value(&journal).unwrap();
        assert_eq!(json["pagesOrArticleNumber"], "e42");
        assert!(!journal.is_empty());
    }

    #[test]
    fn test_thesis_type_key_and_partial_json() {
        let thesis: Thesis =
            serde_json::from_str(r#"{"type": "PhD", "awardingUniversity": "Uni"}"#).unwrap();
        assert_eq!(thesis.thesis_type, "PhD");
        assert_eq!(thesis.awarding_university, "Uni");
        assert!(thesis.defense_date.is_empty());
    }
}
