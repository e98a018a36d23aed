//! Partial updates for collection entries
//!
//! A patch names only the fields it changes; merging is shallow. For optional
//! fields `Some(None)` clears the value and `None` leaves it alone.

use serde::{Deserialize, Deserializer, Serialize};

use vedra_domain::{
    Award, AwardKind, AwardMode, Contributor, ContributorRole, Creator, DateEntry, DateType,
    Description, FileEntry, FileStatus, License, Reference, Title,
};

use crate::error::MutationError;
use crate::path::CollectionPath;

/// Keeps an explicit `null` distinct from an absent key
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Shallow merge of a patch into one entry
pub trait MergePatch<T> {
    fn merge_into(&self, target: &mut T) -> Result<(), MutationError>;
}

fn assign<T: Clone>(slot: &mut T, value: &Option<T>) {
    if let Some(v) = value {
        *slot = v.clone();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<FileStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

impl MergePatch<FileEntry> for FilePatch {
    fn merge_into(&self, target: &mut FileEntry) -> Result<(), MutationError> {
        assign(&mut target.name, &self.name);
        assign(&mut target.status, &self.status);
        if let Some(progress) = self.progress {
            target.progress = progress.min(100);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub language: Option<Option<String>>,
    #[serde(
        rename = "type",
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub title_type: Option<Option<String>>,
}

impl TitlePatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

impl MergePatch<Title> for TitlePatch {
    fn merge_into(&self, target: &mut Title) -> Result<(), MutationError> {
        assign(&mut target.title, &self.title);
        assign(&mut target.language, &self.language);
        assign(&mut target.title_type, &self.title_type);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub orcid: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub role: Option<Option<String>>,
}

impl CreatorPatch {
    pub fn name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

impl MergePatch<Creator> for CreatorPatch {
    fn merge_into(&self, target: &mut Creator) -> Result<(), MutationError> {
        assign(&mut target.name, &self.name);
        assign(&mut target.affiliation, &self.affiliation);
        assign(&mut target.orcid, &self.orcid);
        assign(&mut target.role, &self.role);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(
        rename = "type",
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub description_type: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub language: Option<Option<String>>,
}

impl MergePatch<Description> for DescriptionPatch {
    fn merge_into(&self, target: &mut Description) -> Result<(), MutationError> {
        assign(&mut target.text, &self.text);
        assign(&mut target.description_type, &self.description_type);
        assign(&mut target.language, &self.language);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicensePatch {
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub scheme: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub id_license: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub url: Option<Option<String>>,
}

impl MergePatch<License> for LicensePatch {
    fn merge_into(&self, target: &mut License) -> Result<(), MutationError> {
        assign(&mut target.scheme, &self.scheme);
        assign(&mut target.id_license, &self.id_license);
        assign(&mut target.name, &self.name);
        assign(&mut target.url, &self.url);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContributorPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ContributorRole>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Option<String>>,
}

impl MergePatch<Contributor> for ContributorPatch {
    fn merge_into(&self, target: &mut Contributor) -> Result<(), MutationError> {
        assign(&mut target.name, &self.name);
        assign(&mut target.role, &self.role);
        assign(&mut target.identifier, &self.identifier);
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub date_type: Option<DateType>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
}

impl MergePatch<DateEntry> for DatePatch {
    fn merge_into(&self, target: &mut DateEntry) -> Result<(), MutationError> {
        assign(&mut target.value, &self.value);
        assign(&mut target.date_type, &self.date_type);
        assign(&mut target.description, &self.description);
        Ok(())
    }
}

/// Award patch. Changing `mode` starts from an empty payload of the new mode;
/// fields that do not belong to the resulting mode are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AwardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<AwardMode>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub funder_name: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub award_number: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub award_title: Option<Option<String>>,
    #[serde(deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub text: Option<Option<String>>,
}

impl MergePatch<Award> for AwardPatch {
    fn merge_into(&self, target: &mut Award) -> Result<(), MutationError> {
        let mut kind = match self.mode {
            Some(mode) if mode != target.mode() => AwardKind::empty(mode),
            _ => target.kind.clone(),
        };

        match &mut kind {
            AwardKind::Standard {
                funder_name,
                award_number,
                award_title,
            } => {
                if self.text.is_some() {
                    return Err(MutationError::misuse(
                        CollectionPath::Awards.as_str(),
                        "text applies to custom awards only",
                    ));
                }
                assign(funder_name, &self.funder_name);
                assign(award_number, &self.award_number);
                assign(award_title, &self.award_title);
            }
            AwardKind::Custom { text } => {
                if self.funder_name.is_some()
                    || self.award_number.is_some()
                    || self.award_title.is_some()
                {
                    return Err(MutationError::misuse(
                        CollectionPath::Awards.as_str(),
                        "funder fields apply to standard awards only",
                    ));
                }
                assign(text, &self.text);
            }
        }

        target.kind = kind;
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferencePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl MergePatch<Reference> for ReferencePatch {
    fn merge_into(&self, target: &mut Reference) -> Result<(), MutationError> {
        assign(&mut target.reference, &self.reference);
        Ok(())
    }
}

/// A patch for an entry of any collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "fields", rename_all = "camelCase")]
pub enum ItemPatch {
    File(FilePatch),
    Title(TitlePatch),
    Creator(CreatorPatch),
    Description(DescriptionPatch),
    License(LicensePatch),
    Contributor(ContributorPatch),
    Date(DatePatch),
    Award(AwardPatch),
    Reference(ReferencePatch),
}

impl ItemPatch {
    /// Collection whose entries this patch applies to
    pub fn collection(&self) -> CollectionPath {
        match self {
            ItemPatch::File(_) => CollectionPath::Files,
            ItemPatch::Title(_) => CollectionPath::Titles,
            ItemPatch::Creator(_) => CollectionPath::Creators,
            ItemPatch::Description(_) => CollectionPath::Descriptions,
            ItemPatch::License(_) => CollectionPath::Licenses,
            ItemPatch::Contributor(_) => CollectionPath::Contributors,
            ItemPatch::Date(_) => CollectionPath::Dates,
            ItemPatch::Award(_) => CollectionPath::Awards,
            ItemPatch::Reference(_) => CollectionPath::References,
        }
    }
}

macro_rules! impl_from_patch {
    ($($patch:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$patch> for ItemPatch {
                fn from(patch: $patch) -> Self {
                    ItemPatch::$variant(patch)
                }
            }
        )*
    };
}

impl_from_patch!(
    FilePatch => File,
    TitlePatch => Title,
    CreatorPatch => Creator,
    DescriptionPatch => Description,
    LicensePatch => License,
    ContributorPatch => Contributor,
    DatePatch => Date,
    AwardPatch => Award,
    ReferencePatch => Reference,
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_patch_is_shallow() {
        let mut title = Title::new("Old").with_id("1").with_language("eng");
        TitlePatch::title("New").merge_into(&mut title).unwrap();
        assert_eq!(title.title, "New");
        assert_eq!(title.language.as_deref(), Some("eng"));
        assert_eq!(title.id, "1");
    }

    #[test]
    fn test_explicit_null_clears_optional() {
        let patch: CreatorPatch = serde_json::from_value(json!({"orcid": null})).unwrap();
        assert_eq!(patch.orcid, Some(None));
        let mut creator = Creator::new("Doe").with_orcid("0000-0002-1825-0097");
        patch.merge_into(&mut creator).unwrap();
        assert_eq!(creator.orcid, None);
        assert_eq!(creator.name, "Doe");
    }

    #[test]
    fn test_absent_key_leaves_optional() {
        let patch: CreatorPatch = serde_json::from_value(json!({"name": "Roe"})).unwrap();
        assert_eq!(patch.orcid, None);
    }

    #[test]
    fn test_file_progress_capped() {
        let mut file = FileEntry::queued("a.bin", 1);
        let patch = FilePatch {
            progress: Some(250),
            ..FilePatch::default()
        };
        patch.merge_into(&mut file).unwrap();
        assert_eq!(file.progress, 100);
    }

    #[test]
    fn test_award_patch_same_mode() {
        let mut award = Award::standard("NSF").with_id("a");
        let patch = AwardPatch {
            award_number: Some(Some("123".into())),
            ..AwardPatch::default()
        };
        patch.merge_into(&mut award).unwrap();
        assert_eq!(
            award.kind,
            AwardKind::Standard {
                funder_name: Some("NSF".into()),
                award_number: Some("123".into()),
                award_title: None,
            }
        );
    }

    #[test]
    fn test_award_patch_switches_mode() {
        let mut award = Award::standard("NSF").with_id("a");
        let patch = AwardPatch {
            mode: Some(AwardMode::Custom),
            text: Some(Some("Thanks".into())),
            ..AwardPatch::default()
        };
        patch.merge_into(&mut award).unwrap();
        assert_eq!(award, Award::custom("Thanks").with_id("a"));
    }

    #[test]
    fn test_award_patch_rejects_foreign_fields() {
        let mut award = Award::custom("Thanks").with_id("a");
        let patch = AwardPatch {
            funder_name: Some(Some("NSF".into())),
            ..AwardPatch::default()
        };
        assert!(patch.merge_into(&mut award).is_err());
        assert_eq!(award, Award::custom("Thanks").with_id("a"));
    }

    #[test]
    fn test_item_patch_json_shape() {
        let patch = ItemPatch::from(TitlePatch::title("X"));
        let json = serde_json::to_value(&patch).unwrap();
        assert_eq!(json, json!({"type": "title", "fields": {"title": "X"}}));
        assert_eq!(patch.collection(), CollectionPath::Titles);
    }
}
