//! The mutation engine
//!
//! Every edit of a record funnels through four operations: `set`, `add_item`,
//! `remove_item` and `update_item`. Each takes the current record by reference
//! and returns a new one; the input is never modified.

use serde::{Deserialize, Serialize};
use tracing::debug;

use vedra_domain::{
    ids_of, position_of, Award, Contributor, Creator, DateEntry, Description, FileEntry,
    Identified, ItemId, License, Record, Reference, Title,
};
use vedra_identifiers::{unique_item_id, ItemIdGenerator, RandomIdGenerator};

use crate::error::MutationError;
use crate::patch::{ItemPatch, MergePatch};
use crate::path::{CollectionPath, FieldPath, FieldValue};
use crate::visibility::{reduce, VisibilityAction};

/// A new entry for one of the record's collections
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "item", rename_all = "camelCase")]
pub enum Item {
    File(FileEntry),
    Title(Title),
    Creator(Creator),
    Description(Description),
    License(License),
    Contributor(Contributor),
    Date(DateEntry),
    Award(Award),
    Reference(Reference),
}

impl Item {
    /// Collection this entry belongs to
    pub fn collection(&self) -> CollectionPath {
        match self {
            Item::File(_) => CollectionPath::Files,
            Item::Title(_) => CollectionPath::Titles,
            Item::Creator(_) => CollectionPath::Creators,
            Item::Description(_) => CollectionPath::Descriptions,
            Item::License(_) => CollectionPath::Licenses,
            Item::Contributor(_) => CollectionPath::Contributors,
            Item::Date(_) => CollectionPath::Dates,
            Item::Award(_) => CollectionPath::Awards,
            Item::Reference(_) => CollectionPath::References,
        }
    }
}

macro_rules! impl_from_item {
    ($($ty:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Item {
                fn from(item: $ty) -> Self {
                    Item::$variant(item)
                }
            }
        )*
    };
}

impl_from_item!(
    FileEntry => File,
    Title => Title,
    Creator => Creator,
    Description => Description,
    License => License,
    Contributor => Contributor,
    DateEntry => Date,
    Award => Award,
    Reference => Reference,
);

/// One edit, in serializable form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    Set {
        path: FieldPath,
        value: FieldValue,
    },
    AddItem {
        path: CollectionPath,
        item: Item,
    },
    RemoveItem {
        path: CollectionPath,
        id: ItemId,
    },
    UpdateItem {
        path: CollectionPath,
        id: ItemId,
        patch: ItemPatch,
    },
}

impl Mutation {
    pub fn set(path: FieldPath, value: impl Into<FieldValue>) -> Self {
        Mutation::Set {
            path,
            value: value.into(),
        }
    }

    pub fn add(path: CollectionPath, item: impl Into<Item>) -> Self {
        Mutation::AddItem {
            path,
            item: item.into(),
        }
    }

    pub fn remove(path: CollectionPath, id: impl Into<ItemId>) -> Self {
        Mutation::RemoveItem {
            path,
            id: id.into(),
        }
    }

    pub fn update(path: CollectionPath, id: impl Into<ItemId>, patch: impl Into<ItemPatch>) -> Self {
        Mutation::UpdateItem {
            path,
            id: id.into(),
            patch: patch.into(),
        }
    }

    /// Dot path this mutation addresses
    pub fn path(&self) -> &'static str {
        match self {
            Mutation::Set { path, .. } => path.as_str(),
            Mutation::AddItem { path, .. }
            | Mutation::RemoveItem { path, .. }
            | Mutation::UpdateItem { path, .. } => path.as_str(),
        }
    }
}

/// Applies mutations to records, assigning fresh ids to added entries
#[derive(Debug, Clone, Default)]
pub struct MutationEngine<G = RandomIdGenerator> {
    ids: G,
}

impl<G: ItemIdGenerator> MutationEngine<G> {
    pub fn new(ids: G) -> Self {
        Self { ids }
    }

    /// Apply any mutation. Returns the new record and, for additions, the
    /// id given to the new entry.
    pub fn apply(
        &mut self,
        record: &Record,
        mutation: &Mutation,
    ) -> Result<(Record, Option<ItemId>), MutationError> {
        match mutation {
            Mutation::Set { path, value } => Ok((self.set(record, *path, value.clone())?, None)),
            Mutation::AddItem { path, item } => {
                let (next, id) = self.add_item(record, *path, item.clone())?;
                Ok((next, Some(id)))
            }
            Mutation::RemoveItem { path, id } => Ok((self.remove_item(record, *path, id), None)),
            Mutation::UpdateItem { path, id, patch } => {
                Ok((self.update_item(record, *path, id, patch)?, None))
            }
        }
    }

    /// Replace the value at `path`
    pub fn set(
        &self,
        record: &Record,
        path: FieldPath,
        value: FieldValue,
    ) -> Result<Record, MutationError> {
        if value.kind() != path.kind() {
            return Err(MutationError::misuse(
                path.as_str(),
                format!("expected a {} value, got a {} value", path.kind(), value.kind()),
            ));
        }

        let mut next = record.clone();
        if path.is_visibility() {
            let action = match (path, value) {
                (FieldPath::Level, FieldValue::Level(level)) => VisibilityAction::SetLevel(level),
                (FieldPath::EmbargoEnabled, FieldValue::Bool(b)) => {
                    VisibilityAction::SetEmbargoEnabled(b)
                }
                (FieldPath::EmbargoUntil, FieldValue::Text(s)) => VisibilityAction::SetEmbargoUntil(s),
                (FieldPath::EmbargoReason, FieldValue::Text(s)) => {
                    VisibilityAction::SetEmbargoReason(s)
                }
                (path, _) => return Err(MutationError::misuse(path.as_str(), "not a visibility field")),
            };
            next.visibility = reduce(&record.visibility, action)?;
            debug!(path = %path, "set visibility field");
            return Ok(next);
        }

        match value {
            FieldValue::Text(text) => *text_slot(&mut next, path)? = text,
            FieldValue::Bool(flag) => match path {
                FieldPath::DoiHasExisting => next.basic_information.doi.has_existing = flag,
                _ => return Err(MutationError::misuse(path.as_str(), "not a boolean field")),
            },
            FieldValue::List(list) => match path {
                FieldPath::Keywords => {
                    next.recommended_information.keywords = normalize_list(list)
                }
                FieldPath::Languages => {
                    next.recommended_information.languages = normalize_list(list)
                }
                _ => return Err(MutationError::misuse(path.as_str(), "not a list field")),
            },
            FieldValue::Level(_) => {
                return Err(MutationError::misuse(path.as_str(), "not a visibility field"))
            }
        }

        debug!(path = %path, "set field");
        Ok(next)
    }

    /// Append `item` to the collection at `path` under a fresh id
    pub fn add_item(
        &mut self,
        record: &Record,
        path: CollectionPath,
        item: Item,
    ) -> Result<(Record, ItemId), MutationError> {
        if item.collection() != path {
            return Err(MutationError::misuse(
                path.as_str(),
                format!("cannot add an entry of {}", item.collection()),
            ));
        }

        let mut next = record.clone();
        let ids = &mut self.ids;
        let id = match item {
            Item::File(i) => push_new(&mut next.files, i, ids),
            Item::Title(i) => push_new(&mut next.basic_information.titles, i, ids),
            Item::Creator(i) => push_new(&mut next.basic_information.creators, i, ids),
            Item::Description(i) => push_new(&mut next.basic_information.descriptions, i, ids),
            Item::License(i) => push_new(&mut next.basic_information.licenses, i, ids),
            Item::Contributor(i) => push_new(&mut next.recommended_information.contributors, i, ids),
            Item::Date(i) => push_new(&mut next.recommended_information.dates, i, ids),
            Item::Award(i) => push_new(&mut next.funding.awards, i, ids),
            Item::Reference(i) => push_new(&mut next.references, i, ids),
        };

        debug!(path = %path, id = %id, "added item");
        Ok((next, id))
    }

    /// Remove the entry with `id`; absent ids are a no-op
    pub fn remove_item(&self, record: &Record, path: CollectionPath, id: &str) -> Record {
        let mut next = record.clone();
        let removed = match path {
            CollectionPath::Files => remove_by_id(&mut next.files, id),
            CollectionPath::Titles => remove_by_id(&mut next.basic_information.titles, id),
            CollectionPath::Creators => remove_by_id(&mut next.basic_information.creators, id),
            CollectionPath::Descriptions => {
                remove_by_id(&mut next.basic_information.descriptions, id)
            }
            CollectionPath::Licenses => remove_by_id(&mut next.basic_information.licenses, id),
            CollectionPath::Contributors => {
                remove_by_id(&mut next.recommended_information.contributors, id)
            }
            CollectionPath::Dates => remove_by_id(&mut next.recommended_information.dates, id),
            CollectionPath::Awards => remove_by_id(&mut next.funding.awards, id),
            CollectionPath::References => remove_by_id(&mut next.references, id),
        };
        debug!(path = %path, id, removed, "remove item");
        next
    }

    /// Shallow-merge `patch` into the entry with `id`; absent ids are a no-op
    pub fn update_item(
        &self,
        record: &Record,
        path: CollectionPath,
        id: &str,
        patch: &ItemPatch,
    ) -> Result<Record, MutationError> {
        if patch.collection() != path {
            return Err(MutationError::misuse(
                path.as_str(),
                format!("cannot apply a patch for {}", patch.collection()),
            ));
        }

        let mut next = record.clone();
        let found = match patch {
            ItemPatch::File(p) => merge_by_id(&mut next.files, id, p)?,
            ItemPatch::Title(p) => merge_by_id(&mut next.basic_information.titles, id, p)?,
            ItemPatch::Creator(p) => merge_by_id(&mut next.basic_information.creators, id, p)?,
            ItemPatch::Description(p) => {
                merge_by_id(&mut next.basic_information.descriptions, id, p)?
            }
            ItemPatch::License(p) => merge_by_id(&mut next.basic_information.licenses, id, p)?,
            ItemPatch::Contributor(p) => {
                merge_by_id(&mut next.recommended_information.contributors, id, p)?
            }
            ItemPatch::Date(p) => merge_by_id(&mut next.recommended_information.dates, id, p)?,
            ItemPatch::Award(p) => merge_by_id(&mut next.funding.awards, id, p)?,
            ItemPatch::Reference(p) => merge_by_id(&mut next.references, id, p)?,
        };
        debug!(path = %path, id, found, "update item");
        Ok(next)
    }
}

fn text_slot(record: &mut Record, path: FieldPath) -> Result<&mut String, MutationError> {
    use FieldPath::*;
    let basic = &mut record.basic_information;
    let recommended = &mut record.recommended_information;
    let publishing = &mut record.publishing_information;
    Ok(match path {
        DoiValue => &mut basic.doi.value,
        ResourceType => &mut basic.resource_type,
        PublicationDate => &mut basic.publication_date,
        Copyright => &mut basic.copyright,
        Version => &mut recommended.version,
        Publisher => &mut recommended.publisher,
        JournalTitle => &mut publishing.journal.title,
        JournalIssn => &mut publishing.journal.issn,
        JournalVolume => &mut publishing.journal.volume,
        JournalIssue => &mut publishing.journal.issue,
        JournalPages => &mut publishing.journal.pages_or_article_number,
        ImprintTitle => &mut publishing.imprint.title,
        ImprintIsbn => &mut publishing.imprint.isbn,
        ImprintPlace => &mut publishing.imprint.place,
        ImprintPagination => &mut publishing.imprint.pagination,
        ImprintEdition => &mut publishing.imprint.edition,
        ThesisUniversity => &mut publishing.thesis.awarding_university,
        ThesisDepartment => &mut publishing.thesis.awarding_department,
        ThesisType => &mut publishing.thesis.thesis_type,
        ThesisSubmissionDate => &mut publishing.thesis.submission_date,
        ThesisDefenseDate => &mut publishing.thesis.defense_date,
        other => return Err(MutationError::misuse(other.as_str(), "not a text field")),
    })
}

fn push_new<T, G>(items: &mut Vec<T>, mut item: T, ids: &mut G) -> ItemId
where
    T: Identified,
    G: ItemIdGenerator + ?Sized,
{
    let id = unique_item_id(ids, &ids_of(items));
    item.set_id(id.clone());
    items.push(item);
    id
}

/// Trimmed, non-empty, first occurrence wins
fn normalize_list(list: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(list.len());
    for value in list {
        let value = value.trim();
        if !value.is_empty() && !out.iter().any(|v| v == value) {
            out.push(value.to_string());
        }
    }
    out
}

/// Removes the first entry with `id`
fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: &str) -> bool {
    match position_of(items, id) {
        Some(index) => {
            items.remove(index);
            true
        }
        None => false,
    }
}

fn merge_by_id<T, P>(items: &mut [T], id: &str, patch: &P) -> Result<bool, MutationError>
where
    T: Identified,
    P: MergePatch<T>,
{
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            patch.merge_into(item)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VisibilityError;
    use crate::patch::{AwardPatch, CreatorPatch, TitlePatch};
    use vedra_domain::VisibilityLevel;
    use vedra_identifiers::SequentialIdGenerator;

    fn engine() -> MutationEngine<SequentialIdGenerator> {
        MutationEngine::new(SequentialIdGenerator::new())
    }

    #[test]
    fn test_set_text_leaves_input_untouched() {
        let record = Record::new();
        let next = engine()
            .set(&record, FieldPath::DoiValue, "10.1234/abc".into())
            .unwrap();
        assert_eq!(next.basic_information.doi.value, "10.1234/abc");
        assert_eq!(record.basic_information.doi.value, "");
    }

    #[test]
    fn test_set_kind_mismatch_is_misuse() {
        let err = engine()
            .set(&Record::new(), FieldPath::DoiValue, true.into())
            .unwrap_err();
        assert!(matches!(err, MutationError::Misuse { ref path, .. } if path == "basicInformation.doi.value"));
    }

    #[test]
    fn test_set_lists_and_publishing() {
        let e = engine();
        let r = e
            .set(&Record::new(), FieldPath::Keywords, vec!["a".to_string()].into())
            .unwrap();
        let r = e.set(&r, FieldPath::JournalIssn, "2049-3630".into()).unwrap();
        let r = e.set(&r, FieldPath::DoiHasExisting, true.into()).unwrap();
        assert_eq!(r.recommended_information.keywords, vec!["a"]);
        assert_eq!(r.publishing_information.journal.issn, "2049-3630");
        assert!(r.basic_information.doi.has_existing);
    }

    #[test]
    fn test_set_list_trims_and_dedupes() {
        let list = vec![" tides ", "tides", "", "ocean", "ocean "]
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        let r = engine()
            .set(&Record::new(), FieldPath::Keywords, list.clone().into())
            .unwrap();
        assert_eq!(r.recommended_information.keywords, vec!["tides", "ocean"]);
        let r = engine().set(&r, FieldPath::Languages, list.into()).unwrap();
        assert_eq!(r.recommended_information.languages, vec!["tides", "ocean"]);
    }

    #[test]
    fn test_remove_takes_only_first_duplicate() {
        let mut record = Record::new();
        record
            .basic_information
            .creators
            .push(Creator::new("Twin").with_id("1"));
        let next = engine().remove_item(&record, CollectionPath::Creators, "1");
        let creators = &next.basic_information.creators;
        assert_eq!(creators.len(), 1);
        assert_eq!(creators[0].name, "Twin");
    }

    #[test]
    fn test_set_routes_visibility_through_reducer() {
        let e = engine();
        let err = e
            .set(&Record::new(), FieldPath::EmbargoEnabled, true.into())
            .unwrap_err();
        assert_eq!(
            err,
            MutationError::Visibility(VisibilityError::EmbargoRequiresRestricted {
                level: VisibilityLevel::Public
            })
        );

        let r = e
            .set(&Record::new(), FieldPath::Level, VisibilityLevel::Restricted.into())
            .unwrap();
        let r = e.set(&r, FieldPath::EmbargoEnabled, true.into()).unwrap();
        let r = e.set(&r, FieldPath::EmbargoUntil, "2026-01-01".into()).unwrap();
        let r = e.set(&r, FieldPath::Level, VisibilityLevel::Public.into()).unwrap();
        assert!(!r.visibility.embargo.enabled);
        assert_eq!(r.visibility.embargo.until, "");
    }

    #[test]
    fn test_add_item_appends_with_fresh_id() {
        let mut e = engine();
        let record = Record::new();
        let (next, id) = e
            .add_item(&record, CollectionPath::Titles, Title::new("Second").into())
            .unwrap();
        // "1" is taken by the default title
        assert_eq!(id, "2");
        let titles = &next.basic_information.titles;
        assert_eq!(titles.len(), 2);
        assert_eq!(titles[1].title, "Second");
        assert_eq!(titles[1].id, "2");
        assert_eq!(record.basic_information.titles.len(), 1);
    }

    #[test]
    fn test_add_to_wrong_collection_is_misuse() {
        let err = engine()
            .add_item(&Record::new(), CollectionPath::Titles, Creator::new("X").into())
            .unwrap_err();
        assert!(matches!(err, MutationError::Misuse { .. }));
    }

    #[test]
    fn test_remove_item_idempotent() {
        let e = engine();
        let record = Record::new();
        let once = e.remove_item(&record, CollectionPath::Creators, "1");
        let twice = e.remove_item(&once, CollectionPath::Creators, "1");
        assert!(once.basic_information.creators.is_empty());
        assert_eq!(once, twice);
        assert_eq!(e.remove_item(&record, CollectionPath::Creators, "nope"), record);
    }

    #[test]
    fn test_update_item_only_touches_target() {
        let mut e = engine();
        let (r, id) = e
            .add_item(&Record::new(), CollectionPath::Creators, Creator::new("B").into())
            .unwrap();
        let next = e
            .update_item(&r, CollectionPath::Creators, &id, &CreatorPatch::name("Bee").into())
            .unwrap();
        assert_eq!(next.basic_information.creators[0], r.basic_information.creators[0]);
        assert_eq!(next.basic_information.creators[1].name, "Bee");
        assert_eq!(next.basic_information.creators[1].id, id);
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let record = Record::new();
        let next = engine()
            .update_item(&record, CollectionPath::Titles, "zzz", &TitlePatch::title("X").into())
            .unwrap();
        assert_eq!(next, record);
    }

    #[test]
    fn test_update_with_foreign_patch_is_misuse() {
        let err = engine()
            .update_item(
                &Record::new(),
                CollectionPath::Titles,
                "1",
                &AwardPatch::default().into(),
            )
            .unwrap_err();
        assert!(matches!(err, MutationError::Misuse { .. }));
    }

    #[test]
    fn test_apply_serialized_mutation() {
        let json = r#"{"op":"addItem","path":"funding.awards","item":{"type":"award","item":{"id":"","mode":"custom","text":"Supported by X"}}}"#;
        let mutation: Mutation = serde_json::from_str(json).unwrap();
        assert_eq!(mutation.path(), "funding.awards");
        let (next, id) = engine().apply(&Record::empty(), &mutation).unwrap();
        assert_eq!(id.as_deref(), Some("1"));
        assert_eq!(next.funding.awards[0], Award::custom("Supported by X").with_id("1"));
    }

    #[test]
    fn test_mutation_round_trips_through_json() {
        let mutation = Mutation::set(FieldPath::Level, VisibilityLevel::FilesOnly);
        let json = serde_json::to_string(&mutation).unwrap();
        assert!(json.contains("\"visibility.level\""));
        let back: Mutation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mutation);
    }
}
