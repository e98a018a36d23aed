//! Repeatable record entries and their ids

use std::collections::HashSet;

use crate::{
    Award, Contributor, Creator, DateEntry, Description, FileEntry, License, Reference, Title,
};

/// Id of an entry within its parent collection.
///
/// Ids are unique within one collection only; two collections may reuse the same id.
pub type ItemId = String;

/// An entry of an ordered, id-addressed collection
pub trait Identified {
    fn id(&self) -> &str;
    fn set_id(&mut self, id: ItemId);
}

macro_rules! impl_identified {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Identified for $ty {
                fn id(&self) -> &str {
                    &self.id
                }

                fn set_id(&mut self, id: ItemId) {
                    self.id = id;
                }
            }
        )*
    };
}

impl_identified!(
    FileEntry,
    Title,
    Creator,
    Description,
    License,
    Contributor,
    DateEntry,
    Award,
    Reference,
);

/// Find an entry by id
pub fn find_by_id<'a, T: Identified>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

/// Position of an entry by id
pub fn position_of<T: Identified>(items: &[T], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Ids currently used in a collection
pub fn ids_of<T: Identified>(items: &[T]) -> HashSet<&str> {
    items.iter().map(|item| item.id()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles() -> Vec<Title> {
        vec![
            Title::new("First").with_id("a"),
            Title::new("Second").with_id("b"),
        ]
    }

    #[test]
    fn test_find_by_id() {
        let items = titles();
        assert_eq!(find_by_id(&items, "b").map(|t| t.title.as_str()), Some("Second"));
        assert!(find_by_id(&items, "z").is_none());
    }

    #[test]
    fn test_position_and_ids() {
        let items = titles();
        assert_eq!(position_of(&items, "a"), Some(0));
        let ids = ids_of(&items);
        assert!(ids.contains("a") && ids.contains("b"));
        assert_eq!(ids.len(), 2);
    }
}
