//! Bibliographic references cited by the publication

use serde::{Deserialize, Serialize};

use crate::ItemId;

/// A free-text citation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub id: ItemId,
    pub reference: String,
}

impl Reference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self {
            id: ItemId::new(),
            reference: reference.into(),
        }
    }

    pub fn with_id(mut self, id: impl Into<ItemId>) -> Self {
        self.id = id.into();
        self
    }

    /// DOIs mentioned in the citation text
    pub fn dois(&self) -> Vec<String> {
        vedra_identifiers::extract_dois(&self.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_dois() {
        let r = Reference::new("Smith, J. (2020). A study. Nature. https://doi.org/10.1038/xyz123.");
        assert_eq!(r.dois(), vec!["10.1038/xyz123"]);
        assert!(Reference::new("Unpublished notes").dois().is_empty());
    }
}
