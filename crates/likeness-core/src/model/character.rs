use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DataLoadError;

/// A single character in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,

    /// 0-based position; row `index` of the vector matrix belongs to this
    /// character.
    pub index: usize,
}

/// Ordered, immutable collection of characters.
///
/// Names are unique (case-sensitive, as stored) and the sequence order is the
/// alignment key shared with [`VectorMatrix`](crate::model::VectorMatrix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    records: Vec<CharacterRecord>,
    by_name: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from names in row order.
    ///
    /// Rejects empty (or whitespace-only) names and duplicates.
    pub fn from_names<I, S>(names: I) -> Result<Self, DataLoadError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut records = Vec::new();
        let mut by_name = HashMap::new();

        for (index, name) in names.into_iter().enumerate() {
            let name: String = name.into();
            if name.trim().is_empty() {
                return Err(DataLoadError::EmptyName { row: index });
            }
            if let Some(&first) = by_name.get(&name) {
                return Err(DataLoadError::DuplicateName {
                    name,
                    first,
                    second: index,
                });
            }
            by_name.insert(name.clone(), index);
            records.push(CharacterRecord { name, index });
        }

        Ok(Self { records, by_name })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CharacterRecord> {
        self.records.get(index)
    }

    /// Exact, case-sensitive lookup of a character's position.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.by_name.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterRecord> {
        self.records.iter()
    }

    /// Names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_from_names() {
        let catalog = Catalog::from_names(["Jon Snow", "Arya Stark"]).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get(1).unwrap().name, "Arya Stark");
        assert_eq!(catalog.get(1).unwrap().index, 1);
        assert_eq!(
            catalog.names().collect::<Vec<_>>(),
            vec!["Jon Snow", "Arya Stark"]
        );
    }

    #[test]
    fn test_index_of_is_exact() {
        let catalog = Catalog::from_names(["Jon Snow", "Arya Stark"]).unwrap();
        assert_eq!(catalog.index_of("Arya Stark"), Some(1));
        assert_eq!(catalog.index_of("arya stark"), None);
        assert_eq!(catalog.index_of("Arya"), None);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let err = Catalog::from_names(["Hodor", "Bran Stark", "Hodor"]).unwrap_err();
        match err {
            DataLoadError::DuplicateName {
                name,
                first,
                second,
            } => {
                assert_eq!(name, "Hodor");
                assert_eq!(first, 0);
                assert_eq!(second, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_names_differing_by_case_are_distinct() {
        let catalog = Catalog::from_names(["hodor", "Hodor"]).unwrap();
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = Catalog::from_names(["Sansa Stark", "  "]).unwrap_err();
        assert!(matches!(err, DataLoadError::EmptyName { row: 1 }));
    }
}
