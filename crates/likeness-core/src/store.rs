//! Load-once catalog store.
//!
//! A [`CatalogStore`] pairs the character [`Catalog`] with its index-aligned
//! [`VectorMatrix`]. It is built once at startup and handed by reference to
//! every match request; nothing mutates it afterwards.

use std::fs::File;
use std::path::Path;

use crate::embeddings::read_embeddings;
use crate::error::{DataLoadError, Error, Result};
use crate::matcher::find_best_match;
use crate::model::{Catalog, MatchResult, VectorMatrix};

/// Column holding character names when none is configured.
pub const DEFAULT_NAME_COLUMN: &str = "char";

/// The character catalog and its embeddings, validated to agree row for row.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    catalog: Catalog,
    vectors: VectorMatrix,
}

impl CatalogStore {
    /// Pair an in-memory catalog with its matrix.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError::RowCountMismatch`] when the two disagree in
    /// length.
    pub fn from_parts(
        catalog: Catalog,
        vectors: VectorMatrix,
    ) -> std::result::Result<Self, DataLoadError> {
        if catalog.len() != vectors.rows() {
            return Err(DataLoadError::RowCountMismatch {
                names: catalog.len(),
                vectors: vectors.rows(),
            });
        }
        Ok(Self { catalog, vectors })
    }

    /// Load names from the `char` column of `names_path` and vectors from
    /// `embeddings_path`.
    pub fn load(names_path: &Path, embeddings_path: &Path) -> Result<Self> {
        Self::load_with_column(names_path, DEFAULT_NAME_COLUMN, embeddings_path)
    }

    /// Load names from `column` of the CSV at `names_path` and vectors from
    /// `embeddings_path`.
    pub fn load_with_column(
        names_path: &Path,
        column: &str,
        embeddings_path: &Path,
    ) -> Result<Self> {
        log::info!(
            "Loading catalog from {} and embeddings from {}",
            names_path.display(),
            embeddings_path.display()
        );

        let names = read_names(names_path, column)?;
        let catalog = Catalog::from_names(names)?;
        let vectors = read_embeddings(embeddings_path)?;
        let store = Self::from_parts(catalog, vectors)?;

        log::info!(
            "Loaded {} characters with {}-dimensional embeddings",
            store.len(),
            store.dims()
        );
        Ok(store)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn vectors(&self) -> &VectorMatrix {
        &self.vectors
    }

    /// Number of characters (N).
    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Embedding dimension (D).
    pub fn dims(&self) -> usize {
        self.vectors.dims()
    }

    /// Position of the character named exactly `name`.
    pub fn index_of(&self, name: &str) -> Result<usize> {
        self.catalog
            .index_of(name)
            .ok_or_else(|| Error::UnknownCharacter {
                name: name.to_string(),
            })
    }

    /// Closest other character to the one at `query_index`.
    pub fn best_match(&self, query_index: usize) -> Result<MatchResult> {
        find_best_match(&self.catalog, &self.vectors, query_index)
    }
}

/// Read the `column` field of every row of a headed CSV file.
pub fn read_names(path: &Path, column: &str) -> std::result::Result<Vec<String>, DataLoadError> {
    let file = File::open(path).map_err(|e| DataLoadError::from_io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| DataLoadError::malformed(path, format!("unreadable header row: {e}")))?;
    let position = headers.iter().position(|h| h == column).ok_or_else(|| {
        let found: Vec<&str> = headers.iter().collect();
        DataLoadError::malformed(
            path,
            format!("no column named {column:?} (found: {})", found.join(", ")),
        )
    })?;

    let mut names = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record
            .map_err(|e| DataLoadError::malformed(path, format!("row {row}: {e}")))?;
        let name = record.get(position).ok_or_else(|| {
            DataLoadError::malformed(path, format!("row {row} has no {column:?} field"))
        })?;
        names.push(name.to_string());
    }

    if names.is_empty() {
        return Err(DataLoadError::Empty {
            path: path.to_path_buf(),
        });
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_read_names_by_column() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "characters.csv",
            "id,char,house\n0,Jon Snow,Stark\n1,\"Tyrion Lannister\",Lannister\n",
        );
        let names = read_names(&path, "char").unwrap();
        assert_eq!(names, vec!["Jon Snow", "Tyrion Lannister"]);
    }

    #[test]
    fn test_read_names_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "characters.csv", "name\nJon Snow\n");
        let err = read_names(&path, "char").unwrap_err();
        assert!(err.to_string().contains("no column named \"char\""));
    }

    #[test]
    fn test_read_names_header_only() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "characters.csv", "char\n");
        assert!(matches!(
            read_names(&path, "char"),
            Err(DataLoadError::Empty { .. })
        ));
    }

    #[test]
    fn test_read_names_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_names(&dir.path().join("nope.csv"), "char").unwrap_err();
        assert!(matches!(err, DataLoadError::Missing { .. }));
    }

    #[test]
    fn test_from_parts_row_mismatch() {
        let catalog = Catalog::from_names(["A", "B", "C"]).unwrap();
        let vectors = VectorMatrix::from_rows(vec![vec![1.0], vec![2.0]]).unwrap();
        let err = CatalogStore::from_parts(catalog, vectors).unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::RowCountMismatch {
                names: 3,
                vectors: 2
            }
        ));
    }

    #[test]
    fn test_load_five_names_four_vectors() {
        let dir = TempDir::new().unwrap();
        let names = write(
            &dir,
            "characters.csv",
            "char\nJon Snow\nArya Stark\nSansa Stark\nBran Stark\nRobb Stark\n",
        );
        let embeddings = write(
            &dir,
            "embeddings.json",
            "[[1, 0], [0, 1], [1, 1], [0.5, 0.5]]",
        );

        let err = CatalogStore::load(&names, &embeddings).unwrap_err();
        assert!(matches!(
            err,
            Error::DataLoad(DataLoadError::RowCountMismatch {
                names: 5,
                vectors: 4
            })
        ));
    }

    #[test]
    fn test_load_and_lookup() {
        let dir = TempDir::new().unwrap();
        let names = write(&dir, "characters.csv", "char\nJon\nDaenerys\nTyrion\n");
        let embeddings = write(&dir, "embeddings.json", "[[1, 0], [0.9, 0.1], [-1, 0]]");

        let store = CatalogStore::load(&names, &embeddings).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.dims(), 2);
        assert_eq!(store.index_of("Tyrion").unwrap(), 2);
        assert!(matches!(
            store.index_of("tyrion"),
            Err(Error::UnknownCharacter { .. })
        ));
    }
}
