//! Core domain model for likeness.
//!
//! This crate defines the character catalog, the index-aligned embedding
//! matrix, the loaders that read both from disk, and the cosine-similarity
//! matcher that picks a character's closest counterpart.

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod embeddings;
pub mod error;
pub mod matcher;
pub mod model;
pub mod store;

pub use error::{DataLoadError, Error, Result};
pub use matcher::{cosine_similarity, find_best_match, SELF_SENTINEL};
pub use model::{Catalog, CharacterRecord, MatchResult, VectorMatrix};
pub use store::CatalogStore;
