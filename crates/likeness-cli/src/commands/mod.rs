pub mod characters;
pub mod config;
pub mod inspect;
pub mod matching;
pub mod reveal;

use anyhow::{Context, Result};
use likeness_core::CatalogStore;

use crate::config::Config;

pub use characters::list_characters;
pub use inspect::inspect;
pub use matching::{run_match, Target};
pub use reveal::run_reveal;

/// Load the catalog store named by `config`.
///
/// Any failure here is fatal: no command runs against a partial catalog.
pub fn load_store(config: &Config) -> Result<CatalogStore> {
    CatalogStore::load_with_column(
        &config.names_path,
        &config.name_column,
        &config.embeddings_path,
    )
    .context("Failed to load character data")
}
