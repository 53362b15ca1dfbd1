use anyhow::Result;

use super::load_store;
use crate::config::Config;

pub fn inspect(config: &Config) -> Result<()> {
    let store = load_store(config)?;

    println!("\nLikeness Catalog\n");
    println!("  Names:       {}", config.names_path.display());
    println!("  Embeddings:  {}", config.embeddings_path.display());
    println!("  Characters:  {}", store.len());
    println!("  Dimensions:  {}", store.dims());

    if store.len() < 2 {
        println!("\n  A match needs at least two characters in the catalog");
    }

    Ok(())
}
