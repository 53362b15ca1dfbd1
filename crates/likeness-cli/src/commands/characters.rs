use anyhow::Result;

use super::load_store;
use crate::config::Config;

/// Print every character in catalog order.
pub fn list_characters(config: &Config) -> Result<()> {
    let store = load_store(config)?;

    for record in store.catalog().iter() {
        println!("{:>4}  {}", record.index, record.name);
    }

    Ok(())
}
