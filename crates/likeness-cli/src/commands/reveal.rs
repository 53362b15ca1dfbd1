use anyhow::Result;
use likeness_images::ResolverChain;

use super::load_store;
use crate::config::Config;

/// Run the interactive character picker.
pub async fn run_reveal(config: &Config) -> Result<()> {
    let store = load_store(config)?;
    let chain = ResolverChain::from_config(&config.images)?;

    log::debug!("Image resolvers: {:?}", chain.resolver_names());

    // Log lines would draw over the alternate screen; failures are shown in
    // the UI instead.
    let level = log::max_level();
    log::set_max_level(log::LevelFilter::Off);
    let result = crate::tui::run_tui(&store, &chain).await;
    log::set_max_level(level);

    result
}
