use anyhow::{anyhow, bail, Result};
use twyg::{LogLevel, OptsBuilder};

use crate::config::LoggingConfig;

/// Install the twyg logger described by `config`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let level = parse_level(&config.level)?;

    let opts = OptsBuilder::new()
        .coloured(config.coloured)
        .level(level)
        .build()
        .map_err(|e| anyhow!("Invalid logging options: {:?}", e))?;

    twyg::setup(opts).map_err(|e| anyhow!("Could not set up logger: {:?}", e))?;

    log::debug!("Logging initialised at level {}", config.level);
    Ok(())
}

fn parse_level(level: &str) -> Result<LogLevel> {
    Ok(match level.trim().to_ascii_lowercase().as_str() {
        "trace" => LogLevel::Trace,
        "debug" => LogLevel::Debug,
        "info" => LogLevel::Info,
        "warn" | "warning" => LogLevel::Warn,
        "error" => LogLevel::Error,
        other => bail!(
            "Unknown log level: {}\n\nValid levels: trace, debug, info, warn, error",
            other
        ),
    })
}
