use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod commands;
mod config;
mod logging;
mod tui;

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "likeness", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// CSV file listing the characters (default: characters.csv)
    #[arg(long, global = true)]
    names: Option<PathBuf>,

    /// Precomputed embeddings aligned with the names (default: embeddings.npy)
    #[arg(long, global = true)]
    embeddings: Option<PathBuf>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Debug, clap::Subcommand)]
enum Commands {
    /// List every character in catalog order
    Characters,
    /// Reveal the most similar character
    ///
    /// Scores every other character by cosine similarity of its embedding
    /// against the chosen one and prints the best match. The chosen
    /// character can never match itself; ties go to whichever character
    /// comes first in the catalog.
    ///
    /// Names must match the catalog exactly (case-sensitive). Use
    /// 'likeness characters' to list them.
    ///
    /// Images for both characters are looked up in the remote character
    /// directory, then in the local image folder. A missing image is
    /// reported but never stops the match from being shown.
    Match {
        /// Exact character name
        name: Option<String>,

        /// Catalog position instead of a name
        #[arg(long, conflicts_with = "name")]
        index: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Skip image resolution
        #[arg(long)]
        no_images: bool,
    },
    /// Show the loaded catalog's size and embedding dimension
    Inspect,
    /// Pick a character interactively and reveal its match
    Reveal,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, clap::Subcommand)]
enum ConfigCommand {
    /// Show the effective configuration
    Show,
    /// Print one value, or the whole config file when no key is given
    Get {
        /// Dotted key, e.g. images.local_dir
        key: Option<String>,
    },
    /// Set a value in the config file
    Set {
        /// Dotted key, e.g. images.remote_enabled
        key: String,
        value: String,
    },
    /// Print the config file path
    Path,
    /// Print an example config file
    Example,
    /// Create the config file with defaults
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    config.apply_overrides(cli.names, cli.embeddings, cli.log_level);
    logging::init(&config.logging)?;

    match cli.command {
        Commands::Characters => {
            commands::list_characters(&config)?;
        }
        Commands::Match {
            name,
            index,
            json,
            no_images,
        } => {
            let target = match (name, index) {
                (Some(name), _) => commands::Target::Name(name),
                (None, Some(index)) => commands::Target::Index(index),
                (None, None) => anyhow::bail!("Give a character name or --index"),
            };
            commands::run_match(&config, target, json, !no_images).await?;
        }
        Commands::Inspect => {
            commands::inspect(&config)?;
        }
        Commands::Reveal => {
            commands::run_reveal(&config).await?;
        }
        Commands::Config { command } => match command {
            ConfigCommand::Show => commands::config::show_config(&config)?,
            ConfigCommand::Get { key } => commands::config::get_config(&config, key)?,
            ConfigCommand::Set { key, value } => commands::config::set_config(&key, &value)?,
            ConfigCommand::Path => commands::config::show_path(),
            ConfigCommand::Example => commands::config::show_example(),
            ConfigCommand::Init => commands::config::init_config()?,
        },
    }

    Ok(())
}
