use anyhow::{Context, Result};
use confyg::{env, Confygery};
use likeness_core::store::DEFAULT_NAME_COLUMN;
use likeness_images::ImagesConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for likeness.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (LIKENESS_* prefix)
/// 3. Config file (~/.config/likeness/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// CSV file with one row per character.
    ///
    /// Can be set via:
    /// - CLI: --names /path/to/characters.csv
    /// - ENV: LIKENESS_NAMES_PATH
    /// - Config: names_path = "..."
    #[serde(default = "default_names_path")]
    pub names_path: PathBuf,

    /// Precomputed embeddings, one row per character (.npy or .json,
    /// optionally .gz).
    ///
    /// Can be set via:
    /// - CLI: --embeddings /path/to/embeddings.npy
    /// - ENV: LIKENESS_EMBEDDINGS_PATH
    /// - Config: embeddings_path = "..."
    #[serde(default = "default_embeddings_path")]
    pub embeddings_path: PathBuf,

    /// Header of the CSV column holding character names.
    #[serde(default = "default_name_column")]
    pub name_column: String,

    /// Image resolver chain settings.
    #[serde(default)]
    pub images: ImagesConfig,

    /// Logger settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logger settings, applied to twyg at startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error.
    pub level: String,
    pub coloured: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            coloured: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            names_path: default_names_path(),
            embeddings_path: default_embeddings_path(),
            name_column: default_name_column(),
            images: ImagesConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// Searches for config file at: ~/.config/likeness/config.toml
    /// Reads environment variables with LIKENESS_ prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("likeness");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        Ok(config)
    }

    /// Apply CLI flag overrides on top of the loaded configuration.
    pub fn apply_overrides(
        &mut self,
        names: Option<PathBuf>,
        embeddings: Option<PathBuf>,
        log_level: Option<String>,
    ) {
        if let Some(names) = names {
            self.names_path = names;
        }
        if let Some(embeddings) = embeddings {
            self.embeddings_path = embeddings;
        }
        if let Some(level) = log_level {
            self.logging.level = level;
        }
    }

    /// Look up a (possibly dotted) key such as `images.local_dir`.
    pub fn get(&self, key: &str) -> Result<toml::Value> {
        let value = toml::Value::try_from(self).context("Failed to serialize configuration")?;
        lookup(&value, key).cloned().ok_or_else(|| {
            anyhow::anyhow!(
                "Unknown config key: {}\n\nValid keys: {}",
                key,
                valid_keys().join(", ")
            )
        })
    }
}

fn lookup<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.').try_fold(value, |v, part| v.get(part))
}

/// All settable keys, in dotted form.
pub fn valid_keys() -> Vec<String> {
    let Ok(toml::Value::Table(root)) = toml::Value::try_from(Config::default()) else {
        return Vec::new();
    };
    let mut keys = Vec::new();
    for (key, value) in &root {
        match value {
            toml::Value::Table(section) => {
                keys.extend(section.keys().map(|field| format!("{key}.{field}")));
            }
            _ => keys.push(key.clone()),
        }
    }
    keys
}

/// Set `key` to `value` in the TOML text `contents`, preserving comments and
/// layout. The value is typed after the key's default (bool, integer, or
/// string).
pub fn set_in_document(contents: &str, key: &str, value: &str) -> Result<String> {
    let mut doc = contents
        .parse::<toml_edit::DocumentMut>()
        .context("Config file is not valid TOML")?;

    let template = Config::default().get(key)?;
    let item = match template {
        toml::Value::Boolean(_) => toml_edit::value(
            value
                .parse::<bool>()
                .with_context(|| format!("{key} expects true or false"))?,
        ),
        toml::Value::Integer(_) => toml_edit::value(
            value
                .parse::<i64>()
                .with_context(|| format!("{key} expects an integer"))?,
        ),
        _ => toml_edit::value(value),
    };

    match key.split_once('.') {
        Some((section, field)) => doc[section][field] = item,
        None => doc[key] = item,
    }

    Ok(doc.to_string())
}

fn default_names_path() -> PathBuf {
    PathBuf::from("characters.csv")
}

fn default_embeddings_path() -> PathBuf {
    PathBuf::from("embeddings.npy")
}

fn default_name_column() -> String {
    DEFAULT_NAME_COLUMN.to_string()
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/likeness/config.toml
/// - macOS: ~/Library/Application Support/likeness/config.toml
/// - Windows: %APPDATA%\likeness\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("likeness")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Likeness Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (LIKENESS_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# CSV file listing the characters, one per row
#
# Can also be set via:
# - CLI: likeness --names /data/characters.csv characters
# - Environment: LIKENESS_NAMES_PATH=/data/characters.csv
names_path = "characters.csv"

# Precomputed embeddings, row-aligned with names_path
#
# Supported: NumPy .npy (float32/float64) or JSON (array of arrays),
# optionally gzip compressed (.npy.gz, .json.gz). Convert a pickled
# matrix with numpy.save("embeddings.npy", matrix).
embeddings_path = "embeddings.npy"

# Header of the CSV column holding character names
name_column = "char"

[images]
# Look names up in the remote character directory first
remote_enabled = true
api_url = "https://thronesapi.com/api/v2/Characters"
timeout_secs = 10
max_retries = 2

# Fallback folder: "Jon Snow" resolves to images/Jon_Snow.jpg
local_dir = "images"
extension = "jpg"

[logging]
# trace, debug, info, warn, or error
level = "info"
coloured = true
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}
