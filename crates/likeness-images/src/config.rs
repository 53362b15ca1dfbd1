use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::remote::THRONES_API_URL;

/// Settings for the image resolver chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagesConfig {
    /// Query the remote character directory before the local folder.
    pub remote_enabled: bool,

    /// URL of the character directory (a JSON array of objects carrying
    /// `fullName` and `imageUrl`).
    pub api_url: String,

    /// Per-request timeout for the directory fetch.
    pub timeout_secs: u64,

    /// Retries after a transient directory fetch failure.
    pub max_retries: usize,

    /// Folder holding `<Name_With_Underscores>.<extension>` fallback images.
    pub local_dir: PathBuf,

    /// Extension of the fallback images, without the dot.
    pub extension: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            remote_enabled: true,
            api_url: THRONES_API_URL.to_string(),
            timeout_secs: 10,
            max_retries: 2,
            local_dir: PathBuf::from("images"),
            extension: "jpg".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ImagesConfig::default();
        assert!(config.remote_enabled);
        assert_eq!(config.api_url, THRONES_API_URL);
        assert_eq!(config.local_dir, PathBuf::from("images"));
        assert_eq!(config.extension, "jpg");
    }

    #[test]
    fn test_partial_deserialize_keeps_defaults() {
        let config: ImagesConfig =
            serde_json::from_str(r#"{"remote_enabled": false, "extension": "png"}"#).unwrap();
        assert!(!config.remote_enabled);
        assert_eq!(config.extension, "png");
        assert_eq!(config.max_retries, 2);
    }
}
