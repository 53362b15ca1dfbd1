//! Remote character directory resolver.
//!
//! Fetches the full character directory from the Thrones API (a JSON array
//! of characters with `fullName` and `imageUrl`) once per process, indexes it
//! by normalised full name, and answers lookups from that index. Transient
//! fetch failures are retried with exponential backoff; the final outcome,
//! success or failure, is cached so later lookups never hit the network.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::OnceCell;

use crate::error::{ImageError, ImageResult};
use crate::resolver::{normalize_name, ImageRef, ImageResolver};

/// Public character directory of the Thrones API.
pub const THRONES_API_URL: &str = "https://thronesapi.com/api/v2/Characters";

const SOURCE_NAME: &str = "ThronesAPI";

// ---------------------------------------------------------------------------
// API response types (private)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DirectoryEntry {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
}

/// Parse a directory response body into a normalised name → image URL map.
///
/// Entries missing a name or an image URL are skipped. A body that is not an
/// array of objects is an [`ImageError::UnexpectedShape`].
pub fn parse_directory(body: &str) -> ImageResult<HashMap<String, String>> {
    let entries: Vec<DirectoryEntry> =
        serde_json::from_str(body).map_err(|e| ImageError::UnexpectedShape {
            source_name: SOURCE_NAME.to_string(),
            message: e.to_string(),
        })?;

    let total = entries.len();
    let directory: HashMap<String, String> = entries
        .into_iter()
        .filter_map(|entry| {
            let name = entry.full_name.filter(|n| !n.trim().is_empty())?;
            let url = entry.image_url.filter(|u| !u.trim().is_empty())?;
            Some((normalize_name(&name), url))
        })
        .collect();

    if directory.len() < total {
        log::debug!(
            "Skipped {} {} directory entries without a name or image",
            total - directory.len(),
            SOURCE_NAME
        );
    }
    Ok(directory)
}

/// Resolver backed by the remote character directory.
#[derive(Debug)]
pub struct RemoteDirectoryResolver {
    http: Client,
    url: String,
    max_retries: usize,
    directory: OnceCell<ImageResult<HashMap<String, String>>>,
}

impl RemoteDirectoryResolver {
    /// Create a resolver that will fetch the directory from `url` on first
    /// use.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(url: impl Into<String>, timeout: Duration, max_retries: usize) -> ImageResult<Self> {
        let http = Client::builder()
            .user_agent(concat!(
                "likeness/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/oxur/likeness)"
            ))
            .timeout(timeout)
            .build()
            .map_err(|e| ImageError::Unreachable {
                source_name: SOURCE_NAME.to_string(),
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            http,
            url: url.into(),
            max_retries,
            directory: OnceCell::new(),
        })
    }

    /// Create a resolver over an already-fetched directory, keyed by
    /// normalised name.
    pub fn from_directory(directory: HashMap<String, String>) -> Self {
        Self {
            http: Client::new(),
            url: THRONES_API_URL.to_string(),
            max_retries: 0,
            directory: OnceCell::new_with(Some(Ok(directory))),
        }
    }

    async fn fetch_once(&self) -> ImageResult<HashMap<String, String>> {
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(unreachable)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImageError::Rejected {
                source_name: SOURCE_NAME.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(unreachable)?;
        parse_directory(&body)
    }

    async fn fetch(&self) -> ImageResult<HashMap<String, String>> {
        log::info!("Fetching {} character directory from {}", SOURCE_NAME, self.url);

        let backoff = ExponentialBuilder::default()
            .with_min_delay(Duration::from_millis(250))
            .with_max_times(self.max_retries);

        let result = (|| self.fetch_once())
            .retry(backoff)
            .sleep(tokio::time::sleep)
            .when(ImageError::is_transient)
            .notify(|err: &ImageError, delay: Duration| {
                log::debug!("Retrying {} in {:?} after: {}", SOURCE_NAME, delay, err);
            })
            .await;

        match &result {
            Ok(directory) => log::info!(
                "Indexed {} characters from {}",
                directory.len(),
                SOURCE_NAME
            ),
            Err(e) => log::warn!(
                "{} directory unavailable, falling back for this session: {}",
                SOURCE_NAME,
                e
            ),
        }
        result
    }

    /// The cached directory, fetching it on first call.
    pub async fn directory(&self) -> &ImageResult<HashMap<String, String>> {
        self.directory.get_or_init(|| self.fetch()).await
    }
}

fn unreachable(e: reqwest::Error) -> ImageError {
    ImageError::Unreachable {
        source_name: SOURCE_NAME.to_string(),
        message: e.to_string(),
    }
}

#[async_trait]
impl ImageResolver for RemoteDirectoryResolver {
    fn name(&self) -> &str {
        SOURCE_NAME
    }

    async fn resolve(&self, name: &str) -> ImageResult<Option<ImageRef>> {
        match self.directory().await {
            Ok(directory) => Ok(directory
                .get(&normalize_name(name))
                .cloned()
                .map(ImageRef::Remote)),
            Err(e) => Err(e.clone()),
        }
    }
}
