//! Resolver trait and the ordered resolver chain.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

use crate::config::ImagesConfig;
use crate::error::{ImageError, ImageResult};
use crate::local::LocalFileResolver;
use crate::remote::RemoteDirectoryResolver;

/// A displayable image location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "location", rename_all = "lowercase")]
pub enum ImageRef {
    /// An image hosted elsewhere.
    Remote(String),
    /// An image file on local disk.
    Local(PathBuf),
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{url}"),
            Self::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Outcome of walking the resolver chain for one character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageResolution {
    Found {
        /// Name of the resolver that produced the image.
        resolver: String,
        image: ImageRef,
    },
    /// No resolver produced an image. Carries any failures met on the way
    /// (empty when every resolver simply had nothing for this name).
    Unavailable { failures: Vec<ImageError> },
}

impl ImageResolution {
    pub fn image(&self) -> Option<&ImageRef> {
        match self {
            Self::Found { image, .. } => Some(image),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Found { .. })
    }
}

/// A single source of character images.
#[async_trait]
pub trait ImageResolver: fmt::Debug + Send + Sync {
    /// Short name used in logs and results.
    fn name(&self) -> &str;

    /// Look up an image for `name`.
    ///
    /// `Ok(None)` means the source works but knows no image for this name.
    async fn resolve(&self, name: &str) -> ImageResult<Option<ImageRef>>;
}

/// Trim and case-fold a character name for directory lookups.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Ordered list of resolvers; the first one to produce an image wins.
#[derive(Debug, Default)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn ImageResolver>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resolver to the end of the chain.
    #[must_use]
    pub fn with(mut self, resolver: impl ImageResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    /// Build the standard chain: remote directory (when enabled), then local
    /// folder.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &ImagesConfig) -> ImageResult<Self> {
        let mut chain = Self::new();
        if config.remote_enabled {
            chain = chain.with(RemoteDirectoryResolver::new(
                config.api_url.clone(),
                Duration::from_secs(config.timeout_secs),
                config.max_retries,
            )?);
        }
        Ok(chain.with(LocalFileResolver::new(
            config.local_dir.clone(),
            config.extension.clone(),
        )))
    }

    /// Names of the resolvers, in the order they are tried.
    pub fn resolver_names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    /// Resolve an image for `name`, degrading to `Unavailable` rather than
    /// failing.
    pub async fn resolve(&self, name: &str) -> ImageResolution {
        let mut failures = Vec::new();

        for resolver in &self.resolvers {
            match resolver.resolve(name).await {
                Ok(Some(image)) => {
                    log::debug!("{} resolved {:?} to {}", resolver.name(), name, image);
                    return ImageResolution::Found {
                        resolver: resolver.name().to_string(),
                        image,
                    };
                }
                Ok(None) => {
                    log::debug!("{} has no image for {:?}", resolver.name(), name);
                }
                Err(e) => {
                    log::warn!("{} failed to resolve {:?}: {}", resolver.name(), name, e);
                    failures.push(e);
                }
            }
        }

        ImageResolution::Unavailable { failures }
    }
}
