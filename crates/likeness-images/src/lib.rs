//! Image resolution for likeness.
//!
//! Resolves a character name to something displayable by walking an ordered
//! chain of resolvers: the remote character directory first, then a local
//! image folder. Failures never escape the chain; a character without an
//! image resolves to [`ImageResolution::Unavailable`].

#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod local;
pub mod remote;
pub mod resolver;

pub use config::ImagesConfig;
pub use error::{ImageError, ImageResult};
pub use local::LocalFileResolver;
pub use remote::RemoteDirectoryResolver;
pub use resolver::{normalize_name, ImageRef, ImageResolution, ImageResolver, ResolverChain};
