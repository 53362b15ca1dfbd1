//! Local image folder resolver.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{ImageError, ImageResult};
use crate::resolver::{ImageRef, ImageResolver};

/// Resolves `Jon Snow` to `<dir>/Jon_Snow.<extension>` when that file exists.
#[derive(Debug, Clone)]
pub struct LocalFileResolver {
    dir: PathBuf,
    extension: String,
}

impl LocalFileResolver {
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Path an image for `name` is expected at.
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", name.replace(' ', "_"), self.extension))
    }
}

#[async_trait]
impl ImageResolver for LocalFileResolver {
    fn name(&self) -> &str {
        "local"
    }

    async fn resolve(&self, name: &str) -> ImageResult<Option<ImageRef>> {
        let path = self.path_for(name);
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(Some(ImageRef::Local(path))),
            Ok(_) => Ok(None),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ImageError::Io {
                path,
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_path_for() {
        let resolver = LocalFileResolver::new("images", "jpg");
        assert_eq!(
            resolver.path_for("Daenerys Targaryen"),
            PathBuf::from("images/Daenerys_Targaryen.jpg")
        );
        assert_eq!(resolver.path_for("Hodor"), PathBuf::from("images/Hodor.jpg"));
    }

    #[tokio::test]
    async fn test_resolve_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("Jon_Snow.jpg"), b"jpeg").unwrap();

        let resolver = LocalFileResolver::new(temp_dir.path(), "jpg");
        let image = resolver.resolve("Jon Snow").await.unwrap();
        assert_eq!(
            image,
            Some(ImageRef::Local(temp_dir.path().join("Jon_Snow.jpg")))
        );
    }

    #[tokio::test]
    async fn test_resolve_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let resolver = LocalFileResolver::new(temp_dir.path(), "jpg");
        assert_eq!(resolver.resolve("Jon Snow").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_directory_with_image_name_is_not_an_image() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("Jon_Snow.jpg")).unwrap();

        let resolver = LocalFileResolver::new(temp_dir.path(), "jpg");
        assert_eq!(resolver.resolve("Jon Snow").await.unwrap(), None);
    }
}
