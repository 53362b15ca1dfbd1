use anyhow::{Context, Result};
use likeness_core::{CatalogStore, MatchResult};
use likeness_images::{ImageResolution, ResolverChain};
use serde_json::json;

use super::load_store;
use crate::config::Config;

const COLUMN_WIDTH: usize = 40;

/// Which character to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Name(String),
    Index(usize),
}

impl Target {
    fn index_in(&self, store: &CatalogStore) -> Result<usize> {
        Ok(match self {
            Self::Name(name) => store.index_of(name)?,
            Self::Index(index) => *index,
        })
    }
}

/// Text shown in place of an image.
pub fn image_text(resolution: Option<&ImageResolution>) -> String {
    match resolution {
        None => "(images skipped)".to_string(),
        Some(ImageResolution::Found { image, .. }) => image.to_string(),
        Some(ImageResolution::Unavailable { .. }) => "Image not available".to_string(),
    }
}

fn image_json(resolution: Option<&ImageResolution>) -> serde_json::Value {
    match resolution {
        None => serde_json::Value::Null,
        Some(ImageResolution::Found { resolver, image }) => json!({
            "resolver": resolver,
            "image": image,
        }),
        Some(ImageResolution::Unavailable { failures }) => json!({
            "unavailable": true,
            "failures": failures.iter().map(ToString::to_string).collect::<Vec<_>>(),
        }),
    }
}

/// Find and print the closest character to `target`.
pub async fn run_match(config: &Config, target: Target, json: bool, with_images: bool) -> Result<()> {
    let store = load_store(config)?;
    let query_index = target.index_in(&store)?;
    let result = store.best_match(query_index)?;
    let query_name = store
        .catalog()
        .get(query_index)
        .map(|r| r.name.clone())
        .context("Query character vanished from the catalog")?;

    let (query_image, match_image) = if with_images {
        let chain = ResolverChain::from_config(&config.images)?;
        let (query_image, match_image) =
            tokio::join!(chain.resolve(&query_name), chain.resolve(&result.match_name));
        (Some(query_image), Some(match_image))
    } else {
        (None, None)
    };

    if json {
        let output = json!({
            "query": {
                "index": result.query_index,
                "name": query_name,
                "image": image_json(query_image.as_ref()),
            },
            "match": {
                "index": result.match_index,
                "name": result.match_name,
                "image": image_json(match_image.as_ref()),
            },
            "similarity": result.similarity,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_side_by_side(&query_name, &result, query_image.as_ref(), match_image.as_ref());
    }

    Ok(())
}

fn print_side_by_side(
    query_name: &str,
    result: &MatchResult,
    query_image: Option<&ImageResolution>,
    match_image: Option<&ImageResolution>,
) {
    println!();
    println!(
        "  {:<width$}Match : {}",
        query_name,
        result.match_name,
        width = COLUMN_WIDTH
    );
    println!(
        "  {:<width$}{}",
        image_text(query_image),
        image_text(match_image),
        width = COLUMN_WIDTH
    );
    println!("\n  Similarity: {:.4}", result.similarity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use likeness_core::{Catalog, Error, VectorMatrix};
    use likeness_images::{ImageError, ImageRef};

    fn store() -> CatalogStore {
        CatalogStore::from_parts(
            Catalog::from_names(["Jon", "Daenerys", "Tyrion"]).unwrap(),
            VectorMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![-1.0, 0.0]])
                .unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_target_by_name() {
        let store = store();
        assert_eq!(Target::Name("Tyrion".to_string()).index_in(&store).unwrap(), 2);

        let err = Target::Name("tyrion".to_string()).index_in(&store).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::UnknownCharacter { .. })
        ));
    }

    #[test]
    fn test_target_by_index_passes_through() {
        // Range checking happens in the matcher
        assert_eq!(Target::Index(7).index_in(&store()).unwrap(), 7);
    }

    #[test]
    fn test_image_text() {
        assert_eq!(image_text(None), "(images skipped)");
        assert_eq!(
            image_text(Some(&ImageResolution::Found {
                resolver: "local".to_string(),
                image: ImageRef::Remote("https://x/jon.jpg".to_string()),
            })),
            "https://x/jon.jpg"
        );
        assert_eq!(
            image_text(Some(&ImageResolution::Unavailable {
                failures: Vec::new()
            })),
            "Image not available"
        );
    }

    #[test]
    fn test_image_json_lists_failures() {
        let value = image_json(Some(&ImageResolution::Unavailable {
            failures: vec![ImageError::Rejected {
                source_name: "ThronesAPI".to_string(),
                status: 404,
            }],
        }));
        assert_eq!(value["unavailable"], json!(true));
        assert_eq!(value["failures"][0], json!("ThronesAPI returned HTTP 404"));
    }
}
