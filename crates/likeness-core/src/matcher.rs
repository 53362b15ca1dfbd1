//! Cosine-similarity matching over the embedding matrix.

use crate::error::{Error, Result};
use crate::model::{Catalog, MatchResult, VectorMatrix};

/// Score given to the query row so it can never win.
///
/// Cosine similarity lies in `[-1, 1]`; anything below `-1` is unreachable
/// by a real candidate.
pub const SELF_SENTINEL: f64 = -2.0;

/// Cosine similarity `dot(a, b) / (|a| * |b|)`.
///
/// Accumulates in `f64`. When either vector has zero norm the similarity is
/// undefined and `0.0` is returned instead.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let (dot, norm_a, norm_b) = a.iter().zip(b).fold(
        (0.0f64, 0.0f64, 0.0f64),
        |(dot, na, nb), (&x, &y)| {
            let (x, y) = (f64::from(x), f64::from(y));
            (dot + x * y, na + x * x, nb + y * y)
        },
    );

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        // Rounding can push identical directions a hair past 1.0
        (dot / denom).clamp(-1.0, 1.0)
    }
}

/// Similarity of the query row against every row, with the query's own slot
/// set to [`SELF_SENTINEL`].
pub fn similarity_scores(vectors: &VectorMatrix, query_index: usize) -> Result<Vec<f64>> {
    let query = vectors.row(query_index).ok_or(Error::IndexOutOfRange {
        index: query_index,
        len: vectors.rows(),
    })?;

    Ok(vectors
        .iter_rows()
        .enumerate()
        .map(|(i, row)| {
            if i == query_index {
                SELF_SENTINEL
            } else {
                cosine_similarity(query, row)
            }
        })
        .collect())
}

/// Find the character most similar to the one at `query_index`.
///
/// The query itself is never returned. Ties go to the lowest index.
///
/// # Errors
///
/// - [`Error::IndexOutOfRange`] when `query_index >= N`
/// - [`Error::NoMatchAvailable`] when the catalog holds a single character
pub fn find_best_match(
    catalog: &Catalog,
    vectors: &VectorMatrix,
    query_index: usize,
) -> Result<MatchResult> {
    let len = catalog.len();
    if query_index >= len {
        return Err(Error::IndexOutOfRange {
            index: query_index,
            len,
        });
    }
    if len < 2 {
        return Err(Error::NoMatchAvailable { len });
    }

    let scores = similarity_scores(vectors, query_index)?;

    let mut best = (0, f64::NEG_INFINITY);
    for (i, &score) in scores.iter().enumerate() {
        // Strict comparison keeps the first of equal scores
        if score > best.1 {
            best = (i, score);
        }
    }
    let (match_index, similarity) = best;

    let record = catalog.get(match_index).ok_or(Error::IndexOutOfRange {
        index: match_index,
        len,
    })?;

    log::debug!(
        "Best match for #{} is #{} {:?} (similarity {:.4})",
        query_index,
        match_index,
        record.name,
        similarity
    );

    Ok(MatchResult {
        query_index,
        match_index,
        match_name: record.name.clone(),
        similarity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(names: &[&str], rows: Vec<Vec<f32>>) -> (Catalog, VectorMatrix) {
        (
            Catalog::from_names(names.iter().copied()).unwrap(),
            VectorMatrix::from_rows(rows).unwrap(),
        )
    }

    fn westeros() -> (Catalog, VectorMatrix) {
        fixture(
            &["Jon", "Daenerys", "Tyrion"],
            vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![-1.0, 0.0]],
        )
    }

    #[test]
    fn test_cosine_similarity() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-12);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).abs() < 1e-12);
        assert!((cosine_similarity(&[1.0, 0.0], &[-2.0, 0.0]) + 1.0).abs() < 1e-12);
        // Scale invariant
        assert!((cosine_similarity(&[1.0, 2.0], &[10.0, 20.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_jon_matches_daenerys() {
        let (catalog, vectors) = westeros();
        let result = find_best_match(&catalog, &vectors, 0).unwrap();
        assert_eq!(result.query_index, 0);
        assert_eq!(result.match_index, 1);
        assert_eq!(result.match_name, "Daenerys");
        assert!((result.similarity - 0.9939).abs() < 1e-3);
    }

    #[test]
    fn test_never_returns_self() {
        let (catalog, vectors) = westeros();
        for query in 0..catalog.len() {
            let result = find_best_match(&catalog, &vectors, query).unwrap();
            assert_ne!(result.match_index, query);
            assert!(result.match_index < catalog.len());
        }
    }

    #[test]
    fn test_identical_vectors_still_exclude_self() {
        let (catalog, vectors) = fixture(
            &["A", "B", "C"],
            vec![vec![1.0, 1.0], vec![1.0, 1.0], vec![1.0, 1.0]],
        );
        assert_eq!(find_best_match(&catalog, &vectors, 0).unwrap().match_index, 1);
        assert_eq!(find_best_match(&catalog, &vectors, 1).unwrap().match_index, 0);
        assert_eq!(find_best_match(&catalog, &vectors, 2).unwrap().match_index, 0);
    }

    #[test]
    fn test_tie_breaks_to_lowest_index() {
        let (catalog, vectors) = fixture(
            &["Query", "Other", "TwinA", "TwinB"],
            vec![
                vec![1.0, 0.0],
                vec![0.0, 1.0],
                vec![0.8, 0.6],
                vec![0.8, 0.6],
            ],
        );
        let result = find_best_match(&catalog, &vectors, 0).unwrap();
        assert_eq!(result.match_index, 2);
        assert_eq!(result.match_name, "TwinA");
    }

    #[test]
    fn test_zero_query_vector() {
        let (catalog, vectors) = fixture(
            &["Nobody", "Arya", "Jaqen"],
            vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]],
        );
        let result = find_best_match(&catalog, &vectors, 0).unwrap();
        // Every candidate scores 0.0, so the first non-self row wins
        assert_eq!(result.match_index, 1);
        assert_eq!(result.similarity, 0.0);
    }

    #[test]
    fn test_all_candidates_opposed() {
        let (catalog, vectors) = fixture(
            &["Stark", "Lannister"],
            vec![vec![1.0, 0.0], vec![-1.0, 0.0]],
        );
        let result = find_best_match(&catalog, &vectors, 0).unwrap();
        assert_eq!(result.match_index, 1);
        assert!((result.similarity + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_deterministic() {
        let (catalog, vectors) = westeros();
        let first = find_best_match(&catalog, &vectors, 2).unwrap();
        let second = find_best_match(&catalog, &vectors, 2).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_single_character_has_no_match() {
        let (catalog, vectors) = fixture(&["Hodor"], vec![vec![1.0, 0.0]]);
        let err = find_best_match(&catalog, &vectors, 0).unwrap_err();
        assert!(matches!(err, Error::NoMatchAvailable { len: 1 }));
    }

    #[test]
    fn test_index_out_of_range() {
        let (catalog, vectors) = westeros();
        let err = find_best_match(&catalog, &vectors, 3).unwrap_err();
        assert!(matches!(err, Error::IndexOutOfRange { index: 3, len: 3 }));
    }

    #[test]
    fn test_similarity_scores_marks_self() {
        let (_, vectors) = westeros();
        let scores = similarity_scores(&vectors, 1).unwrap();
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[1], SELF_SENTINEL);
        assert!(scores.iter().all(|s| *s >= SELF_SENTINEL));
    }
}
