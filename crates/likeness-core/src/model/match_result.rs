use serde::{Deserialize, Serialize};

/// The closest counterpart found for a query character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub query_index: usize,
    pub match_index: usize,
    pub match_name: String,

    /// Cosine similarity between the query and the matched row.
    pub similarity: f64,
}
