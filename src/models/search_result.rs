// file: src/models/search_result.rs
// description: Search result model with term-occurrence relevance
// reference: Used for full-text search over the section tree

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Id of the matching section
    pub section_id: String,

    /// Display title of the matching section
    pub section_title: String,

    /// Snippet of content around the anchoring match
    pub match_text: String,

    /// Summed occurrence count of every query token (always >= 1)
    pub relevance_score: usize,
}

impl SearchResult {
    pub fn new(
        section_id: String,
        section_title: String,
        match_text: String,
        relevance_score: usize,
    ) -> Self {
        Self {
            section_id,
            section_title,
            match_text,
            relevance_score,
        }
    }
}

/// Results for one query together with the query as it was understood.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub normalized_query: String,
}

impl SearchOutcome {
    /// An empty query clears the search view rather than reporting "no results".
    pub fn is_cleared(&self) -> bool {
        self.normalized_query.is_empty()
    }
}
