// file: src/search/mod.rs
// description: multi-term full-text search over the section tree
// reference: term-occurrence scoring with stable ranking and context snippets

pub mod query;
pub mod text;

pub use query::SearchQuery;
pub use text::{FoldedText, Segment, highlight};

use crate::config::{SearchConfig, SnippetAnchor};
use crate::models::{SearchOutcome, SearchResult, Section, SectionTree};
use tracing::debug;

pub struct Searcher {
    config: SearchConfig,
}

impl Searcher {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    pub fn search(&self, tree: &SectionTree, input: &str) -> SearchOutcome {
        let query = SearchQuery::parse(input);
        if query.is_empty() {
            return SearchOutcome::default();
        }

        let mut results: Vec<SearchResult> = tree
            .flatten()
            .into_iter()
            .filter_map(|section| self.score(section, &query))
            .collect();

        // stable: equal scores keep document order
        results.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));

        debug!(
            "Query {:?} matched {} section(s)",
            query.normalized(),
            results.len()
        );

        SearchOutcome {
            results,
            normalized_query: query.normalized(),
        }
    }

    fn score(&self, section: &Section, query: &SearchQuery) -> Option<SearchResult> {
        let content = FoldedText::new(&section.content);
        let relevance_score: usize = query.tokens().iter().map(|t| content.count(t)).sum();

        if relevance_score == 0 {
            return None;
        }

        Some(SearchResult::new(
            section.id.clone(),
            section.title.clone(),
            self.snippet(&section.content, &content, query),
            relevance_score,
        ))
    }

    fn snippet(&self, raw: &str, content: &FoldedText, query: &SearchQuery) -> String {
        let anchor = match self.config.anchor {
            SnippetAnchor::EarliestTerm => query
                .tokens()
                .iter()
                .filter_map(|token| content.find_first(token))
                .min_by_key(|range| range.start),
            SnippetAnchor::FirstTerm => query
                .first_token()
                .and_then(|token| content.find_first(token)),
        };

        match anchor {
            Some(range) => {
                content.snippet(range, self.config.context_before, self.config.context_after)
            }
            None => raw.to_string(),
        }
    }
}

impl Default for Searcher {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

/// Searches with the default scoring and snippet settings.
pub fn search(tree: &SectionTree, query: &str) -> SearchOutcome {
    Searcher::default().search(tree, query)
}
