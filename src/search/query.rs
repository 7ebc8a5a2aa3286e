// file: src/search/query.rs
// description: whitespace tokenization of free-text search queries

/// A parsed query: non-empty, whitespace-separated tokens in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    tokens: Vec<String>,
}

impl SearchQuery {
    pub fn parse(input: &str) -> Self {
        Self {
            tokens: input.split_whitespace().map(str::to_string).collect(),
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn first_token(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens joined by single spaces; empty for an empty query.
    pub fn normalized(&self) -> String {
        self.tokens.join(" ")
    }
}
