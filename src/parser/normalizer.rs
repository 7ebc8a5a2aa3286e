// file: src/parser/normalizer.rs
// description: whitespace normalization for section body text
// reference: collapse runs of whitespace to single spaces

pub struct TextNormalizer;

impl TextNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Collapses every run of whitespace to one space and trims both ends.
    pub fn normalize(&self, content: &str) -> String {
        let mut normalized = String::with_capacity(content.len());

        for word in content.split_whitespace() {
            if !normalized.is_empty() {
                normalized.push(' ');
            }
            normalized.push_str(word);
        }

        normalized
    }

    pub fn is_normalized(&self, content: &str) -> bool {
        self.normalize(content) == content
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
