// file: src/parser/outline.rs
// description: groups a classified fragment stream into flat heading/body sections
// reference: a heading closes the open section and starts the next one

use crate::models::{ClassifiedFragment, FlatSection, FragmentKind};
use crate::parser::normalizer::TextNormalizer;

pub struct SectionGrouper {
    fallback_title: String,
    normalizer: TextNormalizer,
    sections: Vec<FlatSection>,
    current: Option<FlatSection>,
}

impl SectionGrouper {
    pub fn new(fallback_title: impl Into<String>) -> Self {
        Self {
            fallback_title: fallback_title.into(),
            normalizer: TextNormalizer::new(),
            sections: Vec::new(),
            current: None,
        }
    }

    pub fn push(&mut self, fragment: ClassifiedFragment) {
        match fragment.kind {
            FragmentKind::Heading { level } => {
                if let Some(done) = self.current.take() {
                    self.sections.push(done);
                }
                self.current = Some(FlatSection {
                    title: fragment.text,
                    content: String::new(),
                    level,
                });
            }
            FragmentKind::Body => {
                let fallback = &self.fallback_title;
                let section = self.current.get_or_insert_with(|| FlatSection {
                    title: fallback.clone(),
                    content: String::new(),
                    level: 1,
                });
                section.content.push_str(&fragment.text);
                section.content.push(' ');
            }
        }
    }

    /// Closes the open section and returns every section with normalized content.
    pub fn finish(mut self) -> Vec<FlatSection> {
        if let Some(done) = self.current.take() {
            self.sections.push(done);
        }

        let normalizer = self.normalizer;
        self.sections
            .into_iter()
            .map(|section| FlatSection {
                content: normalizer.normalize(&section.content),
                ..section
            })
            .collect()
    }
}

impl Extend<ClassifiedFragment> for SectionGrouper {
    fn extend<I: IntoIterator<Item = ClassifiedFragment>>(&mut self, iter: I) {
        for fragment in iter {
            self.push(fragment);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flat(title: &str, content: &str, level: u8) -> FlatSection {
        FlatSection {
            title: title.to_string(),
            content: content.to_string(),
            level,
        }
    }

    #[test]
    fn test_body_accumulates_under_heading() {
        let mut grouper = SectionGrouper::new("Introduction");
        grouper.extend([
            ClassifiedFragment::heading("Title A", 1),
            ClassifiedFragment::body("body"),
            ClassifiedFragment::body(" one  "),
            ClassifiedFragment::heading("Title B", 2),
        ]);

        assert_eq!(
            grouper.finish(),
            vec![flat("Title A", "body one", 1), flat("Title B", "", 2)]
        );
    }

    #[test]
    fn test_leading_body_gets_fallback_section() {
        let mut grouper = SectionGrouper::new("Introduction");
        grouper.extend([
            ClassifiedFragment::body("stray"),
            ClassifiedFragment::body("text"),
            ClassifiedFragment::heading("Next", 2),
        ]);

        assert_eq!(
            grouper.finish(),
            vec![flat("Introduction", "stray text", 1), flat("Next", "", 2)]
        );
    }

    #[test]
    fn test_empty_stream() {
        assert!(SectionGrouper::new("Introduction").finish().is_empty());
    }
}
