// file: src/models/section.rs
// description: thesis section tree model with nested lookup and traversal
// reference: internal data structures

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub subsections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub citations: Vec<Citation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credibility_score: Option<f64>,
    pub version: u32,
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub id: String,
    pub text: String,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub date: NaiveDate,
    pub verified: bool,
}

impl Section {
    pub fn is_leaf(&self) -> bool {
        self.subsections.is_empty()
    }

    /// Depth-first search for `id` in this section and all of its descendants.
    pub fn find(&self, id: &str) -> Option<&Section> {
        if self.id == id {
            return Some(self);
        }
        self.subsections.iter().find_map(|child| child.find(id))
    }
}

/// Ordered sequence of top-level sections making up one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionTree {
    sections: Vec<Section>,
}

/// A section paired with its depth in the tree (0 for roots).
#[derive(Debug, Clone, Copy)]
pub struct OutlineEntry<'a> {
    pub depth: usize,
    pub section: &'a Section,
}

impl SectionTree {
    pub fn new(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn roots(&self) -> &[Section] {
        &self.sections
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of sections at every depth.
    pub fn len(&self) -> usize {
        self.flatten().len()
    }

    pub fn first(&self) -> Option<&Section> {
        self.sections.first()
    }

    pub fn find(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find_map(|section| section.find(id))
    }

    /// Every section in pre-order (document order).
    pub fn flatten(&self) -> Vec<&Section> {
        self.outline().into_iter().map(|entry| entry.section).collect()
    }

    pub fn outline(&self) -> Vec<OutlineEntry<'_>> {
        let mut entries = Vec::new();
        let mut stack: Vec<(usize, &Section)> =
            self.sections.iter().rev().map(|s| (0, s)).collect();

        while let Some((depth, section)) = stack.pop() {
            entries.push(OutlineEntry { depth, section });
            stack.extend(section.subsections.iter().rev().map(|s| (depth + 1, s)));
        }

        entries
    }

    /// Returns the first id that occurs more than once, if any.
    pub fn duplicate_id(&self) -> Option<&str> {
        let mut seen = HashSet::new();
        self.flatten()
            .into_iter()
            .map(|section| section.id.as_str())
            .find(|id| !seen.insert(*id))
    }
}

impl From<Vec<Section>> for SectionTree {
    fn from(sections: Vec<Section>) -> Self {
        Self::new(sections)
    }
}
