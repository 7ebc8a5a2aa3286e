// file: src/pipeline/builder.rs
// description: stack-based nesting of flat sections into the section tree
// reference: index arena with parent/child indices, no back references

use crate::config::SectionDefaults;
use crate::models::{FlatSection, Section, SectionTree};
use chrono::{DateTime, Utc};

/// One flat section placed in the arena.
#[derive(Debug, Clone)]
pub struct ArenaNode {
    pub id: String,
    pub title: String,
    pub content: String,
    pub level: u8,
    pub parent_index: Option<usize>,
    pub children_indices: Vec<usize>,
}

/// Nodes in discovery order; roots are kept separately in document order.
#[derive(Debug, Clone, Default)]
pub struct SectionArena {
    nodes: Vec<ArenaNode>,
    roots: Vec<usize>,
}

impl SectionArena {
    /// Single pass: a heading closes every open section at the same or a deeper level.
    pub fn from_flat(flat: Vec<FlatSection>) -> Self {
        let mut arena = Self::default();
        let mut stack: Vec<(usize, u8)> = Vec::new();

        for (index, section) in flat.into_iter().enumerate() {
            while stack.last().is_some_and(|&(_, level)| level >= section.level) {
                stack.pop();
            }

            let parent_index = stack.last().map(|&(parent, _)| parent);
            match parent_index {
                Some(parent) => arena.nodes[parent].children_indices.push(index),
                None => arena.roots.push(index),
            }

            arena.nodes.push(ArenaNode {
                id: format!("section-{}", index),
                title: section.title,
                content: section.content,
                level: section.level,
                parent_index,
                children_indices: Vec::new(),
            });
            stack.push((index, section.level));
        }

        arena
    }

    pub fn nodes(&self) -> &[ArenaNode] {
        &self.nodes
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Materializes owned sections, stamping every node with the same metadata.
    pub fn into_tree(self, defaults: &SectionDefaults, stamped_at: DateTime<Utc>) -> SectionTree {
        let mut slots: Vec<Option<ArenaNode>> = self.nodes.into_iter().map(Some).collect();
        let sections = self
            .roots
            .iter()
            .filter_map(|&root| materialize(&mut slots, root, defaults, stamped_at))
            .collect();

        SectionTree::new(sections)
    }
}

fn materialize(
    slots: &mut [Option<ArenaNode>],
    index: usize,
    defaults: &SectionDefaults,
    stamped_at: DateTime<Utc>,
) -> Option<Section> {
    let node = slots.get_mut(index)?.take()?;
    let subsections = node
        .children_indices
        .iter()
        .filter_map(|&child| materialize(slots, child, defaults, stamped_at))
        .collect();

    Some(Section {
        id: node.id,
        title: node.title,
        content: node.content,
        subsections,
        citations: Vec::new(),
        credibility_score: Some(defaults.default_credibility),
        version: 1,
        last_updated: stamped_at,
    })
}

pub struct TreeBuilder {
    defaults: SectionDefaults,
}

impl TreeBuilder {
    pub fn new(defaults: SectionDefaults) -> Self {
        Self { defaults }
    }

    pub fn build(&self, flat: Vec<FlatSection>) -> SectionTree {
        self.build_at(flat, Utc::now())
    }

    pub fn build_at(&self, flat: Vec<FlatSection>, stamped_at: DateTime<Utc>) -> SectionTree {
        SectionArena::from_flat(flat).into_tree(&self.defaults, stamped_at)
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new(SectionDefaults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn flat(title: &str, level: u8) -> FlatSection {
        FlatSection {
            title: title.to_string(),
            content: String::new(),
            level,
        }
    }

    fn titles(sections: &[Section]) -> Vec<&str> {
        sections.iter().map(|s| s.title.as_str()).collect()
    }

    #[test]
    fn test_same_level_closes_previous() {
        let tree = TreeBuilder::default().build(vec![flat("A", 2), flat("B", 2)]);
        assert_eq!(titles(tree.roots()), vec!["A", "B"]);
    }

    #[test]
    fn test_nesting_and_unwinding() {
        let tree = TreeBuilder::default().build(vec![
            flat("1", 1),
            flat("1.1", 2),
            flat("1.1.1", 3),
            flat("1.2", 2),
            flat("2", 1),
            flat("2.1", 3),
        ]);

        let roots = tree.roots();
        assert_eq!(titles(roots), vec!["1", "2"]);
        assert_eq!(titles(&roots[0].subsections), vec!["1.1", "1.2"]);
        assert_eq!(titles(&roots[0].subsections[0].subsections), vec!["1.1.1"]);
        assert_eq!(titles(&roots[1].subsections), vec!["2.1"]);
    }

    #[test]
    fn test_deeper_first_heading_becomes_root() {
        let tree = TreeBuilder::default().build(vec![flat("deep", 3), flat("top", 1)]);
        assert_eq!(titles(tree.roots()), vec!["deep", "top"]);
    }

    #[test]
    fn test_ids_follow_discovery_order() {
        let tree = TreeBuilder::default().build(vec![flat("a", 1), flat("b", 2), flat("c", 1)]);
        let ids: Vec<&str> = tree.flatten().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["section-0", "section-1", "section-2"]);
        assert!(tree.duplicate_id().is_none());
    }

    #[test]
    fn test_metadata_defaults() {
        let stamp = Utc::now();
        let tree = TreeBuilder::default().build_at(vec![flat("a", 1), flat("b", 2)], stamp);

        for section in tree.flatten() {
            assert_eq!(section.version, 1);
            assert_eq!(section.credibility_score, Some(0.85));
            assert_eq!(section.last_updated, stamp);
            assert!(section.citations.is_empty());
        }
    }

    #[test]
    fn test_children_are_strictly_deeper_than_parent() {
        let levels = [1, 3, 2, 2, 3, 1, 1, 2, 3, 3, 1, 2, 1, 3];
        let flats: Vec<FlatSection> = levels
            .iter()
            .enumerate()
            .map(|(i, &level)| flat(&format!("h{}", i), level))
            .collect();

        let arena = SectionArena::from_flat(flats);
        assert_eq!(arena.len(), levels.len());

        for node in arena.nodes() {
            if let Some(parent) = node.parent_index {
                assert!(arena.nodes()[parent].level < node.level);
                assert!(parent < arena.nodes().iter().position(|n| n.id == node.id).unwrap());
            }
            for &child in &node.children_indices {
                let parent = arena.nodes()[child].parent_index;
                assert_eq!(parent.map(|p| &arena.nodes()[p].id), Some(&node.id));
            }
        }
    }

    #[test]
    fn test_empty_input() {
        let tree = TreeBuilder::default().build(Vec::new());
        assert!(tree.is_empty());
        assert!(SectionArena::from_flat(Vec::new()).is_empty());
    }
}
