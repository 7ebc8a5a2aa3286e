// file: src/store/mod.rs
// description: active thesis snapshot plus the read-only validation ledger and version log
// reference: snapshot swap behind RwLock<Arc<_>>

use crate::error::Result;
use crate::models::{SearchOutcome, Section, SectionTree, ValidationResult, VersionChange};
use crate::search::Searcher;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

const SEED_JSON: &str = include_str!("../../data/seed.json");

#[derive(Debug, Deserialize)]
struct Seed {
    thesis: SectionTree,
    #[serde(default)]
    versions: Vec<VersionChange>,
    #[serde(default)]
    validation: Vec<ValidationResult>,
}

/// Holds the tree that readers currently see.
///
/// Readers take a cheap `Arc` snapshot; a successful ingestion swaps in a new
/// tree as a whole, so a reader never observes a partially built document.
pub struct ThesisStore {
    tree: RwLock<Arc<SectionTree>>,
    validations: HashMap<String, ValidationResult>,
    versions: Vec<VersionChange>,
}

impl ThesisStore {
    pub fn new(
        tree: SectionTree,
        validations: Vec<ValidationResult>,
        versions: Vec<VersionChange>,
    ) -> Self {
        let validations = validations
            .into_iter()
            .map(|v| (v.section_id.clone(), v))
            .collect();

        Self {
            tree: RwLock::new(Arc::new(tree)),
            validations,
            versions,
        }
    }

    pub fn empty() -> Self {
        Self::new(SectionTree::empty(), Vec::new(), Vec::new())
    }

    /// Loads the bundled demo thesis together with its ledger and version log.
    pub fn seeded() -> Result<Self> {
        Self::from_seed_json(SEED_JSON)
    }

    pub fn from_seed_json(json: &str) -> Result<Self> {
        let seed: Seed = serde_json::from_str(json)?;
        if let Some(id) = seed.thesis.duplicate_id() {
            warn!("Seed thesis contains duplicate section id {}", id);
        }

        info!(
            "Loaded seed thesis: {} sections, {} validation entries, {} version changes",
            seed.thesis.len(),
            seed.validation.len(),
            seed.versions.len()
        );
        Ok(Self::new(seed.thesis, seed.validation, seed.versions))
    }

    pub fn current(&self) -> Arc<SectionTree> {
        self.tree
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn replace(&self, tree: SectionTree) -> Arc<SectionTree> {
        let next = Arc::new(tree);
        let mut guard = self
            .tree
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let previous = std::mem::replace(&mut *guard, next);
        debug!(
            "Replaced active thesis ({} -> {} sections)",
            previous.len(),
            guard.len()
        );
        previous
    }

    /// Nested lookup at any depth.
    pub fn section(&self, id: &str) -> Option<Section> {
        self.current().find(id).cloned()
    }

    /// The requested section, or the first root when `id` is absent or unknown.
    pub fn active_section(&self, id: Option<&str>) -> Option<Section> {
        let tree = self.current();
        id.and_then(|id| tree.find(id))
            .or_else(|| tree.first())
            .cloned()
    }

    pub fn validation_for(&self, section_id: &str) -> Option<&ValidationResult> {
        self.validations.get(section_id)
    }

    /// Changes for one section, in log order.
    pub fn versions_for(&self, section_id: &str) -> Vec<&VersionChange> {
        self.versions
            .iter()
            .filter(|change| change.section_id == section_id)
            .collect()
    }

    pub fn search(&self, searcher: &Searcher, query: &str) -> SearchOutcome {
        searcher.search(&self.current(), query)
    }
}

impl Default for ThesisStore {
    fn default() -> Self {
        Self::empty()
    }
}
