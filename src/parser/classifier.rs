// file: src/parser/classifier.rs
// description: heading/body classification of raw text fragments from font metrics
// reference: configurable font-size and font-name heuristics

use crate::config::{HeadingConfig, LevelStrategy};
use crate::error::{PipelineError, Result};
use crate::models::{ClassifiedFragment, RawFragment};
use regex::{Regex, RegexBuilder};

pub struct FragmentClassifier {
    size_threshold: f32,
    emphasis: Regex,
    max_depth: u8,
    strategy: LevelStrategy,
}

impl FragmentClassifier {
    pub fn new(config: &HeadingConfig) -> Result<Self> {
        let emphasis = RegexBuilder::new(&config.emphasis_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| PipelineError::Config(format!("invalid emphasis_pattern: {}", e)))?;

        Ok(Self {
            size_threshold: config.size_threshold,
            emphasis,
            max_depth: config.max_depth.max(1),
            strategy: config.level_strategy.clone(),
        })
    }

    /// Returns `None` for whitespace-only fragments.
    pub fn classify(&self, fragment: &RawFragment) -> Option<ClassifiedFragment> {
        if fragment.is_blank() {
            return None;
        }

        if self.is_heading(fragment) {
            let level = self.level_for(fragment.font_size);
            Some(ClassifiedFragment::heading(fragment.text.trim(), level))
        } else {
            Some(ClassifiedFragment::body(fragment.text.as_str()))
        }
    }

    pub fn is_heading(&self, fragment: &RawFragment) -> bool {
        fragment.font_size > self.size_threshold
            || fragment
                .font_name
                .as_deref()
                .is_some_and(|name| self.emphasis.is_match(name))
    }

    /// Heading level for a font size, always within `1..=max_depth`.
    pub fn level_for(&self, font_size: f32) -> u8 {
        let max = self.max_depth;

        match &self.strategy {
            LevelStrategy::InverseSize { numerator } => {
                let raw = (numerator / font_size).floor();
                if !raw.is_finite() {
                    return max;
                }
                raw.clamp(1.0, max as f32) as u8
            }
            LevelStrategy::SizeBands { bands } => {
                let band = bands
                    .iter()
                    .position(|&threshold| font_size >= threshold)
                    .unwrap_or(bands.len());
                (band + 1).clamp(1, max as usize) as u8
            }
        }
    }
}
