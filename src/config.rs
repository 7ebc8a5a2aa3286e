// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use regex::RegexBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub ingestion: IngestionConfig,
    pub headings: HeadingConfig,
    pub sections: SectionDefaults,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestionConfig {
    pub max_file_size_mb: u64,
    pub parallel_pages: usize,
    /// Deadline for one run in milliseconds; 0 disables it.
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HeadingConfig {
    /// Fragments strictly larger than this are headings.
    pub size_threshold: f32,
    /// Case-insensitive substring pattern matched against the font name.
    pub emphasis_pattern: String,
    pub max_depth: u8,
    pub level_strategy: LevelStrategy,
}

/// How a heading's font size maps to its nesting level.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LevelStrategy {
    /// `floor(numerator / font_size)`, clamped to `1..=max_depth`.
    InverseSize { numerator: f32 },
    /// Descending size thresholds; the first band the size reaches gives the level.
    SizeBands { bands: Vec<f32> },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SectionDefaults {
    pub default_credibility: f64,
    pub fallback_title: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    pub context_before: usize,
    pub context_after: usize,
    pub anchor: SnippetAnchor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SnippetAnchor {
    /// Earliest occurrence of any query token.
    EarliestTerm,
    /// First occurrence of the first token; full content when it is absent.
    FirstTerm,
}

impl IngestionConfig {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }

    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_ms > 0).then(|| Duration::from_millis(self.timeout_ms))
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 50,
            parallel_pages: 4,
            timeout_ms: 120_000,
        }
    }
}

impl Default for HeadingConfig {
    fn default() -> Self {
        Self {
            size_threshold: 12.0,
            emphasis_pattern: "bold|header".to_string(),
            max_depth: 3,
            level_strategy: LevelStrategy::InverseSize { numerator: 16.0 },
        }
    }
}

impl Default for SectionDefaults {
    fn default() -> Self {
        Self {
            default_credibility: 0.85,
            fallback_title: "Introduction".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            context_before: 50,
            context_after: 100,
            anchor: SnippetAnchor::EarliestTerm,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("THESIS_VIEWER")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            ingestion: IngestionConfig::default(),
            headings: HeadingConfig::default(),
            sections: SectionDefaults::default(),
            search: SearchConfig::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.ingestion.parallel_pages == 0 {
            return Err(PipelineError::Config(
                "parallel_pages must be greater than 0".to_string(),
            ));
        }

        if self.ingestion.max_file_size_mb == 0 {
            return Err(PipelineError::Config(
                "max_file_size_mb must be greater than 0".to_string(),
            ));
        }

        if self.headings.max_depth == 0 {
            return Err(PipelineError::Config(
                "max_depth must be greater than 0".to_string(),
            ));
        }

        if !(self.headings.size_threshold > 0.0) {
            return Err(PipelineError::Config(
                "size_threshold must be positive".to_string(),
            ));
        }

        match &self.headings.level_strategy {
            LevelStrategy::InverseSize { numerator } if !(*numerator > 0.0) => {
                return Err(PipelineError::Config(
                    "inverse_size numerator must be positive".to_string(),
                ));
            }
            LevelStrategy::SizeBands { bands }
                if bands.is_empty() || bands.windows(2).any(|w| w[0] <= w[1]) =>
            {
                return Err(PipelineError::Config(
                    "size_bands must be non-empty and strictly descending".to_string(),
                ));
            }
            _ => {}
        }

        RegexBuilder::new(&self.headings.emphasis_pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| PipelineError::Config(format!("invalid emphasis_pattern: {}", e)))?;

        if !(0.0..=1.0).contains(&self.sections.default_credibility) {
            return Err(PipelineError::Config(
                "default_credibility must be within [0, 1]".to_string(),
            ));
        }

        if self.sections.fallback_title.trim().is_empty() {
            return Err(PipelineError::Config(
                "fallback_title cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}
