// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod search;
pub mod store;
pub mod utils;

pub use config::{
    Config, HeadingConfig, IngestionConfig, LevelStrategy, SearchConfig, SectionDefaults,
    SnippetAnchor,
};
pub use error::{PipelineError, RejectReason, Result};
pub use exporter::{ExportManifest, JsonExporter};
pub use extractor::{FragmentDump, FragmentDumpExtractor, SourceDocument, TextExtractor};
pub use models::{
    Citation, ClassifiedFragment, FlatSection, RawFragment, ScoreGrade, SearchOutcome,
    SearchResult, Section, SectionTree, ValidationResult, VersionChange,
};
pub use parser::{FragmentClassifier, SectionGrouper, TextNormalizer};
pub use pipeline::{
    IngestionPipeline, IngestionReport, IngestionStats, ProgressTracker, TreeBuilder,
};
pub use search::{Searcher, search};
pub use store::ThesisStore;
pub use utils::Validator;
