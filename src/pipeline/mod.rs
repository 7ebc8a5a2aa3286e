// file: src/pipeline/mod.rs
// description: pipeline module exports and public api
// reference: pipeline orchestration

mod builder;
mod orchestrator;
mod progress;

pub use builder::{ArenaNode, SectionArena, TreeBuilder};
pub use orchestrator::{IngestionPipeline, IngestionReport};
pub use progress::{IngestionStats, ProgressTracker};
