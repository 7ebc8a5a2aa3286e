// file: src/parser/mod.rs
// description: fragment classification and section grouping exports
// reference: internal module structure

pub mod classifier;
pub mod normalizer;
pub mod outline;

pub use classifier::FragmentClassifier;
pub use normalizer::TextNormalizer;
pub use outline::SectionGrouper;
