// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod fragment;
pub mod search_result;
pub mod section;
pub mod validation;
pub mod version;

pub use fragment::{ClassifiedFragment, FlatSection, FragmentKind, RawFragment};
pub use search_result::{SearchOutcome, SearchResult};
pub use section::{Citation, OutlineEntry, Section, SectionTree};
pub use validation::{ScoreGrade, ValidationResult};
pub use version::{ChangeType, VersionChange};
