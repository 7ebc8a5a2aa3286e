// file: src/extractor/mod.rs
// description: text extraction service interface and source document handling
// reference: internal module structure

pub mod dump;

pub use dump::{FragmentDump, FragmentDumpExtractor};

use crate::error::{PipelineError, Result};
use crate::models::RawFragment;
use sha2::{Digest, Sha256};
use std::path::Path;

/// One uploaded source document.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl SourceDocument {
    pub fn new(name: impl Into<String>, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.map(str::to_string),
            bytes,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| PipelineError::FileOperation {
                path: path.to_path_buf(),
                source,
            })?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Ok(Self::new(name, None, bytes))
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn sha256(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        format!("{:x}", hasher.finalize())
    }
}

/// Produces positioned text fragments from a source document, one page at a time.
///
/// Implementations are constructed by the caller and handed to the ingestion
/// pipeline; pages may be requested concurrently and in any order.
pub trait TextExtractor: Send + Sync + 'static {
    fn name(&self) -> &str;

    fn page_count(&self, source: &SourceDocument) -> Result<usize>;

    fn extract_page(&self, source: &SourceDocument, page_index: usize) -> Result<Vec<RawFragment>>;
}
