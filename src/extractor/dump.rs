// file: src/extractor/dump.rs
// description: replays pre-extracted page fragments bound to a source PDF digest
// reference: https://docs.rs/serde_json

use crate::error::{PipelineError, Result};
use crate::extractor::{SourceDocument, TextExtractor};
use crate::models::RawFragment;
use crate::utils::patterns::SHA256_HEX;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Page-ordered fragments for one document, as written by an external extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FragmentDump {
    /// Hex SHA-256 of the PDF the fragments came from; unbound when absent.
    #[serde(default)]
    pub source_sha256: Option<String>,
    pub pages: Vec<Vec<RawFragment>>,
}

pub struct FragmentDumpExtractor {
    dump: FragmentDump,
}

impl FragmentDumpExtractor {
    pub fn new(dump: FragmentDump) -> Result<Self> {
        if let Some(digest) = &dump.source_sha256
            && !SHA256_HEX.is_match(digest)
        {
            return Err(PipelineError::Config(format!(
                "source_sha256 is not a lowercase hex SHA-256 digest: {}",
                digest
            )));
        }

        Ok(Self { dump })
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::new(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| PipelineError::FileOperation {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    fn verify(&self, source: &SourceDocument) -> Result<()> {
        match &self.dump.source_sha256 {
            Some(expected) if *expected != source.sha256() => Err(PipelineError::Extraction(
                format!("fragment dump does not belong to {}", source.name),
            )),
            _ => Ok(()),
        }
    }
}

impl TextExtractor for FragmentDumpExtractor {
    fn name(&self) -> &str {
        "fragment-dump"
    }

    fn page_count(&self, source: &SourceDocument) -> Result<usize> {
        self.verify(source)?;
        Ok(self.dump.pages.len())
    }

    fn extract_page(&self, source: &SourceDocument, page_index: usize) -> Result<Vec<RawFragment>> {
        self.verify(source)?;
        let page = self.dump.pages.get(page_index).ok_or_else(|| {
            PipelineError::Extraction(format!(
                "page {} out of range ({} pages)",
                page_index + 1,
                self.dump.pages.len()
            ))
        })?;

        debug!("Replayed {} fragments for page {}", page.len(), page_index + 1);
        Ok(page.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn source() -> SourceDocument {
        SourceDocument::new("thesis.pdf", Some("application/pdf"), b"%PDF-1.7 thesis".to_vec())
    }

    #[test]
    fn test_bound_dump_replays_pages() {
        let json = format!(
            r#"{{
                "source_sha256": "{}",
                "pages": [
                    [{{"text": "Title", "font_size": 20.0, "font_name": "Bold"}}],
                    [{{"text": "body", "font_size": 10.0}}]
                ]
            }}"#,
            source().sha256()
        );
        let extractor = FragmentDumpExtractor::from_json_str(&json).unwrap();

        assert_eq!(extractor.page_count(&source()).unwrap(), 2);
        let page = extractor.extract_page(&source(), 1).unwrap();
        assert_eq!(page[0].text, "body");
        assert!(extractor.extract_page(&source(), 2).is_err());
    }

    #[test]
    fn test_digest_mismatch_is_extraction_failure() {
        let dump = FragmentDump {
            source_sha256: Some("0".repeat(64)),
            pages: vec![vec![]],
        };
        let extractor = FragmentDumpExtractor::new(dump).unwrap();

        let err = extractor.page_count(&source()).unwrap_err();
        assert!(matches!(err, PipelineError::Extraction(_)));
    }

    #[test]
    fn test_malformed_digest_rejected() {
        let dump = FragmentDump {
            source_sha256: Some("not-a-digest".to_string()),
            pages: vec![],
        };
        assert!(FragmentDumpExtractor::new(dump).is_err());
    }

    #[test]
    fn test_unbound_dump_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fragments.json");
        fs::write(&path, r#"{"pages": [[{"text": "stray text", "font_size": 10.0}]]}"#).unwrap();

        let extractor = FragmentDumpExtractor::from_json_file(&path).unwrap();
        assert_eq!(extractor.name(), "fragment-dump");
        assert_eq!(extractor.page_count(&source()).unwrap(), 1);
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            FragmentDumpExtractor::from_json_str("{ not json"),
            Err(PipelineError::Serialization(_))
        ));
    }
}
