// file: src/utils/validation.rs
// description: upload validation run before any ingestion work starts
// reference: input validation patterns

use crate::error::{RejectReason, Result};
use crate::extractor::SourceDocument;
use crate::utils::patterns::{PDF_CONTENT_TYPE, PDF_FILE_NAME};

pub struct Validator;

impl Validator {
    /// Exactly one file per ingestion request.
    pub fn validate_selection(files: &[SourceDocument]) -> Result<&SourceDocument> {
        match files {
            [] => Err(RejectReason::NoFile.into()),
            [single] => Ok(single),
            many => Err(RejectReason::TooManyFiles(many.len()).into()),
        }
    }

    pub fn validate_pdf_type(source: &SourceDocument) -> Result<()> {
        let by_type = source
            .content_type
            .as_deref()
            .is_some_and(|t| PDF_CONTENT_TYPE.is_match(t.trim()));

        if by_type || PDF_FILE_NAME.is_match(&source.name) {
            Ok(())
        } else {
            Err(RejectReason::NotPdf(source.name.clone()).into())
        }
    }

    pub fn validate_size(source: &SourceDocument, limit: u64) -> Result<()> {
        if source.size() > limit {
            return Err(RejectReason::TooLarge {
                name: source.name.clone(),
                size: source.size(),
                limit,
            }
            .into());
        }
        Ok(())
    }

    pub fn validate_upload(source: &SourceDocument, limit: u64) -> Result<()> {
        Self::validate_pdf_type(source)?;
        Self::validate_size(source, limit)
    }
}
