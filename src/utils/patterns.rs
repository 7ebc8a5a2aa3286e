// file: src/utils/patterns.rs
// description: compiled regex patterns shared by input validation and extractors
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    pub static ref PDF_FILE_NAME: Regex = Regex::new(
        r"(?i)\.pdf$"
    ).expect("PDF_FILE_NAME regex is valid");

    pub static ref PDF_CONTENT_TYPE: Regex = Regex::new(
        r"(?i)^application/pdf(\s*;.*)?$"
    ).expect("PDF_CONTENT_TYPE regex is valid");

    pub static ref SHA256_HEX: Regex = Regex::new(
        r"^[a-f0-9]{64}$"
    ).expect("SHA256_HEX regex is valid");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_file_name() {
        assert!(PDF_FILE_NAME.is_match("thesis.pdf"));
        assert!(PDF_FILE_NAME.is_match("THESIS.PDF"));
        assert!(!PDF_FILE_NAME.is_match("thesis.pdf.txt"));
        assert!(!PDF_FILE_NAME.is_match("thesis.docx"));
    }

    #[test]
    fn test_pdf_content_type() {
        assert!(PDF_CONTENT_TYPE.is_match("application/pdf"));
        assert!(PDF_CONTENT_TYPE.is_match("Application/PDF; charset=binary"));
        assert!(!PDF_CONTENT_TYPE.is_match("application/pdfx"));
        assert!(!PDF_CONTENT_TYPE.is_match("text/plain"));
    }

    #[test]
    fn test_sha256_hex() {
        assert!(SHA256_HEX.is_match(&"a".repeat(64)));
        assert!(!SHA256_HEX.is_match(&"A".repeat(64)));
        assert!(!SHA256_HEX.is_match("abc"));
    }
}
