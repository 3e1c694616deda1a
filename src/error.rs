//! Error types for unoutline library.

use std::io;
use thiserror::Error;

/// Result type alias for unoutline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during outline extraction.
#[derive(Error, Debug)]
pub enum Error {
    /// Reading a PDF or writing a JSON result failed.
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),

    /// The input does not start with a PDF header.
    #[error("Not a PDF file: missing %PDF- header")]
    UnknownFormat,

    /// lopdf could not read the document structure.
    #[error("Malformed PDF: {0}")]
    PdfParse(String),

    /// Encrypted documents are not decrypted.
    #[error("PDF is encrypted")]
    Encrypted,

    /// Requested a page the document does not have.
    #[error("No page {0}: document has {1} page(s)")]
    PageOutOfRange(u32, u32),

    /// Table or drawing extraction failed for a page.
    #[error("Region detection failed on page {page}: {reason}")]
    RegionDetection {
        page: u32,
        reason: String,
    },

    /// Title candidates could not be gathered.
    #[error("Title resolution failed: {0}")]
    TitleResolution(String),

    /// The OCR engine could not recognize a page.
    #[error("OCR failed on page {page}: {reason}")]
    Ocr {
        page: u32,
        reason: String,
    },

    /// Batch input directory is missing.
    #[error("Input directory {0} does not exist")]
    InputDirMissing(String),

    /// Batch input directory holds no PDF files.
    #[error("No PDF files found in {0}")]
    NoInputFiles(String),

    /// Writing the outline as JSON failed.
    #[error("JSON encoding failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Anything else, carried as text.
    #[error("{0}")]
    Other(String),
}

impl From<lopdf::Error> for Error {
    fn from(source: lopdf::Error) -> Self {
        match source {
            lopdf::Error::IO(io) => Self::Io(io),
            lopdf::Error::Decryption(_) => Self::Encrypted,
            other => Self::PdfParse(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::Encrypted.to_string(), "PDF is encrypted");
        assert_eq!(
            Error::PageOutOfRange(4, 2).to_string(),
            "No page 4: document has 2 page(s)"
        );

        let err = Error::RegionDetection {
            page: 2,
            reason: "bad stream".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Region detection failed on page 2: bad stream"
        );
    }

    #[test]
    fn test_source_conversions() {
        let missing: Error = io::Error::new(io::ErrorKind::NotFound, "guide.pdf").into();
        assert!(matches!(missing, Error::Io(_)));

        let parse: Error = lopdf::Document::load_mem(b"not a pdf").unwrap_err().into();
        assert!(matches!(parse, Error::PdfParse(_)));
    }
}
