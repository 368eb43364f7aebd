//! Uploaded document handling and text extraction.

mod extractor;

pub use extractor::PlaceholderTextExtractor;

use std::path::Path;

/// Declared media type of an uploaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaType {
    /// `application/pdf`.
    Pdf,
    /// Any `image/*` type; holds the full type string.
    Image(String),
    /// Anything else; read as text.
    Other(String),
}

impl MediaType {
    /// Classify a declared media type string. Parameters after `;` are ignored.
    pub fn parse(declared: &str) -> Self {
        let essence = declared
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if essence == "application/pdf" {
            Self::Pdf
        } else if essence.starts_with("image/") {
            Self::Image(essence)
        } else {
            Self::Other(essence)
        }
    }

    /// Guess the media type from a file extension.
    pub fn from_path(path: &Path) -> Self {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "pdf" => Self::Pdf,
            "jpg" | "jpeg" => Self::Image("image/jpeg".to_string()),
            "png" => Self::Image("image/png".to_string()),
            "csv" => Self::Other("text/csv".to_string()),
            _ => Self::Other("text/plain".to_string()),
        }
    }

    /// The media type string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Image(t) | Self::Other(t) => t,
        }
    }
}

/// A file handed to the pipeline by the upload collaborator.
///
/// Lives only for the duration of one pipeline invocation.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original file name.
    pub name: String,
    /// Declared media type.
    pub media_type: MediaType,
    /// Raw file content.
    pub data: Vec<u8>,
}

impl UploadedFile {
    /// Create a file from its parts.
    pub fn new(name: impl Into<String>, media_type: MediaType, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type,
            data,
        }
    }

    /// File name up to its first dot (`extrato.marco.pdf` -> `extrato`).
    pub fn stem(&self) -> &str {
        self.name.split('.').next().unwrap_or_default()
    }

    /// Size of the content in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the file has no content.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Trait for document text extraction implementations.
///
/// Implementations turn file bytes plus their declared media type into the
/// text that is embedded in the prompt. They never fail: anything that
/// cannot be read must degrade to a non-empty placeholder.
pub trait TextExtractor: Send + Sync {
    /// Extract a plain-text representation of the file.
    fn extract_text(&self, file: &UploadedFile) -> String;
}
