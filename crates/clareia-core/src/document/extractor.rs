//! Placeholder text extraction.
//!
//! PDF text layers and OCR are not implemented; binary documents are
//! represented by a placeholder naming the file so the service still receives
//! some context. Plug a real implementation in through [`TextExtractor`].

use tracing::debug;

use super::{MediaType, TextExtractor, UploadedFile};

/// Text extractor that reads text files and substitutes placeholders for
/// PDFs and images.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaceholderTextExtractor;

impl PlaceholderTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl TextExtractor for PlaceholderTextExtractor {
    fn extract_text(&self, file: &UploadedFile) -> String {
        match &file.media_type {
            MediaType::Pdf => {
                debug!("PDF upload, using placeholder text");
                format!("Conteúdo do documento PDF: {}", file.name)
            }
            MediaType::Image(kind) => {
                debug!("Image upload ({}), using placeholder text", kind);
                format!("Conteúdo da imagem: {}", file.name)
            }
            MediaType::Other(kind) => {
                let text = String::from_utf8_lossy(&file.data);
                if text.trim().is_empty() {
                    debug!("Empty {} upload, using placeholder text", kind);
                    format!("Arquivo sem conteúdo de texto: {}", file.name)
                } else {
                    debug!("Read {} chars of {} content", text.chars().count(), kind);
                    text.into_owned()
                }
            }
        }
    }
}
