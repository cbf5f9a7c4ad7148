use async_trait::async_trait;

use crate::error::{Result, SermonError};
use crate::models::{DocumentType, UploadedFile};
use crate::processing::extractors::{DocxExtractor, PdfExtractor, TextExtractor};

/// Turns an uploaded file into plain text.
///
/// Blank output is not an error here; the caller decides what "usable" means.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, file: UploadedFile) -> Result<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileExtractor;

impl FileExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Synchronous dispatch on the file's extension.
    pub fn extract_bytes(doc_type: DocumentType, bytes: &[u8]) -> Result<String> {
        match doc_type {
            DocumentType::Pdf => PdfExtractor::extract(bytes),
            DocumentType::Docx => DocxExtractor::extract(bytes),
            DocumentType::Hwp => {
                tracing::warn!("HWP is read as plain text; the result may be unreadable");
                Ok(TextExtractor::extract(bytes))
            }
            DocumentType::Text => Ok(TextExtractor::extract(bytes)),
        }
    }
}

#[async_trait]
impl DocumentExtractor for FileExtractor {
    async fn extract(&self, file: UploadedFile) -> Result<String> {
        let doc_type = file.document_type();
        tracing::info!(
            file = %file.name,
            size = file.size(),
            doc_type = %doc_type,
            "Extracting text"
        );

        let UploadedFile { bytes, .. } = file;
        let text = tokio::task::spawn_blocking(move || Self::extract_bytes(doc_type, &bytes))
            .await
            .map_err(|e| SermonError::Extraction(format!("Extraction task failed: {e}")))??;

        tracing::debug!(chars = text.chars().count(), "Extraction finished");
        Ok(text)
    }
}
