use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Extensions offered by the file picker.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt", "hwp"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    #[default]
    Text,
    Pdf,
    Docx,
    Hwp,
}

impl DocumentType {
    /// Dispatch on a lower-cased extension. Anything unknown is read as text.
    pub fn from_extension(extension: Option<&str>) -> Self {
        match extension {
            Some("pdf") => Self::Pdf,
            Some("docx") => Self::Docx,
            Some("hwp") => Self::Hwp,
            _ => Self::Text,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Pdf => write!(f, "pdf"),
            Self::Docx => write!(f, "docx"),
            Self::Hwp => write!(f, "hwp"),
        }
    }
}

/// A file handed over by the user, alive for one extraction call.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { name, bytes })
    }

    /// Lower-cased text after the last dot of the name.
    pub fn extension(&self) -> Option<String> {
        let (_, ext) = self.name.rsplit_once('.')?;
        if ext.is_empty() {
            None
        } else {
            Some(ext.to_lowercase())
        }
    }

    pub fn document_type(&self) -> DocumentType {
        DocumentType::from_extension(self.extension().as_deref())
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
