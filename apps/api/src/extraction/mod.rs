//! Text extraction for uploaded resumes (PDF or plain text).
//!
//! PDF decoding is delegated to `pdf-extract`. An empty result is returned as-is;
//! the analysis service decides whether empty text is acceptable.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type '{0}'. Upload a PDF or TXT file.")]
    UnsupportedMediaType(String),

    #[error("Error reading PDF file: {0}")]
    Pdf(String),

    #[error("Text file is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

/// Media types accepted for resume uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Pdf,
    PlainText,
}

impl MediaType {
    /// Maps a declared content type (parameters such as `charset` are ignored).
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Some(MediaType::Pdf),
            "text/plain" => Some(MediaType::PlainText),
            _ => None,
        }
    }

    /// Maps a file name by its extension.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let (_, extension) = file_name.rsplit_once('.')?;
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(MediaType::Pdf),
            "txt" => Some(MediaType::PlainText),
            _ => None,
        }
    }

    /// Declared content type wins; the file extension is the fallback
    /// (browsers often send `application/octet-stream`).
    pub fn resolve(
        content_type: Option<&str>,
        file_name: Option<&str>,
    ) -> Result<Self, ExtractionError> {
        content_type
            .and_then(Self::from_content_type)
            .or_else(|| file_name.and_then(Self::from_file_name))
            .ok_or_else(|| {
                ExtractionError::UnsupportedMediaType(
                    content_type
                        .or(file_name)
                        .unwrap_or("unknown")
                        .to_string(),
                )
            })
    }
}

/// Extracts the text of a resume file.
pub fn extract_text(bytes: &[u8], media_type: MediaType) -> Result<String, ExtractionError> {
    match media_type {
        MediaType::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))
        }
        MediaType::PlainText => Ok(String::from_utf8(bytes.to_vec())?),
    }
}
