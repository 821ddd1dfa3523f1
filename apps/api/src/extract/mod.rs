//! File-type-specific text extraction for uploaded resumes.
//!
//! The parsers are synchronous; callers run this off the async runtime
//! (see the upload handler's `spawn_blocking`).

pub mod docx;

use std::path::Path;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Pdf(#[from] pdf_extract::OutputError),

    #[error("DOCX extraction failed: {0}")]
    Docx(#[from] anyhow::Error),
}

/// Extracts plain text from a saved upload based on its extension.
/// Unknown extensions produce an empty string; route validation keeps them
/// from reaching this point.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let extension = path
        .extension()
        .and_then(|v| v.to_str())
        .map(|v| v.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "txt" => Ok(std::fs::read_to_string(path)?),
        "pdf" => {
            let bytes = std::fs::read(path)?;
            Ok(pdf_extract::extract_text_from_mem(&bytes)?)
        }
        // Legacy .doc uploads are accepted and tried as DOCX; real binary
        // .doc files fail with a typed error.
        "docx" | "doc" => {
            let bytes = std::fs::read(path)?;
            Ok(docx::extract_docx_text(&bytes)?)
        }
        _ => Ok(String::new()),
    }
}
