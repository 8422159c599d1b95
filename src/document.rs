//! Source documents: file name plus extracted plain text.

use crate::error::{DocmindError, Result};
use std::any::Any;
use std::panic;
use std::path::Path;
use tracing::{debug, instrument, warn};

/// A file loaded for ingestion. Only its chunks are persisted.
#[derive(Debug, Clone)]
pub struct Document {
    /// File name, used as the `source` tag of every chunk.
    pub source: String,
    /// Extracted text.
    pub text: String,
}

impl Document {
    /// Load a PDF or UTF-8 text file.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                DocmindError::InvalidInput(format!("Not a file path: {}", path.display()))
            })?;

        let bytes = std::fs::read(path).map_err(|e| {
            DocmindError::InvalidInput(format!("Cannot read {}: {}", path.display(), e))
        })?;

        let text = if is_pdf(path) {
            extract_pdf(&bytes, &source)?
        } else {
            String::from_utf8(bytes).map_err(|e| {
                DocmindError::InvalidInput(format!("{} is not valid UTF-8: {}", source, e))
            })?
        };

        debug!("Loaded {} ({} characters)", source, text.chars().count());
        Ok(Self { source, text })
    }
}

fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"))
}

/// Extract per-page text. A parser panic on malformed content is an input error.
fn extract_pdf(bytes: &[u8], source: &str) -> Result<String> {
    let extracted = panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|payload| {
            DocmindError::InvalidInput(format!(
                "PDF extraction failed for {}: {}",
                source,
                panic_message(payload.as_ref())
            ))
        })?;

    let pages = extracted.map_err(|e| {
        DocmindError::InvalidInput(format!("PDF extraction failed for {}: {}", source, e))
    })?;

    let blank = pages.iter().filter(|p| p.trim().is_empty()).count();
    if blank > 0 {
        warn!("{}: {} of {} pages had no extractable text", source, blank, pages.len());
    }

    Ok(join_pages(&pages))
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("malformed document content")
}

/// Join trimmed page text with a paragraph break, skipping blank pages.
fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
