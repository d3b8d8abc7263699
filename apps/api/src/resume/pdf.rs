//! PDF-to-text collaborator. A document that cannot be opened is an error;
//! individual pages that fail to decode are skipped.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("could not read PDF: {0}")]
    Unreadable(String),

    #[error("PDF contains no extractable text")]
    NoText,
}

/// Extracts the text of every readable page, joined with newlines.
///
/// The whole document is decoded in one pass first. If that fails, or the
/// decoder panics on an unsupported font or encoding, the document is
/// reopened and decoded page by page so one bad page does not lose the rest.
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
    extract_text_with(bytes, |bytes| {
        pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| e.to_string())
    })
}

fn extract_text_with<F>(bytes: &[u8], whole_document: F) -> Result<String, PdfError>
where
    F: FnOnce(&[u8]) -> Result<Vec<String>, String>,
{
    // pdf_extract panics instead of erroring on some fonts
    let attempt = panic::catch_unwind(AssertUnwindSafe(|| whole_document(bytes)))
        .unwrap_or_else(|payload| Err(format!("panicked: {}", panic_message(payload.as_ref()))));

    let text = match attempt {
        Ok(pages) => join_pages(pages),
        Err(reason) => {
            warn!("Whole-document PDF extraction failed ({reason}), retrying page by page");
            extract_page_by_page(bytes)?
        }
    };

    if text.trim().is_empty() {
        return Err(PdfError::NoText);
    }
    Ok(text)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

fn extract_page_by_page(bytes: &[u8]) -> Result<String, PdfError> {
    let doc = Document::load_mem(bytes).map_err(|e| PdfError::Unreadable(e.to_string()))?;

    let mut pages = Vec::new();
    for page_number in doc.get_pages().keys() {
        match doc.extract_text(&[*page_number]) {
            Ok(text) => pages.push(text),
            Err(e) => warn!("Skipping unreadable PDF page {page_number}: {e}"),
        }
    }
    debug!("Recovered text from {} pages", pages.len());

    Ok(join_pages(pages))
}

fn join_pages(pages: Vec<String>) -> String {
    let mut text = String::new();
    for page in pages {
        text.push_str(&page);
        text.push('\n');
    }
    text
}
