//! Résumé ingestion — PDF text extraction and chunking.
//!
//! The extracted text becomes the interview context; the chunks are what get
//! embedded and upserted into the vector store.

use anyhow::{Context, Result};

pub mod chunker;

pub use chunker::RecursiveCharacterSplitter;

/// Extracts plain text from an uploaded PDF.
pub fn extract_text(pdf_bytes: &[u8]) -> Result<String> {
    let text = pdf_extract::extract_text_from_mem(pdf_bytes)
        .context("Failed to extract text from PDF")?;
    Ok(text)
}

/// Splits résumé text into embedding-sized chunks.
/// The résumé context is the concatenation of all chunks.
pub fn chunk_resume(text: &str) -> Vec<String> {
    RecursiveCharacterSplitter::default().split_text(text)
}
