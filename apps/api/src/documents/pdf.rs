//! PDF text extraction.

use crate::errors::AppError;

/// Extracts plain text from PDF bytes, trimmed of surrounding whitespace.
pub fn extract_text(bytes: &[u8]) -> Result<String, AppError> {
    let text = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| AppError::Validation(format!("Failed to extract text from PDF: {e}")))?;
    Ok(text.trim().to_string())
}
