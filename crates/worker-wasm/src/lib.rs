//! WASM-compatible wrapper for legacy Office text extraction.
//!
//! This crate exposes the text extraction functionality to JavaScript
//! for use in Cloudflare Workers.

use oletext::{TextExtractor, TextNormalizer};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up better panic messages in the console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of extracting a document.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Original filename.
    pub filename: String,
    /// Detected format of the source file ("doc" or "ppt").
    pub format: String,
    /// The recovered text.
    pub text: String,
    /// Warning message if the file held no visible text.
    pub warning: Option<String>,
}

/// Extract text from a .doc or .ppt file.
///
/// # Arguments
/// * `data` - The raw bytes of the file
/// * `filename` - The original filename (used for format detection)
/// * `normalize` - Collapse whitespace and blank lines in the result
///
/// # Returns
/// A JavaScript object with the extraction result, or throws on error.
#[wasm_bindgen]
pub fn extract_text(data: &[u8], filename: &str, normalize: bool) -> Result<JsValue, JsValue> {
    let result = extract_text_impl(data, filename, normalize).map_err(|e| JsValue::from_str(&e))?;

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Whether a filename has an extension this module handles.
#[wasm_bindgen]
pub fn is_supported(filename: &str) -> bool {
    TextExtractor::is_supported(filename)
}

/// Normalize already-extracted text.
///
/// With `preserve_line_breaks` false the text is flattened onto one line.
#[wasm_bindgen]
pub fn normalize_text(text: &str, preserve_line_breaks: bool) -> String {
    TextNormalizer::new()
        .with_preserve_line_breaks(preserve_line_breaks)
        .normalize(text)
}

fn extract_text_impl(data: &[u8], filename: &str, normalize: bool) -> Result<ExtractionResult, String> {
    // Need at least a full CFB header
    if data.len() < 512 {
        return Err("File too small to be a valid document".to_string());
    }

    let doc = TextExtractor::from_bytes(data, filename)
        .map_err(|e| format!("{} parsing error: {}", filename, e))?;

    let text = if normalize {
        TextNormalizer::new().normalize(&doc.text)
    } else {
        doc.text.clone()
    };

    let warning = doc
        .is_blank()
        .then(|| "No text content found. The file may contain only images.".to_string());

    Ok(ExtractionResult {
        filename: doc.filename,
        format: doc.format.extension().to_string(),
        text,
        warning,
    })
}
