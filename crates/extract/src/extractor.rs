//! Format dispatch.

use oletext_cfb::Container;
use oletext_core::{has_cfb_magic, DocumentFormat, Error, ExtractedDocument, Result};
use oletext_doc::{DocExtractor, WORD_DOCUMENT_STREAM};
use oletext_ppt::{PptParser, POWERPOINT_DOCUMENT_STREAM};
use std::path::Path;

/// Extract the text of an in-memory file of a known format.
pub fn extract_text(data: &[u8], format: DocumentFormat) -> Result<String> {
    let container = Container::parse(data)?;
    extract_container(&container, format)
}

fn extract_container(container: &Container<'_>, format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Doc => DocExtractor::new().extract(container),
        DocumentFormat::Ppt => PptParser::new().extract(container),
    }
}

/// Guess the format of a compound file from the streams it holds.
fn sniff_format(container: &Container<'_>) -> Option<DocumentFormat> {
    if container.has_stream(WORD_DOCUMENT_STREAM) {
        Some(DocumentFormat::Doc)
    } else if container.has_stream(POWERPOINT_DOCUMENT_STREAM) {
        Some(DocumentFormat::Ppt)
    } else {
        None
    }
}

/// Entry point for extracting text from `.doc` and `.ppt` files.
pub struct TextExtractor;

impl TextExtractor {
    /// Whether the path has an extension this crate handles.
    pub fn is_supported(path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .extension()
            .and_then(|e| e.to_str())
            .and_then(DocumentFormat::from_extension)
            .is_some()
    }

    /// Names of the streams in a compound file, in directory order.
    pub fn stream_names(data: &[u8]) -> Result<Vec<String>> {
        let container = Container::parse(data)?;
        Ok(container.stream_names().map(str::to_string).collect())
    }

    /// Read a file from disk and extract its text.
    pub fn from_file(path: impl AsRef<Path>) -> Result<ExtractedDocument> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::from_bytes(&data, &filename)
    }

    /// Extract text from an in-memory file. The format comes from the
    /// filename's extension; compound files with any other extension are
    /// identified by the streams they contain.
    pub fn from_bytes(data: &[u8], filename: &str) -> Result<ExtractedDocument> {
        if let Some(format) = DocumentFormat::from_filename(filename) {
            log::debug!("Extracting '{}' as {}", filename, format.extension());
            let text = extract_text(data, format)?;
            return Ok(ExtractedDocument::new(filename, format, text));
        }

        let unsupported = || {
            Error::UnsupportedFormat(match filename.rsplit_once('.') {
                Some((_, ext)) => format!("'.{}' files are not supported", ext),
                None => format!("Cannot tell the format of '{}'", filename),
            })
        };

        if !has_cfb_magic(data) {
            return Err(unsupported());
        }

        let container = Container::parse(data)?;
        let format = sniff_format(&container).ok_or_else(unsupported)?;
        log::debug!(
            "'{}' has no known extension, contents look like {}",
            filename,
            format.extension()
        );
        let text = extract_container(&container, format)?;
        Ok(ExtractedDocument::new(filename, format, text))
    }
}
