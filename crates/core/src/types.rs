//! Domain types for representing extracted document content.

use serde::{Deserialize, Serialize};

/// Signature of a current compound file.
pub const CFB_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Signature written by pre-release (beta) compound file writers.
pub const CFB_MAGIC_LEGACY: [u8; 8] = [0x0E, 0x11, 0xFC, 0x0D, 0xD0, 0xCF, 0x11, 0xE0];

/// The legacy Office format of a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    /// Word 97-2003 document.
    Doc,
    /// PowerPoint 97-2003 presentation.
    Ppt,
}

impl DocumentFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "doc" => Some(Self::Doc),
            "ppt" => Some(Self::Ppt),
            _ => None,
        }
    }

    /// Detect format from the extension of a file name or path.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, ext) = filename.rsplit_once('.')?;
        Self::from_extension(ext)
    }

    /// Canonical lowercase extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Doc => "doc",
            Self::Ppt => "ppt",
        }
    }
}

/// Check whether a buffer starts with either compound file signature.
pub fn has_cfb_magic(bytes: &[u8]) -> bool {
    bytes.len() >= 8 && (bytes[..8] == CFB_MAGIC || bytes[..8] == CFB_MAGIC_LEGACY)
}

/// Text recovered from one source file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    /// Original filename (without path).
    pub filename: String,

    /// Format the text was extracted as.
    pub format: DocumentFormat,

    /// The recovered plain text.
    pub text: String,
}

impl ExtractedDocument {
    /// Create a new extraction result.
    pub fn new(filename: impl Into<String>, format: DocumentFormat, text: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            format,
            text: text.into(),
        }
    }

    /// True when no visible text was recovered.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
