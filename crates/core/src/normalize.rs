//! Optional clean-up of extracted text.
//!
//! Extractors return text exactly as recovered from the file. Callers that
//! want tidier output (collapsed whitespace, composed Unicode) run it
//! through a [`TextNormalizer`].

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse multiple spaces or tabs into one.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{A0}]+").unwrap());

/// Regex to collapse three or more newlines into one blank line.
static BLANK_LINES_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Text normalizer for extracted document text.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    /// Whether to keep line structure or flatten everything onto one line.
    preserve_line_breaks: bool,

    /// Whether to apply Unicode NFC composition.
    compose_unicode: bool,
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextNormalizer {
    /// Create a new text normalizer with default settings.
    pub fn new() -> Self {
        Self {
            preserve_line_breaks: true,
            compose_unicode: true,
        }
    }

    /// Set whether to preserve original line breaks.
    pub fn with_preserve_line_breaks(mut self, preserve: bool) -> Self {
        self.preserve_line_breaks = preserve;
        self
    }

    /// Set whether to compose Unicode to NFC.
    pub fn with_unicode_composition(mut self, compose: bool) -> Self {
        self.compose_unicode = compose;
        self
    }

    /// Normalize a block of extracted text.
    ///
    /// - Normalizes line endings to `\n`
    /// - Collapses space/tab runs to single spaces and trims each line
    /// - Collapses runs of blank lines to a single blank line
    /// - Trims leading/trailing whitespace
    pub fn normalize(&self, text: &str) -> String {
        let text = if self.compose_unicode {
            text.nfc().collect::<String>()
        } else {
            text.to_string()
        };

        let text = text.replace("\r\n", "\n").replace('\r', "\n");

        if !self.preserve_line_breaks {
            let flat = text.replace('\n', " ");
            return WHITESPACE_COLLAPSE_REGEX
                .replace_all(&flat, " ")
                .trim()
                .to_string();
        }

        let lines = text
            .lines()
            .map(|line| WHITESPACE_COLLAPSE_REGEX.replace_all(line, " ").trim().to_string())
            .collect::<Vec<_>>()
            .join("\n");

        BLANK_LINES_REGEX
            .replace_all(&lines, "\n\n")
            .trim()
            .to_string()
    }
}
