//! Core error taxonomy, document types, and text decoding shared by the
//! legacy Office text extractors.

pub mod error;
pub mod normalize;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use normalize::TextNormalizer;
pub use types::{has_cfb_magic, DocumentFormat, ExtractedDocument, CFB_MAGIC, CFB_MAGIC_LEGACY};
