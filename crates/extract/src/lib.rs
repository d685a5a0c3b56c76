//! Text extraction from legacy Office binary files.
//!
//! [`TextExtractor`] picks the Word or PowerPoint extractor for a file and
//! returns its text as an [`ExtractedDocument`].
//!
//! ```no_run
//! use oletext::TextExtractor;
//!
//! let doc = TextExtractor::from_file("minutes.doc")?;
//! println!("{}", doc.text);
//! # Ok::<(), oletext::Error>(())
//! ```

mod extractor;

pub use extractor::{extract_text, TextExtractor};
pub use oletext_core::{DocumentFormat, Error, ExtractedDocument, Result, TextNormalizer};
