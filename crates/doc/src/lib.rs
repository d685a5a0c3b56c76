//! Text extraction for Word 97-2003 binary documents.
//!
//! The `WordDocument` stream starts with the File Information Block, which
//! locates the piece table (CLX) inside the `0Table` or `1Table` stream.
//! The piece table maps character positions onto runs of CP1252 or UTF-16
//! bytes back in `WordDocument`.

mod extractor;
mod fib;
mod fields;
mod piece_table;

pub use extractor::{DocExtractor, WORD_DOCUMENT_STREAM};
pub use fib::Fib;
pub use fields::strip_fields;
pub use piece_table::{Piece, PieceTable};

use oletext_cfb::Container;
use oletext_core::Result;

/// Extract the text of a `.doc` file held in memory.
pub fn extract_text(buffer: &[u8]) -> Result<String> {
    let container = Container::parse(buffer)?;
    DocExtractor::new().extract(&container)
}
