//! Word 97-2003 text extraction.

use crate::fib::Fib;
use crate::fields::strip_fields;
use crate::piece_table::PieceTable;
use oletext_cfb::{Container, SectorReader};
use oletext_core::text::{decode_cp1252, decode_utf16le, map_control_chars};
use oletext_core::Result;

/// Name of the stream holding the FIB and the document characters.
pub const WORD_DOCUMENT_STREAM: &str = "WordDocument";

/// Reassembles document text from the piece table.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocExtractor;

impl DocExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of a parsed `.doc` container.
    pub fn extract(&self, container: &Container<'_>) -> Result<String> {
        let word = container.read_stream_by_name(WORD_DOCUMENT_STREAM)?;
        let fib = Fib::parse(&word)?;
        let table = container.read_stream_by_name(fib.table_stream_name())?;

        log::debug!(
            "WordDocument {} bytes, {} {} bytes, last CP {}",
            word.len(),
            fib.table_stream_name(),
            table.len(),
            fib.last_cp()
        );

        self.extract_with_fib(&fib, &word, &table)
    }

    /// Extract text given the raw `WordDocument` and table streams.
    pub fn extract_from_streams(&self, word: &[u8], table: &[u8]) -> Result<String> {
        let fib = Fib::parse(word)?;
        self.extract_with_fib(&fib, word, table)
    }

    fn extract_with_fib(&self, fib: &Fib, word: &[u8], table: &[u8]) -> Result<String> {
        let clx = SectorReader::le(table).bytes(fib.fc_clx as usize, fib.lcb_clx as usize)?;
        let pieces = PieceTable::from_clx(clx, fib.last_cp())?;

        let word = SectorReader::le(word);
        let mut raw = String::new();
        for piece in pieces.pieces() {
            let bytes = word.bytes(piece.offset, piece.byte_len())?;
            if piece.is_ansi {
                raw.push_str(&decode_cp1252(bytes));
            } else {
                raw.push_str(&decode_utf16le(bytes));
            }
        }

        Ok(map_control_chars(&strip_fields(&raw)))
    }
}
