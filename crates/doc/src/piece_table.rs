//! Locating and decoding the piece table inside the CLX.
//!
//! The CLX is an optional run of property modifier blocks (`0x01`)
//! followed by the piece table block (`0x02`, u32 length, PlcPcd). The
//! blocks are scanned for a `0x02` marker whose declared length exactly
//! covers the rest of the CLX.

use oletext_cfb::SectorReader;
use oletext_core::{Error, Result};

/// Marker byte that opens the piece table block.
const PCDT_MARKER: u8 = 0x02;

/// Size of one piece descriptor.
const PCD_SIZE: usize = 8;

/// Set in a descriptor's file offset when the piece is stored as CP1252.
const FC_COMPRESSED: u32 = 0x4000_0000;

/// One contiguous run of text in the `WordDocument` stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    pub cp_start: u32,
    pub cp_end: u32,
    /// Byte offset of the first character in the `WordDocument` stream.
    pub offset: usize,
    /// Single-byte CP1252 rather than UTF-16LE.
    pub is_ansi: bool,
}

impl Piece {
    /// Number of characters in the piece.
    pub fn char_len(&self) -> usize {
        (self.cp_end - self.cp_start) as usize
    }

    /// Number of bytes the piece occupies in the `WordDocument` stream.
    pub fn byte_len(&self) -> usize {
        if self.is_ansi {
            self.char_len()
        } else {
            self.char_len() * 2
        }
    }
}

/// The ordered pieces that make up the document text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PieceTable {
    pieces: Vec<Piece>,
}

impl PieceTable {
    /// Find the piece table block in a CLX and parse it.
    pub fn from_clx(clx: &[u8], last_cp: u32) -> Result<Self> {
        let plc = locate(clx)?;
        Self::parse(plc, last_cp)
    }

    /// Parse a PlcPcd: CPs up to and including `last_cp`, then one
    /// descriptor per adjacent CP pair.
    pub fn parse(plc: &[u8], last_cp: u32) -> Result<Self> {
        let reader = SectorReader::le(plc);

        let mut cps = Vec::new();
        let mut offset = 0;
        loop {
            let cp = reader.u32(offset).map_err(|_| {
                Error::MalformedPieceTable(format!(
                    "Character position {} never reached",
                    last_cp
                ))
            })?;
            cps.push(cp);
            offset += 4;
            if cp == last_cp {
                break;
            }
        }

        let count = cps.len() - 1;
        if reader.len() - offset < count * PCD_SIZE {
            return Err(Error::MalformedPieceTable(format!(
                "{} piece descriptors expected, {} bytes available",
                count,
                reader.len() - offset
            )));
        }

        let mut pieces = Vec::with_capacity(count);
        for (i, bounds) in cps.windows(2).enumerate() {
            let (cp_start, cp_end) = (bounds[0], bounds[1]);
            if cp_end < cp_start {
                return Err(Error::MalformedPieceTable(format!(
                    "Piece {} runs backwards ({} > {})",
                    i, cp_start, cp_end
                )));
            }

            let fc = reader.u32(offset + i * PCD_SIZE + 2)?;
            let is_ansi = fc & FC_COMPRESSED != 0;
            let start = if is_ansi {
                ((fc & !FC_COMPRESSED) / 2) as usize
            } else {
                fc as usize
            };

            pieces.push(Piece {
                cp_start,
                cp_end,
                offset: start,
                is_ansi,
            });
        }

        Ok(Self { pieces })
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }
}

/// Return the PlcPcd bytes of the first `0x02` block whose declared
/// length matches the remainder of the CLX exactly.
fn locate(clx: &[u8]) -> Result<&[u8]> {
    let reader = SectorReader::le(clx);
    for pos in memchr::memchr_iter(PCDT_MARKER, clx) {
        let body = pos + 5;
        if body > clx.len() {
            break;
        }
        let declared = reader.u32(pos + 1)? as usize;
        if clx.len() - body == declared {
            return Ok(&clx[body..]);
        }
    }
    Err(Error::MalformedPieceTable(
        "No piece table block in CLX".to_string(),
    ))
}
