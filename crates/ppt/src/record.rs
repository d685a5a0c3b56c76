//! PowerPoint record headers.
//!
//! Every record starts with an 8-byte header: a u16 packing the version
//! (low 4 bits) and instance (high 12 bits), a u16 record type and a u32
//! body length. Containers carry version `0xF` and hold further records.

use oletext_cfb::SectorReader;
use oletext_core::{Error, Result};

/// Size of a record header.
pub const HEADER_SIZE: usize = 8;

/// Record type constants for the PowerPoint binary format.
pub mod record_types {
    pub const RT_DOCUMENT: u16 = 0x03E8;
    pub const RT_DOCUMENT_ATOM: u16 = 0x03E9;
    pub const RT_SLIDE: u16 = 0x03EE;
    pub const RT_SLIDE_ATOM: u16 = 0x03EF;
    pub const RT_DOCUMENT_TEXT_INFO: u16 = 0x03F2;
    pub const RT_SLIDE_PERSIST_ATOM: u16 = 0x03F3;
    pub const RT_SLIDE_SHOW_SLIDE_INFO_ATOM: u16 = 0x03F9;
    pub const RT_DOC_INFO_LIST: u16 = 0x07D0;
    pub const RT_SOUND_COLLECTION: u16 = 0x07E4;
    pub const RT_EXTERNAL_OBJECT_LIST: u16 = 0x0409;
    pub const RT_DRAWING_GROUP: u16 = 0x040B;
    pub const RT_DRAWING: u16 = 0x040C;
    pub const RT_TEXT_HEADER_ATOM: u16 = 0x0F9F;
    pub const RT_TEXT_CHARS_ATOM: u16 = 0x0FA0;
    pub const RT_TEXT_BYTES_ATOM: u16 = 0x0FA8;
    pub const RT_HEADERS_FOOTERS: u16 = 0x0FD9;
    pub const RT_SLIDE_LIST_WITH_TEXT: u16 = 0x0FF0;
    pub const RT_USER_EDIT_ATOM: u16 = 0x0FF5;
    pub const RT_PERSIST_DIRECTORY_ATOM: u16 = 0x1772;
    pub const RT_ROUND_TRIP_SLIDE: u16 = 0x3714;
}

/// A decoded record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub version: u8,
    pub instance: u16,
    pub rec_type: u16,
    pub length: u32,
}

impl RecordHeader {
    pub fn parse(data: &[u8], offset: usize) -> Result<Self> {
        let reader = SectorReader::le(data);
        let ver_instance = reader.u16(offset)?;
        Ok(Self {
            version: (ver_instance & 0x0F) as u8,
            instance: ver_instance >> 4,
            rec_type: reader.u16(offset + 2)?,
            length: reader.u32(offset + 4)?,
        })
    }
}

/// A record header together with its body.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    pub header: RecordHeader,
    /// Offset of the header within the buffer it was read from.
    pub offset: usize,
    pub body: &'a [u8],
}

impl<'a> Record<'a> {
    pub fn rec_type(&self) -> u16 {
        self.header.rec_type
    }

    /// Offset of the first byte after this record.
    pub fn end(&self) -> usize {
        self.offset + HEADER_SIZE + self.body.len()
    }
}

/// Read the record at `offset`. A header or body running past the end of
/// `data` is [`Error::TruncatedData`].
pub fn record_at(data: &[u8], offset: usize) -> Result<Record<'_>> {
    let header = RecordHeader::parse(data, offset)?;
    let body_start = offset
        .checked_add(HEADER_SIZE)
        .ok_or_else(|| Error::truncated(offset, HEADER_SIZE, data.len()))?;
    let body = SectorReader::le(data).bytes(body_start, header.length as usize)?;
    Ok(Record {
        header,
        offset,
        body,
    })
}

/// Read a record that must be of type `rec_type`.
pub fn expect_record(data: &[u8], offset: usize, rec_type: u16) -> Result<Record<'_>> {
    let header = RecordHeader::parse(data, offset)?;
    if header.rec_type != rec_type {
        return Err(Error::UnexpectedRecord {
            expected: rec_type,
            offset,
        });
    }
    record_at(data, offset)
}

/// Read the record at `offset` if one of type `rec_type` starts there.
///
/// No room for a header, or a different type, yields `None`. A matching
/// header whose body overruns `data` is still an error.
pub fn optional_record(data: &[u8], offset: usize, rec_type: u16) -> Result<Option<Record<'_>>> {
    match RecordHeader::parse(data, offset) {
        Ok(header) if header.rec_type == rec_type => record_at(data, offset).map(Some),
        _ => Ok(None),
    }
}
