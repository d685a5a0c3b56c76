//! Directory entries.
//!
//! On disk the entries form a red-black tree per storage. Text extraction
//! only ever looks streams up by exact name, so entries are kept as a flat
//! arena indexed by entry id and the tree links are carried as plain data.

use crate::consts::DIRENTRY_SIZE;
use crate::sector::SectorReader;
use oletext_core::Result;

/// Kind of object a directory entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Unused,
    Storage,
    Stream,
    LockBytes,
    Property,
    Root,
    Unknown(u8),
}

impl EntryType {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => EntryType::Unused,
            1 => EntryType::Storage,
            2 => EntryType::Stream,
            3 => EntryType::LockBytes,
            4 => EntryType::Property,
            5 => EntryType::Root,
            other => EntryType::Unknown(other),
        }
    }
}

/// One 128-byte directory record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    /// Entry name, decoded from UTF-16.
    pub name: String,
    pub entry_type: EntryType,
    /// Red-black tree node color.
    pub color: u8,
    /// Left sibling entry id.
    pub left: u32,
    /// Right sibling entry id.
    pub right: u32,
    /// First child entry id (storages only).
    pub child: u32,
    /// First sector (or mini-sector) of the entry's data.
    pub start_sector: u32,
    /// Declared size of the entry's data in bytes.
    pub size: u64,
}

impl DirEntry {
    /// Parse one entry from a 128-byte record.
    ///
    /// With 512-byte sectors only the low 32 bits of the size field are
    /// defined; writers are known to leave garbage in the high half.
    pub(crate) fn parse(reader: &SectorReader<'_>, offset: usize, sector_shift: u16) -> Result<Self> {
        let record = SectorReader::new(reader.bytes(offset, DIRENTRY_SIZE)?, reader.order());

        let name_len = (record.u16(0x40)? as usize).min(64);
        let units = (0..name_len / 2)
            .map(|i| record.u16(i * 2))
            .collect::<Result<Vec<_>>>()?;
        let name = char::decode_utf16(units)
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect::<String>()
            .trim_end_matches('\0')
            .trim()
            .to_string();

        let raw_size = record.u64(0x78)?;
        let size = if sector_shift == 9 {
            raw_size & 0xFFFF_FFFF
        } else {
            raw_size
        };

        Ok(Self {
            name,
            entry_type: EntryType::from_u8(record.u8(0x42)?),
            color: record.u8(0x43)?,
            left: record.u32(0x44)?,
            right: record.u32(0x48)?,
            child: record.u32(0x4C)?,
            start_sector: record.u32(0x74)?,
            size,
        })
    }

    pub fn is_stream(&self) -> bool {
        self.entry_type == EntryType::Stream
    }

    pub fn is_root(&self) -> bool {
        self.entry_type == EntryType::Root
    }
}
