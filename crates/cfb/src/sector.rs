//! Bounds-checked integer extraction from a byte buffer.
//!
//! Every offset handed to a [`SectorReader`] is derived from file fields, so
//! every read is checked and reported as [`Error::TruncatedData`] instead of
//! panicking.

use oletext_core::{Error, Result};

/// Byte order of multi-byte integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByteOrder {
    #[default]
    LittleEndian,
    BigEndian,
}

/// Reads integers and slices at arbitrary offsets of a borrowed buffer.
#[derive(Debug, Clone, Copy)]
pub struct SectorReader<'a> {
    data: &'a [u8],
    order: ByteOrder,
}

impl<'a> SectorReader<'a> {
    /// Create a reader with an explicit byte order.
    pub fn new(data: &'a [u8], order: ByteOrder) -> Self {
        Self { data, order }
    }

    /// Create a little-endian reader. Word and PowerPoint streams are always
    /// little-endian regardless of the container's byte order.
    pub fn le(data: &'a [u8]) -> Self {
        Self::new(data, ByteOrder::LittleEndian)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn order(&self) -> ByteOrder {
        self.order
    }

    /// Borrow exactly `len` bytes at `offset`.
    pub fn bytes(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        let end = offset
            .checked_add(len)
            .ok_or_else(|| Error::truncated(offset, len, self.data.len()))?;
        self.data
            .get(offset..end)
            .ok_or_else(|| Error::truncated(offset, len, self.data.len()))
    }

    /// Borrow up to `len` bytes at `offset`, stopping at the end of the
    /// buffer. The offset itself must lie inside the buffer.
    pub fn bytes_clamped(&self, offset: usize, len: usize) -> Result<&'a [u8]> {
        if offset >= self.data.len() {
            return Err(Error::truncated(offset, len, self.data.len()));
        }
        let end = offset.saturating_add(len).min(self.data.len());
        Ok(&self.data[offset..end])
    }

    pub fn u8(&self, offset: usize) -> Result<u8> {
        Ok(self.bytes(offset, 1)?[0])
    }

    pub fn u16(&self, offset: usize) -> Result<u16> {
        let b = self.bytes(offset, 2)?;
        let raw = [b[0], b[1]];
        Ok(match self.order {
            ByteOrder::LittleEndian => u16::from_le_bytes(raw),
            ByteOrder::BigEndian => u16::from_be_bytes(raw),
        })
    }

    pub fn u32(&self, offset: usize) -> Result<u32> {
        let b = self.bytes(offset, 4)?;
        let raw = [b[0], b[1], b[2], b[3]];
        Ok(match self.order {
            ByteOrder::LittleEndian => u32::from_le_bytes(raw),
            ByteOrder::BigEndian => u32::from_be_bytes(raw),
        })
    }

    pub fn u64(&self, offset: usize) -> Result<u64> {
        let b = self.bytes(offset, 8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(b);
        Ok(match self.order {
            ByteOrder::LittleEndian => u64::from_le_bytes(raw),
            ByteOrder::BigEndian => u64::from_be_bytes(raw),
        })
    }
}
