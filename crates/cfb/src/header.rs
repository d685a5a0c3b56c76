//! The 512-byte compound file header.

use crate::consts::*;
use crate::sector::{ByteOrder, SectorReader};
use oletext_core::{has_cfb_magic, Error, Result};

/// Geometry and chain roots read from the file header.
#[derive(Debug, Clone)]
pub struct Header {
    /// Byte order of every container structure.
    pub byte_order: ByteOrder,
    /// Sector size as a power of two (9 → 512 bytes).
    pub sector_shift: u16,
    /// Mini-sector size as a power of two (6 → 64 bytes).
    pub mini_sector_shift: u16,
    /// Streams smaller than this live in the mini-stream.
    pub mini_stream_cutoff: u32,
    /// Number of FAT sectors declared by the header.
    pub num_fat_sectors: u32,
    /// First sector of the directory chain.
    pub first_dir_sector: u32,
    /// First sector of the MiniFAT chain.
    pub first_mini_fat_sector: u32,
    /// Number of MiniFAT sectors declared by the header.
    pub num_mini_fat_sectors: u32,
    /// First DIFAT overflow sector.
    pub first_difat_sector: u32,
    /// Number of DIFAT overflow sectors declared by the header.
    pub num_difat_sectors: u32,
    /// The DIFAT slots embedded in the header.
    pub difat: Vec<u32>,
}

impl Header {
    /// Validate the signature and read the header fields.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if !has_cfb_magic(data) {
            return Err(Error::InvalidFormat(
                "Not a valid CFB file (invalid magic bytes)".to_string(),
            ));
        }
        if data.len() < HEADER_SIZE {
            return Err(Error::truncated(0, HEADER_SIZE, data.len()));
        }

        // The byte order mark decides how every later field is read.
        let byte_order = if data[0x1C..0x1E] == [0xFE, 0xFF] {
            ByteOrder::LittleEndian
        } else {
            ByteOrder::BigEndian
        };
        let reader = SectorReader::new(data, byte_order);

        let sector_shift = reader.u16(0x1E)?;
        let mini_sector_shift = reader.u16(0x20)?;
        if !(MIN_SECTOR_SHIFT..=MAX_SECTOR_SHIFT).contains(&sector_shift) {
            return Err(Error::InvalidFormat(format!(
                "Unsupported sector shift {}",
                sector_shift
            )));
        }
        if mini_sector_shift >= sector_shift {
            return Err(Error::InvalidFormat(format!(
                "Mini sector shift {} is not smaller than sector shift {}",
                mini_sector_shift, sector_shift
            )));
        }

        let difat = (0..HEADER_DIFAT_SLOTS)
            .map(|i| reader.u32(HEADER_DIFAT_OFFSET + i * 4))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            byte_order,
            sector_shift,
            mini_sector_shift,
            num_fat_sectors: reader.u32(0x2C)?,
            first_dir_sector: reader.u32(0x30)?,
            mini_stream_cutoff: reader.u32(0x38)?,
            first_mini_fat_sector: reader.u32(0x3C)?,
            num_mini_fat_sectors: reader.u32(0x40)?,
            first_difat_sector: reader.u32(0x44)?,
            num_difat_sectors: reader.u32(0x48)?,
            difat,
        })
    }

    pub fn sector_size(&self) -> usize {
        1usize << self.sector_shift
    }

    pub fn mini_sector_size(&self) -> usize {
        1usize << self.mini_sector_shift
    }

    /// Byte offset of a regular sector. Sector 0 follows the header, which
    /// occupies the first sector-sized slot of the file.
    pub fn sector_offset(&self, sector: u32) -> Result<usize> {
        (sector as usize)
            .checked_add(1)
            .and_then(|n| n.checked_mul(self.sector_size()))
            .ok_or_else(|| Error::InvalidFormat(format!("Sector {} is not addressable", sector)))
    }
}
