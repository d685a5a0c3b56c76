//! Compound file layout constants.

/// Size of the file header in bytes.
pub const HEADER_SIZE: usize = 512;

/// Number of DIFAT slots embedded in the header.
pub const HEADER_DIFAT_SLOTS: usize = 109;

/// Offset of the first embedded DIFAT slot.
pub const HEADER_DIFAT_OFFSET: usize = 0x4C;

/// Size of a directory entry in bytes.
pub const DIRENTRY_SIZE: usize = 128;

/// Smallest accepted sector shift (128-byte sectors).
pub const MIN_SECTOR_SHIFT: u16 = 7;

/// Largest accepted sector shift (64 KiB sectors).
pub const MAX_SECTOR_SHIFT: u16 = 16;

/// Denotes a DIFAT sector in a FAT.
#[cfg(test)]
pub const DIFSECT: u32 = 0xFFFF_FFFC;
/// Denotes a FAT sector in a FAT.
#[cfg(test)]
pub const FATSECT: u32 = 0xFFFF_FFFD;
/// End of a sector chain.
pub const ENDOFCHAIN: u32 = 0xFFFF_FFFE;
/// Unallocated sector.
pub const FREESECT: u32 = 0xFFFF_FFFF;

/// Unallocated directory entry index.
#[cfg(test)]
pub const NOSTREAM: u32 = 0xFFFF_FFFF;

/// Name of the root directory entry.
pub const ROOT_ENTRY_NAME: &str = "Root Entry";
