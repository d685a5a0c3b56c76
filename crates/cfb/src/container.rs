//! Compound file container: sector chains, directory, and stream reads.

use crate::consts::*;
use crate::directory::{DirEntry, EntryType};
use crate::header::Header;
use crate::sector::SectorReader;
use oletext_core::{Error, Result};
use std::collections::HashSet;

/// One addressable sector space: the regular sectors of the file, or the
/// mini-sectors of the mini-stream.
struct SectorSpace<'b> {
    reader: SectorReader<'b>,
    chain: &'b [u32],
    shift: u16,
    /// Sector slots preceding sector 0 (the header occupies one slot in the
    /// regular space, nothing precedes mini-sector 0).
    leading_slots: usize,
}

impl SectorSpace<'_> {
    fn offset(&self, sector: u32) -> Result<usize> {
        (sector as usize)
            .checked_add(self.leading_slots)
            .and_then(|n| n.checked_mul(1usize << self.shift))
            .ok_or_else(|| Error::InvalidFormat(format!("Sector {} is not addressable", sector)))
    }

    /// Concatenate the sectors of a chain starting at `start`.
    ///
    /// The walk ends at `ENDOFCHAIN`, at `FREESECT`, at a sector missing
    /// from the chain map, once `limit` bytes are collected, or after as
    /// many steps as the backing buffer has sectors, whichever comes first.
    fn read_chain(&self, start: u32, limit: Option<usize>) -> Result<Vec<u8>> {
        let sector_size = 1usize << self.shift;
        let max_steps = (self.reader.len() >> self.shift) + 1;
        let mut out = Vec::new();
        let mut sector = start;
        let mut steps = 0;

        while sector != ENDOFCHAIN && sector != FREESECT {
            if limit.is_some_and(|limit| out.len() >= limit) {
                break;
            }
            if steps >= max_steps {
                log::warn!(
                    "Sector chain from {} exceeds {} steps; treating as ended",
                    start,
                    max_steps
                );
                break;
            }
            let offset = self.offset(sector)?;
            out.extend_from_slice(self.reader.bytes_clamped(offset, sector_size)?);
            sector = self.chain.get(sector as usize).copied().unwrap_or(ENDOFCHAIN);
            steps += 1;
        }

        Ok(out)
    }
}

/// A parsed, read-only compound file over a borrowed buffer.
#[derive(Debug)]
pub struct Container<'a> {
    data: &'a [u8],
    header: Header,
    fat: Vec<u32>,
    mini_fat: Vec<u32>,
    entries: Vec<DirEntry>,
    mini_stream: Vec<u8>,
}

impl<'a> Container<'a> {
    /// Parse the header, DIFAT, FAT, MiniFAT and directory, then load the
    /// mini-stream from the root entry.
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let header = Header::parse(data)?;

        let mut container = Self {
            data,
            header,
            fat: Vec::new(),
            mini_fat: Vec::new(),
            entries: Vec::new(),
            mini_stream: Vec::new(),
        };

        let difat = container.read_difat()?;
        container.fat = container.read_fat(&difat)?;
        container.mini_fat = container.read_mini_fat()?;
        container.entries = container.read_directory()?;

        log::debug!(
            "CFB: sector size {}, {} FAT entries, {} MiniFAT entries, {} directory entries",
            container.header.sector_size(),
            container.fat.len(),
            container.mini_fat.len(),
            container.entries.len()
        );

        let root_id = container
            .find_stream_id(ROOT_ENTRY_NAME, 0)
            .ok_or(Error::MissingRootEntry)?;
        container.mini_stream = container.read_stream(root_id, true)?;

        Ok(container)
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// All directory entries, indexed by entry id.
    pub fn entries(&self) -> &[DirEntry] {
        &self.entries
    }

    pub fn entry(&self, id: usize) -> Option<&DirEntry> {
        self.entries.get(id)
    }

    /// Names of every stream entry, in directory order.
    pub fn stream_names(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|e| e.is_stream())
            .map(|e| e.name.as_str())
    }

    /// First entry id at or after `search_from` whose name equals `name`.
    pub fn find_stream_id(&self, name: &str, search_from: usize) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .skip(search_from)
            .find(|(_, e)| e.name == name)
            .map(|(id, _)| id)
    }

    pub fn has_stream(&self, name: &str) -> bool {
        self.find_stream_id(name, 0).is_some()
    }

    /// Materialize the data of entry `id`, truncated to its declared size.
    ///
    /// Entries smaller than the mini-stream cutoff are read from the
    /// mini-stream, except when `is_root` is set: the root entry's data *is*
    /// the mini-stream and always lives in regular sectors.
    pub fn read_stream(&self, id: usize, is_root: bool) -> Result<Vec<u8>> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| Error::MissingStream(format!("#{}", id)))?;
        let size = usize::try_from(entry.size)
            .map_err(|_| Error::truncated(0, usize::MAX, self.data.len()))?;

        let mut data = if entry.size < u64::from(self.header.mini_stream_cutoff) && !is_root {
            self.mini_space().read_chain(entry.start_sector, Some(size))?
        } else {
            self.regular_space().read_chain(entry.start_sector, Some(size))?
        };

        if data.len() < size {
            return Err(Error::truncated(0, size, data.len()));
        }
        data.truncate(size);
        Ok(data)
    }

    /// Read the first stream called `name`.
    pub fn read_stream_by_name(&self, name: &str) -> Result<Vec<u8>> {
        let id = self
            .find_stream_id(name, 0)
            .ok_or_else(|| Error::MissingStream(name.to_string()))?;
        self.read_stream(id, false)
    }

    fn reader(&self) -> SectorReader<'a> {
        SectorReader::new(self.data, self.header.byte_order)
    }

    fn regular_space(&self) -> SectorSpace<'_> {
        SectorSpace {
            reader: self.reader(),
            chain: &self.fat,
            shift: self.header.sector_shift,
            leading_slots: 1,
        }
    }

    fn mini_space(&self) -> SectorSpace<'_> {
        SectorSpace {
            reader: SectorReader::new(&self.mini_stream, self.header.byte_order),
            chain: &self.mini_fat,
            shift: self.header.mini_sector_shift,
            leading_slots: 0,
        }
    }

    /// Assemble the list of FAT sectors: the header slots followed by the
    /// overflow sectors. Each overflow sector ends with the id of the next.
    ///
    /// The overflow walk stops at the declared count or on a revisited
    /// sector, and the result never lists more FAT sectors than the buffer
    /// holds.
    fn read_difat(&self) -> Result<Vec<u32>> {
        let reader = self.reader();
        let mut difat = self.header.difat.clone();
        let per_sector = self.header.sector_size() / 4 - 1;
        let declared = self.header.num_difat_sectors as usize;
        let max_sectors = self.data.len() >> self.header.sector_shift;

        let mut sector = self.header.first_difat_sector;
        let mut visited = HashSet::new();
        while declared > 0 && sector != ENDOFCHAIN && sector != FREESECT {
            if !visited.insert(sector) {
                log::warn!("DIFAT sector {} revisited; treating as ended", sector);
                break;
            }
            let start = self.header.sector_offset(sector)?;
            for i in 0..per_sector {
                difat.push(reader.u32(start + i * 4)?);
            }
            sector = reader.u32(start + per_sector * 4)?;
            if visited.len() >= declared.min(max_sectors) {
                break;
            }
        }

        while difat.last() == Some(&FREESECT) {
            difat.pop();
        }
        if difat.len() > max_sectors {
            log::warn!(
                "DIFAT lists {} FAT sectors but the file has {}; truncating",
                difat.len(),
                max_sectors
            );
            difat.truncate(max_sectors);
        }
        Ok(difat)
    }

    fn read_fat(&self, difat: &[u32]) -> Result<Vec<u32>> {
        let reader = self.reader();
        let per_sector = self.header.sector_size() / 4;
        let mut fat = Vec::with_capacity(difat.len() * per_sector);

        for &fat_sector in difat {
            let start = self.header.sector_offset(fat_sector)?;
            for i in 0..per_sector {
                fat.push(reader.u32(start + i * 4)?);
            }
        }
        Ok(fat)
    }

    fn read_mini_fat(&self) -> Result<Vec<u32>> {
        let raw = self
            .regular_space()
            .read_chain(self.header.first_mini_fat_sector, None)?;
        let reader = SectorReader::new(&raw, self.header.byte_order);
        (0..raw.len() / 4).map(|i| reader.u32(i * 4)).collect()
    }

    fn read_directory(&self) -> Result<Vec<DirEntry>> {
        let raw = self
            .regular_space()
            .read_chain(self.header.first_dir_sector, None)?;
        let reader = SectorReader::new(&raw, self.header.byte_order);

        let mut entries = (0..raw.len() / DIRENTRY_SIZE)
            .map(|i| DirEntry::parse(&reader, i * DIRENTRY_SIZE, self.header.sector_shift))
            .collect::<Result<Vec<_>>>()?;

        while entries
            .last()
            .is_some_and(|e| e.entry_type == EntryType::Unused)
        {
            entries.pop();
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oletext_core::{CFB_MAGIC, CFB_MAGIC_LEGACY};
    use std::io::{Cursor, Write};

    const SECTOR: usize = 512;
    const MINI: usize = 64;

    // Layout of the hand-built image:
    //   sector 0      FAT
    //   sector 1      directory (4 entries)
    //   sector 2      MiniFAT
    //   sector 3      mini-stream (root entry data)
    //   sector 4..    large stream
    const FAT_SECTOR: u32 = 0;
    const DIR_SECTOR: u32 = 1;
    const MINIFAT_SECTOR: u32 = 2;
    const MINISTREAM_SECTOR: u32 = 3;
    const LARGE_START: u32 = 4;

    fn put_u32(buf: &mut [u8], at: usize, value: u32) {
        buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn sector_at(image: &mut [u8], sector: u32) -> &mut [u8] {
        let start = (sector as usize + 1) * SECTOR;
        &mut image[start..start + SECTOR]
    }

    fn dir_record(name: &str, entry_type: u8, start: u32, size: u64) -> [u8; DIRENTRY_SIZE] {
        let mut raw = [0u8; DIRENTRY_SIZE];
        let units: Vec<u16> = name.encode_utf16().chain(std::iter::once(0)).collect();
        for (i, unit) in units.iter().enumerate() {
            raw[i * 2..i * 2 + 2].copy_from_slice(&unit.to_le_bytes());
        }
        raw[0x40..0x42].copy_from_slice(&((units.len() * 2) as u16).to_le_bytes());
        raw[0x42] = entry_type;
        put_u32(&mut raw, 0x44, NOSTREAM);
        put_u32(&mut raw, 0x48, NOSTREAM);
        put_u32(&mut raw, 0x4C, NOSTREAM);
        put_u32(&mut raw, 0x74, start);
        raw[0x78..0x80].copy_from_slice(&size.to_le_bytes());
        raw
    }

    /// Build a version 3 image holding one mini-stream stream ("Small",
    /// under 4096 bytes) and one regular stream ("Large").
    fn build_image(small: &[u8], large: &[u8]) -> Vec<u8> {
        assert!(small.len() <= SECTOR && large.len() >= 4096);
        let small_minis = small.len().div_ceil(MINI).max(1);
        let large_sectors = large.len().div_ceil(SECTOR);
        let total_sectors = LARGE_START as usize + large_sectors;
        let mut image = vec![0u8; (total_sectors + 1) * SECTOR];

        // Header
        image[..8].copy_from_slice(&CFB_MAGIC);
        image[0x18..0x1A].copy_from_slice(&0x3Eu16.to_le_bytes());
        image[0x1A..0x1C].copy_from_slice(&3u16.to_le_bytes());
        image[0x1C..0x1E].copy_from_slice(&[0xFE, 0xFF]);
        image[0x1E..0x20].copy_from_slice(&9u16.to_le_bytes());
        image[0x20..0x22].copy_from_slice(&6u16.to_le_bytes());
        put_u32(&mut image, 0x2C, 1);
        put_u32(&mut image, 0x30, DIR_SECTOR);
        put_u32(&mut image, 0x38, 4096);
        put_u32(&mut image, 0x3C, MINIFAT_SECTOR);
        put_u32(&mut image, 0x40, 1);
        put_u32(&mut image, 0x44, ENDOFCHAIN);
        put_u32(&mut image, 0x48, 0);
        for i in 0..HEADER_DIFAT_SLOTS {
            put_u32(&mut image, HEADER_DIFAT_OFFSET + i * 4, FREESECT);
        }
        put_u32(&mut image, HEADER_DIFAT_OFFSET, FAT_SECTOR);

        // FAT
        let fat = sector_at(&mut image, FAT_SECTOR);
        for i in 0..SECTOR / 4 {
            put_u32(fat, i * 4, FREESECT);
        }
        put_u32(fat, 0, FATSECT);
        put_u32(fat, 4, ENDOFCHAIN);
        put_u32(fat, 8, ENDOFCHAIN);
        put_u32(fat, 12, ENDOFCHAIN);
        for i in 0..large_sectors {
            let sector = LARGE_START as usize + i;
            let next = if i + 1 == large_sectors {
                ENDOFCHAIN
            } else {
                sector as u32 + 1
            };
            put_u32(fat, sector * 4, next);
        }

        // MiniFAT
        let minifat = sector_at(&mut image, MINIFAT_SECTOR);
        for i in 0..SECTOR / 4 {
            put_u32(minifat, i * 4, FREESECT);
        }
        for i in 0..small_minis {
            let next = if i + 1 == small_minis {
                ENDOFCHAIN
            } else {
                i as u32 + 1
            };
            put_u32(minifat, i * 4, next);
        }

        // Mini-stream and large stream payloads
        sector_at(&mut image, MINISTREAM_SECTOR)[..small.len()].copy_from_slice(small);
        let large_at = (LARGE_START as usize + 1) * SECTOR;
        image[large_at..large_at + large.len()].copy_from_slice(large);

        // Directory
        let dir = sector_at(&mut image, DIR_SECTOR);
        let records = [
            dir_record("Root Entry", 5, MINISTREAM_SECTOR, (small_minis * MINI) as u64),
            dir_record("Small", 2, 0, small.len() as u64),
            dir_record("Large", 2, LARGE_START, large.len() as u64),
            [0u8; DIRENTRY_SIZE],
        ];
        for (i, record) in records.iter().enumerate() {
            dir[i * DIRENTRY_SIZE..(i + 1) * DIRENTRY_SIZE].copy_from_slice(record);
        }

        image
    }

    fn sample_streams() -> (Vec<u8>, Vec<u8>) {
        let small: Vec<u8> = (0..100u8).collect();
        let large: Vec<u8> = (0..4200usize).map(|i| (i % 251) as u8).collect();
        (small, large)
    }

    fn fat_entry_offset(sector: u32) -> usize {
        (FAT_SECTOR as usize + 1) * SECTOR + sector as usize * 4
    }

    #[test]
    fn test_round_trip_small_and_large() {
        let (small, large) = sample_streams();
        let image = build_image(&small, &large);
        let container = Container::parse(&image).unwrap();

        let small_id = container.find_stream_id("Small", 0).unwrap();
        let large_id = container.find_stream_id("Large", 0).unwrap();
        assert_eq!(container.read_stream(small_id, false).unwrap(), small);
        assert_eq!(container.read_stream(large_id, false).unwrap(), large);
    }

    #[test]
    fn test_stream_length_matches_declared_size() {
        let (small, large) = sample_streams();
        let image = build_image(&small, &large);
        let container = Container::parse(&image).unwrap();

        for (id, entry) in container.entries().iter().enumerate() {
            let data = container.read_stream(id, entry.is_root()).unwrap();
            assert_eq!(data.len() as u64, entry.size, "entry {}", entry.name);
        }
    }

    #[test]
    fn test_root_entry_read_from_regular_sectors() {
        let (small, large) = sample_streams();
        let image = build_image(&small, &large);
        let container = Container::parse(&image).unwrap();

        let root_id = container.find_stream_id("Root Entry", 0).unwrap();
        assert_eq!(root_id, 0);
        assert!(container.entry(root_id).unwrap().is_root());
        let root = container.read_stream(root_id, true).unwrap();
        assert_eq!(&root[..small.len()], &small[..]);
    }

    #[test]
    fn test_trailing_unused_entries_dropped() {
        let (small, large) = sample_streams();
        let image = build_image(&small, &large);
        let container = Container::parse(&image).unwrap();

        assert_eq!(container.entries().len(), 3);
        assert_eq!(container.entries()[1].entry_type, EntryType::Stream);
        assert_eq!(
            container.stream_names().collect::<Vec<_>>(),
            vec!["Small", "Large"]
        );
    }

    #[test]
    fn test_find_stream_id_search_from() {
        let (small, large) = sample_streams();
        let image = build_image(&small, &large);
        let container = Container::parse(&image).unwrap();

        assert_eq!(container.find_stream_id("Small", 0), Some(1));
        assert_eq!(container.find_stream_id("Small", 2), None);
        assert_eq!(container.find_stream_id("Missing", 0), None);
        assert!(container.has_stream("Large"));
    }

    #[test]
    fn test_read_stream_by_name_missing() {
        let (small, large) = sample_streams();
        let image = build_image(&small, &large);
        let container = Container::parse(&image).unwrap();

        let err = container.read_stream_by_name("WordDocument").unwrap_err();
        assert!(matches!(err, Error::MissingStream(name) if name == "WordDocument"));
    }

    #[test]
    fn test_invalid_magic() {
        let image = vec![0u8; 2048];
        assert!(matches!(
            Container::parse(&image),
            Err(Error::InvalidFormat(_))
        ));
        assert!(matches!(Container::parse(b"PK"), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_legacy_magic_accepted() {
        let (small, large) = sample_streams();
        let mut image = build_image(&small, &large);
        image[..8].copy_from_slice(&CFB_MAGIC_LEGACY);
        let container = Container::parse(&image).unwrap();
        assert!(container.has_stream("Small"));
    }

    #[test]
    fn test_missing_root_entry() {
        let (small, large) = sample_streams();
        let mut image = build_image(&small, &large);
        // Rename "Root Entry" to "Root Entrx"
        let at = (DIR_SECTOR as usize + 1) * SECTOR + 9 * 2;
        image[at] = b'x';
        assert!(matches!(
            Container::parse(&image),
            Err(Error::MissingRootEntry)
        ));
    }

    #[test]
    fn test_directory_outside_buffer() {
        let (small, large) = sample_streams();
        let mut image = build_image(&small, &large);
        put_u32(&mut image, 0x30, 500);
        assert!(matches!(
            Container::parse(&image),
            Err(Error::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_truncated_large_stream() {
        let (small, large) = sample_streams();
        let image = build_image(&small, &large);
        // Cut the file in the middle of the large stream
        let cut = &image[..(LARGE_START as usize + 1) * SECTOR + 1000];
        let container = Container::parse(cut).unwrap();
        let id = container.find_stream_id("Large", 0).unwrap();
        assert!(matches!(
            container.read_stream(id, false),
            Err(Error::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_unpadded_last_sector() {
        let (small, large) = sample_streams();
        let image = build_image(&small, &large);
        let end = (LARGE_START as usize + 1) * SECTOR + large.len();
        let container = Container::parse(&image[..end]).unwrap();
        let id = container.find_stream_id("Large", 0).unwrap();
        assert_eq!(container.read_stream(id, false).unwrap(), large);
    }

    #[test]
    fn test_self_referencing_fat_entry_terminates() {
        let (small, large) = sample_streams();
        let mut image = build_image(&small, &large);
        // Directory sector points at itself
        put_u32(&mut image, fat_entry_offset(DIR_SECTOR), DIR_SECTOR);
        let container = Container::parse(&image).unwrap();
        assert!(container.has_stream("Large"));
    }

    #[test]
    fn test_cyclic_stream_chain_terminates() {
        let (small, large) = sample_streams();
        let mut image = build_image(&small, &large);
        // 4 -> 5 -> 4 -> ...
        put_u32(&mut image, fat_entry_offset(LARGE_START + 1), LARGE_START);
        let container = Container::parse(&image).unwrap();
        let id = container.find_stream_id("Large", 0).unwrap();
        let data = container.read_stream(id, false).unwrap();
        assert_eq!(data.len(), large.len());
        assert_eq!(&data[..SECTOR * 2], &large[..SECTOR * 2]);
    }

    #[test]
    fn test_cyclic_mini_chain_terminates() {
        let (small, large) = sample_streams();
        let mut image = build_image(&small, &large);
        // Mini-sector 1 points back to 0
        let at = (MINIFAT_SECTOR as usize + 1) * SECTOR + 4;
        put_u32(&mut image, at, 0);
        let container = Container::parse(&image).unwrap();
        let id = container.find_stream_id("Small", 0).unwrap();
        assert_eq!(container.read_stream(id, false).unwrap().len(), small.len());
    }

    #[test]
    fn test_chain_pointer_outside_buffer() {
        let (small, large) = sample_streams();
        let mut image = build_image(&small, &large);
        put_u32(&mut image, fat_entry_offset(MINIFAT_SECTOR), 100_000);
        assert!(matches!(
            Container::parse(&image),
            Err(Error::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_missing_chain_entry_ends_walk() {
        let backing: Vec<u8> = (0..4 * MINI).map(|i| (i / MINI) as u8).collect();
        let chain = [1u32];
        let space = SectorSpace {
            reader: SectorReader::le(&backing),
            chain: &chain,
            shift: 6,
            leading_slots: 0,
        };
        let data = space.read_chain(0, None).unwrap();
        assert_eq!(data.len(), 2 * MINI);
        assert_eq!(data[MINI], 1);
    }

    #[test]
    fn test_walk_bounded_by_sector_count() {
        let backing = vec![0u8; 4 * MINI];
        let chain = [0u32];
        let space = SectorSpace {
            reader: SectorReader::le(&backing),
            chain: &chain,
            shift: 6,
            leading_slots: 0,
        };
        let data = space.read_chain(0, None).unwrap();
        assert_eq!(data.len(), 5 * MINI);
    }

    #[test]
    fn test_difat_overflow_stops_at_end_of_chain() {
        let (small, large) = sample_streams();
        let mut image = build_image(&small, &large);
        // Append one DIFAT overflow sector full of FREESECT ending in
        // ENDOFCHAIN, while the header claims five overflow sectors.
        let difat_sector = (image.len() / SECTOR - 1) as u32;
        image.extend(std::iter::repeat(0xFF).take(SECTOR));
        let last = image.len() - 4;
        put_u32(&mut image, last, ENDOFCHAIN);
        put_u32(&mut image, fat_entry_offset(difat_sector), DIFSECT);
        put_u32(&mut image, 0x44, difat_sector);
        put_u32(&mut image, 0x48, 5);

        let container = Container::parse(&image).unwrap();
        let id = container.find_stream_id("Large", 0).unwrap();
        assert_eq!(container.read_stream(id, false).unwrap(), large);
    }

    #[test]
    fn test_difat_overflow_loop_bounded_by_declared_count() {
        let (small, large) = sample_streams();
        let mut image = build_image(&small, &large);
        // A DIFAT overflow sector that names itself as its successor.
        let difat_sector = (image.len() / SECTOR - 1) as u32;
        image.extend(std::iter::repeat(0xFF).take(SECTOR));
        let last = image.len() - 4;
        put_u32(&mut image, last, difat_sector);
        put_u32(&mut image, fat_entry_offset(difat_sector), DIFSECT);
        put_u32(&mut image, 0x44, difat_sector);
        put_u32(&mut image, 0x48, 3);

        let container = Container::parse(&image).unwrap();
        assert!(container.has_stream("Small"));
    }

    #[test]
    fn test_difat_self_loop_bounded_by_file_size() {
        let (small, large) = sample_streams();
        let mut image = build_image(&small, &large);
        // Every header slot and every overflow slot names the FAT sector,
        // the overflow sector points at itself, and the header claims the
        // largest possible overflow count.
        let difat_sector = (image.len() / SECTOR - 1) as u32;
        image.extend(std::iter::repeat(0).take(SECTOR));
        for i in 0..HEADER_DIFAT_SLOTS {
            put_u32(&mut image, HEADER_DIFAT_OFFSET + i * 4, FAT_SECTOR);
        }
        let last = image.len() - 4;
        put_u32(&mut image, last, difat_sector);
        put_u32(&mut image, fat_entry_offset(difat_sector), DIFSECT);
        put_u32(&mut image, 0x44, difat_sector);
        put_u32(&mut image, 0x48, u32::MAX);

        let container = Container::parse(&image).unwrap();
        let sectors = image.len() / SECTOR;
        assert!(container.fat.len() <= sectors * (SECTOR / 4));
        let id = container.find_stream_id("Large", 0).unwrap();
        assert_eq!(container.read_stream(id, false).unwrap(), large);
    }

    fn reference_image(streams: &[(&str, Vec<u8>)]) -> Vec<u8> {
        let mut comp = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        for (path, data) in streams {
            let mut stream = comp.create_stream(path).unwrap();
            stream.write_all(data).unwrap();
            stream.flush().unwrap();
        }
        comp.flush().unwrap();
        comp.into_inner().into_inner()
    }

    #[test]
    fn test_reads_reference_writer_output() {
        let small: Vec<u8> = b"tiny stream payload".to_vec();
        let medium: Vec<u8> = (0..3000usize).map(|i| (i * 7 % 256) as u8).collect();
        let large: Vec<u8> = (0..20_000usize).map(|i| (i % 253) as u8).collect();
        let image = reference_image(&[
            ("/Small", small.clone()),
            ("/Medium", medium.clone()),
            ("/Large", large.clone()),
        ]);

        let container = Container::parse(&image).unwrap();
        assert_eq!(container.read_stream_by_name("Small").unwrap(), small);
        assert_eq!(container.read_stream_by_name("Medium").unwrap(), medium);
        assert_eq!(container.read_stream_by_name("Large").unwrap(), large);
    }

    #[test]
    fn test_reads_nested_storage_by_flat_name() {
        let inner: Vec<u8> = b"inside a storage".to_vec();
        let mut comp = cfb::CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        comp.create_storage("/Objects").unwrap();
        {
            let mut stream = comp.create_stream("/Objects/Inner").unwrap();
            stream.write_all(&inner).unwrap();
            stream.flush().unwrap();
        }
        comp.flush().unwrap();
        let image = comp.into_inner().into_inner();

        let container = Container::parse(&image).unwrap();
        let storage = container.find_stream_id("Objects", 0).unwrap();
        assert_eq!(
            container.entry(storage).unwrap().entry_type,
            EntryType::Storage
        );
        assert_eq!(container.read_stream_by_name("Inner").unwrap(), inner);
    }
}
