//! Resolving persist ids to stream offsets.
//!
//! `Current User` points at the newest UserEditAtom in the
//! `PowerPoint Document` stream. Each UserEditAtom links to the previous
//! one and to a PersistDirectoryAtom fragment; replaying the fragments
//! oldest first gives the current persist id → offset map.

use crate::record::record_types::*;
use crate::record::{expect_record, optional_record};
use oletext_cfb::SectorReader;
use oletext_core::{Error, Result};
use std::collections::{HashMap, HashSet};

/// Header token written by files that must not be trusted.
pub const INVALID_CURRENT_USER_TOKEN: u32 = 0xF3D1_C4DF;

/// The fields read from the `Current User` stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub header_token: u32,
    pub offset_to_current_edit: u32,
}

impl CurrentUser {
    pub fn parse(stream: &[u8]) -> Result<Self> {
        let reader = SectorReader::le(stream);
        let header_token = reader.u32(12)?;
        if header_token == INVALID_CURRENT_USER_TOKEN {
            return Err(Error::InvalidFormat(format!(
                "Current User header token {:#010X} marks an unusable presentation",
                header_token
            )));
        }
        Ok(Self {
            header_token,
            offset_to_current_edit: reader.u32(16)?,
        })
    }
}

/// The UserEditAtom fields needed to rebuild the persist directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserEditAtom {
    /// Offset of the header of this atom in the document stream.
    pub offset: u32,
    /// Offset of the previous UserEditAtom, `0` for the first edit.
    pub offset_last_edit: u32,
    /// Offset of this edit's PersistDirectoryAtom.
    pub offset_persist_directory: u32,
    /// Persist id of the DocumentContainer.
    pub doc_persist_id_ref: u32,
}

impl UserEditAtom {
    fn parse(body: &[u8], offset: u32) -> Result<Self> {
        let reader = SectorReader::le(body);
        Ok(Self {
            offset,
            offset_last_edit: reader.u32(8)?,
            offset_persist_directory: reader.u32(12)?,
            doc_persist_id_ref: reader.u32(16)?,
        })
    }
}

/// Walk the UserEditAtom chain from the newest edit back to the first.
///
/// The newest atom must exist. A dangling link further back, or a link
/// that returns to an atom already visited, ends the walk.
pub fn edit_chain(stream: &[u8], offset_to_current_edit: u32) -> Result<Vec<UserEditAtom>> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut offset = offset_to_current_edit;

    loop {
        if !seen.insert(offset) {
            log::warn!("UserEditAtom chain returns to offset {}, stopping", offset);
            break;
        }

        let record = if chain.is_empty() {
            expect_record(stream, offset as usize, RT_USER_EDIT_ATOM)?
        } else {
            match optional_record(stream, offset as usize, RT_USER_EDIT_ATOM)? {
                Some(record) => record,
                None => {
                    log::warn!("No UserEditAtom at offset {}, stopping", offset);
                    break;
                }
            }
        };

        let atom = UserEditAtom::parse(record.body, offset)?;
        chain.push(atom);
        if atom.offset_last_edit == 0 {
            break;
        }
        offset = atom.offset_last_edit;
    }

    Ok(chain)
}

/// PersistDirectoryAtom offsets of a newest-first chain, oldest first.
pub fn persist_directory_offsets(chain: &[UserEditAtom]) -> Vec<u32> {
    chain
        .iter()
        .rev()
        .map(|atom| atom.offset_persist_directory)
        .collect()
}

/// Persist id → offset map for the `PowerPoint Document` stream.
#[derive(Debug, Clone, Default)]
pub struct PersistDirectory {
    entries: HashMap<u32, u32>,
}

impl PersistDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replay the PersistDirectoryAtoms at `offsets` in order. Later
    /// fragments override earlier ones.
    pub fn load(stream: &[u8], offsets: &[u32]) -> Result<Self> {
        let mut directory = Self::new();
        for &offset in offsets {
            let record = expect_record(stream, offset as usize, RT_PERSIST_DIRECTORY_ATOM)?;
            directory.apply_fragment(record.body)?;
        }
        log::debug!(
            "Persist directory: {} entries from {} fragments",
            directory.len(),
            offsets.len()
        );
        Ok(directory)
    }

    /// Apply one PersistDirectoryAtom body: groups of a packed u32 (start
    /// id in the low 20 bits, count in the high 12) and `count` offsets.
    pub fn apply_fragment(&mut self, body: &[u8]) -> Result<()> {
        let reader = SectorReader::le(body);
        let mut pos = 0;
        while pos < body.len() {
            let packed = reader.u32(pos)?;
            let first_id = packed & 0x000F_FFFF;
            let count = packed >> 20;
            pos += 4;

            for i in 0..count {
                let offset = reader.u32(pos)?;
                self.entries.insert(first_id + i, offset);
                pos += 4;
            }
        }
        Ok(())
    }

    pub fn get(&self, persist_id: u32) -> Option<u32> {
        self.entries.get(&persist_id).copied()
    }

    /// Offset for `persist_id`, or [`Error::MissingPersistEntry`].
    pub fn resolve(&self, persist_id: u32) -> Result<u32> {
        self.get(persist_id)
            .ok_or(Error::MissingPersistEntry(persist_id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{current_user, persist_directory, user_edit};

    #[test]
    fn test_current_user() {
        let parsed = CurrentUser::parse(&current_user(0x1234)).unwrap();
        assert_eq!(parsed.offset_to_current_edit, 0x1234);
        assert_eq!(parsed.header_token, 0xE391_C05F);
    }

    #[test]
    fn test_current_user_sentinel_rejected() {
        let mut raw = current_user(0);
        raw[12..16].copy_from_slice(&INVALID_CURRENT_USER_TOKEN.to_le_bytes());
        assert!(matches!(CurrentUser::parse(&raw), Err(Error::InvalidFormat(_))));
    }

    #[test]
    fn test_current_user_too_short() {
        assert!(matches!(
            CurrentUser::parse(&[0u8; 18]),
            Err(Error::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_chain_resolves_oldest_first() {
        // Three edits: A (newest) → B → C (first save)
        let mut stream = vec![0u8; 4];
        let c = stream.len() as u32;
        stream.extend(user_edit(0, 0x300, 1));
        let b = stream.len() as u32;
        stream.extend(user_edit(c, 0x200, 1));
        let a = stream.len() as u32;
        stream.extend(user_edit(b, 0x100, 7));

        let chain = edit_chain(&stream, a).unwrap();
        assert_eq!(
            chain.iter().map(|atom| atom.offset).collect::<Vec<_>>(),
            vec![a, b, c]
        );
        assert_eq!(chain[0].doc_persist_id_ref, 7);
        assert_eq!(persist_directory_offsets(&chain), vec![0x300, 0x200, 0x100]);
    }

    #[test]
    fn test_chain_cycle_stops() {
        let mut stream = vec![0u8; 4];
        let a = stream.len() as u32;
        let b = a + user_edit(0, 0, 0).len() as u32;
        stream.extend(user_edit(b, 0x10, 1));
        stream.extend(user_edit(a, 0x20, 1));

        let chain = edit_chain(&stream, a).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(persist_directory_offsets(&chain), vec![0x20, 0x10]);

        // An atom naming itself as its predecessor
        let mut looped = vec![0u8; 4];
        looped.extend(user_edit(4, 0x30, 1));
        assert_eq!(edit_chain(&looped, 4).unwrap().len(), 1);
    }

    #[test]
    fn test_chain_dangling_link_stops() {
        let stream = user_edit(0x4000, 0x10, 1);
        let chain = edit_chain(&stream, 0).unwrap();
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_chain_requires_current_edit() {
        let stream = persist_directory(&[]);
        assert!(matches!(
            edit_chain(&stream, 0),
            Err(Error::UnexpectedRecord {
                expected: RT_USER_EDIT_ATOM,
                offset: 0
            })
        ));
    }

    #[test]
    fn test_later_fragments_win() {
        let mut stream = persist_directory(&[(1, &[0x10, 0x20][..])]);
        let second = stream.len() as u32;
        stream.extend(persist_directory(&[(2, &[0x99][..]), (5, &[0x50][..])]));

        let directory = PersistDirectory::load(&stream, &[0, second]).unwrap();
        assert_eq!(directory.len(), 3);
        assert_eq!(directory.get(1), Some(0x10));
        assert_eq!(directory.get(2), Some(0x99));
        assert_eq!(directory.get(5), Some(0x50));
        assert!(matches!(
            directory.resolve(3),
            Err(Error::MissingPersistEntry(3))
        ));
    }

    #[test]
    fn test_fragment_packing() {
        let mut directory = PersistDirectory::new();
        let mut body = Vec::new();
        body.extend_from_slice(&(0x000F_FFFEu32 | (2 << 20)).to_le_bytes());
        body.extend_from_slice(&7u32.to_le_bytes());
        body.extend_from_slice(&8u32.to_le_bytes());
        directory.apply_fragment(&body).unwrap();
        assert_eq!(directory.get(0xF_FFFE), Some(7));
        assert_eq!(directory.get(0xF_FFFF), Some(8));
    }

    #[test]
    fn test_fragment_truncated() {
        let mut directory = PersistDirectory::new();
        let mut body = Vec::new();
        body.extend_from_slice(&(1u32 | (3 << 20)).to_le_bytes());
        body.extend_from_slice(&7u32.to_le_bytes());
        assert!(matches!(
            directory.apply_fragment(&body),
            Err(Error::TruncatedData { .. })
        ));
    }

    #[test]
    fn test_fragment_at_wrong_record() {
        let stream = user_edit(0, 0, 0);
        assert!(matches!(
            PersistDirectory::load(&stream, &[0]),
            Err(Error::UnexpectedRecord { .. })
        ));
    }
}
