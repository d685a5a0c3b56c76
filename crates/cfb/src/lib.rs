//! Read-only engine for the Compound Binary File (OLE/CFB) container used
//! by legacy Office documents.
//!
//! [`Container::parse`] reconstructs the FAT and MiniFAT sector chains and
//! the directory from an in-memory buffer; streams are then materialized by
//! name or entry id.

pub mod consts;
pub mod container;
pub mod directory;
pub mod header;
pub mod sector;

pub use container::Container;
pub use directory::{DirEntry, EntryType};
pub use header::Header;
pub use sector::{ByteOrder, SectorReader};
