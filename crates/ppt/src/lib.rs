//! Legacy PPT (OLE/CFB) text extraction.
//!
//! Text is recovered from the slides the newest edit references, in slide
//! list order, with fragments separated by single spaces.

pub mod parser;
pub mod persist;
pub mod record;
pub mod slides;

#[cfg(test)]
mod testing;

pub use parser::{PptParser, CURRENT_USER_STREAM, POWERPOINT_DOCUMENT_STREAM};
pub use persist::{CurrentUser, PersistDirectory, UserEditAtom};
pub use record::{Record, RecordHeader};

use oletext_cfb::Container;
use oletext_core::Result;

/// Extract the text of a `.ppt` file held in memory.
pub fn extract_text(buffer: &[u8]) -> Result<String> {
    let container = Container::parse(buffer)?;
    PptParser::new().extract(&container)
}
