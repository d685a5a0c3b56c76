//! PPT file parser implementation.
//!
//! Follows the persist chain the way PowerPoint itself loads a file:
//!
//! `Current User` → UserEditAtom chain → PersistDirectory →
//! DocumentContainer → SlideList → slides → Drawing → text atoms.
//!
//! Only the newest edit's view of the presentation is read, so text from
//! superseded saves left in the stream does not leak into the output.

use crate::persist::{edit_chain, persist_directory_offsets, CurrentUser, PersistDirectory};
use crate::record::expect_record;
use crate::record::record_types::{RT_DOCUMENT, RT_USER_EDIT_ATOM};
use crate::slides::{collect_text, find_slide_list};
use oletext_cfb::Container;
use oletext_core::{Error, Result};

/// Stream pointing at the newest edit.
pub const CURRENT_USER_STREAM: &str = "Current User";

/// Stream holding every PowerPoint record.
pub const POWERPOINT_DOCUMENT_STREAM: &str = "PowerPoint Document";

/// Parser for legacy PPT (OLE/CFB) files.
#[derive(Debug, Default, Clone, Copy)]
pub struct PptParser;

impl PptParser {
    /// Create a new PPT parser.
    pub fn new() -> Self {
        Self
    }

    /// Extract the text of a parsed `.ppt` container.
    pub fn extract(&self, container: &Container<'_>) -> Result<String> {
        let current_user = container.read_stream_by_name(CURRENT_USER_STREAM)?;
        let document = container.read_stream_by_name(POWERPOINT_DOCUMENT_STREAM)?;
        self.extract_from_streams(&current_user, &document)
    }

    /// Extract text given the raw `Current User` and `PowerPoint Document`
    /// streams.
    pub fn extract_from_streams(&self, current_user: &[u8], document: &[u8]) -> Result<String> {
        let current = CurrentUser::parse(current_user)?;
        let chain = edit_chain(document, current.offset_to_current_edit)?;
        let newest = chain.first().ok_or(Error::UnexpectedRecord {
            expected: RT_USER_EDIT_ATOM,
            offset: current.offset_to_current_edit as usize,
        })?;

        let directory = PersistDirectory::load(document, &persist_directory_offsets(&chain))?;
        log::debug!(
            "{} edits, {} persist entries, document is persist id {}",
            chain.len(),
            directory.len(),
            newest.doc_persist_id_ref
        );

        let doc_offset = directory.resolve(newest.doc_persist_id_ref)?;
        let doc = expect_record(document, doc_offset as usize, RT_DOCUMENT)?;

        let Some(slide_list) = find_slide_list(&doc)? else {
            log::warn!("Presentation has no slide list");
            return Ok(String::new());
        };

        let fragments = collect_text(document, &directory, &slide_list)?;
        log::debug!("{} text fragments", fragments.len());

        Ok(fragments
            .iter()
            .filter(|fragment| !fragment.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" "))
    }
}
