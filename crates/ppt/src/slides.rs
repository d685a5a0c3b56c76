//! From the DocumentContainer down to slide text.

use crate::persist::PersistDirectory;
use crate::record::record_types::*;
use crate::record::{optional_record, record_at, Record, HEADER_SIZE};
use oletext_cfb::SectorReader;
use oletext_core::text::{decode_cp1252, decode_utf16le, map_control_chars};
use oletext_core::Result;

/// Bytes to skip for the DocumentAtom at the start of the DocumentContainer:
/// an 8-byte record header plus a 40-byte body.
const DOCUMENT_ATOM_SIZE: usize = 48;

/// Bytes to skip for the SlideAtom at the start of a SlideContainer: an
/// 8-byte record header plus a 24-byte body.
const SLIDE_ATOM_SIZE: usize = 32;

/// The master list is a SlideListWithText with this instance.
const MASTER_LIST_INSTANCE: u16 = 1;

/// Records that may sit between the DocumentAtom and the slide list, in
/// file order, with the instance a record must carry to be skipped.
const DOCUMENT_PREAMBLE: &[(u16, Option<u16>)] = &[
    (RT_EXTERNAL_OBJECT_LIST, None),
    (RT_DOCUMENT_TEXT_INFO, None),
    (RT_SOUND_COLLECTION, None),
    (RT_DRAWING_GROUP, None),
    (RT_SLIDE_LIST_WITH_TEXT, Some(MASTER_LIST_INSTANCE)),
    (RT_DOC_INFO_LIST, None),
    (RT_HEADERS_FOOTERS, None),
    (RT_HEADERS_FOOTERS, None),
];

/// Records that may sit between the SlideAtom and the Drawing.
const SLIDE_PREAMBLE: &[u16] = &[
    RT_SLIDE_SHOW_SLIDE_INFO_ATOM,
    RT_HEADERS_FOOTERS,
    RT_ROUND_TRIP_SLIDE,
];

/// Locate the slide list inside a DocumentContainer.
pub fn find_slide_list<'a>(document: &Record<'a>) -> Result<Option<Record<'a>>> {
    let body = document.body;
    let mut offset = DOCUMENT_ATOM_SIZE;
    for &(rec_type, instance) in DOCUMENT_PREAMBLE {
        if let Some(record) = optional_record(body, offset, rec_type)? {
            if instance.map_or(true, |i| record.header.instance == i) {
                offset = record.end();
            }
        }
    }
    optional_record(body, offset, RT_SLIDE_LIST_WITH_TEXT)
}

/// Locate the Drawing inside a SlideContainer.
pub fn find_drawing<'a>(slide: &Record<'a>) -> Result<Option<Record<'a>>> {
    let body = slide.body;
    let mut offset = SLIDE_ATOM_SIZE;
    for &rec_type in SLIDE_PREAMBLE {
        if let Some(record) = optional_record(body, offset, rec_type)? {
            offset = record.end();
        }
    }
    optional_record(body, offset, RT_DRAWING)
}

/// Text of a TextCharsAtom or TextBytesAtom; `None` for other records.
pub fn decode_text_atom(record: &Record<'_>) -> Option<String> {
    let raw = match record.rec_type() {
        RT_TEXT_CHARS_ATOM => decode_utf16le(record.body),
        RT_TEXT_BYTES_ATOM => decode_cp1252(record.body),
        _ => return None,
    };
    Some(map_control_chars(&raw))
}

/// Find text atoms in raw drawing bytes.
///
/// Drawing data is OfficeArt, not PowerPoint records, so text atoms are
/// found by their type bytes (`A0 0F` or `A8 0F`) preceded by a zero
/// version/instance word. A candidate whose length runs past the drawing
/// is binary data that happens to match and is skipped.
pub fn scan_drawing(drawing: &[u8]) -> Vec<String> {
    let mut fragments = Vec::new();
    let mut resume = 0;

    for pos in memchr::memchr_iter(0x0F, drawing) {
        if pos < 3 || pos - 3 < resume {
            continue;
        }
        let header_at = pos - 3;
        if !matches!(drawing[pos - 1], 0xA0 | 0xA8) || drawing[header_at..pos - 1] != [0, 0] {
            continue;
        }

        match record_at(drawing, header_at) {
            Ok(record) => {
                fragments.extend(decode_text_atom(&record));
                resume = record.end();
            }
            Err(_) => log::debug!("Text atom signature at {} overruns the drawing", header_at),
        }
    }

    fragments
}

/// Text of the slide stored at `offset`, in drawing order.
pub fn slide_text(stream: &[u8], offset: usize) -> Result<Vec<String>> {
    let Some(slide) = optional_record(stream, offset, RT_SLIDE)? else {
        log::warn!("No slide container at offset {}", offset);
        return Ok(Vec::new());
    };
    Ok(find_drawing(&slide)?
        .map(|drawing| scan_drawing(drawing.body))
        .unwrap_or_default())
}

/// Walk the slide list, following slide references through the persist
/// directory and picking up text atoms stored in the list itself.
pub fn collect_text(
    stream: &[u8],
    directory: &PersistDirectory,
    slide_list: &Record<'_>,
) -> Result<Vec<String>> {
    let body = slide_list.body;
    let mut fragments = Vec::new();
    let mut offset = 0;

    while offset + HEADER_SIZE <= body.len() {
        let record = record_at(body, offset)?;
        match record.rec_type() {
            RT_SLIDE_PERSIST_ATOM => {
                let persist_id = SectorReader::le(record.body).u32(0)?;
                let slide_offset = directory.resolve(persist_id)?;
                fragments.extend(slide_text(stream, slide_offset as usize)?);
            }
            RT_TEXT_CHARS_ATOM | RT_TEXT_BYTES_ATOM => {
                fragments.extend(decode_text_atom(&record));
            }
            _ => {}
        }
        offset = record.end();
    }

    Ok(fragments)
}
