//! Builders for synthetic PowerPoint streams used across the unit tests.

use crate::record::record_types::*;

pub fn record(ver_instance: u16, rec_type: u16, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 8);
    out.extend_from_slice(&ver_instance.to_le_bytes());
    out.extend_from_slice(&rec_type.to_le_bytes());
    out.extend_from_slice(&(body.len() as u32).to_le_bytes());
    out.extend_from_slice(body);
    out
}

pub fn atom(rec_type: u16, body: &[u8]) -> Vec<u8> {
    record(0x0000, rec_type, body)
}

pub fn container(rec_type: u16, children: &[Vec<u8>]) -> Vec<u8> {
    record(0x000F, rec_type, &children.concat())
}

pub fn text_bytes(text: &str) -> Vec<u8> {
    atom(RT_TEXT_BYTES_ATOM, text.as_bytes())
}

pub fn text_chars(text: &str) -> Vec<u8> {
    let raw: Vec<u8> = text.encode_utf16().flat_map(|u| u.to_le_bytes()).collect();
    atom(RT_TEXT_CHARS_ATOM, &raw)
}

pub fn slide_persist(persist_id: u32) -> Vec<u8> {
    let mut body = vec![0u8; 20];
    body[..4].copy_from_slice(&persist_id.to_le_bytes());
    record(0x0000, RT_SLIDE_PERSIST_ATOM, &body)
}

pub fn user_edit(offset_last_edit: u32, offset_persist_directory: u32, doc_persist_id: u32) -> Vec<u8> {
    let mut body = vec![0u8; 28];
    body[8..12].copy_from_slice(&offset_last_edit.to_le_bytes());
    body[12..16].copy_from_slice(&offset_persist_directory.to_le_bytes());
    body[16..20].copy_from_slice(&doc_persist_id.to_le_bytes());
    atom(RT_USER_EDIT_ATOM, &body)
}

pub fn persist_directory(groups: &[(u32, &[u32])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (first_id, offsets) in groups {
        let packed = first_id | ((offsets.len() as u32) << 20);
        body.extend_from_slice(&packed.to_le_bytes());
        for offset in offsets.iter() {
            body.extend_from_slice(&offset.to_le_bytes());
        }
    }
    atom(RT_PERSIST_DIRECTORY_ATOM, &body)
}

pub fn current_user(offset_to_current_edit: u32) -> Vec<u8> {
    let mut out = vec![0u8; 40];
    out[12..16].copy_from_slice(&0xE391_C05Fu32.to_le_bytes());
    out[16..20].copy_from_slice(&offset_to_current_edit.to_le_bytes());
    out
}

/// A slide whose drawing holds `texts` as TextBytesAtoms, surrounded by
/// binary shape data.
pub fn slide(texts: &[&str]) -> Vec<u8> {
    let mut drawing = vec![0x0F, 0xA8, 0x0F, 0x33, 0x00, 0xA0, 0x0F, 0x01];
    for text in texts {
        drawing.extend(atom(RT_TEXT_HEADER_ATOM, &1u32.to_le_bytes()));
        drawing.extend(text_bytes(text));
        drawing.extend_from_slice(&[0x12, 0x34]);
    }
    container(
        RT_SLIDE,
        &[
            atom(RT_SLIDE_ATOM, &[0u8; 24]),
            container(RT_DRAWING, &[drawing]),
        ],
    )
}

/// A DocumentContainer with a master list and the given slide list body.
pub fn document(slide_list: &[Vec<u8>]) -> Vec<u8> {
    container(
        RT_DOCUMENT,
        &[
            atom(RT_DOCUMENT_ATOM, &[0u8; 40]),
            container(RT_DOCUMENT_TEXT_INFO, &[]),
            container(RT_DRAWING_GROUP, &[vec![0u8; 16]]),
            record(0x001F, RT_SLIDE_LIST_WITH_TEXT, &slide_persist(0x7F)),
            record(0x000F, RT_SLIDE_LIST_WITH_TEXT, &slide_list.concat()),
        ],
    )
}

/// Lay out a complete `PowerPoint Document` stream: the slides (persist
/// ids 2, 3, ...), the document (persist id 1), one persist directory and
/// one UserEditAtom. Returns the `Current User` and document streams.
pub fn presentation(slides: &[Vec<u8>], slide_list: &[Vec<u8>]) -> (Vec<u8>, Vec<u8>) {
    let mut stream = Vec::new();
    let mut offsets = Vec::new();
    for slide in slides {
        offsets.push(stream.len() as u32);
        stream.extend_from_slice(slide);
    }

    let doc_offset = stream.len() as u32;
    stream.extend(document(slide_list));

    let persist_offset = stream.len() as u32;
    stream.extend(persist_directory(&[(1, &[doc_offset][..]), (2, &offsets[..])]));

    let edit_offset = stream.len() as u32;
    stream.extend(user_edit(0, persist_offset, 1));

    (current_user(edit_offset), stream)
}
