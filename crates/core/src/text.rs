//! Character decoding shared by the Word and PowerPoint extractors.
//!
//! Both formats store text either as single-byte Windows-1252 runs or as
//! UTF-16LE runs, and both sprinkle C0 control characters through the text
//! as paragraph, cell and break markers.

use encoding_rs::{UTF_16LE, WINDOWS_1252};

/// Word field begin marker.
pub const FIELD_BEGIN: char = '\u{13}';
/// Word field separator (code / result boundary).
pub const FIELD_SEPARATOR: char = '\u{14}';
/// Word field end marker.
pub const FIELD_END: char = '\u{15}';

/// Decode UTF-16LE bytes. A trailing odd byte is ignored.
pub fn decode_utf16le(bytes: &[u8]) -> String {
    let even = &bytes[..bytes.len() & !1];
    UTF_16LE.decode_without_bom_handling(even).0.into_owned()
}

/// Decode single-byte text using the Windows-1252 code page.
pub fn decode_cp1252(bytes: &[u8]) -> String {
    WINDOWS_1252.decode_without_bom_handling(bytes).0.into_owned()
}

/// Map in-text control characters to plain-text equivalents.
///
/// Paragraph marks, cell marks, soft breaks and page breaks become `\n`;
/// tabs and newlines are kept; every other C0 control is dropped.
pub fn map_control_chars(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\r' | '\u{07}' | '\u{0B}' | '\u{0C}' => out.push('\n'),
            '\n' | '\t' => out.push(c),
            c if (c as u32) < 0x20 => {}
            c => out.push(c),
        }
    }
    out
}
