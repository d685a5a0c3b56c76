//! Word field stripping.
//!
//! A field is `\x13 code [\x14 result] \x15` and fields nest. The code part
//! never reaches the output. The result part is kept, except for fields
//! whose code names an embedded picture or HTML form control, which vanish
//! entirely along with fields that have no result at all.

use oletext_core::text::{FIELD_BEGIN, FIELD_END, FIELD_SEPARATOR};

/// Field instructions whose result is never text.
const HIDDEN_FIELDS: &[&str] = &["INCLUDEPICTURE", "HTMLCONTROL"];

#[derive(Debug, Default)]
struct OpenField {
    code: String,
    in_result: bool,
    hidden: bool,
}

impl OpenField {
    fn shows_result(&self) -> bool {
        self.in_result && !self.hidden
    }
}

fn is_hidden(code: &str) -> bool {
    code.split_whitespace()
        .next()
        .map(|instr| {
            HIDDEN_FIELDS
                .iter()
                .any(|hidden| instr.eq_ignore_ascii_case(hidden))
        })
        .unwrap_or(false)
}

/// Remove field codes and markers, keeping visible field results.
///
/// A field still open at the end of the text is not a field after all: its
/// characters are kept and only the markers are dropped.
pub fn strip_fields(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut stack: Vec<OpenField> = Vec::new();
    // Raw characters since the outermost open field began, and where the
    // output stood at that moment.
    let mut pending = String::new();
    let mut mark = 0;

    for c in text.chars() {
        match c {
            FIELD_BEGIN => {
                if stack.is_empty() {
                    mark = out.len();
                    pending.clear();
                }
                stack.push(OpenField::default());
            }
            FIELD_SEPARATOR => {
                if let Some(field) = stack.last_mut() {
                    if !field.in_result {
                        field.in_result = true;
                        field.hidden = is_hidden(&field.code);
                    }
                }
            }
            FIELD_END => {
                stack.pop();
            }
            c if stack.is_empty() => out.push(c),
            c => {
                pending.push(c);
                if let Some(field) = stack.last_mut() {
                    if !field.in_result {
                        field.code.push(c);
                    }
                }
                if stack.iter().all(OpenField::shows_result) {
                    out.push(c);
                }
            }
        }
    }

    if !stack.is_empty() {
        log::debug!("Unterminated field, keeping {} chars", pending.chars().count());
        out.truncate(mark);
        out.push_str(&pending);
    }

    out
}
