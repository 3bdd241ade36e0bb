//! Body transformation for the SMTP DATA block.
//!
//! Two passes, in order: line endings are normalized to CRLF (bare `\n`,
//! `\r\n`, and bare `\r` are all accepted as input), then any line that
//! begins with a literal `.` gets a second `.` prepended so it can never
//! be mistaken for the end-of-data marker.

/// Normalizes all line endings to CRLF.
#[must_use]
pub fn normalize_crlf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push_str("\r\n");
            }
            '\n' => out.push_str("\r\n"),
            other => out.push(other),
        }
    }

    out
}

/// Dot-stuffs a CRLF-normalized body: every line starting with `.` is
/// prefixed with another `.` (RFC 5321 §4.5.2 transparency).
#[must_use]
pub fn dot_stuff(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_line_start = true;

    for ch in text.chars() {
        if at_line_start && ch == '.' {
            out.push('.');
        }
        out.push(ch);
        at_line_start = ch == '\n';
    }

    out
}

/// Prepares a body for the wire: normalization, dot-stuffing, and a
/// guaranteed trailing CRLF so the terminating `.` lands on its own line.
#[must_use]
pub fn for_transmission(text: &str) -> String {
    let mut wire = dot_stuff(&normalize_crlf(text));
    if !wire.ends_with("\r\n") {
        wire.push_str("\r\n");
    }
    wire
}
