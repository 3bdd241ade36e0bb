//! SMTP reply parser.
//!
//! Models the RFC 5321 multi-line reply grammar directly: every line of a
//! reply starts with the same three-digit code, followed by `-` on
//! continuation lines and a space (or nothing) on the final line.

use std::io;

use crate::types::{Reply, ReplyCode};

/// Checks whether a line terminates a reply.
///
/// A line whose fourth character is anything other than `-` (usually a
/// space) is final; `250-STARTTLS` is a continuation, `250 OK` is not.
#[must_use]
pub fn is_final_line(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() >= 3
        && bytes[..3].iter().all(u8::is_ascii_digit)
        && bytes.get(3) != Some(&b'-')
}

/// Parses a complete SMTP reply from its accumulated lines.
///
/// Every line must carry the three-digit code and, when longer, a ` ` or
/// `-` separator; anything else (including a continuation line that does
/// not repeat the code) is a malformed stream.
///
/// # Errors
///
/// Returns [`io::ErrorKind::InvalidData`] if the reply is empty or any
/// line violates the grammar. The driver maps such failures to the error
/// code of the step that was awaiting the reply.
pub fn parse_reply(lines: &[String]) -> io::Result<Reply> {
    let Some(first) = lines.first() else {
        return Err(io::Error::new(io::ErrorKind::InvalidData, "empty reply"));
    };

    let code = first
        .get(0..3)
        .and_then(|digits| digits.parse::<u16>().ok())
        .ok_or_else(|| malformed(first))?;

    let mut text = Vec::with_capacity(lines.len());
    for line in lines {
        let bytes = line.as_bytes();
        if bytes.len() < 3
            || !bytes[..3].iter().all(u8::is_ascii_digit)
            || !matches!(bytes.get(3), None | Some(&b' ') | Some(&b'-'))
        {
            return Err(malformed(line));
        }
        // The separator byte is ASCII, so index 4 is a char boundary.
        text.push(line.get(4..).unwrap_or_default().to_string());
    }

    Ok(Reply::new(ReplyCode::new(code), text))
}

fn malformed(line: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("malformed reply line: {line:?}"),
    )
}
