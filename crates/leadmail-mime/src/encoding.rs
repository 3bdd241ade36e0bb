//! RFC 2047 encoded-word support.
//!
//! Header fields are restricted to ASCII on the wire; anything else is
//! wrapped in a `=?charset?encoding?data?=` encoded word. Only the B
//! (Base64) encoding is produced; both B and Q are accepted on decode.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{Error, Result};

/// Encodes data as Base64.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Returns true if the value contains any byte outside the printable
/// ASCII range (0x20–0x7E) and therefore needs an encoded word.
#[must_use]
pub fn needs_encoded_word(value: &str) -> bool {
    value.bytes().any(|b| !(0x20..=0x7E).contains(&b))
}

/// Encodes a header value as an RFC 2047 encoded word when needed.
///
/// Pure printable-ASCII values pass through unmodified; anything else
/// becomes `=?UTF-8?B?<base64 of the UTF-8 bytes>?=`. The conditionality
/// matters: encoding unconditionally breaks servers and clients that
/// expect plain ASCII subjects to stay readable on the wire.
#[must_use]
pub fn encode_header_value(value: &str) -> String {
    if needs_encoded_word(value) {
        format!("=?UTF-8?B?{}?=", encode_base64(value.as_bytes()))
    } else {
        value.to_string()
    }
}

/// Decodes an RFC 2047 encoded word back to text. Values that are not
/// encoded words are returned unchanged.
///
/// # Errors
///
/// Returns an error if the encoded word is structurally invalid or its
/// payload is not valid Base64/UTF-8.
pub fn decode_header_value(value: &str) -> Result<String> {
    let Some(inner) = value
        .strip_prefix("=?")
        .and_then(|rest| rest.strip_suffix("?="))
    else {
        return Ok(value.to_string());
    };

    let parts: Vec<&str> = inner.splitn(3, '?').collect();
    let (encoding, payload) = match parts[..] {
        [_charset, encoding, payload] => (encoding, payload),
        _ => {
            return Err(Error::InvalidEncoding(
                "malformed encoded word".to_string(),
            ));
        }
    };

    match encoding.to_uppercase().as_str() {
        "B" => {
            let decoded = decode_base64(payload)?;
            String::from_utf8(decoded).map_err(Into::into)
        }
        "Q" => decode_q_encoding(payload),
        other => Err(Error::InvalidEncoding(format!(
            "unknown encoding: {other}"
        ))),
    }
}

/// Q encoding: quoted-printable with `_` standing in for space.
fn decode_q_encoding(payload: &str) -> Result<String> {
    let mut bytes = Vec::with_capacity(payload.len());
    let mut chars = payload.chars();

    while let Some(ch) = chars.next() {
        match ch {
            '_' => bytes.push(b' '),
            '=' => {
                let hex: String = chars.by_ref().take(2).collect();
                if hex.len() != 2 {
                    return Err(Error::InvalidEncoding(
                        "incomplete escape sequence".to_string(),
                    ));
                }
                let byte = u8::from_str_radix(&hex, 16)
                    .map_err(|e| Error::InvalidEncoding(format!("invalid hex: {e}")))?;
                bytes.push(byte);
            }
            _ => bytes.push(ch as u8),
        }
    }

    String::from_utf8(bytes).map_err(Into::into)
}
