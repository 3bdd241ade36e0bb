//! # leadmail-mime
//!
//! Wire preparation for plain-text email submission.
//!
//! ## Features
//!
//! - **RFC 2047 encoded words**: non-ASCII header values (Arabic subjects
//!   included) become `=?UTF-8?B?...?=`; pure-ASCII values pass through
//!   byte-for-byte
//! - **Body transformation**: line endings normalized to CRLF and leading
//!   dots stuffed per the SMTP transparency rules, so a body line that is
//!   literally `.` can never terminate the DATA block early
//! - **Message-ID generation**: a random 128-bit value, hex-encoded and
//!   combined with the sending domain
//!
//! ## Quick Start
//!
//! ```ignore
//! use leadmail_mime::{body, encoding, message_id};
//!
//! let subject = encoding::encode_header_value("مرحبا");
//! assert!(subject.starts_with("=?UTF-8?B?"));
//!
//! let wire = body::for_transmission("line one\n.\nline three");
//! assert!(wire.contains("\r\n..\r\n"));
//!
//! let id = message_id::generate("www.example.com");
//! assert!(id.ends_with("@www.example.com>"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod body;
pub mod encoding;
mod error;
pub mod message_id;

pub use error::{Error, Result};
