//! # leadmail-smtp
//!
//! A minimal SMTP message-submission client (RFC 5321) built for one job:
//! delivering a single, fully-composed message through an authenticated
//! relay, with an optional STARTTLS upgrade mid-connection.
//!
//! ## Features
//!
//! - **Linear state machine**: greeting → EHLO (HELO fallback) →
//!   optional STARTTLS + EHLO → MAIL FROM → RCPT TO → DATA → QUIT
//! - **STARTTLS**: in-place TLS upgrade validated against the Mozilla
//!   root store; self-signed certificates are rejected, no override
//! - **Structured replies**: multi-line replies are parsed into a
//!   [`Reply`] by the RFC 5321 continuation grammar, never re-scanned
//! - **Flat error taxonomy**: every failure maps to one stable code
//!   (see [`Error::code`]) plus a human-readable diagnostic
//! - **One timeout**: a single whole-connection budget covers connect,
//!   the TLS handshake, and every read and write
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::time::Duration;
//! use leadmail_smtp::{Address, Client, Config, Encryption};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new("relay.example.com", 587)
//!         .encryption(Encryption::Tls)
//!         .timeout(Duration::from_secs(30))
//!         .helo_domain("www.example.com");
//!
//!     let from = Address::new("forms@example.com")?;
//!     let to = Address::new("sales@example.com")?;
//!
//!     let mut client = Client::open(&config).await?;
//!     client
//!         .send_mail(&from, &to, b"Subject: Hello\r\n\r\nA new lead arrived.\r\n")
//!         .await?;
//!     client.quit().await;
//!     Ok(())
//! }
//! ```
//!
//! Out of scope by design: AUTH, connection reuse, pipelining, retries,
//! and cancellation of an in-flight send. Each call owns its socket and
//! the socket never outlives the call.
//!
//! ## Modules
//!
//! - [`command`]: SMTP command builders
//! - [`connection`]: configuration, stream handling and the client
//! - [`parser`]: reply parser
//! - [`types`]: core SMTP types (addresses, replies)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod command;
pub mod connection;
mod error;
pub mod parser;
pub mod types;

pub use connection::{Client, Config, Encryption};
pub use error::{Error, Result};
pub use types::{Address, InvalidAddress, Mailbox, Reply, ReplyCode};

/// SMTP protocol version supported.
pub const SMTP_VERSION: &str = "SMTP/ESMTP (RFC 5321)";
