//! # leadmail
//!
//! Email delivery for lead-capture form handlers.
//!
//! The form handlers (contact, booking, newsletter) validate their fields,
//! build a [`Message`], and call [`send`] with the site's relay [`Config`].
//! They get back a [`Delivery`] report: `success`, a stable machine-checkable
//! `error_code` (empty on success), and a human-readable diagnostic. No
//! exceptions cross this boundary and nothing is retried or queued; whether
//! to retry, fall back, or record the lead as undelivered is the caller's
//! decision.
//!
//! Each call is independent and all-or-nothing: it opens its own
//! connection, drives one SMTP transaction, and closes the connection on
//! every exit path. Sending an admin notification and a visitor auto-reply
//! from the same request is just two calls, sequential or concurrent.
//!
//! ## Quick Start
//!
//! ```ignore
//! use leadmail::{Config, Encryption, Message, send};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::new("relay.example.com", 587)
//!         .encryption(Encryption::Tls)
//!         .helo_domain("www.example.com");
//!
//!     let message = Message::new(
//!         "forms@example.com",
//!         "sales@example.com",
//!         "New contact request",
//!         "Name: Jordan\nPhone: +1 555 0100",
//!     )
//!     .from_name("Website forms")
//!     .reply_to("jordan@customer.example");
//!
//!     let delivery = send(&config, &message).await;
//!     if !delivery.success {
//!         eprintln!("{}: {}", delivery.error_code, delivery.diagnostic);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod delivery;
mod message;

pub use delivery::Delivery;
pub use message::Message;

pub use leadmail_smtp::{Client, Config, Encryption, Error, Result};

use leadmail_smtp::Address;

/// Delivers one message through the configured relay.
///
/// Never panics and never returns an error type; every outcome, including
/// configuration problems, lands in the [`Delivery`] report.
pub async fn send(config: &Config, message: &Message) -> Delivery {
    match try_send(config, message).await {
        Ok(()) => Delivery::delivered(),
        Err(e) => {
            tracing::warn!(code = e.code(), error = %e, "delivery failed");
            Delivery::failed(&e)
        }
    }
}

/// [`send`], but with the raw [`Result`] for callers that prefer `?`.
///
/// # Errors
///
/// Returns the error of whichever step failed; see [`Error::code`] for the
/// stable code strings.
pub async fn try_send(config: &Config, message: &Message) -> Result<()> {
    if config.host.is_empty() {
        return Err(Error::NoHost);
    }

    let from = Address::new(message.from_email.clone()).map_err(|e| Error::MailFrom(e.to_string()))?;
    let to = Address::new(message.to_email.clone()).map_err(|e| Error::RcptTo(e.to_string()))?;
    let payload = message.to_wire(&config.helo_domain);

    let mut client = Client::open(config).await?;
    client.send_mail(&from, &to, payload.as_bytes()).await?;
    client.quit().await;

    Ok(())
}
