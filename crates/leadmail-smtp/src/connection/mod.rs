//! SMTP connection management.

mod client;
mod config;
mod stream;

pub use client::Client;
pub use config::{Config, Encryption};
pub use stream::{SmtpStream, connect};
