//! Core SMTP types.

mod address;
mod reply;

pub use address::{Address, InvalidAddress, Mailbox};
pub use reply::{Reply, ReplyCode};
