//! The per-send outcome report.

use leadmail_smtp::Error;

/// Outcome of one send.
///
/// `error_code` is one of the stable strings from
/// [`leadmail_smtp::Error::code`] and is empty exactly when `success` is
/// true. Callers branch on the code; the diagnostic is for humans and
/// logs only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Whether the message was accepted by the relay.
    pub success: bool,
    /// Stable error code, empty on success.
    pub error_code: String,
    /// Human-readable failure detail, empty on success.
    pub diagnostic: String,
}

impl Delivery {
    pub(crate) fn delivered() -> Self {
        Self {
            success: true,
            error_code: String::new(),
            diagnostic: String::new(),
        }
    }

    pub(crate) fn failed(error: &Error) -> Self {
        Self {
            success: false,
            error_code: error.code().to_string(),
            diagnostic: error.to_string(),
        }
    }
}
