//! Error types for SMTP submission.
//!
//! The taxonomy is deliberately flat: every failure point in a send maps
//! to exactly one variant, and every variant carries a stable code string
//! callers can branch on without parsing free-text diagnostics.

/// Result type alias for SMTP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// SMTP submission errors.
///
/// One variant per failure point. An I/O failure (EOF, malformed stream,
/// timeout expiry) while waiting for a step's reply is reported under that
/// step's variant, with the underlying cause in the diagnostic text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No relay host configured.
    #[error("no SMTP host configured")]
    NoHost,

    /// TCP connect failed.
    #[error("connect failed: {0}")]
    Connect(String),

    /// Server banner was not 220.
    #[error("unexpected server greeting: {0}")]
    BadGreeting(String),

    /// Both EHLO and the HELO fallback were rejected.
    #[error("EHLO and HELO rejected: {0}")]
    Helo(String),

    /// STARTTLS command was not answered with 220.
    #[error("STARTTLS rejected: {0}")]
    StartTls(String),

    /// TLS handshake failed after STARTTLS was accepted.
    #[error("TLS negotiation failed: {0}")]
    TlsNegotiation(String),

    /// EHLO after the TLS upgrade was rejected.
    #[error("EHLO after STARTTLS rejected: {0}")]
    EhloAfterTls(String),

    /// MAIL FROM was rejected.
    #[error("MAIL FROM rejected: {0}")]
    MailFrom(String),

    /// RCPT TO was rejected.
    #[error("RCPT TO rejected: {0}")]
    RcptTo(String),

    /// DATA command was rejected.
    #[error("DATA rejected: {0}")]
    Data(String),

    /// Message content was rejected after the terminating dot.
    #[error("message rejected: {0}")]
    MessageRejected(String),
}

impl Error {
    /// Returns the stable, machine-checkable code for this error.
    ///
    /// These strings are part of the public contract; callers branch on
    /// them rather than on the diagnostic text.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoHost => "smtp_no_host",
            Self::Connect(_) => "smtp_connect_failed",
            Self::BadGreeting(_) => "smtp_bad_greeting",
            Self::Helo(_) => "smtp_helo_failed",
            Self::StartTls(_) => "smtp_starttls_failed",
            Self::TlsNegotiation(_) => "smtp_tls_negotiation_failed",
            Self::EhloAfterTls(_) => "smtp_ehlo_after_tls_failed",
            Self::MailFrom(_) => "smtp_mail_from_failed",
            Self::RcptTo(_) => "smtp_rcpt_to_failed",
            Self::Data(_) => "smtp_data_failed",
            Self::MessageRejected(_) => "smtp_message_rejected",
        }
    }
}
