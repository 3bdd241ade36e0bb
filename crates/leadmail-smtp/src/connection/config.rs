//! Relay configuration.

use std::time::Duration;

/// Transport encryption mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encryption {
    /// Upgrade the connection with STARTTLS before the mail transaction.
    Tls,
    /// Plaintext for the whole session.
    #[default]
    None,
}

/// Relay configuration for a single send.
///
/// Immutable for the duration of one send; the caller builds it from site
/// configuration and may reuse it across calls, but no connection state is
/// ever attached to it.
#[derive(Debug, Clone)]
pub struct Config {
    /// Relay hostname.
    pub host: String,
    /// Relay port (typically 587 for submission).
    pub port: u16,
    /// Whether to upgrade the session with STARTTLS.
    pub encryption: Encryption,
    /// Whole-connection timeout budget, covering connect, the TLS
    /// handshake, and every read and write. There is no per-step deadline.
    pub timeout: Duration,
    /// Domain announced in EHLO/HELO and used in Message-ID generation.
    pub helo_domain: String,
}

impl Config {
    /// Default whole-connection timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Creates a configuration for the given relay.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            encryption: Encryption::default(),
            timeout: Self::DEFAULT_TIMEOUT,
            helo_domain: "localhost".to_string(),
        }
    }

    /// Sets the encryption mode.
    #[must_use]
    pub const fn encryption(mut self, encryption: Encryption) -> Self {
        self.encryption = encryption;
        self
    }

    /// Sets the whole-connection timeout budget.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the EHLO/HELO domain.
    #[must_use]
    pub fn helo_domain(mut self, domain: impl Into<String>) -> Self {
        self.helo_domain = domain.into();
        self
    }
}
