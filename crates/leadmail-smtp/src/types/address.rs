//! Envelope address types.
//!
//! The submission client trusts the caller's field validation; the checks
//! here are structural only, enough to keep an obviously broken string out
//! of a `MAIL FROM`/`RCPT TO` command.

/// Structurally invalid email address.
#[derive(Debug, thiserror::Error)]
#[error("invalid email address: {0}")]
pub struct InvalidAddress(pub String);

/// Email address for the SMTP envelope.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Address(String);

impl Address {
    /// Creates a new address from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is structurally invalid.
    pub fn new(addr: impl Into<String>) -> Result<Self, InvalidAddress> {
        let addr = addr.into();
        Self::validate(&addr)?;
        Ok(Self(addr))
    }

    /// Returns the address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(addr: &str) -> Result<(), InvalidAddress> {
        if addr.is_empty() {
            return Err(InvalidAddress("address cannot be empty".into()));
        }

        let Some((local, domain)) = addr.split_once('@') else {
            return Err(InvalidAddress(format!("missing @ in {addr:?}")));
        };

        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(InvalidAddress(format!("malformed address {addr:?}")));
        }

        Ok(())
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Mailbox (optional display name + address), as rendered in `From`/`To`
/// headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    /// Display name (optional).
    pub name: Option<String>,
    /// Email address.
    pub address: Address,
}

impl Mailbox {
    /// Creates a new mailbox with just an address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is structurally invalid.
    pub fn new(address: impl Into<String>) -> Result<Self, InvalidAddress> {
        Ok(Self {
            name: None,
            address: Address::new(address)?,
        })
    }

    /// Creates a new mailbox with a display name and address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is structurally invalid.
    pub fn with_name(name: impl Into<String>, address: impl Into<String>) -> Result<Self, InvalidAddress> {
        Ok(Self {
            name: Some(name.into()),
            address: Address::new(address)?,
        })
    }
}

impl std::fmt::Display for Mailbox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name} <{}>", self.address),
            None => write!(f, "{}", self.address),
        }
    }
}
