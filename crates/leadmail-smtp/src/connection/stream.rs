//! Low-level SMTP stream handling.
//!
//! All operations here return plain [`io::Result`]; the client maps
//! failures to the error code of the protocol step that was in flight.

use std::io;
use std::sync::Arc;

use rustls::pki_types::ServerName;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio_rustls::{
    TlsConnector,
    rustls::{ClientConfig, RootCertStore},
};

use crate::parser::{is_final_line, parse_reply};
use crate::types::Reply;

/// SMTP stream (TCP or TLS).
#[derive(Debug)]
pub enum SmtpStream {
    /// Plain TCP connection.
    Tcp(BufReader<TcpStream>),
    /// TLS-encrypted connection.
    Tls(Box<BufReader<tokio_rustls::client::TlsStream<TcpStream>>>),
}

impl SmtpStream {
    /// Reads one CRLF-terminated line, trailing line ending stripped.
    ///
    /// # Errors
    ///
    /// Returns [`io::ErrorKind::UnexpectedEof`] if the server closed the
    /// connection before a line arrived, or any underlying read error.
    pub async fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        let read = match self {
            Self::Tcp(reader) => reader.read_line(&mut line).await?,
            Self::Tls(reader) => reader.read_line(&mut line).await?,
        };
        if read == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed by server",
            ));
        }
        Ok(line.trim_end().to_string())
    }

    /// Reads lines until the multi-line reply termination rule matches,
    /// then parses the accumulated lines into a [`Reply`].
    ///
    /// # Errors
    ///
    /// Returns an error if the stream fails or the reply is malformed.
    pub async fn read_reply(&mut self) -> io::Result<Reply> {
        let mut lines = Vec::new();
        loop {
            let line = self.read_line().await?;
            if line.is_empty() {
                continue;
            }

            let is_final = is_final_line(&line);
            lines.push(line);

            if is_final {
                break;
            }
        }

        parse_reply(&lines)
    }

    /// Writes data to the stream and flushes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        match self {
            Self::Tcp(reader) => {
                reader.get_mut().write_all(data).await?;
                reader.get_mut().flush().await?;
            }
            Self::Tls(reader) => {
                reader.get_mut().write_all(data).await?;
                reader.get_mut().flush().await?;
            }
        }
        Ok(())
    }

    /// Upgrades the plaintext stream to TLS in place (STARTTLS semantics:
    /// the conversation so far is preserved, encryption starts with the
    /// handshake). The server certificate is validated against the Mozilla
    /// root store; self-signed certificates are rejected with no override.
    ///
    /// # Errors
    ///
    /// Returns an error if the stream is already encrypted, the hostname
    /// is not a valid server name, or the handshake fails.
    pub async fn upgrade_to_tls(self, hostname: &str) -> io::Result<Self> {
        let tcp_stream = match self {
            Self::Tcp(reader) => reader.into_inner(),
            Self::Tls(_) => {
                return Err(io::Error::other("connection is already encrypted"));
            }
        };

        let connector = tls_connector();
        let server_name = ServerName::try_from(hostname.to_string()).map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid server name: {hostname}"),
            )
        })?;

        let tls_stream = connector.connect(server_name, tcp_stream).await?;
        Ok(Self::Tls(Box::new(BufReader::new(tls_stream))))
    }
}

/// Opens a plain TCP connection to the relay.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub async fn connect(hostname: &str, port: u16) -> io::Result<SmtpStream> {
    let addr = format!("{hostname}:{port}");
    let stream = TcpStream::connect(&addr).await?;
    Ok(SmtpStream::Tcp(BufReader::new(stream)))
}

/// Creates a TLS connector backed by the Mozilla root store.
fn tls_connector() -> TlsConnector {
    let root_store = RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    };

    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();

    TlsConnector::from(Arc::new(config))
}
