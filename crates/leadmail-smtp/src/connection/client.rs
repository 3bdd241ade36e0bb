//! The SMTP submission client.
//!
//! One [`Client`] per send. The client owns the stream, so every exit
//! path, success or failure, drops and thereby closes the connection; no
//! socket outlives the call that created it.

use std::future::Future;
use std::io;

use tokio::time::{Instant, timeout_at};

use crate::command::Command;
use crate::connection::{Config, Encryption, SmtpStream, connect};
use crate::error::{Error, Result};
use crate::types::{Address, Reply};

/// SMTP submission client.
///
/// Drives the linear command sequence against a relay:
///
/// ```text
/// greeting → EHLO (HELO fallback) → [STARTTLS → EHLO] → MAIL FROM
///     → RCPT TO → DATA → message → QUIT
/// ```
///
/// [`Client::open`] performs everything up to and including the optional
/// TLS upgrade; [`Client::send_mail`] runs the mail transaction;
/// [`Client::quit`] ends the session best-effort. Any protocol mismatch or
/// I/O failure aborts the sequence with the error code of the step that
/// was in flight.
#[derive(Debug)]
pub struct Client {
    stream: SmtpStream,
    deadline: Instant,
}

impl Client {
    /// Connects to the relay, reads the greeting, announces the client
    /// with EHLO (falling back to HELO), and upgrades to TLS when the
    /// configuration asks for it.
    ///
    /// The whole-connection timeout budget starts here: one deadline is
    /// fixed before the connect and every subsequent operation on this
    /// client is bounded by it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoHost`] without opening a socket if the host is
    /// empty, otherwise the error of whichever handshake step failed.
    pub async fn open(config: &Config) -> Result<Self> {
        if config.host.is_empty() {
            return Err(Error::NoHost);
        }

        let deadline = Instant::now() + config.timeout;
        let stream = bounded(deadline, connect(&config.host, config.port))
            .await
            .map_err(|e| Error::Connect(e.to_string()))?;

        let mut client = Self { stream, deadline };

        let greeting = client
            .read_reply()
            .await
            .map_err(|e| Error::BadGreeting(e.to_string()))?;
        if !greeting.accepted_by(&[220]) {
            return Err(Error::BadGreeting(greeting.to_string()));
        }
        tracing::debug!(%greeting, "connected to relay");

        client.hello(config).await?;

        if config.encryption == Encryption::Tls {
            client = client.start_tls(config).await?;
        }

        Ok(client)
    }

    /// Runs one mail transaction: MAIL FROM, RCPT TO, DATA, the message
    /// payload, and the terminating dot.
    ///
    /// `payload` must be fully composed for the wire: CRLF line endings,
    /// leading dots already stuffed, and a trailing CRLF. The terminating
    /// `.` line is written here.
    ///
    /// # Errors
    ///
    /// Returns the error of whichever transaction step was rejected.
    pub async fn send_mail(&mut self, from: &Address, to: &Address, payload: &[u8]) -> Result<()> {
        let mail_from = Command::MailFrom { from: from.clone() };
        self.exchange(&mail_from, &[250], Error::MailFrom).await?;

        let rcpt_to = Command::RcptTo { to: to.clone() };
        self.exchange(&rcpt_to, &[250, 251], Error::RcptTo).await?;

        self.exchange(&Command::Data, &[354], Error::Data).await?;

        bounded(self.deadline, self.stream.write_all(payload))
            .await
            .map_err(|e| Error::MessageRejected(e.to_string()))?;
        bounded(self.deadline, self.stream.write_all(b".\r\n"))
            .await
            .map_err(|e| Error::MessageRejected(e.to_string()))?;

        let reply = self
            .read_reply()
            .await
            .map_err(|e| Error::MessageRejected(e.to_string()))?;
        if !reply.accepted_by(&[250]) {
            return Err(Error::MessageRejected(reply.to_string()));
        }
        tracing::debug!(%reply, "message accepted");

        Ok(())
    }

    /// Sends QUIT and closes the connection.
    ///
    /// Best-effort: the session is over either way, so a rejected QUIT or
    /// an I/O failure here is logged and swallowed rather than changing
    /// the outcome of an already-accepted send.
    pub async fn quit(mut self) {
        match self.roundtrip(&Command::Quit).await {
            Ok(reply) if reply.accepted_by(&[221, 250]) => {}
            Ok(reply) => tracing::warn!(%reply, "unexpected reply to QUIT"),
            Err(e) => tracing::warn!(error = %e, "QUIT failed"),
        }
    }

    /// EHLO with HELO fallback; both rejected is a single `Helo` error
    /// carrying both replies.
    async fn hello(&mut self, config: &Config) -> Result<()> {
        let ehlo = Command::Ehlo {
            hostname: config.helo_domain.clone(),
        };
        let reply = self
            .roundtrip(&ehlo)
            .await
            .map_err(|e| Error::Helo(e.to_string()))?;
        if reply.accepted_by(&[250]) {
            return Ok(());
        }
        tracing::debug!(%reply, "EHLO rejected, trying HELO");

        let helo = Command::Helo {
            hostname: config.helo_domain.clone(),
        };
        let fallback = self
            .roundtrip(&helo)
            .await
            .map_err(|e| Error::Helo(e.to_string()))?;
        if fallback.accepted_by(&[250]) {
            return Ok(());
        }

        Err(Error::Helo(format!("EHLO: {reply}; HELO: {fallback}")))
    }

    /// STARTTLS, in-place handshake, then a fresh EHLO over the encrypted
    /// stream. Consumes and rebuilds the client so the plaintext stream
    /// can be moved into the handshake.
    async fn start_tls(mut self, config: &Config) -> Result<Self> {
        self.exchange(&Command::StartTls, &[220], Error::StartTls)
            .await?;

        let Self { stream, deadline } = self;
        let stream = bounded(deadline, stream.upgrade_to_tls(&config.host))
            .await
            .map_err(|e| Error::TlsNegotiation(e.to_string()))?;
        tracing::debug!(host = %config.host, "TLS established");

        let mut client = Self { stream, deadline };
        client.ehlo_secure(config).await?;

        Ok(client)
    }

    /// Fresh EHLO after the TLS upgrade. No HELO fallback at this point:
    /// a relay that offered STARTTLS speaks ESMTP.
    async fn ehlo_secure(&mut self, config: &Config) -> Result<()> {
        let ehlo = Command::Ehlo {
            hostname: config.helo_domain.clone(),
        };
        self.exchange(&ehlo, &[250], Error::EhloAfterTls).await?;
        Ok(())
    }

    /// Sends a command and checks the reply against the step's acceptance
    /// set, wrapping both I/O failures and rejections in the step's error.
    async fn exchange(
        &mut self,
        cmd: &Command,
        accept: &[u16],
        fail: fn(String) -> Error,
    ) -> Result<Reply> {
        let reply = self.roundtrip(cmd).await.map_err(|e| fail(e.to_string()))?;
        if reply.accepted_by(accept) {
            Ok(reply)
        } else {
            Err(fail(reply.to_string()))
        }
    }

    async fn roundtrip(&mut self, cmd: &Command) -> io::Result<Reply> {
        tracing::debug!(command = %cmd, "sending");
        let bytes = cmd.serialize();
        bounded(self.deadline, self.stream.write_all(&bytes)).await?;
        let reply = self.read_reply().await?;
        tracing::debug!(%reply, "received");
        Ok(reply)
    }

    async fn read_reply(&mut self) -> io::Result<Reply> {
        bounded(self.deadline, self.stream.read_reply()).await
    }
}

/// Bounds an I/O future by the whole-connection deadline. Expiry surfaces
/// as [`io::ErrorKind::TimedOut`], which the caller attributes to the step
/// that was in flight.
async fn bounded<T, F>(deadline: Instant, fut: F) -> io::Result<T>
where
    F: Future<Output = io::Result<T>>,
{
    match timeout_at(deadline, fut).await {
        Ok(result) => result,
        Err(_) => Err(io::Error::new(
            io::ErrorKind::TimedOut,
            "connection timeout budget exhausted",
        )),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    use super::*;

    // Certificate validation is pinned to the Mozilla root store, so the
    // post-upgrade EHLO step is exercised here over plaintext.
    #[tokio::test]
    async fn ehlo_rejected_after_upgrade() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            reader.read_line(&mut line).await.unwrap();
            assert_eq!(line, "EHLO www.example.com\r\n");
            reader
                .get_mut()
                .write_all(b"502 command not implemented\r\n")
                .await
                .unwrap();
            reader.get_mut().flush().await.unwrap();
        });

        let config =
            Config::new(addr.ip().to_string(), addr.port()).helo_domain("www.example.com");
        let stream = connect(&config.host, config.port).await.unwrap();
        let mut client = Client {
            stream,
            deadline: Instant::now() + config.timeout,
        };

        let err = client.ehlo_secure(&config).await.unwrap_err();
        assert_eq!(err.code(), "smtp_ehlo_after_tls_failed");
        assert!(err.to_string().contains("502"));
    }
}
