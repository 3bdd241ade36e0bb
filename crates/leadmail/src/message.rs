//! Outgoing message composition.

use std::fmt::Write as _;

use chrono::Utc;
use leadmail_mime::{body, encoding, message_id};

/// A single outgoing plain-text message.
///
/// Constructed fresh per call by a form handler and never reused; the
/// Message-ID is generated at render time, so two sends of the same
/// `Message` value still produce distinct wire messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Envelope and header sender address.
    pub from_email: String,
    /// Optional display name for the `From` header.
    pub from_name: Option<String>,
    /// Envelope and header recipient address.
    pub to_email: String,
    /// Subject line (UTF-8; encoded for the wire only when needed).
    pub subject: String,
    /// Plain-text body (UTF-8, any line-ending convention).
    pub body: String,
    /// Caller-supplied headers (e.g. `Reply-To`), appended after the
    /// fixed set in insertion order.
    pub extra_headers: Vec<(String, String)>,
}

impl Message {
    /// Creates a new message.
    #[must_use]
    pub fn new(
        from_email: impl Into<String>,
        to_email: impl Into<String>,
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            from_email: from_email.into(),
            from_name: None,
            to_email: to_email.into(),
            subject: subject.into(),
            body: body.into(),
            extra_headers: Vec::new(),
        }
    }

    /// Sets the display name for the `From` header.
    #[must_use]
    pub fn from_name(mut self, name: impl Into<String>) -> Self {
        self.from_name = Some(name.into());
        self
    }

    /// Appends a caller-supplied header. Fixed headers always come first;
    /// extra headers keep their insertion order.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    /// Appends a `Reply-To` header.
    #[must_use]
    pub fn reply_to(self, address: impl Into<String>) -> Self {
        self.header("Reply-To", address)
    }

    /// Renders the message for the DATA block: the fixed-order header
    /// block, a blank line, and the CRLF-normalized, dot-stuffed body with
    /// a trailing CRLF. The terminating `.` line is the driver's job.
    #[must_use]
    pub fn to_wire(&self, helo_domain: &str) -> String {
        let mut out = String::new();

        let _ = write!(out, "Date: {}\r\n", Utc::now().to_rfc2822());

        match &self.from_name {
            Some(name) => {
                let _ = write!(out, "From: {name} <{}>\r\n", self.from_email);
            }
            None => {
                let _ = write!(out, "From: {}\r\n", self.from_email);
            }
        }

        let _ = write!(out, "To: {}\r\n", self.to_email);
        let _ = write!(
            out,
            "Subject: {}\r\n",
            encoding::encode_header_value(&self.subject)
        );
        let _ = write!(out, "Message-ID: {}\r\n", message_id::generate(helo_domain));

        out.push_str("MIME-Version: 1.0\r\n");
        out.push_str("Content-Type: text/plain; charset=UTF-8\r\n");
        out.push_str("Content-Transfer-Encoding: 8bit\r\n");

        for (name, value) in &self.extra_headers {
            let _ = write!(out, "{name}: {value}\r\n");
        }

        out.push_str("\r\n");
        out.push_str(&body::for_transmission(&self.body));

        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn header_lines(wire: &str) -> Vec<String> {
        wire.split("\r\n\r\n")
            .next()
            .unwrap()
            .split("\r\n")
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn fixed_header_order() {
        let message = Message::new("a@x.test", "b@y.test", "Hi", "body");
        let wire = message.to_wire("www.example.com");
        let headers = header_lines(&wire);

        let names: Vec<&str> = headers
            .iter()
            .map(|h| h.split(':').next().unwrap())
            .collect();
        assert_eq!(
            names,
            vec![
                "Date",
                "From",
                "To",
                "Subject",
                "Message-ID",
                "MIME-Version",
                "Content-Type",
                "Content-Transfer-Encoding",
            ]
        );
    }

    #[test]
    fn extra_headers_follow_fixed_set_in_order() {
        let message = Message::new("a@x.test", "b@y.test", "Hi", "body")
            .reply_to("visitor@customer.test")
            .header("X-Form", "booking");
        let wire = message.to_wire("www.example.com");
        let headers = header_lines(&wire);

        let len = headers.len();
        assert_eq!(headers[len - 2], "Reply-To: visitor@customer.test");
        assert_eq!(headers[len - 1], "X-Form: booking");
    }

    #[test]
    fn from_with_display_name() {
        let message =
            Message::new("forms@x.test", "b@y.test", "Hi", "body").from_name("Front Desk");
        let wire = message.to_wire("www.example.com");
        assert!(wire.contains("From: Front Desk <forms@x.test>\r\n"));
    }

    #[test]
    fn from_without_display_name() {
        let message = Message::new("forms@x.test", "b@y.test", "Hi", "body");
        let wire = message.to_wire("www.example.com");
        assert!(wire.contains("From: forms@x.test\r\n"));
    }

    #[test]
    fn ascii_subject_untouched() {
        let message = Message::new("a@x.test", "b@y.test", "Hello", "body");
        let wire = message.to_wire("www.example.com");
        assert!(wire.contains("Subject: Hello\r\n"));
    }

    #[test]
    fn non_ascii_subject_encoded() {
        let message = Message::new("a@x.test", "b@y.test", "مرحبا", "body");
        let wire = message.to_wire("www.example.com");
        let subject_line = wire
            .split("\r\n")
            .find(|l| l.starts_with("Subject: "))
            .unwrap();
        let value = subject_line.trim_start_matches("Subject: ");
        assert!(value.starts_with("=?UTF-8?B?"));
        assert_eq!(
            leadmail_mime::encoding::decode_header_value(value).unwrap(),
            "مرحبا"
        );
    }

    #[test]
    fn message_id_uses_helo_domain() {
        let message = Message::new("a@x.test", "b@y.test", "Hi", "body");
        let wire = message.to_wire("www.example.com");
        let id_line = wire
            .split("\r\n")
            .find(|l| l.starts_with("Message-ID: "))
            .unwrap();
        assert!(id_line.ends_with("@www.example.com>"));
    }

    #[test]
    fn renders_distinct_message_ids() {
        let message = Message::new("a@x.test", "b@y.test", "Hi", "body");
        let first = message.to_wire("www.example.com");
        let second = message.to_wire("www.example.com");

        let id = |wire: &str| {
            wire.split("\r\n")
                .find(|l| l.starts_with("Message-ID: "))
                .unwrap()
                .to_string()
        };
        assert_ne!(id(&first), id(&second));
    }

    #[test]
    fn body_is_normalized_and_stuffed() {
        let message = Message::new("a@x.test", "b@y.test", "Hi", "line one\n.\nline three");
        let wire = message.to_wire("www.example.com");
        let body = wire.split_once("\r\n\r\n").unwrap().1;
        assert_eq!(body, "line one\r\n..\r\nline three\r\n");
    }
}
