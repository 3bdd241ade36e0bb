//! End-to-end form-handler scenarios against a scripted in-process relay.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use leadmail::{Config, Message, send};

/// One accepted session: banner, one canned reply per command, body
/// captured between `354` and the lone dot. Returns the client's lines.
async fn serve_session(stream: TcpStream, replies: Vec<&'static str>) -> Vec<String> {
    let mut reader = BufReader::new(stream);
    let mut transcript = Vec::new();

    write_line(&mut reader, "220 relay.test ESMTP").await;

    let mut replies = replies.into_iter();
    loop {
        let Some(line) = read_line(&mut reader).await else {
            break;
        };
        transcript.push(line);

        let Some(reply) = replies.next() else {
            break;
        };
        write_line(&mut reader, reply).await;

        if reply.starts_with("354") {
            loop {
                let Some(body_line) = read_line(&mut reader).await else {
                    return transcript;
                };
                let done = body_line == ".";
                transcript.push(body_line);
                if done {
                    break;
                }
            }
            let Some(after_body) = replies.next() else {
                break;
            };
            write_line(&mut reader, after_body).await;
        }
    }

    transcript
}

async fn read_line(reader: &mut BufReader<TcpStream>) -> Option<String> {
    let mut line = String::new();
    let read = reader.read_line(&mut line).await.unwrap();
    if read == 0 {
        None
    } else {
        Some(line.trim_end().to_string())
    }
}

async fn write_line(reader: &mut BufReader<TcpStream>, line: &str) {
    reader
        .get_mut()
        .write_all(format!("{line}\r\n").as_bytes())
        .await
        .unwrap();
    reader.get_mut().flush().await.unwrap();
}

const ACCEPT_ALL: [&str; 6] = [
    "250 relay.test",
    "250 sender ok",
    "250 recipient ok",
    "354 go ahead",
    "250 queued",
    "221 bye",
];

/// Spawns a relay accepting `sessions` connections, each following the
/// accept-everything script, and collects every session transcript.
async fn spawn_relay(sessions: usize) -> (SocketAddr, JoinHandle<Vec<Vec<String>>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let mut workers = Vec::new();
        for _ in 0..sessions {
            let (stream, _) = listener.accept().await.unwrap();
            workers.push(tokio::spawn(serve_session(stream, ACCEPT_ALL.to_vec())));
        }
        let mut transcripts = Vec::new();
        for worker in workers {
            transcripts.push(worker.await.unwrap());
        }
        transcripts
    });
    (addr, handle)
}

async fn spawn_relay_with(replies: Vec<&'static str>) -> (SocketAddr, JoinHandle<Vec<String>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        serve_session(stream, replies).await
    });
    (addr, handle)
}

fn config_for(addr: SocketAddr) -> Config {
    Config::new(addr.ip().to_string(), addr.port())
        .timeout(Duration::from_secs(5))
        .helo_domain("www.example.com")
}

fn header<'a>(transcript: &'a [String], name: &str) -> Option<&'a String> {
    transcript
        .iter()
        .find(|l| l.starts_with(&format!("{name}: ")))
}

#[tokio::test]
async fn contact_form_message_is_delivered() {
    let (addr, handle) = spawn_relay_with(ACCEPT_ALL.to_vec()).await;

    let message = Message::new(
        "forms@example.com",
        "sales@example.com",
        "New contact request",
        "Name: Jordan\nPhone: +1 555 0100",
    )
    .from_name("Website forms")
    .reply_to("jordan@customer.example");

    let delivery = send(&config_for(addr), &message).await;
    assert!(delivery.success);
    assert_eq!(delivery.error_code, "");
    assert_eq!(delivery.diagnostic, "");

    let transcript = handle.await.unwrap();
    assert_eq!(transcript[0], "EHLO www.example.com");
    assert_eq!(transcript[1], "MAIL FROM:<forms@example.com>");
    assert_eq!(transcript[2], "RCPT TO:<sales@example.com>");

    assert_eq!(
        header(&transcript, "From").unwrap(),
        "From: Website forms <forms@example.com>"
    );
    assert_eq!(
        header(&transcript, "Subject").unwrap(),
        "Subject: New contact request"
    );
    assert_eq!(
        header(&transcript, "Reply-To").unwrap(),
        "Reply-To: jordan@customer.example"
    );
    assert!(
        header(&transcript, "Message-ID")
            .unwrap()
            .ends_with("@www.example.com>")
    );
    assert!(transcript.contains(&"Name: Jordan".to_string()));
    assert!(transcript.contains(&"Phone: +1 555 0100".to_string()));
    assert_eq!(transcript.last().unwrap(), "QUIT");
}

#[tokio::test]
async fn arabic_subject_travels_as_encoded_word() {
    let (addr, handle) = spawn_relay_with(ACCEPT_ALL.to_vec()).await;

    let message = Message::new("forms@example.com", "sales@example.com", "مرحبا", "أهلا");
    let delivery = send(&config_for(addr), &message).await;
    assert!(delivery.success);

    let transcript = handle.await.unwrap();
    let subject = header(&transcript, "Subject").unwrap();
    let value = subject.trim_start_matches("Subject: ");
    assert!(value.starts_with("=?UTF-8?B?"));
    assert_eq!(
        leadmail_mime::encoding::decode_header_value(value).unwrap(),
        "مرحبا"
    );
}

#[tokio::test]
async fn lone_dot_line_is_stuffed_and_message_accepted() {
    let (addr, handle) = spawn_relay_with(ACCEPT_ALL.to_vec()).await;

    let message = Message::new(
        "forms@example.com",
        "sales@example.com",
        "Notes",
        "before\n.\nafter",
    );
    let delivery = send(&config_for(addr), &message).await;
    assert!(delivery.success);

    let transcript = handle.await.unwrap();
    // The stuffed line arrives, the bare dot only as the terminator, and
    // the line after the dot was not cut off.
    assert!(transcript.contains(&"..".to_string()));
    assert!(transcript.contains(&"after".to_string()));
    let dot_position = transcript.iter().position(|l| l == ".").unwrap();
    let after_position = transcript.iter().position(|l| l == "after").unwrap();
    assert!(after_position < dot_position);
}

#[tokio::test]
async fn missing_host_reports_no_host() {
    let config = Config::new("", 587);
    let message = Message::new("a@x.test", "b@y.test", "Hi", "body");

    let delivery = send(&config, &message).await;
    assert!(!delivery.success);
    assert_eq!(delivery.error_code, "smtp_no_host");
}

#[tokio::test]
async fn rejected_recipient_reports_code() {
    let (addr, _handle) =
        spawn_relay_with(vec!["250 relay.test", "250 ok", "550 5.1.1 unknown user"]).await;

    let message = Message::new("forms@example.com", "nobody@example.com", "Hi", "body");
    let delivery = send(&config_for(addr), &message).await;
    assert!(!delivery.success);
    assert_eq!(delivery.error_code, "smtp_rcpt_to_failed");
    assert!(delivery.diagnostic.contains("550"));
}

#[tokio::test]
async fn invalid_sender_fails_before_connecting() {
    // No relay exists at this address; a connection attempt would fail
    // with smtp_connect_failed, not smtp_mail_from_failed.
    let config = Config::new("relay.invalid", 587);
    let message = Message::new("not-an-address", "b@y.test", "Hi", "body");

    let delivery = send(&config, &message).await;
    assert!(!delivery.success);
    assert_eq!(delivery.error_code, "smtp_mail_from_failed");
}

#[tokio::test]
async fn concurrent_sends_use_distinct_connections_and_ids() {
    let (addr, handle) = spawn_relay(2).await;
    let config = config_for(addr);

    let admin = Message::new(
        "forms@example.com",
        "admin@example.com",
        "New lead",
        "A lead arrived.",
    );
    let visitor = Message::new(
        "forms@example.com",
        "visitor@customer.example",
        "Thanks for reaching out",
        "We got your message.",
    );

    let (first, second) = tokio::join!(send(&config, &admin), send(&config, &visitor));
    assert!(first.success);
    assert!(second.success);

    let transcripts = handle.await.unwrap();
    assert_eq!(transcripts.len(), 2);

    let ids: Vec<&String> = transcripts
        .iter()
        .map(|t| header(t, "Message-ID").unwrap())
        .collect();
    assert_ne!(ids[0], ids[1]);
}
