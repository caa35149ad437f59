// SPDX-FileCopyrightText: 2026 DispatchTrack Contributors
//
// SPDX-License-Identifier: GPL-3.0-or-later

//! STOMP-Style Frame Codec
//!
//! Wire format for broker communication: a command line, `name:value` header
//! lines, a blank line, then a UTF-8 body terminated by NUL. Header names and
//! values use the standard STOMP escapes (`\n`, `\c`, `\\`).

use super::error::NetworkError;

/// Frame commands used by the client/broker dialogue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameCommand {
    /// Client handshake request.
    Connect,
    /// Broker handshake acknowledgment.
    Connected,
    /// Client subscription request.
    Subscribe,
    /// Client subscription removal.
    Unsubscribe,
    /// Client-to-broker message.
    Send,
    /// Broker-to-client message delivery.
    Message,
    /// Broker error report.
    Error,
    /// Client teardown.
    Disconnect,
}

impl FrameCommand {
    /// The wire spelling of the command.
    pub fn as_str(&self) -> &'static str {
        match self {
            FrameCommand::Connect => "CONNECT",
            FrameCommand::Connected => "CONNECTED",
            FrameCommand::Subscribe => "SUBSCRIBE",
            FrameCommand::Unsubscribe => "UNSUBSCRIBE",
            FrameCommand::Send => "SEND",
            FrameCommand::Message => "MESSAGE",
            FrameCommand::Error => "ERROR",
            FrameCommand::Disconnect => "DISCONNECT",
        }
    }

    fn parse(s: &str) -> Result<Self, NetworkError> {
        match s {
            "CONNECT" => Ok(FrameCommand::Connect),
            "CONNECTED" => Ok(FrameCommand::Connected),
            "SUBSCRIBE" => Ok(FrameCommand::Subscribe),
            "UNSUBSCRIBE" => Ok(FrameCommand::Unsubscribe),
            "SEND" => Ok(FrameCommand::Send),
            "MESSAGE" => Ok(FrameCommand::Message),
            "ERROR" => Ok(FrameCommand::Error),
            "DISCONNECT" => Ok(FrameCommand::Disconnect),
            other => Err(NetworkError::InvalidFrame(format!(
                "unknown command: {}",
                other
            ))),
        }
    }
}

/// One discrete unit of data on the broker connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The frame command.
    pub command: FrameCommand,
    /// Header name/value pairs, in wire order.
    pub headers: Vec<(String, String)>,
    /// UTF-8 frame body (may be empty).
    pub body: String,
}

impl Frame {
    /// Creates a frame with no headers and no body.
    pub fn new(command: FrameCommand) -> Self {
        Frame {
            command,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    /// Adds a header (builder style).
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Sets the body (builder style).
    pub fn with_body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    /// Returns the first header with the given name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Client handshake frame for a user session.
    pub fn connect(host: &str, user_id: &str) -> Self {
        Frame::new(FrameCommand::Connect)
            .with_header("accept-version", "1.2")
            .with_header("host", host)
            .with_header("login", user_id)
    }

    /// Broker handshake acknowledgment.
    pub fn connected() -> Self {
        Frame::new(FrameCommand::Connected).with_header("version", "1.2")
    }

    /// Subscription request for a destination.
    pub fn subscribe(token: &str, destination: &str) -> Self {
        Frame::new(FrameCommand::Subscribe)
            .with_header("id", token)
            .with_header("destination", destination)
            .with_header("ack", "auto")
    }

    /// Broker message delivery on a subscription.
    pub fn message(token: &str, destination: &str, body: &str) -> Self {
        Frame::new(FrameCommand::Message)
            .with_header("subscription", token)
            .with_header("destination", destination)
            .with_body(body)
    }

    /// Broker error report.
    pub fn error(message: &str) -> Self {
        Frame::new(FrameCommand::Error).with_header("message", message)
    }

    /// Client teardown frame.
    pub fn disconnect() -> Self {
        Frame::new(FrameCommand::Disconnect)
    }

    /// Encodes the frame into its wire representation.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        out.push_str(self.command.as_str());
        out.push('\n');
        for (name, value) in &self.headers {
            out.push_str(&escape_header(name));
            out.push(':');
            out.push_str(&escape_header(value));
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    /// Parses a frame from its wire representation.
    pub fn parse(raw: &str) -> Result<Self, NetworkError> {
        let raw = raw.strip_suffix('\0').unwrap_or(raw);

        let (head, body) = match raw.split_once("\n\n") {
            Some((head, body)) => (head, body),
            None => (raw, ""),
        };

        let mut lines = head.lines();
        let command_line = lines
            .next()
            .filter(|l| !l.is_empty())
            .ok_or_else(|| NetworkError::InvalidFrame("empty frame".into()))?;
        let command = FrameCommand::parse(command_line.trim_end_matches('\r'))?;

        let mut headers = Vec::new();
        for line in lines {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let (name, value) = line.split_once(':').ok_or_else(|| {
                NetworkError::InvalidFrame(format!("malformed header: {}", line))
            })?;
            headers.push((unescape_header(name)?, unescape_header(value)?));
        }

        Ok(Frame {
            command,
            headers,
            body: body.to_string(),
        })
    }
}

fn escape_header(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            ':' => out.push_str("\\c"),
            other => out.push(other),
        }
    }
    out
}

fn unescape_header(s: &str) -> Result<String, NetworkError> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('c') => out.push(':'),
            other => {
                return Err(NetworkError::InvalidFrame(format!(
                    "bad escape sequence: \\{}",
                    other.map(String::from).unwrap_or_default()
                )))
            }
        }
    }
    Ok(out)
}
