//! Live order channel framing
//!
//! The backend pushes order updates over STOMP 1.2 on top of a WebSocket.
//! This module holds the frame codec and the destinations shared by the
//! client and its tests.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

pub mod payload;
pub use payload::*;

/// STOMP protocol version offered on CONNECT
pub const STOMP_VERSION: &str = "1.2";

/// Topic carrying order updates
pub const ORDER_TOPIC: &str = "/topic/orders";

/// Destination receiving the subscription-intent message
pub const SUBSCRIBE_DESTINATION: &str = "/app/orders/subscribe";

/// Frame commands used by the live channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    Connect,
    Connected,
    Subscribe,
    Unsubscribe,
    Send,
    Message,
    Receipt,
    Error,
    Disconnect,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Connect => "CONNECT",
            Command::Connected => "CONNECTED",
            Command::Subscribe => "SUBSCRIBE",
            Command::Unsubscribe => "UNSUBSCRIBE",
            Command::Send => "SEND",
            Command::Message => "MESSAGE",
            Command::Receipt => "RECEIPT",
            Command::Error => "ERROR",
            Command::Disconnect => "DISCONNECT",
        }
    }
}

impl TryFrom<&str> for Command {
    type Error = FrameError;

    fn try_from(value: &str) -> Result<Self, FrameError> {
        match value {
            "CONNECT" | "STOMP" => Ok(Command::Connect),
            "CONNECTED" => Ok(Command::Connected),
            "SUBSCRIBE" => Ok(Command::Subscribe),
            "UNSUBSCRIBE" => Ok(Command::Unsubscribe),
            "SEND" => Ok(Command::Send),
            "MESSAGE" => Ok(Command::Message),
            "RECEIPT" => Ok(Command::Receipt),
            "ERROR" => Ok(Command::Error),
            "DISCONNECT" => Ok(Command::Disconnect),
            other => Err(FrameError::UnknownCommand(other.to_string())),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame decoding errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("unknown frame command: {0}")]
    UnknownCommand(String),

    #[error("malformed header line: {0}")]
    MalformedHeader(String),

    #[error("invalid escape sequence in header: {0}")]
    InvalidEscape(String),

    #[error("frame is missing the header terminator")]
    Truncated,
}

/// A single STOMP frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub command: Command,
    /// Headers in wire order; on repeated names the first wins
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Frame {
    pub fn new(command: Command) -> Self {
        Self {
            command,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Serialize `payload` as a JSON body
    pub fn json_body<T: Serialize>(self, payload: &T) -> Result<Self, serde_json::Error> {
        let body = serde_json::to_string(payload)?;
        Ok(self
            .header("content-type", "application/json")
            .body(body))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    // ========== Client frames ==========

    pub fn connect(host: &str, heartbeat_ms: u32) -> Self {
        Self::new(Command::Connect)
            .header("accept-version", STOMP_VERSION)
            .header("host", host)
            .header("heart-beat", format!("{heartbeat_ms},{heartbeat_ms}"))
    }

    pub fn subscribe(id: &str, destination: &str) -> Self {
        Self::new(Command::Subscribe)
            .header("id", id)
            .header("destination", destination)
            .header("ack", "auto")
    }

    pub fn send(destination: &str) -> Self {
        Self::new(Command::Send).header("destination", destination)
    }

    pub fn disconnect(receipt: &str) -> Self {
        Self::new(Command::Disconnect).header("receipt", receipt)
    }

    /// Encode to the wire text, NUL-terminated
    pub fn encode(&self) -> String {
        let escape = self.command != Command::Connect && self.command != Command::Connected;
        let mut out = String::with_capacity(self.body.len() + 64);
        out.push_str(self.command.as_str());
        out.push('\n');
        for (name, value) in &self.headers {
            if escape {
                out.push_str(&escape_header(name));
                out.push(':');
                out.push_str(&escape_header(value));
            } else {
                out.push_str(name);
                out.push(':');
                out.push_str(value);
            }
            out.push('\n');
        }
        if !self.body.is_empty() && self.get("content-length").is_none() {
            out.push_str(&format!("content-length:{}\n", self.body.len()));
        }
        out.push('\n');
        out.push_str(&self.body);
        out.push('\0');
        out
    }

    /// Decode one frame from wire text
    ///
    /// Returns `Ok(None)` for heart-beat frames (bare end-of-line).
    pub fn decode(text: &str) -> Result<Option<Self>, FrameError> {
        let text = text.trim_start_matches(['\r', '\n']);
        if text.is_empty() {
            return Ok(None);
        }

        let (head, body) = split_head(text).ok_or(FrameError::Truncated)?;

        let mut lines = head.lines();
        let command_line = lines.next().ok_or(FrameError::Truncated)?;
        let command = Command::try_from(command_line.trim_end_matches('\r'))?;
        let unescape = command != Command::Connect && command != Command::Connected;

        let mut headers = Vec::new();
        for line in lines {
            let line = line.trim_end_matches('\r');
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| FrameError::MalformedHeader(line.to_string()))?;
            if unescape {
                headers.push((unescape_header(name)?, unescape_header(value)?));
            } else {
                headers.push((name.to_string(), value.to_string()));
            }
        }

        let body = match body.find('\0') {
            Some(end) => &body[..end],
            None => body,
        };

        Ok(Some(Self {
            command,
            headers,
            body: body.to_string(),
        }))
    }
}

/// Split at the first blank line; each header line ends in LF or CRLF
fn split_head(text: &str) -> Option<(&str, &str)> {
    let mut offset = 0;
    for line in text.split_inclusive('\n') {
        let end = offset + line.len();
        if line == "\n" || line == "\r\n" {
            return Some((&text[..offset], &text[end..]));
        }
        offset = end;
    }
    None
}

fn escape_header(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            ':' => out.push_str("\\c"),
            c => out.push(c),
        }
    }
    out
}

fn unescape_header(value: &str) -> Result<String, FrameError> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('c') => out.push(':'),
            _ => return Err(FrameError::InvalidEscape(value.to_string())),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_subscribe() {
        let frame = Frame::subscribe("sub-0", ORDER_TOPIC);
        assert_eq!(
            frame.encode(),
            "SUBSCRIBE\nid:sub-0\ndestination:/topic/orders\nack:auto\n\n\0"
        );
    }

    #[test]
    fn test_encode_adds_content_length() {
        let frame = Frame::send(SUBSCRIBE_DESTINATION).body("{}");
        let wire = frame.encode();
        assert!(wire.contains("content-length:2\n"));
        assert!(wire.ends_with("\n\n{}\0"));
    }

    #[test]
    fn test_decode_message() {
        let wire = "MESSAGE\ndestination:/topic/orders\nmessage-id:7\nsubscription:sub-0\n\n{\"id\":1}\0";
        let frame = Frame::decode(wire).unwrap().unwrap();
        assert_eq!(frame.command, Command::Message);
        assert_eq!(frame.get("destination"), Some(ORDER_TOPIC));
        assert_eq!(frame.get("message-id"), Some("7"));
        assert_eq!(frame.body, "{\"id\":1}");
    }

    #[test]
    fn test_decode_heartbeat() {
        assert_eq!(Frame::decode("\n").unwrap(), None);
        assert_eq!(Frame::decode("\r\n").unwrap(), None);
    }

    #[test]
    fn test_decode_crlf_body_with_blank_lines() {
        let wire = "MESSAGE\r\ndestination:/topic/orders\r\nmessage-id:9\r\n\r\nfirst\n\nsecond\0";
        let frame = Frame::decode(wire).unwrap().unwrap();
        assert_eq!(frame.get("destination"), Some(ORDER_TOPIC));
        assert_eq!(frame.get("message-id"), Some("9"));
        assert_eq!(frame.body, "first\n\nsecond");
    }

    #[test]
    fn test_decode_connected_without_body() {
        let frame = Frame::decode("CONNECTED\nversion:1.2\nheart-beat:0,0\n\n\0")
            .unwrap()
            .unwrap();
        assert_eq!(frame.command, Command::Connected);
        assert_eq!(frame.get("version"), Some("1.2"));
        assert!(frame.body.is_empty());
    }

    #[test]
    fn test_header_escaping() {
        let frame = Frame::send("/app/x").header("note", "a:b\nc");
        let wire = frame.encode();
        assert!(wire.contains("note:a\\cb\\nc\n"));

        let decoded = Frame::decode(&wire).unwrap().unwrap();
        assert_eq!(decoded.get("note"), Some("a:b\nc"));
    }

    #[test]
    fn test_decode_errors() {
        assert_eq!(
            Frame::decode("BOGUS\n\n\0"),
            Err(FrameError::UnknownCommand("BOGUS".to_string()))
        );
        assert_eq!(Frame::decode("MESSAGE\nno-colon"), Err(FrameError::Truncated));
        assert!(matches!(
            Frame::decode("MESSAGE\nbad\n\n\0"),
            Err(FrameError::MalformedHeader(_))
        ));
        assert!(matches!(
            Frame::decode("MESSAGE\nx:\\q\n\n\0"),
            Err(FrameError::InvalidEscape(_))
        ));
    }

    #[test]
    fn test_json_body() {
        let frame = Frame::send(SUBSCRIBE_DESTINATION)
            .json_body(&SubscriptionIntent::orders(Some("till-1".to_string())))
            .unwrap();
        assert_eq!(frame.get("content-type"), Some("application/json"));
        assert!(frame.body.contains("\"clientName\":\"till-1\""));
    }
}
