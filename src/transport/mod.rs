//! Room transports.
//!
//! The bot only needs two things from a chat network: the next inbound
//! message and a way to say something. Both shipped transports speak the
//! same line format, `sender> message text`.

pub mod console;
pub mod script;

pub use console::ConsoleTransport;
pub use script::{ScriptStep, ScriptedTransport};

use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use thiserror::Error;

use crate::room::RoomMessage;

#[async_trait]
pub trait RoomTransport: Send {
    /// Next inbound message, or `None` once the room is closed.
    async fn next_message(&mut self) -> Result<Option<RoomMessage>>;

    async fn send(&mut self, text: &str) -> Result<()>;
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineError {
    #[error("expected 'sender> message', got {0:?}")]
    MissingSender(String),
    #[error("message from {0} is empty")]
    EmptyBody(String),
}

/// Splits `sender> text` lines into room messages.
pub struct LineParser {
    line_regex: Regex,
    next_event: u64,
}

impl LineParser {
    pub fn new() -> Result<Self> {
        let line_regex = Regex::new(r"^\s*([^\s>]+)>\s?(.*)$")?;

        Ok(Self {
            line_regex,
            next_event: 1,
        })
    }

    pub fn parse(&mut self, line: &str) -> Result<RoomMessage, LineError> {
        let captures = self
            .line_regex
            .captures(line)
            .ok_or_else(|| LineError::MissingSender(line.to_string()))?;

        let sender = &captures[1];
        let body = captures[2].trim_end();
        if body.trim().is_empty() {
            return Err(LineError::EmptyBody(sender.to_string()));
        }

        let event_id = format!("$line-{}", self.next_event);
        self.next_event += 1;
        Ok(RoomMessage::new(event_id, sender, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let mut parser = LineParser::new().unwrap();
        let message = parser.parse("alice> !meeting rollcall").unwrap();
        assert_eq!(message.sender, "alice");
        assert_eq!(message.body, "!meeting rollcall");
        assert_eq!(message.event_id, "$line-1");

        let message = parser.parse("  @bob:example.org>hi there  ").unwrap();
        assert_eq!(message.sender, "@bob:example.org");
        assert_eq!(message.body, "hi there");
        assert_eq!(message.event_id, "$line-2");
    }

    #[test]
    fn test_parse_errors() {
        let mut parser = LineParser::new().unwrap();
        assert_eq!(
            parser.parse("no sender here"),
            Err(LineError::MissingSender("no sender here".to_string()))
        );
        assert_eq!(
            parser.parse("alice>   "),
            Err(LineError::EmptyBody("alice".to_string()))
        );
    }
}
