//! Room model shared by every module.
//!
//! Modules never talk to the chat transport directly. They see the room
//! through the narrow traits below, which the host wires to a [`ChatRoom`],
//! an [`Operators`] list and an [`Outbox`].

pub mod members;
pub mod operators;
pub mod outbox;

pub use members::ChatRoom;
pub use operators::Operators;
pub use outbox::Outbox;

use chrono::{DateTime, Utc};

use crate::meeting::ReminderToken;

/// A line of room output: either ready-made text or a list of words
/// (user ids, module names) that the transport joins with spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Announcement {
    Text(String),
    Words(Vec<String>),
}

impl Announcement {
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Words(words) => words.join(" "),
        }
    }
}

impl From<String> for Announcement {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<&str> for Announcement {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<String>> for Announcement {
    fn from(words: Vec<String>) -> Self {
        Self::Words(words)
    }
}

/// An inbound chat message after the transport has identified its sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomMessage {
    pub event_id: String,
    pub sender: String,
    pub body: String,
    pub timestamp: DateTime<Utc>,
}

impl RoomMessage {
    pub fn new(event_id: impl Into<String>, sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            event_id: event_id.into(),
            sender: sender.into(),
            body: body.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Everything the host loop delivers to the bot, one at a time.
#[derive(Debug, Clone)]
pub enum RoomEvent {
    Message(RoomMessage),
    Reminder(ReminderToken),
}

/// Who is currently in the room.
pub trait Roster: Send + Sync {
    fn present_users(&self) -> Vec<String>;
}

/// Maps display names, mentions and partial ids to canonical user ids.
pub trait IdentityResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Option<String>;
}

/// Fire-and-forget outbound messaging.
pub trait Announcer: Send + Sync {
    fn announce(&self, announcement: Announcement);
}

pub trait Authorizer: Send + Sync {
    fn is_operator(&self, user: &str) -> bool;
}
