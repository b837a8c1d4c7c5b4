//! Meeting phase and read-only views of a session.

use serde::{Deserialize, Serialize};

/// Phase of the turn-taking lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeetingPhase {
    /// No meeting is running.
    #[default]
    Idle,
    /// Gathering attendees.
    RollCall,
    /// Participants are taking turns.
    InProgress,
}

impl MeetingPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::RollCall => "roll_call",
            Self::InProgress => "in_progress",
        }
    }

    /// One-line status as shown in the room.
    pub fn short_status(&self) -> &'static str {
        match self {
            Self::Idle => "No meeting in progress.",
            Self::RollCall => "Doing the rollcall.",
            Self::InProgress => "Meeting in progress.",
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Copy of the session state at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSnapshot {
    pub phase: MeetingPhase,
    pub chair: Option<String>,
    pub pending: Vec<String>,
    /// Sorted for stable comparison.
    pub done: Vec<String>,
    pub current: Option<String>,
    pub breakouts: Vec<String>,
}

/// Present users who are neither queued nor already heard, in roster order.
pub fn non_responders<'a>(
    present: &'a [String],
    pending: &[String],
    done: &std::collections::HashSet<String>,
) -> Vec<&'a str> {
    present
        .iter()
        .filter(|user| !pending.contains(*user) && !done.contains(user.as_str()))
        .map(String::as_str)
        .collect()
}
