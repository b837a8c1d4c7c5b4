//! Turn-based meetings.
//!
//! A roll-call gathers participants, the chair (or an operator) moves the
//! meeting from speaker to speaker, and a reminder nudges anyone who stays
//! silent.

pub mod commands;
pub mod reminder;
pub mod session;
pub mod status;

pub use commands::MeetingWatcher;
pub use reminder::{ReminderTimer, ReminderToken};
pub use session::{MeetingServices, MeetingSession};
pub use status::{non_responders, MeetingPhase, MeetingSnapshot};
