//! Turn-taking state machine.
//!
//! idle → roll_call → in_progress → idle
//!
//! The session is driven serially by the host loop: commands, passive room
//! activity and reminder firings never interleave. All collaborators are
//! injected so the machine can be exercised without a transport.

use chrono::Local;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::MeetingConfig;
use crate::notes::{weekly_label, LoggingToggle};
use crate::room::{Announcement, Announcer, Authorizer, IdentityResolver, RoomEvent, Roster};

use super::reminder::{ReminderTimer, ReminderToken};
use super::status::{non_responders, MeetingPhase, MeetingSnapshot};

/// Room-side collaborators used by a [`MeetingSession`].
#[derive(Clone)]
pub struct MeetingServices {
    pub roster: Arc<dyn Roster>,
    pub resolver: Arc<dyn IdentityResolver>,
    pub announcer: Arc<dyn Announcer>,
    pub authorizer: Arc<dyn Authorizer>,
    pub notes: Arc<dyn LoggingToggle>,
}

pub struct MeetingSession {
    phase: MeetingPhase,
    chair: Option<String>,
    pending: VecDeque<String>,
    done: HashSet<String>,
    skipped: HashSet<String>,
    current: Option<String>,
    breakouts: Vec<String>,
    reminder: ReminderTimer,
    events: mpsc::UnboundedSender<RoomEvent>,
    timing: MeetingConfig,
    services: MeetingServices,
}

impl MeetingSession {
    /// `events` is the host loop's queue; reminder firings are posted there
    /// as [`RoomEvent::Reminder`] and come back through [`Self::on_timeout`].
    pub fn new(
        services: MeetingServices,
        timing: MeetingConfig,
        events: mpsc::UnboundedSender<RoomEvent>,
    ) -> Self {
        Self {
            phase: MeetingPhase::Idle,
            chair: None,
            pending: VecDeque::new(),
            done: HashSet::new(),
            skipped: HashSet::new(),
            current: None,
            breakouts: Vec::new(),
            reminder: ReminderTimer::new(),
            events,
            timing,
            services,
        }
    }

    pub fn phase(&self) -> MeetingPhase {
        self.phase
    }

    pub fn snapshot(&self) -> MeetingSnapshot {
        let mut done: Vec<String> = self.done.iter().cloned().collect();
        done.sort();
        MeetingSnapshot {
            phase: self.phase,
            chair: self.chair.clone(),
            pending: self.pending.iter().cloned().collect(),
            done,
            current: self.current.clone(),
            breakouts: self.breakouts.clone(),
        }
    }

    pub fn reminder_armed(&self) -> bool {
        self.reminder.is_armed()
    }

    pub fn start_roll_call(&mut self, initiator: &str) {
        if self.phase.is_active() {
            self.short_status();
            return;
        }

        self.breakouts.clear();
        self.done.clear();
        self.skipped.clear();
        self.pending.clear();
        self.pending.push_back(initiator.to_string());
        self.chair = Some(initiator.to_string());
        self.current = None;
        self.phase = MeetingPhase::RollCall;
        info!("Meeting {} started by {}", self.phase.as_str(), initiator);

        self.set_notes_logging(initiator, true);
        self.short_status();

        let mut roster = vec!["Hello @room, this is the roll-call!".to_string()];
        roster.extend(self.services.roster.present_users());
        self.announce(roster);

        self.arm_reminder(self.timing.rollcall_reminder());
    }

    /// Sees every room message, commands included.
    pub fn observe_activity(&mut self, sender: &str) {
        if self.phase.is_active()
            && !self.done.contains(sender)
            && !self.pending.iter().any(|p| p == sender)
        {
            debug!("{} joins the queue", sender);
            self.pending.push_back(sender.to_string());

            // The chair speaks last
            if let Some(chair) = self.chair.as_ref() {
                if let Some(pos) = self.pending.iter().position(|p| p == chair) {
                    if let Some(chair) = self.pending.remove(pos) {
                        self.pending.push_back(chair);
                    }
                }
            }
        }

        if self.phase == MeetingPhase::InProgress
            && self.current.as_deref() == Some(sender)
            && self.reminder.cancel()
        {
            debug!("{} responded, turn reminder disarmed", sender);
        }
    }

    pub fn advance(&mut self, requester: &str) {
        if !self.phase.is_active() {
            self.short_status();
            return;
        }
        if !self.can_steer(requester) {
            debug!("Ignoring next from {}", requester);
            return;
        }

        if self.phase == MeetingPhase::RollCall {
            self.phase = MeetingPhase::InProgress;
            info!(
                "Meeting {} with {} participants",
                self.phase.as_str(),
                self.pending.len()
            );
            self.status();
            // Roll-call answers are forgotten, skips are not
            self.done.clone_from(&self.skipped);
        }

        let Some(speaker) = self.pending.pop_front() else {
            self.finish(requester, MeetingPhase::Idle.short_status());
            return;
        };
        self.done.insert(speaker.clone());
        self.current = Some(speaker.clone());

        match self.pending.front() {
            Some(next) => {
                self.announce(format!("{}, you're up (after that, {}).", speaker, next));
                self.arm_reminder(self.timing.turn_reminder());
            }
            None => {
                self.announce(format!("{}, you're up (after that, we're done!).", speaker));
                self.finish(requester, "That was the last turn, the meeting is over.");
            }
        }
    }

    pub fn skip(&mut self, requester: &str, users: &[String]) {
        if !self.phase.is_active() {
            self.short_status();
            return;
        }
        if !self.can_steer(requester) {
            debug!("Ignoring skip from {}", requester);
            return;
        }

        for token in users {
            let Some(user) = self.services.resolver.resolve(token) else {
                debug!("Cannot skip unknown user '{}'", token);
                continue;
            };
            self.pending.retain(|p| p != &user);
            self.announce(format!("User {} will be skipped this meeting.", user));
            self.skipped.insert(user.clone());
            self.done.insert(user);
        }
    }

    pub fn bump(&mut self, requester: &str, users: &[String]) {
        if !self.phase.is_active() {
            self.short_status();
            return;
        }
        if !self.can_steer(requester) {
            debug!("Ignoring bump from {}", requester);
            return;
        }

        for token in users {
            let Some(user) = self.services.resolver.resolve(token) else {
                debug!("Cannot bump unknown user '{}'", token);
                continue;
            };
            self.pending.retain(|p| p != &user);
            self.done.remove(&user);
            self.skipped.remove(&user);
            self.announce(format!("User {} is up next.", user));
            self.pending.push_front(user);
        }
    }

    pub fn register_breakout(&mut self, note: &str) {
        if self.phase != MeetingPhase::InProgress {
            self.short_status();
            return;
        }

        let note = note.trim();
        if note.is_empty() {
            self.announce("Usage: breakout <description>");
            return;
        }

        self.breakouts.push(note.to_string());
        self.announce(format!("Registered breakout '{}'.", note));
    }

    /// Ends the meeting whatever its phase. Operators only.
    pub fn force_end(&mut self, requester: &str) {
        if !self.services.authorizer.is_operator(requester) {
            debug!("Ignoring forced end from {}", requester);
            return;
        }

        if self.phase.is_active() {
            self.set_notes_logging(requester, false);
        }
        self.reset();
        info!("Meeting forcefully ended by {}", requester);
        self.announce("The meeting has been forcefully ended.");
    }

    /// Handles a fired reminder. Notification only: no state changes and no
    /// re-arming.
    pub fn on_timeout(&mut self, token: ReminderToken) {
        if !self.reminder.accept(token) {
            return;
        }

        match self.phase {
            MeetingPhase::RollCall => {
                let present = self.services.roster.present_users();
                let missing = non_responders(&present, self.pending.make_contiguous(), &self.done);
                if !missing.is_empty() {
                    let mut words = vec!["Roll-call for".to_string()];
                    words.extend(missing.into_iter().map(str::to_string));
                    self.announce(words);
                }
            }
            MeetingPhase::InProgress => {
                if let Some(current) = self.current.clone() {
                    self.announce(vec![current, "are you with us?".to_string()]);
                }
            }
            MeetingPhase::Idle => {}
        }
    }

    pub fn short_status(&self) {
        self.announce(self.phase.short_status());
    }

    pub fn status(&self) {
        self.short_status();
        if self.phase.is_active() {
            self.announce(format!("There are {} participants.", self.pending.len()));
        }
    }

    fn finish(&mut self, requester: &str, closing: &str) {
        self.announce(closing);
        for breakout in &self.breakouts {
            self.announce(format!("Breakout: {}", breakout));
        }
        self.set_notes_logging(requester, false);
        self.reset();
        info!("Meeting finished");
    }

    fn reset(&mut self) {
        self.reminder.cancel();
        self.phase = MeetingPhase::Idle;
        self.chair = None;
        self.pending.clear();
        self.done.clear();
        self.skipped.clear();
        self.current = None;
        self.breakouts.clear();
    }

    fn can_steer(&self, user: &str) -> bool {
        self.chair.as_deref() == Some(user) || self.services.authorizer.is_operator(user)
    }

    fn set_notes_logging(&self, user: &str, enabled: bool) {
        if self.services.authorizer.is_operator(user) {
            let label = weekly_label(Local::now().date_naive());
            self.services.notes.set_logging(&label, enabled);
        }
    }

    fn arm_reminder(&mut self, delay: Duration) {
        let events = self.events.clone();
        self.reminder.arm(delay, move |token| {
            if events.send(RoomEvent::Reminder(token)).is_err() {
                warn!("Event loop closed, dropping reminder {:?}", token);
            }
        });
    }

    pub(super) fn announce(&self, announcement: impl Into<Announcement>) {
        self.services.announcer.announce(announcement.into());
    }
}
