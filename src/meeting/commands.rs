//! The `meeting` command module.

use tracing::debug;

use crate::command::{CommandArgs, Watcher};
use crate::room::RoomMessage;

use super::reminder::ReminderToken;
use super::session::MeetingSession;

pub struct MeetingWatcher {
    session: MeetingSession,
    prefix: String,
}

impl MeetingWatcher {
    pub const NAME: &'static str = "meeting";

    pub fn new(session: MeetingSession, prefix: impl Into<String>) -> Self {
        Self {
            session,
            prefix: prefix.into(),
        }
    }

    fn usage(&self) -> String {
        format!(
            "Usage: {}{} <status|rollcall|next|breakout|skip|bump|done>",
            self.prefix,
            Self::NAME
        )
    }
}

impl Watcher for MeetingWatcher {
    fn module_name(&self) -> &'static str {
        Self::NAME
    }

    fn module_commands(&self) -> &'static [&'static str] {
        &["status", "rollcall", "next", "skip", "bump", "breakout", "done"]
    }

    fn handle_command(&mut self, cmd: &CommandArgs) {
        debug!("meeting {} from {}", cmd.command, cmd.user);
        match cmd.command.as_str() {
            "status" => self.session.status(),
            "rollcall" => self.session.start_roll_call(&cmd.user),
            "next" => self.session.advance(&cmd.user),
            "skip" => self.session.skip(&cmd.user, &cmd.args),
            "bump" => self.session.bump(&cmd.user, &cmd.args),
            "breakout" => self.session.register_breakout(&cmd.joined_args()),
            "done" => self.session.force_end(&cmd.user),
            _ => self.session.announce(self.usage()),
        }
    }

    fn handle_message(&mut self, message: &RoomMessage) {
        self.session.observe_activity(&message.sender);
    }

    fn handle_reminder(&mut self, token: ReminderToken) {
        self.session.on_timeout(token);
    }
}
