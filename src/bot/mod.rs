//! Routes room events to the registered command modules.
//!
//! Modules are held in an explicit, ordered list. Every message is shown to
//! every module; a command whose verb names a module is handed to that module
//! as a subcommand (`!meeting next`), `help` and `status` are answered across
//! modules, and anything else goes to the built-in commands.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;

use crate::command::{BasicCommands, CommandArgs, Watcher};
use crate::config::Config;
use crate::meeting::{MeetingServices, MeetingSession, MeetingWatcher};
use crate::notes::{LogWatcher, NotesLog};
use crate::room::{Announcement, Announcer, ChatRoom, Operators, RoomEvent, RoomMessage};

/// Shared room handles the standard modules are built from.
#[derive(Clone)]
pub struct BotParts {
    pub room: Arc<ChatRoom>,
    pub operators: Arc<Operators>,
    pub announcer: Arc<dyn Announcer>,
    pub notes: Arc<NotesLog>,
    pub events: mpsc::UnboundedSender<RoomEvent>,
}

pub struct Bot {
    prefix: String,
    announcer: Arc<dyn Announcer>,
    watchers: Vec<Box<dyn Watcher>>,
}

impl Bot {
    pub fn new(
        prefix: impl Into<String>,
        announcer: Arc<dyn Announcer>,
        watchers: Vec<Box<dyn Watcher>>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            announcer,
            watchers,
        }
    }

    /// Built-in commands, meetings and notes, in that order.
    pub fn standard(config: &Config, parts: BotParts) -> Self {
        let prefix = config.bot.command_prefix.clone();

        let basic = BasicCommands::new(
            prefix.clone(),
            parts.operators.clone(),
            parts.room.clone(),
            parts.room.clone(),
            parts.announcer.clone(),
        );

        let session = MeetingSession::new(
            MeetingServices {
                roster: parts.room.clone(),
                resolver: parts.room.clone(),
                announcer: parts.announcer.clone(),
                authorizer: parts.operators.clone(),
                notes: parts.notes.clone(),
            },
            config.meeting.clone(),
            parts.events,
        );
        let meeting = MeetingWatcher::new(session, prefix.clone());

        let log = LogWatcher::new(parts.notes, parts.operators, parts.announcer.clone());

        Self::new(
            prefix,
            parts.announcer,
            vec![Box::new(basic), Box::new(meeting), Box::new(log)],
        )
    }

    pub fn module_names(&self) -> Vec<&'static str> {
        self.watchers.iter().map(|w| w.module_name()).collect()
    }

    pub fn handle_event(&mut self, event: RoomEvent) {
        match event {
            RoomEvent::Message(message) => self.handle_message(&message),
            RoomEvent::Reminder(token) => {
                for watcher in &mut self.watchers {
                    watcher.handle_reminder(token);
                }
            }
        }
    }

    pub fn handle_message(&mut self, message: &RoomMessage) {
        for watcher in &mut self.watchers {
            watcher.handle_message(message);
        }

        if let Some(cmd) = CommandArgs::parse(&self.prefix, message) {
            self.dispatch(&cmd);
        }
    }

    fn dispatch(&mut self, cmd: &CommandArgs) {
        debug!("Command '{}' from {}", cmd.command, cmd.user);
        match cmd.command.as_str() {
            "help" => self.help(cmd),
            "status" => {
                for watcher in &mut self.watchers {
                    if watcher.module_commands().contains(&"status") {
                        watcher.handle_command(cmd);
                    }
                }
            }
            verb => {
                if let Some(watcher) = self.watchers.iter_mut().find(|w| w.module_name() == verb) {
                    let sub = cmd.pop().unwrap_or_else(|| CommandArgs {
                        command: String::new(),
                        args: Vec::new(),
                        ..cmd.clone()
                    });
                    watcher.handle_command(&sub);
                } else if let Some(basic) = self
                    .watchers
                    .iter_mut()
                    .find(|w| w.module_name() == BasicCommands::NAME)
                {
                    basic.handle_command(cmd);
                }
            }
        }
    }

    fn help(&self, cmd: &CommandArgs) {
        if cmd.args.is_empty() {
            let mut words = vec!["The following modules are available:".to_string()];
            words.extend(self.module_names().into_iter().map(str::to_string));
            self.announce(words);
            self.announce(format!(
                "Use {}help <modulename..> to see what commands are available.",
                self.prefix
            ));
            return;
        }

        for name in &cmd.args {
            if let Some(watcher) = self.watchers.iter().find(|w| w.module_name() == name) {
                let mut words = vec![format!("Module {} understands:", watcher.module_name())];
                words.extend(watcher.module_commands().iter().map(|c| c.to_string()));
                self.announce(words);
            }
        }
    }

    fn announce(&self, announcement: impl Into<Announcement>) {
        self.announcer.announce(announcement.into());
    }
}
