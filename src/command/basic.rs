//! Built-in commands: `echo`, `ops` and the bot's own status line.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::debug;

use crate::room::{Announcement, Announcer, Authorizer, IdentityResolver, Operators, RoomMessage, Roster};

use super::{CommandArgs, Watcher};

pub struct BasicCommands {
    prefix: String,
    operators: Arc<Operators>,
    resolver: Arc<dyn IdentityResolver>,
    roster: Arc<dyn Roster>,
    announcer: Arc<dyn Announcer>,
    message_count: u64,
    command_count: u64,
    last_message_at: Option<DateTime<Utc>>,
}

impl BasicCommands {
    pub const NAME: &'static str = "turnbot";

    pub fn new(
        prefix: impl Into<String>,
        operators: Arc<Operators>,
        resolver: Arc<dyn IdentityResolver>,
        roster: Arc<dyn Roster>,
        announcer: Arc<dyn Announcer>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            operators,
            resolver,
            roster,
            announcer,
            message_count: 0,
            command_count: 0,
            last_message_at: None,
        }
    }

    fn announce(&self, announcement: impl Into<Announcement>) {
        self.announcer.announce(announcement.into());
    }

    fn status(&self) {
        let now = Utc::now().format("%H:%M:%S");
        let sent = self
            .last_message_at
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "an unknown time".to_string());
        self.announce(format!(
            "({}) It is {}. Your message was sent at {}. (Time UTC) \
             I can see {} people in the room. I have processed {} messages and {} commands.",
            Self::NAME,
            now,
            sent,
            self.roster.present_users().len(),
            self.message_count,
            self.command_count,
        ));
    }

    fn ops(&self, cmd: &CommandArgs) {
        match cmd.args.first().map(String::as_str) {
            Some("?") | Some("status") => {
                let operators = self.operators.list();
                let mut words = vec![format!("There are {} operators.", operators.len())];
                words.extend(operators);
                self.announce(words);
            }
            Some("+") | Some("add") | Some("op") => self.change_ops(cmd, true),
            Some("-") | Some("remove") | Some("deop") => self.change_ops(cmd, false),
            _ => self.ops_usage(),
        }
    }

    fn change_ops(&self, cmd: &CommandArgs, enable: bool) {
        if !self.operators.is_operator(&cmd.user) {
            self.announce("Only operators can change operators.");
            return;
        }
        if cmd.args.len() < 2 {
            self.ops_usage();
            return;
        }

        for token in &cmd.args[1..] {
            let Some(user) = self.resolver.resolve(token) else {
                self.announce(format!("Unrecognized user '{}' when changing operators.", token));
                continue;
            };

            let changed = if enable {
                self.operators.add(&user)
            } else {
                self.operators.remove(&user)
            };

            match (changed, enable) {
                (true, true) => self.announce(format!("{} is now an operator", user)),
                (true, false) => self.announce(format!("{} is no longer an operator", user)),
                (false, _) => self.announce(format!("Changing operator status of {} failed.", user)),
            }
        }
    }

    fn ops_usage(&self) {
        self.announce(format!("Usage: {}ops status", self.prefix));
        self.announce(format!(
            "Usage: {}ops <add|op|+|remove|deop|-> <name..>",
            self.prefix
        ));
    }
}

impl Watcher for BasicCommands {
    fn module_name(&self) -> &'static str {
        Self::NAME
    }

    fn module_commands(&self) -> &'static [&'static str] {
        &["echo", "ops", "help", "status"]
    }

    fn handle_command(&mut self, cmd: &CommandArgs) {
        match cmd.command.as_str() {
            "echo" => {
                if !cmd.args.is_empty() {
                    self.announce(cmd.args.clone());
                }
            }
            "ops" => self.ops(cmd),
            "status" => self.status(),
            other => {
                debug!("Unknown command '{}' from {}", other, cmd.user);
                self.announce(format!(
                    "Unknown command '{}'. Try {}help.",
                    other, self.prefix
                ));
            }
        }
        self.command_count += 1;
    }

    fn handle_message(&mut self, message: &RoomMessage) {
        self.last_message_at = Some(message.timestamp);
        self.message_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::room::test_support::drain;
    use crate::room::{Announcement, ChatRoom, Outbox};
    use tokio::sync::mpsc::UnboundedReceiver;

    fn setup() -> (BasicCommands, Arc<Operators>, UnboundedReceiver<Announcement>) {
        let room = Arc::new(ChatRoom::new("#test"));
        room.join("@admin:example.org", None);
        room.join("@bob:example.org", None);
        let operators = Arc::new(Operators::new(["@admin:example.org"]));
        let (outbox, rx) = Outbox::channel();
        let basic = BasicCommands::new("!", operators.clone(), room.clone(), room, Arc::new(outbox));
        (basic, operators, rx)
    }

    fn command(user: &str, body: &str) -> CommandArgs {
        CommandArgs::parse("!", &RoomMessage::new("$1", user, body)).unwrap()
    }

    #[test]
    fn test_echo() {
        let (mut basic, _, mut rx) = setup();
        basic.handle_command(&command("@bob:example.org", "!echo hello  world"));
        basic.handle_command(&command("@bob:example.org", "!echo"));
        assert_eq!(drain(&mut rx), vec!["hello world"]);
    }

    #[test]
    fn test_ops_add_requires_operator() {
        let (mut basic, operators, mut rx) = setup();
        basic.handle_command(&command("@bob:example.org", "!ops add bob"));
        assert!(!operators.is_operator("@bob:example.org"));
        assert_eq!(drain(&mut rx), vec!["Only operators can change operators."]);

        basic.handle_command(&command("@admin:example.org", "!ops + bob nobody"));
        assert!(operators.is_operator("@bob:example.org"));
        assert_eq!(
            drain(&mut rx),
            vec![
                "@bob:example.org is now an operator",
                "Unrecognized user 'nobody' when changing operators.",
            ]
        );
    }

    #[test]
    fn test_ops_remove_and_status() {
        let (mut basic, _, mut rx) = setup();
        basic.handle_command(&command("@admin:example.org", "!ops deop admin"));
        assert_eq!(
            drain(&mut rx),
            vec!["Changing operator status of @admin:example.org failed."]
        );

        basic.handle_command(&command("@bob:example.org", "!ops status"));
        assert_eq!(drain(&mut rx), vec!["There are 1 operators. @admin:example.org"]);

        basic.handle_command(&command("@bob:example.org", "!ops"));
        assert_eq!(drain(&mut rx).len(), 2);
    }

    #[test]
    fn test_status_counts_messages_and_commands() {
        let (mut basic, _, mut rx) = setup();
        basic.handle_message(&RoomMessage::new("$1", "@bob:example.org", "hi"));
        basic.handle_message(&RoomMessage::new("$2", "@bob:example.org", "!status"));
        basic.handle_command(&command("@bob:example.org", "!status"));

        let lines = drain(&mut rx);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("(turnbot) It is "));
        assert!(lines[0].contains("I can see 2 people in the room."));
        assert!(lines[0].contains("processed 2 messages and 0 commands."));
    }

    #[test]
    fn test_unknown_command() {
        let (mut basic, _, mut rx) = setup();
        basic.handle_command(&command("@bob:example.org", "!dance"));
        assert_eq!(drain(&mut rx), vec!["Unknown command 'dance'. Try !help."]);
    }
}
