//! Command parsing and the module interface.
//!
//! A room message whose body starts with the command prefix becomes a
//! [`CommandArgs`]. Modules implementing [`Watcher`] receive the commands
//! routed to them plus every message in the room.

pub mod basic;

pub use basic::BasicCommands;

use crate::meeting::ReminderToken;
use crate::room::RoomMessage;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    /// Event id of the message that carried the command.
    pub id: String,
    pub user: String,
    pub command: String,
    pub args: Vec<String>,
}

impl CommandArgs {
    /// Returns `None` when the message is not a command.
    pub fn parse(prefix: &str, message: &RoomMessage) -> Option<Self> {
        let rest = message.body.trim().strip_prefix(prefix)?;
        if rest.starts_with(char::is_whitespace) {
            return None;
        }

        let mut words = rest.split_whitespace();
        let command = words.next()?.to_lowercase();

        Some(Self {
            id: message.event_id.clone(),
            user: message.sender.clone(),
            command,
            args: words.map(str::to_string).collect(),
        })
    }

    /// Drops the verb and promotes the first argument: `meeting next bob`
    /// becomes `next bob`. Returns `None` if there is no argument to promote.
    pub fn pop(&self) -> Option<Self> {
        let (command, args) = self.args.split_first()?;
        Some(Self {
            id: self.id.clone(),
            user: self.user.clone(),
            command: command.to_lowercase(),
            args: args.to_vec(),
        })
    }

    pub fn joined_args(&self) -> String {
        self.args.join(" ")
    }
}

/// A command module registered with the bot.
pub trait Watcher: Send {
    fn module_name(&self) -> &'static str;

    fn module_commands(&self) -> &'static [&'static str];

    fn handle_command(&mut self, cmd: &CommandArgs);

    /// Called for every message in the room, commands included.
    fn handle_message(&mut self, message: &RoomMessage);

    fn handle_reminder(&mut self, _token: ReminderToken) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(body: &str) -> RoomMessage {
        RoomMessage::new("$event1", "@alice:example.org", body)
    }

    #[test]
    fn test_parse_command() {
        let cmd = CommandArgs::parse("!", &message("  !Meeting skip bob carol ")).unwrap();
        assert_eq!(cmd.id, "$event1");
        assert_eq!(cmd.user, "@alice:example.org");
        assert_eq!(cmd.command, "meeting");
        assert_eq!(cmd.args, vec!["skip", "bob", "carol"]);
    }

    #[test]
    fn test_parse_non_commands() {
        assert!(CommandArgs::parse("!", &message("hello there")).is_none());
        assert!(CommandArgs::parse("!", &message("! meeting")).is_none());
        assert!(CommandArgs::parse("!", &message("!")).is_none());
    }

    #[test]
    fn test_parse_custom_prefix() {
        let cmd = CommandArgs::parse("turnbot:", &message("turnbot:status")).unwrap();
        assert_eq!(cmd.command, "status");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_pop_subcommand() {
        let cmd = CommandArgs::parse("!", &message("!meeting BREAKOUT api review")).unwrap();
        let sub = cmd.pop().unwrap();
        assert_eq!(sub.command, "breakout");
        assert_eq!(sub.joined_args(), "api review");
        assert_eq!(sub.user, cmd.user);

        let bare = CommandArgs::parse("!", &message("!meeting")).unwrap();
        assert!(bare.pop().is_none());
    }
}
