use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "turnbot")]
#[command(about = "Roll-calls and turn-taking for chat-room meetings", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Join a console room on stdin/stdout, or replay a script
    Run(RunCliArgs),
    /// Inspect the configuration file
    Config(ConfigCliArgs),
    /// Print version information
    Version,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct RunCliArgs {
    /// Room name shown in logs
    #[arg(long, default_value = "console")]
    pub room: String,
    /// User already present in the room (repeatable)
    #[arg(long = "member")]
    pub members: Vec<String>,
    /// Extra operator for this run, on top of the config file (repeatable)
    #[arg(long = "op")]
    pub operators: Vec<String>,
    /// Replay a transcript file instead of reading stdin
    #[arg(long)]
    pub script: Option<PathBuf>,
}

impl Default for RunCliArgs {
    fn default() -> Self {
        Self {
            room: "console".to_string(),
            members: Vec::new(),
            operators: Vec::new(),
            script: None,
        }
    }
}

#[derive(ClapArgs, Debug)]
pub struct ConfigCliArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration
    Show,
    /// Print the configuration file location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_args() {
        let cli = Cli::parse_from([
            "turnbot", "-v", "run", "--member", "alice", "--member", "bob", "--op", "alice",
            "--script", "standup.txt",
        ]);
        assert!(cli.verbose);
        match cli.command {
            Some(CliCommand::Run(args)) => {
                assert_eq!(args.room, "console");
                assert_eq!(args.members, vec!["alice", "bob"]);
                assert_eq!(args.operators, vec!["alice"]);
                assert_eq!(args.script, Some(PathBuf::from("standup.txt")));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::parse_from(["turnbot"]);
        assert!(!cli.verbose);
        assert!(cli.command.is_none());
    }
}
