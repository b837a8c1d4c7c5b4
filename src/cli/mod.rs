use crate::config::Config;
use anyhow::{Context, Result};

pub mod args;

pub use args::{Cli, CliCommand, ConfigCliArgs, ConfigCommand, RunCliArgs};

pub fn handle_config_command(args: ConfigCliArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            let content = toml::to_string_pretty(&config).context("Failed to serialize config")?;
            println!("{}", content);
        }
        ConfigCommand::Path => {
            println!("{}", Config::config_path()?.display());
        }
    }
    Ok(())
}
