use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use turnbot::{
    app,
    cli::{handle_config_command, Cli, CliCommand, RunCliArgs},
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("turnbot {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(CliCommand::Config(args)) => handle_config_command(args),
        Some(CliCommand::Run(args)) => app::run_service(args).await,
        None => app::run_service(RunCliArgs::default()).await,
    }
}
