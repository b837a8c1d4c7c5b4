use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};
use tracing::warn;

use super::{LineParser, RoomTransport};
use crate::room::RoomMessage;

/// Interactive room on stdin/stdout.
pub struct ConsoleTransport {
    lines: Lines<BufReader<Stdin>>,
    stdout: Stdout,
    parser: LineParser,
}

impl ConsoleTransport {
    pub fn new() -> Result<Self> {
        Ok(Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            stdout: tokio::io::stdout(),
            parser: LineParser::new()?,
        })
    }
}

#[async_trait]
impl RoomTransport for ConsoleTransport {
    async fn next_message(&mut self) -> Result<Option<RoomMessage>> {
        while let Some(line) = self
            .lines
            .next_line()
            .await
            .context("Failed to read from stdin")?
        {
            if line.trim().is_empty() {
                continue;
            }
            match self.parser.parse(&line) {
                Ok(message) => return Ok(Some(message)),
                Err(e) => warn!("Skipping input: {}", e),
            }
        }
        Ok(None)
    }

    async fn send(&mut self, text: &str) -> Result<()> {
        self.stdout
            .write_all(format!("turnbot> {}\n", text).as_bytes())
            .await
            .context("Failed to write to stdout")?;
        self.stdout.flush().await?;
        Ok(())
    }
}
