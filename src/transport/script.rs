//! Replays a meeting transcript.
//!
//! Each line is either `sender> text`, `wait <seconds>` to let time pass
//! (reminders fire while waiting), a blank line or a `#` comment.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::path::Path;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

use super::{LineParser, RoomTransport};
use crate::room::RoomMessage;

#[derive(Debug, Clone)]
pub enum ScriptStep {
    Say(RoomMessage),
    Wait(Duration),
}

pub struct ScriptedTransport {
    steps: VecDeque<ScriptStep>,
    wait_until: Option<Instant>,
    sent: Vec<String>,
    echo: bool,
}

impl ScriptedTransport {
    pub fn parse(script: &str) -> Result<Self> {
        let mut parser = LineParser::new()?;
        let mut steps = VecDeque::new();

        for (number, line) in script.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            if let Some(seconds) = trimmed.strip_prefix("wait ") {
                let seconds: u64 = seconds
                    .trim()
                    .parse()
                    .with_context(|| format!("Invalid wait on line {}", number + 1))?;
                steps.push_back(ScriptStep::Wait(Duration::from_secs(seconds)));
                continue;
            }

            match parser.parse(line) {
                Ok(message) => steps.push_back(ScriptStep::Say(message)),
                Err(e) => bail!("Line {}: {}", number + 1, e),
            }
        }

        debug!("Parsed script with {} steps", steps.len());
        Ok(Self {
            steps,
            wait_until: None,
            sent: Vec::new(),
            echo: false,
        })
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let script = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {:?}", path))?;
        info!("Replaying script {:?}", path);
        Self::parse(&script)
    }

    /// Also print the conversation to stdout while replaying.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Everything the bot said so far.
    pub fn sent(&self) -> &[String] {
        &self.sent
    }
}

#[async_trait]
impl RoomTransport for ScriptedTransport {
    async fn next_message(&mut self) -> Result<Option<RoomMessage>> {
        while let Some(step) = self.steps.front().cloned() {
            match step {
                ScriptStep::Wait(duration) => {
                    // The deadline survives an interrupted wait
                    let deadline = *self
                        .wait_until
                        .get_or_insert_with(|| Instant::now() + duration);
                    tokio::time::sleep_until(deadline).await;
                    self.wait_until = None;
                    self.steps.pop_front();
                }
                ScriptStep::Say(message) => {
                    self.steps.pop_front();
                    if self.echo {
                        println!("{}> {}", message.sender, message.body);
                    }
                    return Ok(Some(message));
                }
            }
        }
        Ok(None)
    }

    async fn send(&mut self, text: &str) -> Result<()> {
        if self.echo {
            println!("turnbot> {}", text);
        }
        self.sent.push(text.to_string());
        Ok(())
    }
}
