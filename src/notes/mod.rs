//! Meeting notes: a plain-text log of everything said in the room while
//! logging is switched on.
//!
//! The `log` module exposes `on`, `off` and `status`. Meetings switch it on
//! and off through [`LoggingToggle`] using a per-week label.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use regex::Regex;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{debug, info, warn};

use crate::command::{CommandArgs, Watcher};
use crate::room::{Announcement, Announcer, Authorizer, RoomMessage};

/// Switches notes logging on or off under a session label.
pub trait LoggingToggle: Send + Sync {
    fn set_logging(&self, label: &str, enabled: bool);
}

/// `notes_<iso year>_<iso week>` for the week containing `date`.
pub fn weekly_label(date: NaiveDate) -> String {
    let week = date.iso_week();
    format!("notes_{}_{}", week.year(), week.week())
}

#[derive(Debug, Clone)]
struct ActiveLog {
    label: String,
    path: PathBuf,
}

pub struct NotesLog {
    dir: PathBuf,
    unsafe_chars: Regex,
    active: Mutex<Option<ActiveLog>>,
}

impl NotesLog {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let unsafe_chars = Regex::new(r"[^a-zA-Z0-9_-]")?;

        Ok(Self {
            dir: dir.into(),
            unsafe_chars,
            active: Mutex::new(None),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Starts (or continues) logging to the file for `label`.
    pub fn start(&self, label: &str) -> Result<PathBuf> {
        let file_stem = self.unsafe_chars.replace_all(label, "");
        let file_stem = if file_stem.is_empty() { "notes".into() } else { file_stem };
        let path = self.dir.join(format!("{}.txt", file_stem));

        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(current) = active.as_ref() {
            if current.path == path {
                debug!("Notes already logging to {:?}", path);
                return Ok(path);
            }
        }

        std::fs::create_dir_all(&self.dir).context("Failed to create notes directory")?;
        append_line(
            &path,
            &format!("# {} opened {}", label, Utc::now().format("%Y-%m-%d %H:%M:%S UTC")),
        )?;

        *active = Some(ActiveLog {
            label: label.to_string(),
            path: path.clone(),
        });
        Ok(path)
    }

    /// Stops logging, returning the file that was being written.
    pub fn stop(&self) -> Option<PathBuf> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .map(|log| log.path)
    }

    /// Stops logging only if the active log was started under `label`.
    pub fn stop_label(&self, label: &str) -> Option<PathBuf> {
        let mut active = self.active.lock().unwrap_or_else(PoisonError::into_inner);
        match active.as_ref() {
            Some(log) if log.label == label => active.take().map(|log| log.path),
            _ => None,
        }
    }

    pub fn active_label(&self) -> Option<String> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|log| log.label.clone())
    }

    pub fn active_path(&self) -> Option<PathBuf> {
        self.active
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|log| log.path.clone())
    }

    /// Appends `message` if logging is on.
    pub fn record(&self, message: &RoomMessage) -> Result<()> {
        let Some(path) = self.active_path() else {
            return Ok(());
        };
        append_line(
            &path,
            &format!(
                "[{}] {}: {}",
                message.timestamp.format("%H:%M:%S"),
                message.sender,
                message.body
            ),
        )
    }
}

impl LoggingToggle for NotesLog {
    fn set_logging(&self, label: &str, enabled: bool) {
        if enabled {
            match self.start(label) {
                Ok(path) => info!("Notes logging on: {:?}", path),
                Err(e) => warn!("Failed to start notes '{}': {:#}", label, e),
            }
        } else {
            match self.stop_label(label) {
                Some(path) => info!("Notes logging off: {:?}", path),
                None => debug!("Notes '{}' not active, leaving logging as is", label),
            }
        }
    }
}

fn append_line(path: &Path, line: &str) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open notes file {:?}", path))?;
    writeln!(file, "{}", line).context("Failed to write notes")?;
    Ok(())
}

/// The `log` command module.
pub struct LogWatcher {
    notes: Arc<NotesLog>,
    authorizer: Arc<dyn Authorizer>,
    announcer: Arc<dyn Announcer>,
}

impl LogWatcher {
    pub const NAME: &'static str = "log";

    pub fn new(notes: Arc<NotesLog>, authorizer: Arc<dyn Authorizer>, announcer: Arc<dyn Announcer>) -> Self {
        Self {
            notes,
            authorizer,
            announcer,
        }
    }

    fn announce(&self, announcement: impl Into<Announcement>) {
        self.announcer.announce(announcement.into());
    }

    fn status(&self) {
        match self.notes.active_label() {
            Some(label) => self.announce(format!("Logging is on ({}).", label)),
            None => self.announce("Logging is off."),
        }
    }
}

impl Watcher for LogWatcher {
    fn module_name(&self) -> &'static str {
        Self::NAME
    }

    fn module_commands(&self) -> &'static [&'static str] {
        &["on", "off", "status"]
    }

    fn handle_command(&mut self, cmd: &CommandArgs) {
        match cmd.command.as_str() {
            "status" => self.status(),
            "on" | "off" => {
                if !self.authorizer.is_operator(&cmd.user) {
                    debug!("Ignoring log {} from {}", cmd.command, cmd.user);
                    return;
                }
                if cmd.command == "on" {
                    // A label argument wins over the event id
                    let label = cmd.args.first().unwrap_or(&cmd.id);
                    self.notes.set_logging(label, true);
                } else if let Some(path) = self.notes.stop() {
                    info!("Notes logging off: {:?}", path);
                }
                self.status();
            }
            _ => self.announce("Usage: log <on|off|status> [label]"),
        }
    }

    fn handle_message(&mut self, message: &RoomMessage) {
        if let Err(e) = self.notes.record(message) {
            warn!("Failed to record message {}: {:#}", message.event_id, e);
        }
    }
}
