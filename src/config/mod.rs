use crate::global;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub bot: BotConfig,
    pub meeting: MeetingConfig,
    pub notes: NotesConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
    /// Prefix that marks a room message as a command, e.g. `!meeting next`.
    pub command_prefix: String,
    /// User ids that hold operator privileges from startup.
    pub operators: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeetingConfig {
    /// Delay before naming users who have not answered the roll-call.
    pub rollcall_reminder_seconds: u64,
    /// Delay before nudging a speaker who has not said anything.
    pub turn_reminder_seconds: u64,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesConfig {
    /// Overrides the directory meeting notes are written to.
    pub directory: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            command_prefix: "!".to_string(),
            operators: Vec::new(),
        }
    }
}

impl Default for MeetingConfig {
    fn default() -> Self {
        Self {
            rollcall_reminder_seconds: 60,
            turn_reminder_seconds: 30,
        }
    }
}

impl MeetingConfig {
    pub fn rollcall_reminder(&self) -> Duration {
        Duration::from_secs(self.rollcall_reminder_seconds)
    }

    pub fn turn_reminder(&self) -> Duration {
        Duration::from_secs(self.turn_reminder_seconds)
    }
}

impl NotesConfig {
    pub fn notes_dir(&self) -> Result<PathBuf> {
        match &self.directory {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => global::notes_dir(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        if !config_path.exists() {
            info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        Self::load_from(&config_path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, content).context("Failed to write config file")?;

        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        global::config_file()
    }
}
