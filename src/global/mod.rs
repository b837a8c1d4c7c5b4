//! Per-user file locations.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

const APP_DIR: &str = "turnbot";
const CONFIG_FILE: &str = "config.toml";
const NOTES_DIR: &str = "notes";

/// `~/.config/turnbot/config.toml` on Linux.
pub fn config_file() -> Result<PathBuf> {
    let base = dirs::config_dir().context("Unable to determine config directory")?;
    Ok(config_file_in(&base))
}

/// Default notes directory, `~/.local/share/turnbot/notes` on Linux.
pub fn notes_dir() -> Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
        .context("Unable to determine data directory")?;
    Ok(notes_dir_in(&base))
}

fn config_file_in(base: &Path) -> PathBuf {
    base.join(APP_DIR).join(CONFIG_FILE)
}

fn notes_dir_in(base: &Path) -> PathBuf {
    base.join(APP_DIR).join(NOTES_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_live_under_app_dir() {
        let base = Path::new("/home/alice/.config");
        assert_eq!(
            config_file_in(base),
            PathBuf::from("/home/alice/.config/turnbot/config.toml")
        );

        let base = Path::new("/home/alice/.local/share");
        assert_eq!(
            notes_dir_in(base),
            PathBuf::from("/home/alice/.local/share/turnbot/notes")
        );
    }
}
