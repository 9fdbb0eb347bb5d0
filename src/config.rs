//! User configuration — default directories and the menu title.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/iso2chroot/config.toml` (default `~/.config/iso2chroot/config.toml`).
//! Command-line flags take precedence over the file.

use std::path::{Path, PathBuf};

use crate::core::iso::DEFAULT_MOUNT_DIR;

const DEFAULT_ISO_DIR: &str = "/var/lib/libvirt/isos";
const DEFAULT_TITLE: &str = "iso2chroot - TUI (experimental)";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory scanned for ISO images.
    pub iso_dir: PathBuf,
    /// Directory the selected ISO is mounted into.
    pub mount_dir: PathBuf,
    /// Title shown at the top of the interactive menu.
    pub title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            iso_dir: PathBuf::from(DEFAULT_ISO_DIR),
            mount_dir: PathBuf::from(DEFAULT_MOUNT_DIR),
            title: DEFAULT_TITLE.to_owned(),
        }
    }
}

impl AppConfig {
    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(err) => {
                tracing::debug!("no config at {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Apply command-line overrides.
    pub fn with_overrides(mut self, iso_dir: Option<PathBuf>, mount_dir: Option<PathBuf>) -> Self {
        if let Some(dir) = iso_dir {
            self.iso_dir = dir;
        }
        if let Some(dir) = mount_dir {
            self.mount_dir = dir;
        }
        self
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');
            if value.is_empty() {
                continue;
            }

            match key {
                "iso_dir" => config.iso_dir = PathBuf::from(value),
                "mount_dir" => config.mount_dir = PathBuf::from(value),
                "title" => config.title = value.to_owned(),
                other => tracing::debug!("ignoring unknown config key {other:?}"),
            }
        }

        config
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/iso2chroot/config.toml`).
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join(env!("CARGO_PKG_NAME")).join("config.toml")
}
