//! Persisted user preferences.
//!
//! Stored as JSON, by default at `~/.pack3r-tui/settings.json`. A missing
//! or unreadable file means defaults; the app never fails to start because
//! of it.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Last selected Pack3r executable.
    pub pack3r_path: String,
    /// Mapping install directory (the one containing `maps/`), with a
    /// trailing separator.
    pub maps_path: String,
    pub wrap_output_lines: bool,
}

pub fn default_settings_path() -> PathBuf {
    let home = std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    home.join(".pack3r-tui").join("settings.json")
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create settings directory: {}", parent.display()))?;
    }
    Ok(())
}

fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, data).with_context(|| format!("Failed to write temp file: {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace {} with {}", path.display(), tmp.display()))?;
    Ok(())
}

pub fn load(path: &Path) -> anyhow::Result<Settings> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let settings: Settings =
        serde_json::from_str(&raw).with_context(|| format!("Invalid settings JSON at {}", path.display()))?;
    Ok(settings)
}

pub fn save(path: &Path, settings: &Settings) -> anyhow::Result<()> {
    let data = serde_json::to_vec_pretty(settings).context("Failed to serialize settings")?;
    write_atomic(path, &data)
}

/// Settings bound to the file they are saved to.
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    /// Loads `path`, falling back to defaults if it doesn't exist or is broken.
    pub fn open(path: PathBuf) -> Self {
        let settings = if path.exists() {
            match load(&path) {
                Ok(settings) => {
                    info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    warn!("Using default settings: {:#}", e);
                    Settings::default()
                }
            }
        } else {
            Settings::default()
        };

        Self { path, settings }
    }

    pub fn get(&self) -> &Settings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` and writes the file if anything changed.
    ///
    /// Save failures are logged; the in-memory value is kept either way.
    pub fn update(&mut self, change: impl FnOnce(&mut Settings)) {
        let before = self.settings.clone();
        change(&mut self.settings);
        if self.settings == before {
            return;
        }

        if let Err(e) = save(&self.path, &self.settings) {
            warn!("Failed to save settings: {:#}", e);
        }
    }
}
