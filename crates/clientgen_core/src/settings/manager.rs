//! Settings manager for loading and atomically saving the settings file.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::types::Settings;

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] io::Error),

    #[error("Failed to parse settings: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize settings: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Settings file not found: {0}")]
    NotFound(PathBuf),
}

/// Result type for settings operations.
pub type SettingsResult<T> = Result<T, SettingsError>;

/// Per-user location of the settings file, `settings.toml` in the working
/// directory when no home directory can be resolved.
pub fn default_settings_path() -> PathBuf {
    directories::ProjectDirs::from("io.github", "clientgen", "clientgen-console")
        .map(|dirs| dirs.config_dir().join("settings.toml"))
        .unwrap_or_else(|| PathBuf::from("settings.toml"))
}

/// Loads and saves console settings.
pub struct SettingsManager {
    path: PathBuf,
    settings: Settings,
}

impl SettingsManager {
    /// Create a manager for the given file. Does not touch the disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings: Settings::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Changes made here are only in memory until `save()` is called.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }

    /// Load settings from file. Returns error if the file doesn't exist.
    pub fn load(&mut self) -> SettingsResult<()> {
        if !self.path.exists() {
            return Err(SettingsError::NotFound(self.path.clone()));
        }

        let content = fs::read_to_string(&self.path)?;
        self.settings = toml::from_str(&content)?;
        Ok(())
    }

    /// Load settings, writing a default file first if there is none.
    pub fn load_or_create(&mut self) -> SettingsResult<()> {
        if self.path.exists() {
            self.load()
        } else {
            tracing::info!(path = %self.path.display(), "creating default settings file");
            self.settings = Settings::default();
            self.save()
        }
    }

    /// Save the whole file atomically.
    pub fn save(&self) -> SettingsResult<()> {
        let content = self.generate_with_comments()?;
        self.atomic_write(&content)?;
        Ok(())
    }

    fn generate_with_comments(&self) -> SettingsResult<String> {
        let mut output = String::new();

        output.push_str("# clientgen console settings\n");
        output.push_str("# Command-line flags override values in this file.\n\n");

        push_section(&mut output, "Engine web server", "backend", &self.settings.backend)?;
        push_section(&mut output, "Stats polling", "poller", &self.settings.poller)?;
        push_section(&mut output, "Alert display", "alerts", &self.settings.alerts)?;
        push_section(&mut output, "Packet chart", "chart", &self.settings.chart)?;
        push_section(&mut output, "Config export", "export", &self.settings.export)?;
        push_section(&mut output, "Logging", "logging", &self.settings.logging)?;

        Ok(output)
    }

    /// Writes to a temp file next to the target, then renames over it.
    fn atomic_write(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("toml.tmp");
        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

fn push_section<T: Serialize>(
    output: &mut String,
    comment: &str,
    table: &str,
    section: &T,
) -> SettingsResult<()> {
    output.push_str(&format!("# {comment}\n[{table}]\n"));
    for line in toml::to_string_pretty(section)?.lines() {
        output.push_str(line);
        output.push('\n');
    }
    output.push('\n');
    Ok(())
}
