use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::renderer::{RenderMode, SizeRequest};
use crate::shared::constants;

/// Effective rendering settings: defaults, then the config file, then the
/// command line.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Settings {
    /// 1-based column images start at; 0 keeps the cursor column.
    pub column: u32,
    /// 1-based row of the first image; ignored for more than one file.
    pub row: u32,
    /// Forced width in pixels, 0 for automatic.
    pub width: u32,
    /// Forced height in pixels, 0 for automatic.
    pub height: u32,
    pub keep_size: bool,
    pub mode: RenderMode,
    pub log_file: Option<PathBuf>,
}

/// Values given on the command line. `None` leaves the setting alone.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub column: Option<u32>,
    pub row: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub keep_size: bool,
    pub mode: Option<RenderMode>,
    pub log_file: Option<PathBuf>,
}

/// Settings read from a config file, with the keys that were not understood.
#[derive(Clone, Debug, Default)]
pub struct LoadedConfig {
    pub settings: Settings,
    pub unknown_keys: Vec<String>,
}

pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(constants::CONFIG_DIR).join(constants::CONFIG_FILE))
}

impl Settings {
    /// Defaults merged with the config file at `path`, or with the default
    /// config file when no path is given.
    ///
    /// An explicit path must exist; a missing default file is not an error.
    pub fn load(path: Option<&Path>) -> Result<LoadedConfig> {
        let mut loaded = LoadedConfig::default();

        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => return Ok(loaded),
            },
        };

        if !required && !path.exists() {
            return Ok(loaded);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        loaded.unknown_keys = loaded
            .settings
            .apply_config(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(loaded)
    }

    /// Apply `key = value` lines. Blank lines and `#` comments are skipped.
    ///
    /// Returns the keys that were ignored.
    pub fn apply_config(&mut self, content: &str) -> Result<Vec<String>> {
        let mut unknown = Vec::new();
        for (index, line) in content.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once('=') else {
                bail!("line {}: expected `key = value`", line_no);
            };
            let (key, value) = (key.trim(), value.trim());

            let known = self
                .apply_entry(key, value)
                .with_context(|| format!("line {}: bad value for `{}`", line_no, key))?;
            if !known {
                unknown.push(key.to_string());
            }
        }
        Ok(unknown)
    }

    fn apply_entry(&mut self, key: &str, value: &str) -> Result<bool> {
        match key {
            "mode" => {
                self.mode = RenderMode::from_str(value, true).map_err(anyhow::Error::msg)?;
            }
            "keep" => self.keep_size = parse_bool(value)?,
            "width" => self.width = value.parse()?,
            "height" => self.height = value.parse()?,
            "column" => self.column = value.parse()?,
            "row" => self.row = value.parse()?,
            "log-file" => {
                self.log_file = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(column) = overrides.column {
            self.column = column;
        }
        if let Some(row) = overrides.row {
            self.row = row;
        }
        if let Some(width) = overrides.width {
            self.width = width;
        }
        if let Some(height) = overrides.height {
            self.height = height;
        }
        if overrides.keep_size {
            self.keep_size = true;
        }
        if let Some(mode) = overrides.mode {
            self.mode = mode;
        }
        if let Some(path) = &overrides.log_file {
            self.log_file = Some(path.clone());
        }
    }

    pub fn size_request(&self, terminal_columns: u32) -> SizeRequest {
        SizeRequest {
            terminal_columns,
            forced_width: self.width,
            forced_height: self.height,
            keep_size: self.keep_size,
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => bail!("expected a boolean, got `{}`", other),
    }
}
