//! Grid configuration.
//!
//! Values are layered: built-in defaults, then an optional `config.json`, then
//! command-line flags. Later layers only override the keys they set.

use std::fs;
use std::io;
use std::path::Path;

use datagrid_lib::model::Column;
use datagrid_lib::view::DEFAULT_REVEAL_COUNT;
use log::debug;
use log::info;
use serde::Deserialize;

use crate::error::ConfigError;

/// Tunables for the grid front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridConfig {
    /// Rows realized when the grid is first shown.
    pub initial_reveal: usize,
    /// Rows added each time the body scrolls near its end.
    pub reveal_step: usize,
    /// Distance from the end, in rows, that counts as "near".
    pub scroll_threshold: usize,
    /// Rows scrolled per mouse wheel notch.
    pub scroll_wheel_rows: usize,
    /// Width for columns that declare none.
    pub default_column_width: u16,
    pub min_column_width: u16,
    pub max_column_width: u16,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            initial_reveal: DEFAULT_REVEAL_COUNT,
            reveal_step: 10,
            scroll_threshold: 1,
            scroll_wheel_rows: 3,
            default_column_width: 14,
            min_column_width: 4,
            max_column_width: 40,
        }
    }
}

/// On-disk form of [`GridConfig`]. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    pub initial_reveal: Option<usize>,
    pub reveal_step: Option<usize>,
    pub scroll_threshold: Option<usize>,
    pub scroll_wheel_rows: Option<usize>,
    pub default_column_width: Option<u16>,
    pub min_column_width: Option<u16>,
    pub max_column_width: Option<u16>,
}

impl ConfigFile {
    /// Reads a config file. A missing file at the default location is not an
    /// error, so `required` is false for the platform path.
    pub fn load(path: &Path, required: bool) -> Result<Option<Self>, ConfigError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound && !required => {
                debug!("No config file at {}", path.display());
                return Ok(None);
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let file = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(Some(file))
    }
}

impl GridConfig {
    pub fn with_initial_reveal(mut self, rows: usize) -> Self {
        self.initial_reveal = rows;
        self
    }

    pub fn with_reveal_step(mut self, rows: usize) -> Self {
        self.reveal_step = rows;
        self
    }

    pub fn with_scroll_threshold(mut self, rows: usize) -> Self {
        self.scroll_threshold = rows;
        self
    }

    pub fn with_default_column_width(mut self, width: u16) -> Self {
        self.default_column_width = width;
        self
    }

    /// Applies every key the file sets.
    pub fn merge(self, file: ConfigFile) -> Self {
        Self {
            initial_reveal: file.initial_reveal.unwrap_or(self.initial_reveal),
            reveal_step: file.reveal_step.unwrap_or(self.reveal_step),
            scroll_threshold: file.scroll_threshold.unwrap_or(self.scroll_threshold),
            scroll_wheel_rows: file.scroll_wheel_rows.unwrap_or(self.scroll_wheel_rows),
            default_column_width: file
                .default_column_width
                .unwrap_or(self.default_column_width),
            min_column_width: file.min_column_width.unwrap_or(self.min_column_width),
            max_column_width: file.max_column_width.unwrap_or(self.max_column_width),
        }
    }

    /// Display width for a column, clamped to the configured range.
    pub fn column_width(&self, column: &Column) -> u16 {
        let min = self.min_column_width.max(1);
        let max = self.max_column_width.max(min);
        column
            .width
            .unwrap_or(self.default_column_width)
            .clamp(min, max)
    }
}
