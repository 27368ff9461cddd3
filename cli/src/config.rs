//! Project configuration loaded from `scalpel.toml`.
//!
//! Values from the file sit between command-line flags (which win) and the
//! built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use scalpel::ParserOptions;
use scalpel::parser::{DEFAULT_FENCE, DEFAULT_MARKER};
use scalpel_export::{OutputKind, Strategy};

pub const CONFIG_FILE_NAME: &str = "scalpel.toml";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Token that starts a fence line.
    #[serde(default = "default_fence")]
    pub fence: String,

    /// Keyword marking a fence as annotated.
    #[serde(default = "default_marker")]
    pub marker: String,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Base directory; exports land in `<path>/scalpel_output`.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,

    #[serde(default)]
    pub strategy: Strategy,

    #[serde(default = "default_output_types")]
    pub types: Vec<OutputKind>,
}

fn default_fence() -> String {
    DEFAULT_FENCE.to_string()
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_output_path() -> PathBuf {
    PathBuf::from(".")
}

fn default_output_types() -> Vec<OutputKind> {
    vec![OutputKind::Text]
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            path: default_output_path(),
            strategy: Strategy::default(),
            types: default_output_types(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fence: default_fence(),
            marker: default_marker(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Load an explicit config file, or `./scalpel.toml` when present, or
    /// fall back to defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let local = Path::new(CONFIG_FILE_NAME);
                if local.is_file() {
                    Self::from_file(local)
                } else {
                    log::debug!("no {} found, using defaults", CONFIG_FILE_NAME);
                    Ok(Config::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config '{}'", path.display()))?;
        let config = Self::from_toml(&text)
            .with_context(|| format!("invalid config '{}'", path.display()))?;
        log::debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        if config.fence.is_empty() {
            bail!("`fence` must not be empty");
        }
        if config.marker.is_empty() {
            bail!("`marker` must not be empty");
        }
        Ok(config)
    }

    pub fn parser_options(&self) -> ParserOptions {
        ParserOptions {
            fence: self.fence.clone(),
            marker: self.marker.clone(),
        }
    }
}
