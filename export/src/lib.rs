pub mod artifact;
pub mod error;
pub mod writer;

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

pub use artifact::{Artifact, plan_artifacts};
pub use error::ExportError;
pub use writer::{Exporter, JSON_FILE_NAME, OUTPUT_DIR_NAME};

/// How sequences are laid out on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// One file per sequence holding its flattened script.
    #[default]
    Full,
    /// One file per block, grouped in a directory per sequence.
    Blocks,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "full" => Ok(Strategy::Full),
            "blocks" => Ok(Strategy::Blocks),
            other => Err(format!(
                "unknown strategy '{}' (expected 'full' or 'blocks')",
                other
            )),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Full => write!(f, "full"),
            Strategy::Blocks => write!(f, "blocks"),
        }
    }
}

/// Which outputs an export run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    /// The `sequences/` and `files/` directory tree.
    Text,
    /// `summary.json`.
    Json,
}

impl FromStr for OutputKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(OutputKind::Text),
            "json" => Ok(OutputKind::Json),
            other => Err(format!(
                "unknown output type '{}' (expected 'text' or 'json')",
                other
            )),
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputKind::Text => write!(f, "text"),
            OutputKind::Json => write!(f, "json"),
        }
    }
}
