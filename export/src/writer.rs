use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use scalpel::Summary;

use crate::Strategy;
use crate::artifact::{FILES_DIR, SEQUENCES_DIR, plan_artifacts};
use crate::error::ExportError;

/// Directory created under the base path to hold every export.
pub const OUTPUT_DIR_NAME: &str = "scalpel_output";

pub const JSON_FILE_NAME: &str = "summary.json";

/// Writes a `Summary` to disk under `<base>/scalpel_output`.
#[derive(Debug, Clone)]
pub struct Exporter {
    root: PathBuf,
    strategy: Strategy,
}

impl Exporter {
    pub fn new(base: impl AsRef<Path>, strategy: Strategy) -> Self {
        Exporter {
            root: base.as_ref().join(OUTPUT_DIR_NAME),
            strategy,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write the `sequences/` and `files/` trees. Returns the written paths.
    ///
    /// Both directories are created even when the summary is empty.
    pub fn write_text(&self, summary: &Summary) -> Result<Vec<PathBuf>, ExportError> {
        for dir in [SEQUENCES_DIR, FILES_DIR] {
            create_dir(&self.root.join(dir))?;
        }

        let mut written = Vec::new();
        for artifact in plan_artifacts(summary, self.strategy)? {
            let path = self.root.join(&artifact.path);
            if let Some(parent) = path.parent() {
                create_dir(parent)?;
            }
            fs::write(&path, artifact.contents).map_err(ExportError::io(&path))?;
            log::info!("wrote {}", path.display());
            written.push(path);
        }
        Ok(written)
    }

    /// Write `summary.json` with the summary's dictionary form.
    pub fn write_json(&self, summary: &Summary) -> Result<PathBuf, ExportError> {
        create_dir(&self.root)?;
        let path = self.root.join(JSON_FILE_NAME);
        let file = File::create(&path).map_err(ExportError::io(&path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, &summary.to_dict())?;
        writer.flush().map_err(ExportError::io(&path))?;
        log::info!("wrote {}", path.display());
        Ok(path)
    }
}

fn create_dir(path: &Path) -> Result<(), ExportError> {
    fs::create_dir_all(path).map_err(ExportError::io(path))
}
