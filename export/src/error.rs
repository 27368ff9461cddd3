use std::fmt;
use std::io;
use std::path::PathBuf;

use scalpel::UnknownSequence;

#[derive(Debug)]
pub enum ExportError {
    Io { path: PathBuf, source: io::Error },
    Json(serde_json::Error),
    UnknownSequence(UnknownSequence),
}

impl ExportError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> ExportError {
        let path = path.into();
        move |source| ExportError::Io { path, source }
    }
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io { path, source } => {
                write!(f, "cannot write '{}': {}", path.display(), source)
            }
            ExportError::Json(err) => write!(f, "JSON error: {}", err),
            ExportError::UnknownSequence(err) => err.fmt(f),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io { source, .. } => Some(source),
            ExportError::Json(err) => Some(err),
            ExportError::UnknownSequence(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Json(err)
    }
}

impl From<UnknownSequence> for ExportError {
    fn from(err: UnknownSequence) -> Self {
        ExportError::UnknownSequence(err)
    }
}
