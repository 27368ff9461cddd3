mod report;

use std::fmt;

use serde::Serialize;

use crate::registry::Registry;
use crate::sequence::Sequence;

/// Everything extracted from one document: sequences of blocks and
/// accumulated file contents, both in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    sequences: Registry<Sequence>,
    files: Registry<String>,
}

impl Summary {
    pub fn new(sequences: Registry<Sequence>, files: Registry<String>) -> Self {
        Summary { sequences, files }
    }

    pub fn sequences(&self) -> &Registry<Sequence> {
        &self.sequences
    }

    pub fn files(&self) -> &Registry<String> {
        &self.files
    }

    pub fn sequence(&self, name: &str) -> Option<&Sequence> {
        self.sequences.get(name)
    }

    pub fn file(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    /// True when the document contained no annotated blocks that reference a
    /// sequence or a file.
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty() && self.files.is_empty()
    }

    /// Squash every block of `name` into one script, one command per line.
    pub fn full_sequence(&self, name: &str) -> Result<String, UnknownSequence> {
        self.sequences
            .get(name)
            .map(Sequence::flatten)
            .ok_or_else(|| UnknownSequence(name.to_string()))
    }

    /// Sequences (with blocks and commands) and files as a JSON value.
    /// Flattened scripts are not included.
    pub fn to_dict(&self) -> serde_json::Value {
        serde_json::json!({
            "sequences": &self.sequences,
            "files": &self.files,
        })
    }
}

/// Lookup of a sequence name the document never declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSequence(pub String);

impl fmt::Display for UnknownSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sequence: {}", self.0)
    }
}

impl std::error::Error for UnknownSequence {}
