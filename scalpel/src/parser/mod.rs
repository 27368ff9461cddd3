pub mod annotation;
pub mod error;
mod line_processor;

pub use error::{ParseError, ParseErrorKind};

use crate::Summary;

pub const DEFAULT_FENCE: &str = "```";
pub const DEFAULT_MARKER: &str = "scalpel";

/// Tokens that identify fences and annotated fences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// A line starting with this token is a fence.
    pub fence: String,
    /// A fence containing this keyword opens an annotated block.
    pub marker: String,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            fence: DEFAULT_FENCE.to_string(),
            marker: DEFAULT_MARKER.to_string(),
        }
    }
}

/// Parser entry point.
pub struct Parser {
    source: String,
    file_id: usize,
    options: ParserOptions,
}

impl Parser {
    pub fn new(source: String, file_id: usize) -> Self {
        Parser {
            source,
            file_id,
            options: ParserOptions::default(),
        }
    }

    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse the whole document in one pass. The first content error aborts
    /// the parse; no partial summary is returned.
    pub fn parse(&self) -> Result<Summary, ParseError> {
        line_processor::process_document(&self.source, self.file_id, &self.options)
    }
}
