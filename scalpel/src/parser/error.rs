use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label};

/// The kind of content error that aborted a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// An annotated fence opened while another annotated block was still open.
    NestedBlock,
    /// An annotated fence carried the marker keyword and nothing after it.
    NoArguments,
    /// An annotation token contained `=` with nothing on one side of it.
    ArgValueMissing { token: String },
}

impl ParseErrorKind {
    /// Stable kebab-case identifier, used by fixtures and CLI output.
    pub fn code(&self) -> &'static str {
        match self {
            ParseErrorKind::NestedBlock => "nested-block",
            ParseErrorKind::NoArguments => "no-arguments",
            ParseErrorKind::ArgValueMissing { .. } => "arg-value-missing",
        }
    }
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorKind::NestedBlock => {
                write!(f, "annotated block opened inside another annotated block")
            }
            ParseErrorKind::NoArguments => write!(f, "annotated block has no arguments"),
            ParseErrorKind::ArgValueMissing { token } => {
                write!(f, "annotation argument `{}` is missing a value", token)
            }
        }
    }
}

/// Parse errors with source location information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Byte span of the offending line.
    pub span: Range<usize>,
    /// 1-based line number of the offending line.
    pub line: usize,
    pub file_id: usize,
    /// Span of the fence that was still open, for nested blocks.
    pub open_fence: Option<Range<usize>>,
    pub notes: Vec<String>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Range<usize>, line: usize, file_id: usize) -> Self {
        ParseError {
            kind,
            span,
            line,
            file_id,
            open_fence: None,
            notes: Vec::new(),
        }
    }

    pub fn with_open_fence(mut self, span: Range<usize>) -> Self {
        self.open_fence = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    pub fn to_diagnostic(&self) -> Diagnostic<usize> {
        let mut labels = vec![Label::primary(self.file_id, self.span.clone())];
        if let Some(open) = &self.open_fence {
            labels.push(
                Label::secondary(self.file_id, open.clone())
                    .with_message("this block is still open"),
            );
        }
        Diagnostic::error()
            .with_message(self.kind.to_string())
            .with_code(self.kind.code())
            .with_labels(labels)
            .with_notes(self.notes.clone())
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.kind)
    }
}

impl std::error::Error for ParseError {}
