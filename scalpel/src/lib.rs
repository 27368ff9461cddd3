pub mod parser;
pub mod registry;
pub mod sequence;
pub mod summary;

pub use parser::{ParseError, ParseErrorKind, Parser, ParserOptions};
pub use summary::{Summary, UnknownSequence};

/// Parse a document with the default fence and marker.
///
/// Shorthand for `Parser::new(source, 0).parse()` when no diagnostics file
/// database is involved.
pub fn process_str(source: &str) -> Result<Summary, ParseError> {
    Parser::new(source.to_string(), 0).parse()
}
