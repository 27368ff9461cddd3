use std::ops::Range;

use crate::parser::ParserOptions;
use crate::parser::annotation::{Annotations, parse_annotations};
use crate::parser::error::{ParseError, ParseErrorKind};
use crate::registry::Registry;
use crate::sequence::Sequence;
use crate::sequence::block::Block;
use crate::summary::Summary;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Run the line processor over a whole document.
pub fn process_document(
    source: &str,
    file_id: usize,
    options: &ParserOptions,
) -> Result<Summary, ParseError> {
    let mut state = LineProcessor::new(options, file_id);
    for (number, (line, span)) in lines_with_spans(source).enumerate() {
        state.process_line(line, span, number + 1)?;
    }
    Ok(state.finish())
}

// ---------------------------------------------------------------------------
// Parse state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum BlockState {
    Outside,
    /// Inside an annotated block; holds the span of its opening fence.
    Inside(Range<usize>),
}

struct LineProcessor<'a> {
    options: &'a ParserOptions,
    file_id: usize,
    state: BlockState,
    /// Sequences whose last block receives the current block's lines, each once.
    active_sequences: Vec<String>,
    /// File receiving the current block's lines.
    active_file: Option<String>,
    sequences: Registry<Sequence>,
    files: Registry<String>,
}

impl<'a> LineProcessor<'a> {
    fn new(options: &'a ParserOptions, file_id: usize) -> Self {
        LineProcessor {
            options,
            file_id,
            state: BlockState::Outside,
            active_sequences: Vec::new(),
            active_file: None,
            sequences: Registry::new(),
            files: Registry::new(),
        }
    }

    fn process_line(
        &mut self,
        line: &str,
        span: Range<usize>,
        number: usize,
    ) -> Result<(), ParseError> {
        if !line.starts_with(self.options.fence.as_str()) {
            self.append(line);
            return Ok(());
        }

        if !line.contains(self.options.marker.as_str()) {
            self.close_block(number);
            return Ok(());
        }

        if let BlockState::Inside(open) = &self.state {
            return Err(
                ParseError::new(ParseErrorKind::NestedBlock, span, number, self.file_id)
                    .with_open_fence(open.clone())
                    .with_note("close the open block with a plain fence first"),
            );
        }

        let tokens = self.annotation_tokens(line);
        if tokens.is_empty() || line.trim_end().ends_with(self.options.marker.as_str()) {
            return Err(
                ParseError::new(ParseErrorKind::NoArguments, span, number, self.file_id)
                    .with_note(format!(
                        "expected `key=value` pairs after `{}`, and the line must not end with it",
                        self.options.marker
                    )),
            );
        }

        let annotations = parse_annotations(tokens).map_err(|kind| {
            ParseError::new(kind, span.clone(), number, self.file_id)
                .with_note("annotations take the form `key=value`")
        })?;

        self.open_block(annotations, span, number);
        Ok(())
    }

    /// Whitespace-separated tokens following the first marker keyword.
    fn annotation_tokens<'l>(&self, line: &'l str) -> Vec<&'l str> {
        line.split_once(self.options.marker.as_str())
            .map(|(_, rest)| rest.split_whitespace().collect())
            .unwrap_or_default()
    }

    fn open_block(&mut self, annotations: Annotations, span: Range<usize>, number: usize) {
        if annotations.is_inert() {
            log::debug!(
                "line {}: annotated block feeds no sequence or file; its lines are dropped",
                number
            );
        }

        let Annotations {
            name,
            sequences,
            file,
        } = annotations;

        for seq_name in sequences {
            self.sequences
                .get_or_insert_with(&seq_name, Sequence::new)
                .push_block(Block::new(name.clone()));
            if !self.active_sequences.contains(&seq_name) {
                self.active_sequences.push(seq_name);
            }
        }

        if let Some(file_name) = file {
            self.files.get_or_insert_with(&file_name, String::new);
            self.active_file = Some(file_name);
        }

        log::debug!(
            "line {}: opened block {:?} (sequences: {:?}, file: {:?})",
            number,
            name,
            self.active_sequences,
            self.active_file
        );
        self.state = BlockState::Inside(span);
    }

    fn close_block(&mut self, number: usize) {
        if self.state != BlockState::Outside {
            log::debug!("line {}: closed annotated block", number);
        }
        self.state = BlockState::Outside;
        self.active_sequences.clear();
        self.active_file = None;
    }

    fn append(&mut self, line: &str) {
        for seq_name in &self.active_sequences {
            if let Some(block) = self
                .sequences
                .get_mut(seq_name)
                .and_then(Sequence::last_block_mut)
            {
                block.commands.push(line.to_string());
            }
        }
        if let Some(file_name) = &self.active_file {
            if let Some(text) = self.files.get_mut(file_name) {
                text.push_str(line);
                text.push('\n');
            }
        }
    }

    fn finish(self) -> Summary {
        if let BlockState::Inside(open) = &self.state {
            log::debug!("document ended inside the block opened at byte {}", open.start);
        }
        Summary::new(self.sequences, self.files)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Split `source` into lines (without `\n` or `\r\n`) paired with their byte spans.
fn lines_with_spans(source: &str) -> impl Iterator<Item = (&str, Range<usize>)> {
    let mut offset = 0;
    source.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let line = line.strip_suffix('\r').unwrap_or(line);
        (line, start..start + line.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_cover_line_text() {
        let source = "ab\r\ncd\n\nef";
        let lines: Vec<_> = lines_with_spans(source).collect();
        assert_eq!(
            lines,
            vec![("ab", 0..2), ("cd", 4..6), ("", 7..7), ("ef", 8..10)]
        );
    }

    #[test]
    fn empty_source_has_no_lines() {
        assert_eq!(lines_with_spans("").count(), 0);
    }

    #[test]
    fn tokens_follow_first_marker() {
        let options = ParserOptions::default();
        let processor = LineProcessor::new(&options, 0);
        assert_eq!(
            processor.annotation_tokens("```bash scalpel name=x  file=y"),
            vec!["name=x", "file=y"]
        );
        assert_eq!(
            processor.annotation_tokens("```scalpel name=scalpel file=scalpel.txt"),
            vec!["name=scalpel", "file=scalpel.txt"]
        );
        assert!(processor.annotation_tokens("```scalpel   ").is_empty());
    }
}
