use std::collections::HashMap;

use crate::parser::error::ParseErrorKind;

const KEY_NAME: &str = "name";
const KEY_SEQUENCES: &str = "sequences";
const KEY_FILE: &str = "file";

/// Recognized annotations of one opening fence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotations {
    pub name: Option<String>,
    /// Every segment of the comma-separated `sequences` value, in order.
    /// Repeats and empty names are kept; each one opens its own block.
    pub sequences: Vec<String>,
    pub file: Option<String>,
}

impl Annotations {
    /// True when the block feeds neither a sequence nor a file.
    pub fn is_inert(&self) -> bool {
        self.sequences.is_empty() && self.file.is_none()
    }
}

/// Parse the `key=value` tokens that follow the marker keyword.
///
/// All tokens are read into a map before any key is interpreted, so `name`
/// applies no matter where it sits relative to `sequences`. Tokens without `=`
/// are skipped; unknown keys are ignored.
pub fn parse_annotations<'a>(
    tokens: impl IntoIterator<Item = &'a str>,
) -> Result<Annotations, ParseErrorKind> {
    let mut args: HashMap<&str, &str> = HashMap::new();

    for token in tokens {
        let Some((key, value)) = token.split_once('=') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            return Err(ParseErrorKind::ArgValueMissing {
                token: token.to_string(),
            });
        }
        args.insert(key, value);
    }

    for key in args.keys() {
        if ![KEY_NAME, KEY_SEQUENCES, KEY_FILE].contains(key) {
            log::debug!("ignoring unknown annotation `{}`", key);
        }
    }

    let sequences: Vec<String> = args
        .get(KEY_SEQUENCES)
        .map(|list| list.split(',').map(str::to_string).collect())
        .unwrap_or_default();

    Ok(Annotations {
        name: args.get(KEY_NAME).map(|s| s.to_string()),
        sequences,
        file: args.get(KEY_FILE).map(|s| s.to_string()),
    })
}
