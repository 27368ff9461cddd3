use serde::Serialize;

/// One contiguous run of lines between an annotated opening fence and the next
/// fence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Block {
    /// Label from the `name=` annotation, if any.
    pub name: Option<String>,
    /// Lines of the block, verbatim, without line terminators.
    pub commands: Vec<String>,
}

impl Block {
    pub fn new(name: Option<String>) -> Self {
        Block {
            name,
            commands: Vec::new(),
        }
    }
}
