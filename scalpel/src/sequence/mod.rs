pub mod block;

use serde::Serialize;

use crate::sequence::block::Block;

/// A named, ordered collection of blocks whose commands flatten into one script.
/// Every annotation that references the sequence appends a fresh block; blocks
/// are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sequence {
    pub blocks: Vec<Block>,
}

impl Sequence {
    pub fn new() -> Self {
        Sequence { blocks: Vec::new() }
    }

    pub fn push_block(&mut self, block: Block) {
        self.blocks.push(block);
    }

    /// The block currently receiving lines (the most recently appended one).
    pub fn last_block_mut(&mut self) -> Option<&mut Block> {
        self.blocks.last_mut()
    }

    /// All commands of all blocks, each followed by a newline.
    pub fn flatten(&self) -> String {
        let mut script = String::new();
        for block in &self.blocks {
            for command in &block.commands {
                script.push_str(command);
                script.push('\n');
            }
        }
        script
    }
}
