use std::fmt;

use crate::summary::Summary;

/// Human-readable report: counts, block listings, file contents, then the
/// flattened script of every sequence.
impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SUMMARY:")?;
        writeln!(f, "TOTAL SEQUENCES: {}", self.sequences.len())?;
        writeln!(f, "TOTAL FILES: {}", self.files.len())?;
        writeln!(f)?;

        for (name, sequence) in self.sequences.iter() {
            writeln!(f, "SEQUENCE: {}", name)?;
            for block in &sequence.blocks {
                writeln!(f, "BLOCK: {}", block.name.as_deref().unwrap_or("(unnamed)"))?;
                for command in &block.commands {
                    writeln!(f, "{}", command)?;
                }
            }
            writeln!(f)?;
        }

        for (name, text) in self.files.iter() {
            writeln!(f, "FILE: {}", name)?;
            writeln!(f, "{}", text)?;
        }

        writeln!(f, "FULL SEQUENCES:")?;
        for (name, sequence) in self.sequences.iter() {
            writeln!(f, "{}:", name)?;
            writeln!(f, "{}", sequence.flatten())?;
        }
        Ok(())
    }
}
