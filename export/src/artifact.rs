use std::collections::HashSet;
use std::path::PathBuf;

use scalpel::sequence::Sequence;
use scalpel::{Summary, UnknownSequence};

use crate::Strategy;

pub const SEQUENCES_DIR: &str = "sequences";
pub const FILES_DIR: &str = "files";

/// One output file, with its path relative to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

/// Compute every file a text export writes, without touching the filesystem.
///
/// Sequences come first (laid out per `strategy`), then file entries, both in
/// document order.
pub fn plan_artifacts(
    summary: &Summary,
    strategy: Strategy,
) -> Result<Vec<Artifact>, UnknownSequence> {
    let mut artifacts = Vec::new();

    for (name, sequence) in summary.sequences().iter() {
        match strategy {
            Strategy::Full => artifacts.push(Artifact {
                path: PathBuf::from(SEQUENCES_DIR).join(name),
                contents: summary.full_sequence(name)?,
            }),
            Strategy::Blocks => {
                let dir = PathBuf::from(SEQUENCES_DIR).join(name);
                for (file_name, contents) in block_artifacts(name, sequence) {
                    artifacts.push(Artifact {
                        path: dir.join(file_name),
                        contents,
                    });
                }
            }
        }
    }

    for (name, text) in summary.files().iter() {
        artifacts.push(Artifact {
            path: PathBuf::from(FILES_DIR).join(name),
            contents: text.clone(),
        });
    }

    Ok(artifacts)
}

/// File names and contents for the `blocks` layout of one sequence.
///
/// A block is named `<sequence>_<label>`, where the label is the block name or
/// its 1-based position when unnamed. Clashing names get `_2`, `_3`, ...
/// appended in block order.
fn block_artifacts(sequence_name: &str, sequence: &Sequence) -> Vec<(String, String)> {
    let mut used: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(sequence.blocks.len());

    for (i, block) in sequence.blocks.iter().enumerate() {
        let label = match &block.name {
            Some(name) => name.clone(),
            None => (i + 1).to_string(),
        };
        let base = format!("{}_{}", sequence_name, label);
        let mut file_name = base.clone();
        let mut suffix = 2;
        while used.contains(&file_name) {
            file_name = format!("{}_{}", base, suffix);
            suffix += 1;
        }
        if file_name != base {
            log::warn!(
                "sequence '{}': block artifact '{}' already exists, writing '{}' instead",
                sequence_name,
                base,
                file_name
            );
        }
        used.insert(file_name.clone());

        let mut contents = String::new();
        for command in &block.commands {
            contents.push_str(command);
            contents.push('\n');
        }
        out.push((file_name, contents));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(doc: &str) -> Summary {
        scalpel::process_str(doc).expect("parse failed")
    }

    fn paths(artifacts: &[Artifact]) -> Vec<String> {
        artifacts
            .iter()
            .map(|a| a.path.to_string_lossy().replace('\\', "/"))
            .collect()
    }

    #[test]
    fn full_layout() {
        let s = summary("```scalpel sequences=a,b file=f.txt\nx\n```\n```scalpel sequences=a\ny\n```\n");
        let artifacts = plan_artifacts(&s, Strategy::Full).unwrap();
        assert_eq!(paths(&artifacts), vec!["sequences/a", "sequences/b", "files/f.txt"]);
        assert_eq!(artifacts[0].contents, "x\ny\n");
        assert_eq!(artifacts[1].contents, "x\n");
        assert_eq!(artifacts[2].contents, "x\n");
    }

    #[test]
    fn blocks_layout_names_unnamed_blocks_by_position() {
        let s = summary("```scalpel name=init sequences=a\n1\n```\n```scalpel sequences=a\n2\n3\n```\n");
        let artifacts = plan_artifacts(&s, Strategy::Blocks).unwrap();
        assert_eq!(paths(&artifacts), vec!["sequences/a/a_init", "sequences/a/a_2"]);
        assert_eq!(artifacts[1].contents, "2\n3\n");
    }

    #[test]
    fn clashing_block_names_get_suffixes() {
        let s = summary(
            "```scalpel name=step sequences=a\n1\n```\n\
             ```scalpel name=step sequences=a\n2\n```\n\
             ```scalpel name=step_2 sequences=a\n3\n```\n",
        );
        let artifacts = plan_artifacts(&s, Strategy::Blocks).unwrap();
        assert_eq!(
            paths(&artifacts),
            vec!["sequences/a/a_step", "sequences/a/a_step_2", "sequences/a/a_step_2_2"]
        );
        let contents: Vec<&str> = artifacts.iter().map(|a| a.contents.as_str()).collect();
        assert_eq!(contents, vec!["1\n", "2\n", "3\n"]);
    }

    #[test]
    fn empty_summary_plans_nothing() {
        let s = summary("no blocks here\n");
        assert!(plan_artifacts(&s, Strategy::Blocks).unwrap().is_empty());
    }
}
