use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use scalpel::{Parser, Summary};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestConfig {
    /// Human-readable test description.
    #[serde(default)]
    pub description: Option<String>,

    /// Expected parse error code (`nested-block`, `no-arguments`,
    /// `arg-value-missing`).
    #[serde(default)]
    pub expect_error: Option<String>,

    /// If set together with `expect_error`, the 1-based line the error must point at.
    #[serde(default)]
    pub expect_error_line: Option<usize>,

    /// If true, the document must produce no sequences and no files.
    #[serde(default)]
    pub expect_empty: bool,

    /// Sequence names in the order the document introduces them.
    #[serde(default)]
    pub expect_sequence_order: Option<Vec<String>>,

    /// Sequence name -> expected flattened script.
    #[serde(default)]
    pub expect_sequences: BTreeMap<String, String>,

    /// File name -> expected accumulated text.
    #[serde(default)]
    pub expect_files: BTreeMap<String, String>,
}

/// Parse a `.test.md` file into its TOML config and document source.
fn parse_test_file(content: &str) -> Result<(TestConfig, &str), String> {
    let content = content.trim_start_matches('\u{feff}'); // strip BOM

    if !content.starts_with("---") {
        return Err("missing opening --- frontmatter delimiter".into());
    }

    let after_open = &content[3..];
    let after_open = after_open
        .strip_prefix('\n')
        .or_else(|| after_open.strip_prefix("\r\n"))
        .unwrap_or(after_open);

    let close_pos = after_open
        .find("\n---")
        .ok_or("missing closing --- frontmatter delimiter")?;

    let toml_str = after_open[..close_pos].trim_end_matches('\r');
    let rest_start = close_pos + 4; // skip \n---
    let source = after_open[rest_start..]
        .strip_prefix("\r\n")
        .or_else(|| after_open[rest_start..].strip_prefix('\n'))
        .unwrap_or(&after_open[rest_start..]);

    let config: TestConfig =
        toml::from_str(toml_str).map_err(|e| format!("TOML parse error: {}", e))?;

    Ok((config, source))
}

pub enum TestOutcome {
    Pass,
    Fail(String),
}

pub struct TestResult {
    pub path: PathBuf,
    pub description: Option<String>,
    pub outcome: TestOutcome,
}

fn run_single_test(path: &Path) -> TestResult {
    let fail = |description: Option<String>, reason: String| TestResult {
        path: path.to_path_buf(),
        description,
        outcome: TestOutcome::Fail(reason),
    };

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => return fail(None, format!("cannot read file: {}", e)),
    };

    let (config, source) = match parse_test_file(&content) {
        Ok(pair) => pair,
        Err(e) => return fail(None, format!("frontmatter error: {}", e)),
    };

    let description = config.description.clone();
    let parse_result = Parser::new(source.to_string(), 0).parse();

    let outcome = match (&config.expect_error, parse_result) {
        (Some(expected), Err(err)) => {
            if err.kind.code() != expected.as_str() {
                Some(format!(
                    "expected error '{}', got '{}' ({})",
                    expected,
                    err.kind.code(),
                    err
                ))
            } else {
                match config.expect_error_line {
                    Some(line) if line != err.line => Some(format!(
                        "expected error on line {}, got line {}",
                        line, err.line
                    )),
                    _ => None,
                }
            }
        }
        (Some(expected), Ok(_)) => Some(format!(
            "expected error '{}', but parsing succeeded",
            expected
        )),
        (None, Err(err)) => Some(format!("unexpected parse error: {}", err)),
        (None, Ok(summary)) => check_summary(&config, &summary),
    };

    match outcome {
        Some(reason) => fail(description, reason),
        None => TestResult {
            path: path.to_path_buf(),
            description,
            outcome: TestOutcome::Pass,
        },
    }
}

/// Compare a parsed summary against the fixture's expectations.
/// Returns `Some(reason)` on mismatch.
fn check_summary(config: &TestConfig, summary: &Summary) -> Option<String> {
    if config.expect_empty && !summary.is_empty() {
        return Some(format!(
            "expected no sequences or files, got {} sequence(s) and {} file(s)",
            summary.sequences().len(),
            summary.files().len()
        ));
    }

    if let Some(order) = &config.expect_sequence_order {
        let actual: Vec<&str> = summary.sequences().names().collect();
        if actual != order.iter().map(String::as_str).collect::<Vec<_>>() {
            return Some(format!(
                "sequence order mismatch\n  expected: {:?}\n  actual:   {:?}",
                order, actual
            ));
        }
    }

    for (name, expected) in &config.expect_sequences {
        match summary.full_sequence(name) {
            Ok(actual) if &actual == expected => {}
            Ok(actual) => {
                return Some(format!(
                    "sequence '{}' mismatch\n  expected: {:?}\n  actual:   {:?}",
                    name, expected, actual
                ));
            }
            Err(err) => return Some(err.to_string()),
        }
    }

    for (name, expected) in &config.expect_files {
        match summary.file(name) {
            Some(actual) if actual == expected.as_str() => {}
            Some(actual) => {
                return Some(format!(
                    "file '{}' mismatch\n  expected: {:?}\n  actual:   {:?}",
                    name, expected, actual
                ));
            }
            None => return Some(format!("file '{}' was not produced", name)),
        }
    }

    None
}

/// Discover `.test.md` files grouped by category (subfolder relative to root).
/// Files directly in `root` get category "" (uncategorized).
fn discover_categorized(root: &Path) -> BTreeMap<String, Vec<PathBuf>> {
    let mut categories: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    collect_tests(root, root, &mut categories);
    for files in categories.values_mut() {
        files.sort();
    }
    categories
}

fn collect_tests(dir: &Path, root: &Path, out: &mut BTreeMap<String, Vec<PathBuf>>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_tests(&path, root, out);
        } else if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            if name.ends_with(".test.md") {
                let category = path
                    .parent()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
                    .unwrap_or_default();
                out.entry(category).or_default().push(path);
            }
        }
    }
}

fn pass_label(no_color: bool) -> &'static str {
    if no_color { "PASS" } else { "\x1b[32mPASS\x1b[0m" }
}

fn fail_label(no_color: bool) -> &'static str {
    if no_color { "FAIL" } else { "\x1b[31mFAIL\x1b[0m" }
}

fn bold(s: &str, no_color: bool) -> String {
    if no_color {
        s.to_string()
    } else {
        format!("\x1b[1m{}\x1b[0m", s)
    }
}

fn label_for(result: &TestResult) -> &str {
    result.description.as_deref().unwrap_or_else(|| {
        result
            .path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("?")
    })
}

/// Run all `.test.md` files under `path` (or a single file).
/// Returns exit code: 0 = all pass, 1 = any failure.
pub fn run_tests(path: &Path, no_color: bool) -> i32 {
    let categories: BTreeMap<String, Vec<PathBuf>> = if path.is_file() {
        BTreeMap::from([(String::new(), vec![path.to_path_buf()])])
    } else {
        discover_categorized(path)
    };

    if categories.is_empty() {
        eprintln!("no .test.md files found in {}", path.display());
        return 1;
    }

    let mut passed = 0usize;
    let mut failures: Vec<TestResult> = Vec::new();

    for (cat, files) in &categories {
        let header = if cat.is_empty() { "(root)" } else { cat.as_str() };
        eprintln!();
        eprintln!("{}", bold(header, no_color));

        for file in files {
            let result = run_single_test(file);
            match &result.outcome {
                TestOutcome::Pass => {
                    passed += 1;
                    eprintln!("  {}  {}", pass_label(no_color), label_for(&result));
                }
                TestOutcome::Fail(_) => {
                    eprintln!("  {}  {}", fail_label(no_color), label_for(&result));
                    failures.push(result);
                }
            }
        }
    }

    if !failures.is_empty() {
        eprintln!();
        eprintln!("failures:");
        for f in &failures {
            eprintln!();
            eprintln!("  --- {} ---", f.path.display());
            if let TestOutcome::Fail(reason) = &f.outcome {
                for line in reason.lines() {
                    eprintln!("  {}", line);
                }
            }
        }
    }

    eprintln!();
    let failed = failures.len();
    if failed == 0 {
        let ok = if no_color { "ok" } else { "\x1b[32mok\x1b[0m" };
        eprintln!("test result: {}. {} passed, 0 failed", ok, passed);
        0
    } else {
        let bad = if no_color { "FAILED" } else { "\x1b[31mFAILED\x1b[0m" };
        eprintln!(
            "test result: {}. {} passed, {} failed (of {})",
            bad,
            passed,
            failed,
            passed + failed
        );
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontmatter_is_split_from_document() {
        let content = "---\ndescription = \"x\"\nexpect_empty = true\n---\n# Doc\ntext\n";
        let (config, source) = parse_test_file(content).unwrap();
        assert_eq!(config.description.as_deref(), Some("x"));
        assert!(config.expect_empty);
        assert_eq!(source, "# Doc\ntext\n");
    }

    #[test]
    fn missing_frontmatter_is_reported() {
        assert!(parse_test_file("# no frontmatter\n").is_err());
        assert!(parse_test_file("---\nexpect_empty = true\n").is_err());
    }

    #[test]
    fn check_summary_reports_sequence_mismatch() {
        let (config, source) = parse_test_file(
            "---\n[expect_sequences]\na = \"wrong\\n\"\n---\n```scalpel sequences=a\nright\n```\n",
        )
        .unwrap();
        let summary = scalpel::process_str(source).unwrap();
        let reason = check_summary(&config, &summary).expect("mismatch");
        assert!(reason.contains("sequence 'a' mismatch"), "got: {}", reason);
    }

    #[test]
    fn bundled_fixtures_pass() {
        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
        assert_eq!(run_tests(&fixtures, true), 0);
    }
}
