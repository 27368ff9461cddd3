use std::fs;
use std::path::Path;

use scalpel_export::{Exporter, JSON_FILE_NAME, OUTPUT_DIR_NAME, Strategy};

const DOC: &str = "\
# Deploy

```scalpel name=install sequences=deploy,ci
apt-get install -y nginx
```

```scalpel name=config file=nginx.conf
server { listen 80; }
```

```scalpel name=start sequences=deploy
systemctl start nginx
```
";

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("cannot read {}: {}", path.display(), e))
}

#[test]
fn full_strategy_writes_one_file_per_sequence() {
    let dir = tempfile::tempdir().unwrap();
    let summary = scalpel::process_str(DOC).unwrap();
    let exporter = Exporter::new(dir.path(), Strategy::Full);

    let written = exporter.write_text(&summary).unwrap();
    assert_eq!(written.len(), 3);

    let root = dir.path().join(OUTPUT_DIR_NAME);
    assert_eq!(exporter.root(), root.as_path());
    assert_eq!(
        read(&root.join("sequences/deploy")),
        "apt-get install -y nginx\nsystemctl start nginx\n"
    );
    assert_eq!(read(&root.join("sequences/ci")), "apt-get install -y nginx\n");
    assert_eq!(read(&root.join("files/nginx.conf")), "server { listen 80; }\n");
}

#[test]
fn blocks_strategy_writes_one_file_per_block() {
    let dir = tempfile::tempdir().unwrap();
    let summary = scalpel::process_str(DOC).unwrap();
    Exporter::new(dir.path(), Strategy::Blocks)
        .write_text(&summary)
        .unwrap();

    let seq_dir = dir.path().join(OUTPUT_DIR_NAME).join("sequences/deploy");
    assert_eq!(read(&seq_dir.join("deploy_install")), "apt-get install -y nginx\n");
    assert_eq!(read(&seq_dir.join("deploy_start")), "systemctl start nginx\n");
    assert!(!dir.path().join(OUTPUT_DIR_NAME).join("sequences/deploy_install").exists());
}

#[test]
fn duplicate_block_names_are_not_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let doc = "```scalpel name=step sequences=s\none\n```\n```scalpel name=step sequences=s\ntwo\n```\n";
    let summary = scalpel::process_str(doc).unwrap();
    Exporter::new(dir.path(), Strategy::Blocks)
        .write_text(&summary)
        .unwrap();

    let seq_dir = dir.path().join(OUTPUT_DIR_NAME).join("sequences/s");
    assert_eq!(read(&seq_dir.join("s_step")), "one\n");
    assert_eq!(read(&seq_dir.join("s_step_2")), "two\n");
}

#[test]
fn empty_summary_still_creates_directories() {
    let dir = tempfile::tempdir().unwrap();
    let summary = scalpel::process_str("nothing to extract\n").unwrap();
    let written = Exporter::new(dir.path(), Strategy::Full)
        .write_text(&summary)
        .unwrap();

    assert!(written.is_empty());
    let root = dir.path().join(OUTPUT_DIR_NAME);
    assert!(root.join("sequences").is_dir());
    assert!(root.join("files").is_dir());
}

#[test]
fn nested_file_names_get_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let summary = scalpel::process_str("```scalpel file=etc/app/config.toml\nkey = 1\n```\n").unwrap();
    Exporter::new(dir.path(), Strategy::Full)
        .write_text(&summary)
        .unwrap();

    let path = dir.path().join(OUTPUT_DIR_NAME).join("files/etc/app/config.toml");
    assert_eq!(read(&path), "key = 1\n");
}

#[test]
fn json_export_matches_to_dict() {
    let dir = tempfile::tempdir().unwrap();
    let summary = scalpel::process_str(DOC).unwrap();
    let path = Exporter::new(dir.path(), Strategy::Full)
        .write_json(&summary)
        .unwrap();

    assert_eq!(path, dir.path().join(OUTPUT_DIR_NAME).join(JSON_FILE_NAME));
    let value: serde_json::Value = serde_json::from_str(&read(&path)).unwrap();
    assert_eq!(value, summary.to_dict());
    assert_eq!(
        value["sequences"]["deploy"]["blocks"][1]["name"],
        serde_json::json!("start")
    );
}

#[test]
fn unwritable_root_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("occupied");
    fs::write(&blocker, "a file, not a directory").unwrap();

    let summary = scalpel::process_str(DOC).unwrap();
    let err = Exporter::new(&blocker, Strategy::Full)
        .write_text(&summary)
        .unwrap_err();
    assert!(err.to_string().contains("occupied"), "got: {}", err);
}
