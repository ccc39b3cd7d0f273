use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const CORPUS: &str = "#!cexversion
3.0

#!citelibrary
name#Demo library

#!ctsdata
// demo corpus
urn:cts:x:a.b:1.1#hello world
urn:cts:x:a.b:1.2#goodbye
urn:cts:x:c.d:1#\"quoted # text, said hello\"
urn:cts:x:a.b:1.3#hello again

#!ctscatalog
urn#citationScheme#groupName
";

fn cex_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_cex"))
}

fn setup_test_env(corpus: &str) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().to_path_buf();

    let cex_dir = root.join("cex");
    fs::create_dir_all(&cex_dir).unwrap();
    fs::write(cex_dir.join("corpus.cex"), corpus).unwrap();

    let config_dir = root.join("config");
    fs::create_dir_all(&config_dir).unwrap();

    let config_content = format!(
        r#"[source]
path = "{}/cex/corpus.cex"

[server]
bind = "127.0.0.1:0"
"#,
        root.display()
    );

    let config_path = config_dir.join("cex.toml");
    fs::write(&config_path, config_content).unwrap();

    (tmp, config_path)
}

fn run_cex(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = cex_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run cex binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

#[test]
fn test_check_summarizes_corpus() {
    let (_tmp, config_path) = setup_test_env(CORPUS);

    let (stdout, stderr, success) = run_cex(&config_path, &["check"]);
    assert!(success, "check failed: stdout={}, stderr={}", stdout, stderr);
    // a.b, c.d, then a.b again
    assert!(stdout.contains("works: 3"), "stdout: {}", stdout);
    assert!(stdout.contains("passages: 4"), "stdout: {}", stdout);
    assert!(stdout.contains("sha256: "));
    assert!(stdout.contains("ok"));
}

#[test]
fn test_check_json_dump() {
    let (_tmp, config_path) = setup_test_env(CORPUS);

    let (stdout, stderr, success) = run_cex(&config_path, &["check", "--json"]);
    assert!(success, "check --json failed: {}", stderr);

    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let works = value["works"].as_array().unwrap();
    assert_eq!(works.len(), 3);
    assert_eq!(works[0]["work_id"], "urn:cts:x:a.b");
    assert_eq!(works[2]["work_id"], "urn:cts:x:a.b");
    // The quoted field keeps its delimiter.
    assert_eq!(works[1]["passages"][0]["text"], "quoted # text, said hello");
    assert_eq!(works[2]["passages"][0]["index"], 0);
}

#[test]
fn test_search_lists_matches_in_corpus_order() {
    let (_tmp, config_path) = setup_test_env(CORPUS);

    let (stdout, stderr, success) = run_cex(&config_path, &["search", "hello"]);
    assert!(success, "search failed: {}", stderr);

    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(
        lines,
        vec![
            "3 matching passages:",
            "urn:cts:x:a.b:1.1",
            "urn:cts:x:c.d:1",
            "urn:cts:x:a.b:1.3",
        ]
    );
}

#[test]
fn test_search_single_match() {
    let (_tmp, config_path) = setup_test_env(CORPUS);

    let (stdout, _, success) = run_cex(&config_path, &["search", "goodbye"]);
    assert!(success);
    assert_eq!(stdout.lines().collect::<Vec<_>>(), vec!["1 matching passage:", "urn:cts:x:a.b:1.2"]);
}

#[test]
fn test_search_no_match_is_success() {
    let (_tmp, config_path) = setup_test_env(CORPUS);

    let (stdout, _, success) = run_cex(&config_path, &["search", "zzz"]);
    assert!(success);
    assert!(stdout.contains("No matching passages."));
}

#[test]
fn test_search_empty_query_fails() {
    let (_tmp, config_path) = setup_test_env(CORPUS);

    let (_, stderr, success) = run_cex(&config_path, &["search", ""]);
    assert!(!success);
    assert!(stderr.contains("must not be empty"), "stderr: {}", stderr);
}

#[test]
fn test_missing_sentinel_fails() {
    let (_tmp, config_path) = setup_test_env("#!cexversion\n3.0\n");

    let (_, stderr, success) = run_cex(&config_path, &["check"]);
    assert!(!success);
    assert!(stderr.contains("#!ctsdata"), "stderr: {}", stderr);
}

#[test]
fn test_malformed_record_reports_location() {
    let (_tmp, config_path) =
        setup_test_env("#!ctsdata\nurn:cts:x:a:1#fine\nno delimiter\n");

    let (_, stderr, success) = run_cex(&config_path, &["check"]);
    assert!(!success);
    assert!(
        stderr.contains("malformed record 1 at line 3"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn test_missing_config_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, stderr, success) = run_cex(&tmp.path().join("absent.toml"), &["check"]);
    assert!(!success);
    assert!(stderr.contains("Failed to read config file"));
}
