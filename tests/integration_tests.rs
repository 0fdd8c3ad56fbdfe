use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

/// Runs the binary from an empty directory so no stray config is picked up.
fn commitlens(cwd: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("commitlens").expect("binary exists");
    cmd.current_dir(cwd.path());
    cmd
}

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn json_output(cmd: &mut Command) -> Value {
    let output = cmd.assert().success().get_output().stdout.clone();
    serde_json::from_slice(&output).expect("valid JSON output")
}

// ---------------------------------------------------------------------------
// CLI smoke tests
// ---------------------------------------------------------------------------

#[test]
fn test_help_output() {
    let cwd = TempDir::new().unwrap();
    commitlens(&cwd)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("co-change coupling"));
}

#[test]
fn test_missing_log_argument_fails() {
    let cwd = TempDir::new().unwrap();
    commitlens(&cwd)
        .arg("keywords")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no commit log given"));
}

#[test]
fn test_nonexistent_log_fails() {
    let cwd = TempDir::new().unwrap();
    commitlens(&cwd)
        .args(["-l", "/nonexistent/commits.txt", "keywords"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_undecodable_log_fails() {
    let cwd = TempDir::new().unwrap();
    let path = cwd.path().join("binary.txt");
    std::fs::write(&path, [0x66, 0xC3, 0x28, 0xA0]).unwrap();
    commitlens(&cwd)
        .args(["-l", path.to_str().unwrap(), "defects"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot decode"));
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

#[test]
fn test_keywords_json() {
    let cwd = TempDir::new().unwrap();
    let value = json_output(commitlens(&cwd).args([
        "-l",
        &fixture("commits.txt"),
        "-f",
        "json",
        "keywords",
    ]));

    let keywords = value["keywords"].as_array().unwrap();
    assert_eq!(keywords[0]["word"], "fix");
    assert_eq!(keywords[0]["count"], 2);
    assert_eq!(keywords[1]["word"], "lexer");
    assert_eq!(keywords[1]["count"], 2);
    assert!(keywords.iter().all(|k| k["word"] != "the"));
    assert_eq!(value["summary"]["messages"], 4);
}

#[test]
fn test_keywords_limit() {
    let cwd = TempDir::new().unwrap();
    let value = json_output(commitlens(&cwd).args([
        "-l",
        &fixture("commits.txt"),
        "-f",
        "json",
        "keywords",
        "-n",
        "1",
    ]));
    assert_eq!(value["keywords"].as_array().unwrap().len(), 1);
}

#[test]
fn test_keywords_without_default_stopwords() {
    let cwd = TempDir::new().unwrap();
    let value = json_output(commitlens(&cwd).args([
        "-l",
        &fixture("commits.txt"),
        "-f",
        "json",
        "keywords",
        "--no-default-stopwords",
    ]));
    let keywords = value["keywords"].as_array().unwrap();
    assert!(keywords.iter().any(|k| k["word"] == "the"));
}

#[test]
fn test_keywords_text_output() {
    let cwd = TempDir::new().unwrap();
    commitlens(&cwd)
        .args(["-l", &fixture("commits.txt"), "-f", "text", "keywords"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Top Keywords in Commit Messages"))
        .stdout(predicate::str::contains("fix"));
}

// ---------------------------------------------------------------------------
// Defects
// ---------------------------------------------------------------------------

#[test]
fn test_defects_per_month() {
    let cwd = TempDir::new().unwrap();
    let value = json_output(commitlens(&cwd).args([
        "-l",
        &fixture("commits.txt"),
        "-f",
        "json",
        "defects",
    ]));
    assert_eq!(value["per_month"]["2023-11"], 1);
    assert_eq!(value["per_month"]["2023-12"], 1);
    assert!(value["per_month"].get("2024-01").is_none());
    assert_eq!(value["summary"]["defect_commits"], 2);
    assert_eq!(value["summary"]["total_commits"], 4);
}

#[test]
fn test_defects_custom_keyword() {
    let cwd = TempDir::new().unwrap();
    let value = json_output(commitlens(&cwd).args([
        "-l",
        &fixture("commits.txt"),
        "-f",
        "json",
        "defects",
        "-k",
        "refactor",
    ]));
    assert_eq!(value["per_month"]["2024-01"], 1);
    assert_eq!(value["summary"]["defect_commits"], 1);
}

#[test]
fn test_defects_per_file_detailed() {
    let cwd = TempDir::new().unwrap();
    let value = json_output(commitlens(&cwd).args([
        "-l",
        &fixture("commits_detailed.txt"),
        "--log-format",
        "detailed",
        "-f",
        "json",
        "defects",
    ]));
    assert_eq!(value["per_file"]["src/parser.py"], 2);
    assert_eq!(value["per_file"]["src/lexer.py"], 2);
    assert_eq!(value["per_file_month"]["src/lexer.py"]["2024-01"], 1);

    let top = value["top_files"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["file"], "src/lexer.py");
    assert_eq!(top[1]["file"], "src/parser.py");
}

#[test]
fn test_defects_markdown_output() {
    let cwd = TempDir::new().unwrap();
    commitlens(&cwd)
        .args(["-l", &fixture("commits.txt"), "-f", "markdown", "defects"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Defect-Related Commits Per Month"))
        .stdout(predicate::str::contains("| 2023-11 | 1 |"));
}

// ---------------------------------------------------------------------------
// Coupling
// ---------------------------------------------------------------------------

#[test]
fn test_coupling_block_log() {
    let cwd = TempDir::new().unwrap();
    let value = json_output(commitlens(&cwd).args([
        "-l",
        &fixture("commit_files.txt"),
        "--log-format",
        "block",
        "-f",
        "json",
        "coupling",
    ]));

    let couplings = value["couplings"].as_array().unwrap();
    assert_eq!(couplings[0]["file_a"], "src/util.py");
    assert_eq!(couplings[0]["file_b"], "tests/test_helpers.py");
    assert_eq!(couplings[0]["cochange_count"], 2);
    assert!(couplings[1..].iter().all(|c| c["cochange_count"] == 1));
    for c in couplings {
        assert!(c["file_a"].as_str().unwrap() < c["file_b"].as_str().unwrap());
    }
}

#[test]
fn test_coupling_min_cochanges() {
    let cwd = TempDir::new().unwrap();
    let value = json_output(commitlens(&cwd).args([
        "-l",
        &fixture("commit_files.txt"),
        "--log-format",
        "block",
        "-f",
        "json",
        "coupling",
        "--min-cochanges",
        "2",
    ]));
    assert_eq!(value["couplings"].as_array().unwrap().len(), 1);
}

#[test]
fn test_coupling_oneline_log_has_no_pairs() {
    let cwd = TempDir::new().unwrap();
    let value = json_output(commitlens(&cwd).args([
        "-l",
        &fixture("commits.txt"),
        "-f",
        "json",
        "coupling",
    ]));
    assert!(value["couplings"].as_array().unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Association
// ---------------------------------------------------------------------------

#[test]
fn test_associate_by_name() {
    let cwd = TempDir::new().unwrap();
    let tests_dir = cwd.path().join("tests");
    std::fs::create_dir(&tests_dir).unwrap();
    std::fs::write(tests_dir.join("test_helpers.py"), "").unwrap();
    std::fs::write(tests_dir.join("test_parser.py"), "").unwrap();

    let value = json_output(commitlens(&cwd).args([
        "-l",
        &fixture("commit_files.txt"),
        "--log-format",
        "block",
        "-f",
        "json",
        "associate",
        "src/parser.py",
        "--test-dir",
        tests_dir.to_str().unwrap(),
    ]));
    assert_eq!(value["target"], "src/parser.py");
    assert_eq!(value["association"]["test_file"], "test_parser.py");
    assert_eq!(value["association"]["strategy"], "name");
}

#[test]
fn test_associate_by_coupling() {
    let cwd = TempDir::new().unwrap();
    let value = json_output(commitlens(&cwd).args([
        "-l",
        &fixture("commit_files.txt"),
        "--log-format",
        "block",
        "-f",
        "json",
        "associate",
        "src/util.py",
        "--candidate",
        "test_misc.py",
        "--candidate",
        "test_helpers.py",
    ]));
    assert_eq!(value["association"]["test_file"], "test_helpers.py");
    assert_eq!(value["association"]["strategy"], "coupling");
    assert_eq!(value["association"]["cochanges"], 2);
}

#[test]
fn test_associate_none() {
    let cwd = TempDir::new().unwrap();
    let value = json_output(commitlens(&cwd).args([
        "-l",
        &fixture("commit_files.txt"),
        "--log-format",
        "block",
        "-f",
        "json",
        "associate",
        "src/unknown.py",
        "--candidate",
        "test_misc.py",
    ]));
    assert!(value["association"].is_null());
}

#[test]
fn test_associate_requires_catalog() {
    let cwd = TempDir::new().unwrap();
    commitlens(&cwd)
        .args([
            "-l",
            &fixture("commit_files.txt"),
            "--log-format",
            "block",
            "associate",
            "src/util.py",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no test catalog given"));
}

// ---------------------------------------------------------------------------
// Empty log, combined report and configuration
// ---------------------------------------------------------------------------

#[test]
fn test_empty_log() {
    let cwd = TempDir::new().unwrap();
    let path = cwd.path().join("empty.txt");
    std::fs::write(&path, "").unwrap();

    let value = json_output(commitlens(&cwd).args(["-l", path.to_str().unwrap(), "-f", "json", "all"]));
    assert_eq!(value["log"]["records"], 0);
    assert!(value["keywords"]["keywords"].as_array().unwrap().is_empty());
    assert!(value["defects"]["per_month"].as_object().unwrap().is_empty());
    assert!(value["coupling"]["couplings"].as_array().unwrap().is_empty());
}

#[test]
fn test_all_detailed() {
    let cwd = TempDir::new().unwrap();
    let value = json_output(commitlens(&cwd).args([
        "-l",
        &fixture("commits_detailed.txt"),
        "--log-format",
        "detailed",
        "-f",
        "json",
        "all",
    ]));
    assert_eq!(value["log"]["records"], 4);
    assert_eq!(value["defects"]["summary"]["defect_commits"], 3);
    assert_eq!(value["coupling"]["couplings"][0]["file_a"], "src/lexer.py");
    assert!(value["generated_at"].is_string());
}

#[test]
fn test_config_file_supplies_log() {
    let cwd = TempDir::new().unwrap();
    let config = format!(
        "[log]\npath = \"{}\"\nformat = \"block\"\n\n[output]\nformat = \"json\"\n",
        fixture("commit_files.txt")
    );
    std::fs::write(cwd.path().join("commitlens.toml"), config).unwrap();

    let value = json_output(commitlens(&cwd).arg("coupling"));
    assert_eq!(value["couplings"][0]["cochange_count"], 2);
}

#[test]
fn test_config_command() {
    let cwd = TempDir::new().unwrap();
    commitlens(&cwd)
        .args(["--log-format", "detailed", "config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[keywords]"))
        .stdout(predicate::str::contains("format = \"detailed\""));
}

#[test]
fn test_env_override() {
    let cwd = TempDir::new().unwrap();
    let value = json_output(
        commitlens(&cwd)
            .env("COMMITLENS_KEYWORDS__TOP", "1")
            .args(["-l", &fixture("commits.txt"), "-f", "json", "keywords"]),
    );
    assert_eq!(value["keywords"].as_array().unwrap().len(), 1);
}
