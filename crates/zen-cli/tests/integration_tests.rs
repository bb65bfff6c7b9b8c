//! Integration tests for the ZEN CLI
//!
//! These tests verify the CLI behavior end-to-end

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Helper function to create a test CLI command running in an empty directory
#[allow(deprecated)]
fn cli(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("zen").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("ZEN_PROFILES_DIR")
        .env("NO_COLOR", "1");
    cmd
}

/// Helper function to create a project with a config file and one custom profile
fn create_test_project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let profiles = temp_dir.path().join("profiles");
    fs::create_dir(&profiles).unwrap();

    fs::write(
        profiles.join("caps.toml"),
        "[profile]\nname = \"caps\"\ntag_case = \"upper\"\nplace_cursor = false\n",
    )
    .unwrap();
    fs::write(
        temp_dir.path().join(".zenrc.json"),
        r#"{ "defaultProfile": "xhtml", "profilesDir": "profiles" }"#,
    )
    .unwrap();

    temp_dir
}

#[test]
fn test_help_command() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("ZEN expands CSS-selector-like abbreviations"))
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("Commands:"));
}

#[test]
fn test_version_command() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(VERSION));
}

#[test]
fn test_version_detailed() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["version", "--detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("zen {VERSION}")))
        .stdout(predicate::str::contains("Built-in profiles: plain, html, xhtml, xml"));
}

#[test]
fn test_expand_marks_caret() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["expand", "div#main.a.b"])
        .assert()
        .success()
        .stdout(r#"<div id="main" class="a b">|</div>"#.to_string() + "\n");
}

#[test]
fn test_expand_json_with_cursor() {
    let dir = TempDir::new().unwrap();
    let output = cli(&dir)
        .args(["expand", "<p>a.x rest", "--cursor", "6", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["abbreviation"], "a.x");
    assert_eq!(json["start"], 3);
    assert_eq!(json["text"], r#"<a class="x"></a>"#);
    assert_eq!(json["caret"], 13);
}

#[test]
fn test_expand_with_profile() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["expand", "br", "--profile", "xml"])
        .assert()
        .success()
        .stdout("<br/>\n");
}

#[test]
fn test_expand_without_abbreviation_fails() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["expand", "plain text "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No abbreviation found"));
}

#[test]
fn test_expand_malformed_abbreviation_fails() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["expand", "div>p("])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unbalanced group parenthesis"));
}

#[test]
fn test_wrap_stdin() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["wrap", "div>p", "--profile", "html"])
        .write_stdin("hello\n")
        .assert()
        .success()
        .stdout("<div>\n\t<p>hello|</p>\n</div>\n");
}

#[test]
fn test_wrap_file_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("snippet.txt");
    fs::write(&input, "text").unwrap();

    let output = cli(&dir)
        .args(["wrap", "em", "--file"])
        .arg(&input)
        .args(["--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["text"], "<em>text</em>");
    assert_eq!(json["caret"], 8);
}

#[test]
fn test_profiles_from_discovered_config() {
    let project = create_test_project();
    cli(&project)
        .args(["profiles", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("caps"))
        .stdout(predicate::str::contains("xhtml (built-in) [default]"));

    cli(&project)
        .args(["expand", "b", "--profile", "caps"])
        .assert()
        .success()
        .stdout("<B></B>\n");
}

#[test]
fn test_profiles_dir_flag() {
    let project = create_test_project();
    let elsewhere = TempDir::new().unwrap();
    cli(&elsewhere)
        .arg("--profiles-dir")
        .arg(project.path().join("profiles"))
        .args(["profiles", "show", "caps", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""tagCase": "upper""#));
}

#[test]
fn test_profiles_show_unknown() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["profiles", "show", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown profile 'nope'"));
}

#[test]
fn test_config_init_and_validate() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["config", "init", "--format", "toml"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".zenrc.toml"));
    assert!(dir.path().join(".zenrc.toml").exists());

    cli(&dir)
        .args(["config", "init", "--format", "toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    cli(&dir)
        .args(["config", "validate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Default profile: html"));
}

#[test]
fn test_config_validate_rejects_bad_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zen.json");
    fs::write(&path, r#"{ "maxNodes": 0 }"#).unwrap();

    cli(&dir)
        .args(["config", "validate"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("maxNodes"));
}

#[test]
fn test_config_show() {
    let project = create_test_project();
    cli(&project)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""defaultProfile": "xhtml""#));
}

#[test]
fn test_explicit_missing_config() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--config", "missing.json", "expand", "p"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_generate_completion() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["--generate-completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("zen"));
}

#[test]
fn test_verbose_logging_keeps_stdout_clean() {
    let dir = TempDir::new().unwrap();
    cli(&dir)
        .args(["-vv", "expand", "ul>li*2", "--profile", "plain"])
        .assert()
        .success()
        .stdout("<ul><li></li><li></li></ul>\n");
}

#[test]
fn test_config_validate_rejects_zero_depth() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zen.json");
    fs::write(&path, r#"{ "maxDepth": 0 }"#).unwrap();

    cli(&dir)
        .args(["config", "validate"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("maxDepth"));
}
