//! End-to-end tests for the `fob-webfont` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M12 2l10 20H2z"/></svg>"#;

fn fob_webfont() -> Command {
    let mut cmd = Command::cargo_bin("fob-webfont").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

fn project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let icons = temp.path().join("icons");
    fs::create_dir_all(&icons).unwrap();
    fs::write(icons.join("triangle.svg"), ICON).unwrap();
    temp
}

#[test]
fn help_lists_commands() {
    fob_webfont()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("build"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("check"));
}

#[test]
fn check_accepts_discovered_options_file() {
    let temp = project();
    fs::write(
        temp.path().join("webfont.json"),
        r#"{ "files": "icons/*.svg", "dest": "dist/fonts", "template": "scss" }"#,
    )
    .unwrap();

    fob_webfont()
        .arg("check")
        .arg("--cwd")
        .arg(temp.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("Options are valid"));
}

#[test]
fn check_prints_resolved_options() {
    let temp = project();

    fob_webfont()
        .args(["check", "--print", "-f", "icons/*.svg", "-d", "out", "--font-name", "glyphs"])
        .arg("--cwd")
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("icons/*.svg"))
        .stdout(predicate::str::contains("glyphs"));
}

#[test]
fn check_requires_files() {
    let temp = project();

    fob_webfont()
        .args(["check", "-d", "out"])
        .arg("--cwd")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Require `files` options"));
}

#[test]
fn check_requires_dest() {
    let temp = project();

    fob_webfont()
        .args(["check", "-f", "icons/*.svg"])
        .arg("--cwd")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Require `dest` options"));
}

#[test]
fn check_reports_missing_custom_template() {
    let temp = project();

    fob_webfont()
        .args(["check", "-f", "icons/*.svg", "-d", "out", "-t", "templates/icons.css.njk"])
        .arg("--cwd")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("icons.css.njk"));
}

#[test]
fn build_fails_when_generator_cannot_start() {
    let temp = project();

    fob_webfont()
        .args(["build", "-f", "icons/*.svg", "-d", "out"])
        .args(["--node", "fob-webfont-missing-node"])
        .arg("--cwd")
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Build failed with 1 error(s)"));

    assert!(!temp.path().join("out").exists());
}

#[test]
fn build_rejects_unknown_directory() {
    let temp = TempDir::new().unwrap();

    fob_webfont()
        .args(["build", "-f", "icons/*.svg", "-d", "out"])
        .arg("--cwd")
        .arg(temp.path().join("missing"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Directory not found"));
}
