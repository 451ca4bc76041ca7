use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use tempfile::{tempdir, NamedTempFile, TempDir};

/// Creates a config file pointing all documentation paths into a temp dir.
fn create_config(docs_root: &TempDir, repo_url: &str) -> NamedTempFile {
    let config = NamedTempFile::new().expect("Creating temp config file failed");
    let yaml = format!(
        "package:\n  name: demo-lib\n  display_name: Demo Lib\n  version: 1.2.0\ndocumentation:\n  root: {}\n  entry_point: ./src/main.ts\ngenerator:\n  program: typedoc\n  poll_interval_secs: 0\n  detection_tries: 1\nwiki:\n  repo_url: \"{}\"\n",
        docs_root.path().display(),
        repo_url
    );
    write(config.path(), yaml).expect("Writing temp config failed");
    config
}

#[test]
fn clean_succeeds_on_a_fresh_docs_root() {
    let docs_root = tempdir().unwrap();
    let config = create_config(&docs_root, "https://github.com/demo/demo-lib.git");

    let mut cmd = Command::cargo_bin("wiki-publish").expect("Binary exists");
    cmd.arg("clean").arg("--config").arg(config.path());

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Clean complete."));
}

#[test]
fn publish_rejects_a_non_github_repo_before_doing_any_work() {
    let docs_root = tempdir().unwrap();
    let config = create_config(&docs_root, "https://gitlab.com/demo/demo-lib.git");

    let mut cmd = Command::cargo_bin("wiki-publish").expect("Binary exists");
    cmd.arg("publish").arg("--config").arg(config.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Github"));

    // Pre-flight failure: no folders may have been created.
    assert!(!docs_root.path().join(".tmp").exists());
    assert!(!docs_root.path().join(".github-wiki").exists());
}

#[test]
fn publish_rejects_a_repo_url_without_git_suffix() {
    let docs_root = tempdir().unwrap();
    let config = create_config(&docs_root, "https://github.com/demo/demo-lib");

    let mut cmd = Command::cargo_bin("wiki-publish").expect("Binary exists");
    cmd.arg("publish").arg("--config").arg(config.path());

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(".git"));
}

#[test]
fn missing_config_file_fails_with_a_clear_message() {
    let mut cmd = Command::cargo_bin("wiki-publish").expect("Binary exists");
    cmd.arg("clean").arg("--config").arg("/definitely/not/here.yaml");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config file"));
}

#[test]
fn document_fails_when_the_generator_never_produces_output() {
    let docs_root = tempdir().unwrap();
    // `true` exits immediately without creating any documentation folder, so
    // the bounded detection poll must give up.
    let config = NamedTempFile::new().unwrap();
    let yaml = format!(
        "package:\n  name: demo-lib\n  display_name: Demo Lib\n  version: 1.2.0\ndocumentation:\n  root: {}\n  entry_point: ./src/main.ts\ngenerator:\n  program: \"true\"\n  poll_interval_secs: 0\n  detection_tries: 2\nwiki:\n  repo_url: \"https://github.com/demo/demo-lib.git\"\n",
        docs_root.path().display()
    );
    write(config.path(), yaml).unwrap();

    let mut cmd = Command::cargo_bin("wiki-publish").expect("Binary exists");
    cmd.arg("document").arg("--config").arg(config.path());

    cmd.assert().failure().stderr(predicate::str::contains(
        "Unable to detect documentation folder after 2 tries.",
    ));
}
