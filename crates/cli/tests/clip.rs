// ABOUTME: End-to-end CLI tests: clip a mocked page and verify the written note.

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta property="og:title" content="Release recap">
  <meta name="author" content="Alice">
  <meta property="og:description" content="What happened this week">
</head>
<body>
  <script>track();</script>
  <p>Lots of things shipped.</p>
</body>
</html>"#;

#[test]
fn clips_url_into_vault() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/post");
        then.status(200)
            .header("content-type", "text/html; charset=utf-8")
            .body(PAGE_HTML);
    });
    let vault = tempfile::tempdir().unwrap();

    Command::cargo_bin("clipmark")
        .unwrap()
        .arg(server.url("/post"))
        .arg("--vault")
        .arg(vault.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Clippings/Release recap.md"));

    let note = std::fs::read_to_string(vault.path().join("Clippings/Release recap.md")).unwrap();
    assert!(note.starts_with("---\n"));
    assert!(note.contains("title: \"Release recap\""));
    assert!(note.contains("author: \"Alice\""));
    assert!(note.contains("Lots of things shipped."));
    assert!(!note.contains("track()"));
}

#[test]
fn refuses_to_overwrite_an_existing_note() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/post");
        then.status(200)
            .header("content-type", "text/html")
            .body(PAGE_HTML);
    });
    let vault = tempfile::tempdir().unwrap();

    let mut first = Command::cargo_bin("clipmark").unwrap();
    first
        .arg(server.url("/post"))
        .arg("--vault")
        .arg(vault.path());
    first.assert().success();

    Command::cargo_bin("clipmark")
        .unwrap()
        .arg(server.url("/post"))
        .arg("--vault")
        .arg(vault.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn dry_run_prints_note_without_writing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/post");
        then.status(200)
            .header("content-type", "text/html")
            .body(PAGE_HTML);
    });
    let vault = tempfile::tempdir().unwrap();

    Command::cargo_bin("clipmark")
        .unwrap()
        .arg(server.url("/post"))
        .arg("--vault")
        .arg(vault.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Lots of things shipped."));

    assert!(!vault.path().join("Clippings").exists());
}

#[test]
fn invalid_url_fails_with_message() {
    Command::cargo_bin("clipmark")
        .unwrap()
        .arg("notaurl")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid URL"));
}

#[test]
fn json_output_contains_pattern_and_properties() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/post");
        then.status(200)
            .header("content-type", "text/html")
            .body(PAGE_HTML);
    });

    Command::cargo_bin("clipmark")
        .unwrap()
        .arg(server.url("/post"))
        .arg("--json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"pattern\": \"web/default\""))
        .stdout(predicate::str::contains("Release recap"));
}

#[test]
fn templates_in_vault_are_applied() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/post");
        then.status(200)
            .header("content-type", "text/html")
            .body(PAGE_HTML);
    });
    let vault = tempfile::tempdir().unwrap();
    let template_dir = vault.path().join("templates/clipmark");
    std::fs::create_dir_all(&template_dir).unwrap();
    std::fs::write(
        template_dir.join("web-default.md"),
        "> clipped {{clipped}}\n\n{{content}}",
    )
    .unwrap();

    Command::cargo_bin("clipmark")
        .unwrap()
        .arg(server.url("/post"))
        .arg("--vault")
        .arg(vault.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("> clipped 20"));
}
