use assert_cmd::Command;
use predicates::prelude::*;
use std::error::Error;
use std::path::Path;
use tempfile::tempdir;

fn snip(db: &Path) -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("snip")?;
    cmd.env("SNIP_DB_PATH", db).env("NO_COLOR", "1").env_remove("RUST_LOG");
    Ok(cmd)
}

#[test]
fn save_then_cat_prints_raw_content() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let db = dir.path().join("nested").join("snippets.db");

    snip(&db)?
        .args(["save", "hello world", "--tags", "shell, demo"])
        .write_stdin("echo 'hello'\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Snippet saved with ID: 1"));

    snip(&db)?
        .args(["cat", "1"])
        .assert()
        .success()
        .stdout("echo 'hello'\n");

    assert!(db.exists());
    Ok(())
}

#[test]
fn missing_snippet_is_reported_without_failing() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let db = dir.path().join("snippets.db");

    snip(&db)?
        .args(["cat", "99"])
        .assert()
        .success()
        .stdout(predicate::str::contains("snippet with ID 99 not found"));

    snip(&db)?
        .args(["delete", "abc", "--force"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid snippet ID"));
    Ok(())
}

#[test]
fn search_tag_filter_is_exact() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let db = dir.path().join("snippets.db");

    snip(&db)?
        .args(["save", "goroutines", "-t", "go"])
        .write_stdin("go func() {}()")
        .assert()
        .success();
    snip(&db)?
        .args(["save", "modules", "-t", "golang"])
        .write_stdin("go mod init")
        .assert()
        .success();

    snip(&db)?
        .args(["search", "", "--tag", "go"])
        .assert()
        .success()
        .stdout(predicate::str::contains("goroutines"))
        .stdout(predicate::str::contains("modules").not());
    Ok(())
}

#[test]
fn export_then_import_into_fresh_database() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let source = dir.path().join("source.db");
    let target = dir.path().join("target.db");
    let export = dir.path().join("backup.json");

    for (title, body) in [("first", "1"), ("second", "2")] {
        snip(&source)?
            .args(["save", title])
            .write_stdin(body)
            .assert()
            .success();
    }

    snip(&source)?
        .args(["export", "--format", "json", "--output"])
        .arg(&export)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 2 snippets"));

    snip(&target)?
        .arg("import")
        .arg(&export)
        .arg("--yes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Successfully imported all 2 snippets!"));

    snip(&target)?
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 snippet(s)"))
        .stdout(predicate::str::contains("first"))
        .stdout(predicate::str::contains("second"));
    Ok(())
}

#[test]
fn unknown_command_exits_with_error() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    snip(&dir.path().join("snippets.db"))?
        .arg("frobnicate")
        .assert()
        .failure();
    Ok(())
}
