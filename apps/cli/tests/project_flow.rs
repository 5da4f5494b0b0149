use std::error::Error;
use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn fresh_workspace_lists_seed_files() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("my-project (3 files)"))
        .stdout(predicate::str::contains("index.html"))
        .stdout(predicate::str::contains("styles.css"))
        .stdout(predicate::str::contains("script.js"));

    assert!(workspace.path().join(".minide").join("session.json").exists());
    Ok(())
}

#[test]
fn delete_without_selection_fails() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?
        .arg("delete")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no files are selected"));
    Ok(())
}

#[test]
fn select_then_delete_removes_files() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?
        .args(["select", "index.html", "script.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Selected: index.html, script.js"));

    cli(workspace.path())?
        .arg("delete")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 file(s)"));

    cli(workspace.path())?
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("(1 files)"))
        .stdout(predicate::str::contains("index.html").not());
    Ok(())
}

#[test]
fn selecting_unknown_path_fails() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?
        .args(["select", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing.txt"));
    Ok(())
}

#[test]
fn edit_tab_and_save_updates_content() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?
        .args(["edit", "--tab", "css"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Editing: styles.css"));

    cli(workspace.path())?
        .args(["save", "--text", "body { color: red; }"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved: styles.css"));

    cli(workspace.path())?
        .args(["cat", "styles.css"])
        .assert()
        .success()
        .stdout("body { color: red; }\n");
    Ok(())
}

#[test]
fn save_without_open_file_fails() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?
        .args(["save", "--text", "ignored"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no file is currently being edited"));
    Ok(())
}

#[test]
fn save_as_nests_every_file() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?
        .args(["save-as", "site"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project saved as: site"));

    cli(workspace.path())?
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("site (3 files)"))
        .stdout(predicate::str::contains("site/index.html"))
        .stdout(predicate::str::contains("site/script.js"));
    Ok(())
}

#[test]
fn copy_uses_default_folder() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?
        .args(["select", "script.js"])
        .assert()
        .success();

    cli(workspace.path())?
        .arg("copy")
        .assert()
        .success()
        .stdout(predicate::str::contains("script.js -> copy/script.js"));

    cli(workspace.path())?
        .args(["cat", "copy/script.js"])
        .assert()
        .success()
        .stdout(predicate::str::contains("console.log('Hello World!');"));
    Ok(())
}

#[test]
fn mkdir_creates_readme_placeholder() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?
        .args(["mkdir", "docs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("docs/README.md"));

    cli(workspace.path())?
        .args(["cat", "docs/README.md"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# docs"));
    Ok(())
}

#[test]
fn preview_inlines_style_and_script() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?
        .arg("preview")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<!DOCTYPE html>"))
        .stdout(predicate::str::contains("<h1>Hello World!</h1>"))
        .stdout(predicate::str::contains("font-family: Arial"))
        .stdout(predicate::str::contains("console.log('Hello World!');"));

    let output = workspace.path().join("out").join("preview.html");
    cli(workspace.path())?
        .args(["preview", "--output", output.to_str().unwrap()])
        .assert()
        .success();
    let document = fs::read_to_string(&output)?;
    assert!(document.contains("<h1>Hello World!</h1>"));
    assert!(!document.contains("<title>My Project</title>"));
    Ok(())
}

#[test]
fn share_prints_reference() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?
        .arg("share")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "http://localhost/project/my-project?hash=",
        ))
        .stdout(predicate::str::contains("..."));

    cli(workspace.path())?
        .arg("status")
        .assert()
        .success()
        .stdout("URL generated\n");
    Ok(())
}

#[test]
fn clear_restores_seed_after_edits() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?.args(["save-as", "nested"]).assert().success();
    cli(workspace.path())?
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("Application cleared"));

    cli(workspace.path())?
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("my-project (3 files)"))
        .stdout(predicate::str::contains("nested/").not());
    Ok(())
}

#[test]
fn export_then_import_bundle_round_trips() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;
    let bundle = workspace.path().join("bundle.json");

    cli(workspace.path())?.args(["mkdir", "docs"]).assert().success();
    cli(workspace.path())?
        .args(["export", "--output", bundle.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 4 files"));

    let payload: serde_json::Value = serde_json::from_str(&fs::read_to_string(&bundle)?)?;
    assert_eq!(payload["projectName"], "my-project");
    assert!(payload["files"]["docs/README.md"].is_string());
    assert!(payload["timestamp"].is_string());

    cli(workspace.path())?.arg("clear").assert().success();
    cli(workspace.path())?
        .args(["import-bundle", bundle.to_str().unwrap()])
        .assert()
        .success();

    cli(workspace.path())?
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("my-project (4 files)"))
        .stdout(predicate::str::contains("docs/README.md"));
    Ok(())
}

#[test]
fn export_defaults_to_workspace_bundle_name() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?.arg("export").assert().success();

    assert!(workspace.path().join("my-project-bundle.json").exists());
    Ok(())
}

#[test]
fn export_of_empty_project_fails() -> Result<(), Box<dyn Error>> {
    let workspace = tempdir()?;

    cli(workspace.path())?
        .args(["select", "index.html", "styles.css", "script.js"])
        .assert()
        .success();
    cli(workspace.path())?.arg("delete").assert().success();

    cli(workspace.path())?
        .arg("export")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no files to export"));
    Ok(())
}

fn cli(workspace: &Path) -> Result<Command, Box<dyn Error>> {
    let mut cmd = Command::cargo_bin("minide-cli")?;
    cmd.current_dir(workspace)
        .env_remove("RUST_LOG")
        .arg("--workspace")
        .arg(workspace);
    Ok(cmd)
}
