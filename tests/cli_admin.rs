use predicates::prelude::*;
use serde_json::Value;

fn maktaba(data_dir: &std::path::Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("maktaba");
    cmd.env_remove("MAKTABA_LOG")
        .env_remove("RUST_LOG")
        .arg("--data-dir")
        .arg(data_dir);
    cmd
}

fn persisted(data_dir: &std::path::Path) -> anyhow::Result<Value> {
    let raw = std::fs::read_to_string(data_dir.join("librarySettings.json"))?;
    Ok(serde_json::from_str(&raw)?)
}

fn stdout_line(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_owned()
}

#[test]
fn set_field_persists_and_shows_in_listing() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    maktaba(temp.path())
        .args(["admin", "set", "site-name", "Bayt al-Hikma"])
        .assert()
        .success();

    assert_eq!(persisted(temp.path())?["siteName"], "Bayt al-Hikma");
    maktaba(temp.path())
        .args(["list"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Bayt al-Hikma (7 books)"));

    maktaba(temp.path())
        .args(["admin", "set", "ad-duration", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("whole number of seconds"));
    Ok(())
}

#[test]
fn category_and_book_lifecycle() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let output = maktaba(temp.path())
        .args(["admin", "category", "add", "--title", "Poetry", "--emoji", "🎭"])
        .output()?;
    assert!(output.status.success());
    let category_id = stdout_line(&output);
    assert!(category_id.starts_with('c'));

    let output = maktaba(temp.path())
        .args(["admin", "book", "add", "--category", &category_id])
        .args(["--title", "Diwan", "--author", "Al-Mutanabbi", "--content", "verses"])
        .output()?;
    assert!(output.status.success());
    let book_id = stdout_line(&output);

    maktaba(temp.path())
        .args(["admin", "book", "edit", "--category", &category_id, "--id", &book_id])
        .args(["--title", "Diwan al-Mutanabbi"])
        .assert()
        .success();

    maktaba(temp.path())
        .args(["read", "--book", &book_id, "--tick-ms", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Diwan al-Mutanabbi"))
        .stdout(predicate::str::contains("verses"));

    maktaba(temp.path())
        .args(["admin", "category", "delete", "--id", &category_id])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires confirmation"));

    maktaba(temp.path())
        .args(["admin", "category", "delete", "--id", &category_id, "--yes"])
        .assert()
        .success();
    maktaba(temp.path())
        .args(["list", "--query", "Diwan"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no results"));
    Ok(())
}

#[test]
fn export_then_import_round_trips_through_files() -> anyhow::Result<()> {
    let source = tempfile::TempDir::new()?;
    let target = tempfile::TempDir::new()?;
    let export = source.path().join("backup.json");

    maktaba(source.path())
        .args(["admin", "set", "about-title", "Exported"])
        .assert()
        .success();
    maktaba(source.path())
        .args(["admin", "export", "--out"])
        .arg(&export)
        .assert()
        .success();
    maktaba(source.path())
        .args(["admin", "export", "--out"])
        .arg(&export)
        .assert()
        .failure()
        .stderr(predicate::str::contains("output already exists"));

    maktaba(target.path())
        .args(["admin", "import", "--file"])
        .arg(&export)
        .assert()
        .success();
    assert_eq!(persisted(target.path())?["about"]["title"], "Exported");

    let bad = target.path().join("bad.json");
    std::fs::write(&bad, r#"{"categories": []}"#)?;
    maktaba(target.path())
        .args(["admin", "import", "--file"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains("siteName"));
    assert_eq!(persisted(target.path())?["about"]["title"], "Exported");
    Ok(())
}

#[test]
fn apply_json_rejects_invalid_drafts_without_saving() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let broken = temp.path().join("broken.json");
    std::fs::write(&broken, "[{")?;

    maktaba(temp.path())
        .args(["admin", "apply-json", "--categories"])
        .arg(&broken)
        .assert()
        .failure()
        .stderr(predicate::str::contains("categories JSON is invalid"));
    assert!(!temp.path().join("librarySettings.json").exists());

    let empty = temp.path().join("promos.json");
    std::fs::write(&empty, "[]")?;
    maktaba(temp.path())
        .args(["admin", "apply-json", "--promotions"])
        .arg(&empty)
        .assert()
        .success();
    maktaba(temp.path())
        .args(["promotions"])
        .assert()
        .success()
        .stdout(predicate::str::contains("no promotions"));
    Ok(())
}

#[test]
fn replace_rewrites_string_values() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    maktaba(temp.path())
        .args(["admin", "replace", "--find", "غرناطة", "--replace", "Granada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("replaced 3 occurrence(s)"));

    maktaba(temp.path())
        .args(["list", "--query", "Granada"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ar1"));
    Ok(())
}

#[test]
fn reset_requires_yes_and_restores_defaults() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    maktaba(temp.path())
        .args(["admin", "set", "site-name", "Temporary"])
        .assert()
        .success();

    maktaba(temp.path())
        .args(["admin", "reset"])
        .assert()
        .failure();
    assert_eq!(persisted(temp.path())?["siteName"], "Temporary");

    maktaba(temp.path())
        .args(["admin", "reset", "--yes"])
        .assert()
        .success();
    assert!(!temp.path().join("librarySettings.json").exists());
    maktaba(temp.path())
        .args(["admin", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"siteName\": \"مكتبة الحكايات\""));
    Ok(())
}
