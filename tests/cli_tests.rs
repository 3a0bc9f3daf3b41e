use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn td(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("td").unwrap();
    cmd.arg("--db").arg(temp_dir.path().join("tasks.db"));
    cmd
}

#[test]
fn test_cli_add_and_list() {
    let temp_dir = TempDir::new().unwrap();

    td(&temp_dir)
        .args(["add", "Buy milk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added task 1: Buy milk"));

    td(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"));
}

#[test]
fn test_cli_add_blank_name_fails() {
    let temp_dir = TempDir::new().unwrap();

    td(&temp_dir)
        .args(["add", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("INVALID_INPUT"));
}

#[test]
fn test_cli_list_json() {
    let temp_dir = TempDir::new().unwrap();

    td(&temp_dir).args(["add", "Buy milk"]).assert().success();

    td(&temp_dir)
        .args(["list", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"Buy milk\""))
        .stdout(predicate::str::contains("\"is_completed\": false"));
}

#[test]
fn test_cli_done_and_clear_completed() {
    let temp_dir = TempDir::new().unwrap();

    td(&temp_dir).args(["add", "Buy milk"]).assert().success();
    td(&temp_dir).args(["add", "Walk dog"]).assert().success();

    td(&temp_dir)
        .args(["done", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed task 1"));

    td(&temp_dir)
        .arg("clear-completed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 completed task(s)"));

    td(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Walk dog"))
        .stdout(predicate::str::contains("Buy milk").not());
}

#[test]
fn test_cli_done_missing_task() {
    let temp_dir = TempDir::new().unwrap();

    td(&temp_dir)
        .args(["done", "42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("TASK_NOT_FOUND"));
}

#[test]
fn test_cli_rm_is_idempotent() {
    let temp_dir = TempDir::new().unwrap();

    td(&temp_dir).args(["add", "Ephemeral"]).assert().success();

    td(&temp_dir).args(["rm", "1"]).assert().success();
    td(&temp_dir).args(["rm", "1"]).assert().success();

    td(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No tasks"));
}

#[test]
fn test_cli_sort_order_persists() {
    let temp_dir = TempDir::new().unwrap();

    td(&temp_dir).args(["add", "Banana"]).assert().success();
    td(&temp_dir).args(["add", "Apple"]).assert().success();

    // Default order is by creation time.
    td(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::is_match("(?s)Banana.*Apple").unwrap());

    td(&temp_dir).args(["sort", "name"]).assert().success();

    td(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::is_match("(?s)Apple.*Banana").unwrap());
}

#[test]
fn test_cli_hide_completed_persists() {
    let temp_dir = TempDir::new().unwrap();

    td(&temp_dir).args(["add", "Visible"]).assert().success();
    td(&temp_dir).args(["add", "Hidden"]).assert().success();
    td(&temp_dir).args(["done", "2"]).assert().success();

    td(&temp_dir)
        .args(["hide-completed", "true"])
        .assert()
        .success();

    td(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Visible"))
        .stdout(predicate::str::contains("Hidden").not());
}

#[test]
fn test_cli_search_is_case_sensitive() {
    let temp_dir = TempDir::new().unwrap();

    td(&temp_dir).args(["add", "Buy milk"]).assert().success();
    td(&temp_dir).args(["add", "buy bread"]).assert().success();

    td(&temp_dir)
        .args(["list", "--search", "Buy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Buy milk"))
        .stdout(predicate::str::contains("buy bread").not());
}

#[test]
fn test_cli_seed_runs_once() {
    let temp_dir = TempDir::new().unwrap();

    td(&temp_dir)
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("Seeded sample tasks"));

    td(&temp_dir)
        .arg("seed")
        .assert()
        .success()
        .stdout(predicate::str::contains("already seeded"));
}
