use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn ledger_cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("profit_ledger_cli").unwrap();
    cmd.env("PROFIT_LEDGER_CLI_SCRIPT", "1")
        .env("PROFIT_LEDGER_HOME", home.path())
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_adds_and_persists_entries() {
    let home = TempDir::new().unwrap();
    ledger_cli(&home)
        .write_stdin("add 2024-05-01 100000 60000 50000\nexit\n")
        .assert()
        .success()
        .stdout(contains("saved for 2024-05-01 (profit ₹10,000)"));

    let json = std::fs::read_to_string(home.path().join("store/profit_entries.json")).unwrap();
    assert!(json.contains("\"2024-05-01\""));

    ledger_cli(&home)
        .write_stdin("list\n")
        .assert()
        .success()
        .stdout(contains("2024-05-01"));
}

#[test]
fn invalid_input_is_reported_and_session_continues() {
    let home = TempDir::new().unwrap();
    ledger_cli(&home)
        .write_stdin("add 2024-05-01 100 abc 10\nlsit\nadd 2024-05-02 10 5 5\n")
        .assert()
        .success()
        .stdout(contains("fill all fields correctly"))
        .stdout(contains("did you mean `list`?"))
        .stdout(contains("saved for 2024-05-02"));
}

#[test]
fn filter_narrows_summary_cards() {
    let home = TempDir::new().unwrap();
    let script = "\
add 2024-05-01 100 150 0
add 2023-05-01 100 90 0
add 2024-06-01 100 100 500
filter month=05 year=2024
";
    ledger_cli(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Summary (2024-05)"))
        .stdout(contains(format!("{:<20} ₹50\n", "Profit")));
}

#[test]
fn delete_removes_entry_in_script_mode() {
    let home = TempDir::new().unwrap();
    ledger_cli(&home)
        .write_stdin("add 2024-05-01 1 1 1\n")
        .assert()
        .success();

    let json = std::fs::read_to_string(home.path().join("store/profit_entries.json")).unwrap();
    let entries: serde_json::Value = serde_json::from_str(&json).unwrap();
    let id = entries[0]["id"].as_i64().unwrap();

    ledger_cli(&home)
        .write_stdin(format!("delete {}\n", id))
        .assert()
        .success()
        .stdout(contains(format!("Deleted entry {}", id)));

    let json = std::fs::read_to_string(home.path().join("store/profit_entries.json")).unwrap();
    assert_eq!(json.trim(), "[]");
}

#[test]
fn config_changes_the_currency_symbol() {
    let home = TempDir::new().unwrap();
    ledger_cli(&home)
        .write_stdin("config set currency_symbol Rs\nadd 2024-05-01 0 1234567 0\n")
        .assert()
        .success()
        .stdout(contains("profit Rs12,34,567"));

    let config = std::fs::read_to_string(home.path().join("config.json")).unwrap();
    assert!(config.contains("\"Rs\""));
}
