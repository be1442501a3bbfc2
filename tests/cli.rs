use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn fintrack(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fintrack").unwrap();
    cmd.env("FINTRACK_DATA_DIR", home).env_remove("RUST_LOG");
    cmd
}

fn add(home: &Path, args: &[&str]) {
    fintrack(home).arg("txn").arg("add").args(args).assert().success();
}

fn seed_january(home: &Path) {
    add(home, &["income", "5000", "Salary", "-d", "2024-01-15"]);
    add(home, &["expense", "1200", "Housing", "-d", "2024-01-01", "-D", "Rent"]);
    add(home, &["expense", "300", "Food", "-d", "2024-01-10"]);
    add(home, &["expense", "45", "Food", "-d", "2024-01-18"]);
}

#[test]
fn init_creates_settings_and_ledger() {
    let home = TempDir::new().unwrap();

    fintrack(home.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialization complete!"));

    assert!(home.path().join("config.json").exists());
    assert!(home.path().join("data").join("transactions.json").exists());
}

#[test]
fn add_and_list_transactions() {
    let home = TempDir::new().unwrap();

    fintrack(home.path())
        .args(["txn", "add", "expense", "12.50", "Food", "-d", "2024-01-10", "-D", "Lunch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added expense $12.50 on 2024-01-10 (Food)"));

    fintrack(home.path())
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Lunch"))
        .stdout(predicate::str::contains("Food"));
}

#[test]
fn add_rejects_legacy_and_negative_input() {
    let home = TempDir::new().unwrap();

    fintrack(home.path())
        .args(["txn", "add", "investment", "100", "Stocks"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no longer supported"));

    fintrack(home.path())
        .args(["txn", "add", "expense", "abc", "Food"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation error"));
}

#[test]
fn report_summary_for_a_month() {
    let home = TempDir::new().unwrap();
    seed_january(home.path());

    fintrack(home.path())
        .args(["report", "summary", "--period", "2024-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary: Jan 2024"))
        .stdout(predicate::str::contains("$5000.00"))
        .stdout(predicate::str::contains("$1545.00"))
        .stdout(predicate::str::contains("$3455.00"));
}

#[test]
fn report_categories_merges_by_name() {
    let home = TempDir::new().unwrap();
    seed_january(home.path());

    fintrack(home.path())
        .args(["report", "categories", "-p", "2024-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Housing"))
        .stdout(predicate::str::contains("$345.00"));
}

#[test]
fn report_exports_csv() {
    let home = TempDir::new().unwrap();
    seed_january(home.path());
    let output = home.path().join("summary.csv");

    fintrack(home.path())
        .args(["report", "summary", "-p", "2024-01", "-o"])
        .arg(&output)
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(
        content,
        "Section,Key,Income,Expenses,Amount\nsummary,Jan 2024,5000.00,1545.00,3455.00\n"
    );
}

#[test]
fn report_rejects_inverted_range() {
    let home = TempDir::new().unwrap();

    fintrack(home.path())
        .args(["report", "dashboard", "--start", "2024-02-01", "--end", "2024-01-01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date range"));
}

#[test]
fn import_csv_reports_bad_rows() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("bank.csv");
    fs::write(
        &file,
        "Date,Type,Amount,Description,Category\n\
         2024-01-15,income,5000,Paycheck,Salary\n\
         2024-01-10,expense,300,Groceries,Food\n\
         2024-01-11,expense,abc,Broken,Food\n\
         2024-01-12,investment,100,Old,Stocks\n",
    )
    .unwrap();

    fintrack(home.path())
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported:  2"))
        .stdout(predicate::str::contains("row 3:"))
        .stdout(predicate::str::contains("row 4:"));

    fintrack(home.path())
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Paycheck"))
        .stdout(predicate::str::contains("Broken").not());
}

#[test]
fn import_dry_run_saves_nothing() {
    let home = TempDir::new().unwrap();
    let file = home.path().join("records.json");
    fs::write(
        &file,
        r#"[{"id": "1", "type": "expense", "amount": 45, "category": "Food", "date": "2024-01-18"}]"#,
    )
    .unwrap();

    fintrack(home.path())
        .arg("import")
        .arg(&file)
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("New transactions:   1"))
        .stdout(predicate::str::contains("Dry run"));

    fintrack(home.path())
        .args(["txn", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No transactions found."));
}

#[test]
fn export_json_round_trips_into_a_new_ledger() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    seed_january(source.path());
    let file = source.path().join("ledger.json");

    fintrack(source.path())
        .arg("export")
        .arg(&file)
        .args(["--format", "json", "--pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 4 transaction(s)"));

    fintrack(target.path())
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported:  4"));

    fintrack(target.path())
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Duplicates (skip):  4"))
        .stdout(predicate::str::contains("No new transactions to import."));
}

#[test]
fn export_yaml_round_trips_into_a_new_ledger() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    seed_january(source.path());
    let file = source.path().join("ledger.yaml");

    fintrack(source.path())
        .arg("export")
        .arg(&file)
        .args(["--format", "yaml"])
        .assert()
        .success();

    fintrack(target.path())
        .arg("import")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported:  4"));

    fintrack(target.path())
        .args(["report", "summary", "-p", "2024-01"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$3455.00"));
}

#[test]
fn export_csv_uses_fixed_columns() {
    let home = TempDir::new().unwrap();
    add(home.path(), &["expense", "1200", "Housing", "-d", "2024-01-01", "-D", "Rent, January"]);
    let file = home.path().join("out.csv");

    fintrack(home.path())
        .arg("export")
        .arg(&file)
        .assert()
        .success();

    let content = fs::read_to_string(&file).unwrap();
    let mut lines = content.lines();
    assert_eq!(
        lines.next(),
        Some("Date,Type,Amount,Description,Category,Subcategory,Account,Note")
    );
    assert_eq!(
        lines.next(),
        Some("2024-01-01,expense,1200.00,\"Rent, January\",Housing,,,")
    );
}

#[test]
fn categories_lists_catalog() {
    let home = TempDir::new().unwrap();

    fintrack(home.path())
        .args(["categories", "--type", "income"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Salary"))
        .stdout(predicate::str::contains("Housing").not());
}
