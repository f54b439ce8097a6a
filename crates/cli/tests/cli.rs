use assert_cmd::Command;

fn libris() -> Command {
    let mut cmd = Command::cargo_bin("libris").unwrap();
    cmd.env_remove("RUST_LOG").env("LIBRIS_CONFIG_DIR", "/nonexistent");
    cmd
}

#[test]
fn config_prints_lending_rules() {
    let output = libris().arg("config").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("daily_late_fee: 10"));
    assert!(stdout.contains("deposit: 500"));
}

#[test]
fn unknown_environment_fails() {
    let output = libris().args(["config", "--env", "qa"]).output().unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("unsupported environment 'qa'"));
}

#[test]
fn migrate_applies_every_table_once() {
    let output = libris()
        .args(["migrate", "--database-url", "sqlite::memory:"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("applied 3 migrations"));
    assert!(stdout.contains("catalog/001_books"));
    assert!(stdout.contains("ledger/001_transactions"));
    assert!(stdout.contains("members/001_members"));
}
