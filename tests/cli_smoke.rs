use assert_cmd::Command;
use predicates::str::contains;

#[test]
fn todos_help_works() {
    Command::cargo_bin("todos")
        .expect("binary")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("local task list"));
}

#[test]
fn subcommand_help_works() {
    let subcommands = [
        "add",
        "edit",
        "check",
        "trash",
        "restore",
        "empty-trash",
        "list",
        "ls",
        "filters",
    ];

    for cmd in subcommands {
        Command::cargo_bin("todos")
            .expect("binary")
            .arg(cmd)
            .arg("--help")
            .assert()
            .success();
    }
}

#[test]
fn missing_subcommand_is_usage_error() {
    Command::cargo_bin("todos")
        .expect("binary")
        .assert()
        .failure()
        .code(2);
}
