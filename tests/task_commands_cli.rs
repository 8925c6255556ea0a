mod support;

use predicates::str::contains;

use support::{values, TestHome};

#[test]
fn add_prepends_newest_first() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();

    home.cmd()
        .args(["add", "buy", "milk"])
        .assert()
        .success()
        .stdout(contains("todos add:"))
        .stdout(contains("text: buy milk"));
    home.add("walk dog");

    let items = home.read_store();
    assert_eq!(values(&items), vec!["walk dog", "buy milk"]);
    assert!(items.iter().all(|item| !item.checked && !item.removed));
    assert_ne!(items[0].id, items[1].id);

    Ok(())
}

#[test]
fn add_without_text_is_a_no_op() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();

    home.cmd()
        .arg("add")
        .assert()
        .success()
        .stdout(contains("nothing to add"));
    assert!(!home.store_file().exists());

    let envelope = home.json(&["add", ""]);
    assert_eq!(envelope["data"]["changed"], false);
    assert!(envelope["data"].get("task").is_none());

    Ok(())
}

#[test]
fn edit_replaces_text_only() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    let id = home.add("buy milk");

    home.cmd()
        .args(["edit", &id.to_string(), "buy", "oat", "milk"])
        .assert()
        .success()
        .stdout(contains("was: buy milk"))
        .stdout(contains("now: buy oat milk"));

    let items = home.read_store();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id.as_i64(), id);
    assert_eq!(items[0].value, "buy oat milk");
    assert!(!items[0].checked);

    Ok(())
}

#[test]
fn check_toggles_completion() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    let id = home.add("a");

    let envelope = home.json(&["check", &id.to_string()]);
    assert_eq!(envelope["command"], "check");
    assert_eq!(envelope["data"]["task"]["checked"], true);
    assert!(home.read_store()[0].checked);

    home.cmd()
        .args(["check", &id.to_string()])
        .assert()
        .success()
        .stdout(contains("open"));
    assert!(!home.read_store()[0].checked);

    Ok(())
}

#[test]
fn finished_tasks_cannot_be_edited() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    let id = home.add("a");
    home.json(&["check", &id.to_string()]);

    home.cmd()
        .args(["edit", &id.to_string(), "b"])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("editing is disabled"))
        .stderr(contains(format!("hint: todos check {id}")));
    assert_eq!(home.read_store()[0].value, "a");

    Ok(())
}

#[test]
fn trashed_tasks_cannot_be_checked_or_edited() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    let id = home.add("a");

    home.cmd()
        .args(["trash", &id.to_string()])
        .assert()
        .success()
        .stdout(contains("moved to trash"));

    home.cmd()
        .args(["check", &id.to_string()])
        .assert()
        .failure()
        .code(2)
        .stderr(contains("checking is disabled"))
        .stderr(contains(format!("hint: todos restore {id}")));

    home.cmd()
        .args(["edit", &id.to_string(), "b"])
        .assert()
        .failure()
        .code(2);

    let items = home.read_store();
    assert!(items[0].removed);
    assert!(!items[0].checked);

    Ok(())
}

#[test]
fn restore_brings_task_back_with_its_state() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    let id = home.add("a");
    home.json(&["check", &id.to_string()]);
    home.json(&["trash", &id.to_string()]);

    home.cmd()
        .args(["restore", &id.to_string()])
        .assert()
        .success()
        .stdout(contains("restored"));

    let items = home.read_store();
    assert!(!items[0].removed);
    assert!(items[0].checked);

    Ok(())
}

#[test]
fn unknown_ids_are_user_errors() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();
    home.add("a");
    let before = home.read_store();

    for command in ["check", "trash"] {
        home.cmd()
            .args([command, "12345"])
            .assert()
            .failure()
            .code(2)
            .stderr(contains("Task not found: 12345"));
    }

    home.cmd()
        .args(["edit", "12345", "x"])
        .assert()
        .failure()
        .code(2);

    assert_eq!(home.read_store(), before);

    Ok(())
}

#[test]
fn malformed_ids_are_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let home = TestHome::new();

    home.cmd()
        .args(["--json", "check", "soon"])
        .assert()
        .failure()
        .code(2)
        .stdout(contains("\"status\": \"error\""))
        .stdout(contains("\"kind\": \"user_error\""))
        .stdout(contains("invalid task id 'soon'"));

    Ok(())
}
