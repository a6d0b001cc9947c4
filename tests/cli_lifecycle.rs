mod support;

use assert_cmd::Command;
use predicates::str::contains;
use serde_json::Value;

use support::{FakeBrowser, TestStore};

fn tabq(store: &TestStore, browser: &FakeBrowser) -> Command {
    let mut cmd = support::tabq_cmd();
    cmd.env("TABQ_STORE", store.path());
    cmd.env("TABQ_BROWSER_URL", browser.endpoint());
    cmd.env("HOME", store.config_home());
    cmd.env("XDG_CONFIG_HOME", store.config_home());
    cmd
}

fn task_ids(store: &TestStore) -> Vec<String> {
    store
        .read_tasks()
        .iter()
        .map(|task| task["id"].as_str().expect("task id").to_string())
        .collect()
}

#[test]
fn toggle_completes_a_task_and_closes_its_tab() {
    let store = TestStore::new();
    let browser = FakeBrowser::start();
    browser.add_tab("t1", "https://a.example/", "Alpha");
    tabq(&store, &browser).arg("snapshot").assert().success();
    let id = task_ids(&store).remove(0);

    tabq(&store, &browser)
        .args(["toggle", &id])
        .assert()
        .success()
        .stdout(contains(format!("completed {id}")));

    assert_eq!(browser.closed(), vec!["t1"]);
    assert!(browser.tabs().is_empty());

    let tasks = store.read_tasks();
    assert_eq!(tasks[0]["status"], "completed");
    // The stored hint survives completion.
    assert_eq!(tasks[0]["tabId"], "t1");
}

#[test]
fn toggle_reopens_a_completed_task_in_a_fresh_tab() {
    let store = TestStore::new();
    let browser = FakeBrowser::start();
    browser.add_tab("t1", "https://a.example/", "Alpha");
    tabq(&store, &browser).arg("snapshot").assert().success();
    let id = task_ids(&store).remove(0);

    tabq(&store, &browser)
        .args(["toggle", &id])
        .assert()
        .success();
    tabq(&store, &browser)
        .args(["toggle", &id])
        .assert()
        .success()
        .stdout(contains(format!("reopened {id}")));

    assert_eq!(browser.created(), vec!["https://a.example/"]);
    let tasks = store.read_tasks();
    assert_eq!(tasks[0]["status"], "open");
    // Reopening repoints the hint at the tab it just created.
    assert_eq!(tasks[0]["tabId"], "fake-1");
}

#[test]
fn toggle_of_an_unknown_id_changes_nothing() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::new();
    let browser = FakeBrowser::start();
    browser.add_tab("t1", "https://a.example/", "Alpha");
    tabq(&store, &browser).arg("snapshot").assert().success();

    let output = tabq(&store, &browser)
        .args(["toggle", "ghost", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["changed"], Value::Bool(false));
    assert_eq!(value["data"]["message"], "no task with id ghost");

    assert!(browser.closed().is_empty());
    assert_eq!(store.read_tasks()[0]["status"], "open");

    Ok(())
}

#[test]
fn rm_deletes_the_task_but_not_its_tab() {
    let store = TestStore::new();
    let browser = FakeBrowser::start();
    browser.add_tab("t1", "https://a.example/", "Alpha");
    browser.add_tab("t2", "https://b.example/", "Beta");
    tabq(&store, &browser).arg("snapshot").assert().success();
    let ids = task_ids(&store);

    tabq(&store, &browser)
        .args(["rm", &ids[0]])
        .assert()
        .success()
        .stdout(contains(format!("deleted {}", ids[0])));

    assert_eq!(task_ids(&store), vec![ids[1].clone()]);
    assert_eq!(browser.tabs().len(), 2);
    assert!(browser.closed().is_empty());
}

#[test]
fn clear_drops_only_completed_tasks() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::new();
    let browser = FakeBrowser::start();
    browser.add_tab("t1", "https://a.example/", "Alpha");
    browser.add_tab("t2", "https://b.example/", "Beta");
    tabq(&store, &browser).arg("snapshot").assert().success();
    let ids = task_ids(&store);

    tabq(&store, &browser)
        .args(["toggle", &ids[0]])
        .assert()
        .success();

    let output = tabq(&store, &browser)
        .args(["clear", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["data"]["removed"].as_u64(), Some(1));
    assert_eq!(value["data"]["remaining"].as_u64(), Some(1));

    assert_eq!(task_ids(&store), vec![ids[1].clone()]);

    Ok(())
}

#[test]
fn clear_with_nothing_completed_reports_zero() {
    let store = TestStore::new();
    let browser = FakeBrowser::start();
    browser.add_tab("t1", "https://a.example/", "Alpha");
    tabq(&store, &browser).arg("snapshot").assert().success();

    tabq(&store, &browser)
        .arg("clear")
        .assert()
        .success()
        .stdout(contains("No completed tasks to clear"));

    assert_eq!(task_ids(&store).len(), 1);
}

#[test]
fn swap_exchanges_positions_and_is_its_own_inverse() {
    let store = TestStore::new();
    let browser = FakeBrowser::start();
    browser.add_tab("t1", "https://a.example/", "Alpha");
    browser.add_tab("t2", "https://b.example/", "Beta");
    tabq(&store, &browser).arg("snapshot").assert().success();
    let ids = task_ids(&store);

    tabq(&store, &browser)
        .args(["swap", &ids[0], &ids[1]])
        .assert()
        .success()
        .stdout(contains("swapped"));
    assert_eq!(task_ids(&store), vec![ids[1].clone(), ids[0].clone()]);

    tabq(&store, &browser)
        .args(["swap", &ids[0], &ids[1]])
        .assert()
        .success();
    assert_eq!(task_ids(&store), ids);
}

#[test]
fn swap_with_an_unknown_id_is_a_no_op() {
    let store = TestStore::new();
    let browser = FakeBrowser::start();
    browser.add_tab("t1", "https://a.example/", "Alpha");
    tabq(&store, &browser).arg("snapshot").assert().success();
    let ids = task_ids(&store);

    tabq(&store, &browser)
        .args(["swap", &ids[0], "ghost"])
        .assert()
        .success()
        .stdout(contains("nothing to swap"));
    assert_eq!(task_ids(&store), ids);
}

#[test]
fn list_filters_by_status() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::new();
    let browser = FakeBrowser::start();
    browser.add_tab("t1", "https://a.example/", "Alpha");
    browser.add_tab("t2", "https://b.example/", "Beta");
    tabq(&store, &browser).arg("snapshot").assert().success();
    let ids = task_ids(&store);

    tabq(&store, &browser)
        .args(["toggle", &ids[0]])
        .assert()
        .success();

    let output = tabq(&store, &browser)
        .args(["list", "--status", "completed", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["data"]["total"].as_u64(), Some(2));
    assert_eq!(value["data"]["open"].as_u64(), Some(1));
    assert_eq!(value["data"]["completed"].as_u64(), Some(1));

    let tasks = value["data"]["tasks"].as_array().expect("tasks array");
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["id"].as_str(), Some(ids[0].as_str()));
    assert_eq!(tasks[0]["status"], "completed");

    Ok(())
}
