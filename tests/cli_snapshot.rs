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

#[test]
fn snapshot_captures_every_tab_in_order() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::new();
    let browser = FakeBrowser::start();
    browser.add_tab("t1", "https://a.example/", "Alpha");
    browser.add_tab("t2", "https://b.example/", "Beta");
    browser.add_tab("t3", "https://c.example/", "");

    tabq(&store, &browser)
        .arg("snapshot")
        .assert()
        .success()
        .stdout(contains("Captured 3 tab(s)"));

    let tasks = store.read_tasks();
    assert_eq!(tasks.len(), 3);

    let urls: Vec<&str> = tasks
        .iter()
        .map(|task| task["url"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(
        urls,
        vec!["https://a.example/", "https://b.example/", "https://c.example/"]
    );

    // Empty titles fall back to the url at capture time.
    assert_eq!(tasks[0]["title"], "Alpha");
    assert_eq!(tasks[2]["title"], "https://c.example/");

    // One batch: a shared timestamp and position-derived ids.
    let stamp = tasks[0]["createdAt"].as_i64().expect("createdAt");
    for (index, task) in tasks.iter().enumerate() {
        assert_eq!(task["createdAt"].as_i64(), Some(stamp));
        assert_eq!(task["id"], format!("{stamp}-{index}"));
        assert_eq!(task["status"], "open");
    }
    assert_eq!(tasks[1]["tabId"], "t2");

    Ok(())
}

#[test]
fn snapshot_appends_without_dedup() -> Result<(), Box<dyn std::error::Error>> {
    let store = TestStore::new();
    let browser = FakeBrowser::start();
    browser.add_tab("t1", "https://a.example/", "Alpha");

    tabq(&store, &browser).arg("snapshot").assert().success();

    let output = tabq(&store, &browser)
        .args(["snapshot", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let value: Value = serde_json::from_slice(&output)?;
    assert_eq!(value["schema_version"], "tabq.v1");
    assert_eq!(value["command"], "snapshot");
    assert_eq!(value["status"], "success");
    assert_eq!(value["data"]["added"].as_u64(), Some(1));
    assert_eq!(value["data"]["total"].as_u64(), Some(2));

    let tasks = store.read_tasks();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0]["url"], tasks[1]["url"]);
    assert_ne!(tasks[0]["id"], tasks[1]["id"]);

    Ok(())
}

#[test]
fn snapshot_of_an_empty_browser_writes_nothing() {
    let store = TestStore::new();
    let browser = FakeBrowser::start();

    tabq(&store, &browser)
        .arg("snapshot")
        .assert()
        .success()
        .stdout(contains("No open tabs to capture"));

    assert!(!store.path().exists());
}

#[test]
fn list_renders_captured_tasks() {
    let store = TestStore::new();
    let browser = FakeBrowser::start();
    browser.add_tab("t1", "https://a.example/", "Alpha");

    tabq(&store, &browser).arg("snapshot").assert().success();

    tabq(&store, &browser)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("1 task(s): 1 open, 0 completed"))
        .stdout(contains("[ ]"))
        .stdout(contains("Alpha"));
}

#[test]
fn list_is_empty_without_a_store_file() {
    let store = TestStore::new();
    let browser = FakeBrowser::start();

    tabq(&store, &browser)
        .arg("list")
        .assert()
        .success()
        .stdout(contains("No tasks. Run 'tabq snapshot' to capture the open tabs."));
}
