#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;
use todos::item::TaskItem;

pub const STORAGE_KEY: &str = "todo-20200101";

/// An isolated home: data directory, config directory, no ambient env.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn store_file(&self) -> PathBuf {
        self.store_file_for(STORAGE_KEY)
    }

    pub fn store_file_for(&self, key: &str) -> PathBuf {
        self.data_dir().join(format!("{key}.json"))
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.dir.path().join("config.toml");
        fs::write(&path, contents).expect("write config");
        path
    }

    pub fn write_store(&self, contents: &str) {
        let path = self.store_file();
        fs::create_dir_all(self.data_dir()).expect("create data dir");
        fs::write(path, contents).expect("write store");
    }

    pub fn read_store(&self) -> Vec<TaskItem> {
        let raw = fs::read_to_string(self.store_file()).expect("read store");
        serde_json::from_str(&raw).expect("parse store")
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("todos").expect("binary");
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("xdg-config"))
            .env("XDG_DATA_HOME", self.path().join("xdg-data"))
            .env("TODOS_DATA_DIR", self.data_dir())
            .env_remove("TODOS_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run a command with `--json` and return the parsed envelope.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .output()
            .expect("run todos");
        assert!(
            output.status.success(),
            "todos {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("json output")
    }

    /// Add a task and return its id.
    pub fn add(&self, text: &str) -> i64 {
        let envelope = self.json(&["add", text]);
        envelope["data"]["task"]["id"].as_i64().expect("task id")
    }
}

pub fn values(items: &[TaskItem]) -> Vec<&str> {
    items.iter().map(|item| item.value.as_str()).collect()
}
