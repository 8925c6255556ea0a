//! Configuration loading and management
//!
//! Handles parsing of the `config.toml` file found in the platform config
//! directory (or passed with `--config`).

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::Deserialize;

use crate::filter::Filter;
use crate::kv;
use crate::lock::DEFAULT_LOCK_TIMEOUT_MS;
use crate::persist::DEFAULT_STORAGE_KEY;

/// File name of the configuration inside the config directory
pub const CONFIG_FILE: &str = "config.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Where and how the task list is stored
    #[serde(default)]
    pub storage: StorageConfig,

    /// Presentation defaults
    #[serde(default)]
    pub view: ViewConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Data directory; the platform data directory when unset
    #[serde(default)]
    pub dir: Option<PathBuf>,

    /// Key the whole list is stored under
    #[serde(default = "default_key")]
    pub key: String,

    /// How long a writer waits for another process's lock
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
}

fn default_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            dir: None,
            key: default_key(),
            lock_timeout_ms: default_lock_timeout_ms(),
        }
    }
}

/// View configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewConfig {
    /// Filter used by `todos list` when none is given
    #[serde(default)]
    pub default_filter: Filter,
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "todos")
}

/// Platform location of `config.toml`, if a home directory is known
pub fn default_config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE))
}

/// Platform data directory, falling back to `./.todos`
pub fn default_data_dir() -> PathBuf {
    project_dirs()
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".todos"))
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load the platform configuration, or return defaults
    ///
    /// A broken file here is logged and ignored; an explicitly requested
    /// file goes through [`Config::load`] and fails loudly instead.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Data directory after applying config and the fallback
    pub fn data_dir(&self) -> PathBuf {
        self.storage.dir.clone().unwrap_or_else(default_data_dir)
    }

    fn validate(&self) -> crate::error::Result<()> {
        kv::validate_key(&self.storage.key)?;
        if !self.view.default_filter.is_named() {
            return Err(crate::error::Error::InvalidConfig(
                "view.default_filter must be one of all, unchecked, checked, removed".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;

    #[test]
    fn defaults_are_expected() {
        let cfg = Config::default();
        assert!(cfg.storage.dir.is_none());
        assert_eq!(cfg.storage.key, "todo-20200101");
        assert_eq!(cfg.storage.lock_timeout_ms, 5000);
        assert_eq!(cfg.view.default_filter, Filter::All);
    }

    #[test]
    fn load_parses_overrides() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        let content = r#"
[storage]
dir = "/tmp/todos-data"
key = "work"
lock_timeout_ms = 250

[view]
default_filter = "unchecked"
"#;
        fs::write(&path, content).expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.storage.dir, Some(PathBuf::from("/tmp/todos-data")));
        assert_eq!(cfg.storage.key, "work");
        assert_eq!(cfg.storage.lock_timeout_ms, 250);
        assert_eq!(cfg.view.default_filter, Filter::Unchecked);
        assert_eq!(cfg.data_dir(), PathBuf::from("/tmp/todos-data"));
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "[view]\ndefault_filter = \"checked\"\n").expect("write config");

        let cfg = Config::load(&path).expect("load config");
        assert_eq!(cfg.storage.key, DEFAULT_STORAGE_KEY);
        assert_eq!(cfg.view.default_filter, Filter::Checked);
    }

    #[test]
    fn rejects_bad_key_and_filter() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);

        fs::write(&path, "[storage]\nkey = \"../outside\"\n").expect("write config");
        assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));

        fs::write(&path, "[view]\ndefault_filter = \"someday\"\n").expect("write config");
        assert!(matches!(Config::load(&path), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn load_or_default_tolerates_missing_and_broken_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILE);

        let cfg = Config::load_or_default(Some(&path));
        assert_eq!(cfg.storage.key, DEFAULT_STORAGE_KEY);

        fs::write(&path, "this is = = not toml").expect("write config");
        let cfg = Config::load_or_default(Some(&path));
        assert_eq!(cfg.storage.key, DEFAULT_STORAGE_KEY);
    }
}
