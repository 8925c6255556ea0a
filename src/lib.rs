//! todos - local task list library
//!
//! Core pieces behind the `todos` CLI:
//!
//! - **Task store**: an ordered list of tasks plus the active filter, changed
//!   only through pure create/edit/check/trash/purge transformations
//! - **Persistence**: the whole list stored as one JSON value under a fixed
//!   key, loaded once at startup and saved after every change
//! - **Application root**: owns the store and schedules a save whenever an
//!   intent changes the list
//!
//! # Module Organization
//!
//! - `item`: task record and id
//! - `filter`: view filters and the visible-items projection
//! - `store`: list transformations, intents and the owned store
//! - `kv`: key-value storage backends (file, memory)
//! - `persist`: typed load/save and the background save worker
//! - `app`: application root wiring the store to persistence
//! - `view`: presentation rules (titles, read-only tasks)
//! - `cli`: command-line interface using clap
//! - `config`: configuration loading from `config.toml`
//! - `error`: error types and result aliases
//! - `lock`: file locking and atomic writes
//! - `output`: human and JSON output

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod filter;
pub mod item;
pub mod kv;
pub mod lock;
pub mod output;
pub mod persist;
pub mod store;
pub mod view;

pub use error::{Error, Result};
