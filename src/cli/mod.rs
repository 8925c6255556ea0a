//! Command-line interface for todos
//!
//! This module defines the CLI structure using clap derive macros.
//! Each group of subcommands is implemented in its own submodule; all of them
//! go through a [`Session`] that locks the storage key, loads the list,
//! applies intents, and flushes the pending save before releasing the lock.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::app::{App, Startup};
use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::kv::FileKvStore;
use crate::lock::FileLock;
use crate::output::OutputOptions;
use crate::persist::Persistence;
use crate::store::{Applied, Intent, TaskStore};

mod item;
mod list;
mod trash;

/// todos - a local task list
///
/// Add, edit, complete and trash short tasks. The list is stored in a
/// local data directory and survives between runs.
#[derive(Parser, Debug)]
#[command(name = "todos")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the stored task list
    #[arg(long, global = true, env = "TODOS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true, env = "TODOS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add a task to the top of the list
    Add {
        /// Task text (words are joined with spaces)
        text: Vec<String>,
    },

    /// Replace the text of a task
    Edit {
        /// Task id
        id: String,

        /// New text (words are joined with spaces)
        text: Vec<String>,
    },

    /// Mark a task done, or open again
    Check {
        /// Task id
        id: String,
    },

    /// Move a task to the trash, or restore it from there
    #[command(visible_alias = "restore")]
    Trash {
        /// Task id
        id: String,
    },

    /// Permanently delete every trashed task
    EmptyTrash {
        /// Confirm the deletion
        #[arg(short, long)]
        yes: bool,
    },

    /// Show tasks through a filter
    #[command(visible_alias = "ls")]
    List {
        /// all, unchecked, checked or removed (other names show everything)
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show the available filters and how many tasks each shows
    Filters,
}

impl Cli {
    /// Run the CLI command
    pub fn run(self) -> Result<()> {
        let config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::load_or_default(config::default_config_path().as_deref()),
        };
        let data_dir = self.data_dir.clone().unwrap_or_else(|| config.data_dir());
        let ctx = Context {
            data_dir,
            config,
            output: OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        };

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.command.run(&ctx))
    }
}

impl Commands {
    async fn run(self, ctx: &Context) -> Result<()> {
        match self {
            Commands::Add { text } => item::run_add(ctx, item::AddOptions { words: text }).await,
            Commands::Edit { id, text } => {
                item::run_edit(
                    ctx,
                    item::EditOptions {
                        id: id.parse()?,
                        words: text,
                    },
                )
                .await
            }
            Commands::Check { id } => item::run_check(ctx, id.parse()?).await,
            Commands::Trash { id } => item::run_trash(ctx, id.parse()?).await,
            Commands::EmptyTrash { yes } => trash::run_empty(ctx, trash::EmptyOptions { yes }).await,
            Commands::List { filter } => list::run_list(ctx, list::ListOptions { filter }).await,
            Commands::Filters => list::run_filters(ctx).await,
        }
    }
}

/// Resolved settings shared by every command
pub struct Context {
    pub data_dir: PathBuf,
    pub config: Config,
    pub output: OutputOptions,
}

impl Context {
    pub fn kv(&self) -> FileKvStore {
        FileKvStore::new(&self.data_dir).with_lock_timeout(self.config.storage.lock_timeout_ms)
    }

    pub fn persistence(&self) -> Persistence<FileKvStore> {
        Persistence::new(self.kv(), self.config.storage.key.clone())
    }
}

/// One command's lifetime: lock, load, dispatch, flush, unlock.
struct Session {
    app: App,
    warnings: Vec<String>,
    lock: Option<FileLock>,
}

impl Session {
    async fn open(ctx: &Context) -> Result<Self> {
        let mut warnings = Vec::new();
        let lock = lock_storage(ctx, &mut warnings).await?;

        let persistence = ctx.persistence();
        let Startup { app, load_failure } =
            App::start(&persistence, ctx.config.view.default_filter).await;

        if let Some(err) = load_failure {
            warnings.push(format!("{err}; started from an empty list"));
        }
        Ok(Self {
            app,
            warnings,
            lock,
        })
    }

    fn store(&self) -> &TaskStore {
        self.app.store()
    }

    fn dispatch(&mut self, intent: Intent) -> Applied {
        self.app.dispatch(intent)
    }

    /// Flush pending saves; failures become warnings, never errors.
    async fn close(self) -> (TaskStore, Vec<String>) {
        let Session {
            app,
            mut warnings,
            lock,
        } = self;
        let (store, report) = app.shutdown().await;
        drop(lock);
        warnings.extend(report.failures);
        (store, warnings)
    }
}

/// Take the storage key lock for the whole session.
///
/// Another run holding it past the timeout is an error. A data directory
/// that cannot hold a lock file is left to the load/save path, which reports
/// it as a warning.
async fn lock_storage(ctx: &Context, warnings: &mut Vec<String>) -> Result<Option<FileLock>> {
    let kv = ctx.kv();
    let key = ctx.config.storage.key.clone();
    let locked = tokio::task::spawn_blocking(move || kv.lock_key(&key))
        .await
        .map_err(|err| Error::OperationFailed(err.to_string()))?;

    match locked {
        Ok(lock) => Ok(Some(lock)),
        Err(err @ (Error::LockFailed(_) | Error::InvalidConfig(_))) => Err(err),
        Err(err) => {
            tracing::warn!(error = %err, "running without the storage lock");
            warnings.push(format!("Could not lock task list: {err}"));
            Ok(None)
        }
    }
}
