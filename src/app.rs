//! Application root: owns the task store and its save hook.
//!
//! Presentation code borrows the store through [`App::store`] and sends
//! intents through [`App::dispatch`]. Whenever an intent settles with a
//! changed list, the current list is handed to the save worker.

use tracing::debug;

use crate::error::Error;
use crate::filter::Filter;
use crate::kv::KvStore;
use crate::persist::{Persistence, SaveReport, SaveScheduler};
use crate::store::{Applied, Intent, TaskStore};

pub struct App {
    store: TaskStore,
    saver: SaveScheduler,
}

/// A started application plus whatever went wrong while loading.
pub struct Startup {
    pub app: App,
    /// Logged load failure; the store started empty.
    pub load_failure: Option<Error>,
}

impl App {
    /// Load the stored list and start the save worker.
    ///
    /// Must be called inside a tokio runtime.
    pub async fn start<S: KvStore>(persistence: &Persistence<S>, filter: Filter) -> Startup {
        let saver = persistence.spawn_saver();
        let outcome = persistence.load_or_empty().await;
        debug!(
            key = persistence.key(),
            count = outcome.items.len(),
            found = outcome.found,
            "task store ready"
        );

        let store = TaskStore::new(outcome.items).with_filter(filter);
        Startup {
            app: App { store, saver },
            load_failure: outcome.failure,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    /// Apply an intent and schedule a save once the list has settled.
    pub fn dispatch(&mut self, intent: Intent) -> Applied {
        let applied = self.store.apply(intent);
        if applied.list_changed {
            self.saver.schedule(self.store.items().to_vec());
        }
        applied
    }

    /// Wait for pending saves and hand back the final store.
    pub async fn shutdown(self) -> (TaskStore, SaveReport) {
        let report = self.saver.flush().await;
        (self.store, report)
    }
}
