//! Presentation rules that sit between user input and the store.
//!
//! The store accepts any intent. These checks mirror what the interface
//! disables: text of finished or trashed tasks is read-only, and trashed
//! tasks cannot be completed.

use crate::error::{Error, Result};
use crate::filter::Filter;
use crate::item::{TaskId, TaskItem};
use crate::store::TaskStore;

/// Heading shown above a filtered list.
pub fn title(filter: Filter) -> &'static str {
    match filter {
        Filter::All => "All tasks",
        Filter::Unchecked => "Current tasks",
        Filter::Checked => "Completed tasks",
        Filter::Removed => "Trash",
        Filter::Unfiltered => "TODO",
    }
}

/// Look up a task the user addressed by id.
pub fn require(store: &TaskStore, id: TaskId) -> Result<&TaskItem> {
    store.get(id).ok_or(Error::TaskNotFound(id))
}

pub fn ensure_editable(item: &TaskItem) -> Result<()> {
    if item.checked || item.removed {
        return Err(Error::TaskLocked {
            id: item.id,
            state: item.state(),
            action: "editing",
        });
    }
    Ok(())
}

pub fn ensure_checkable(item: &TaskItem) -> Result<()> {
    if item.removed {
        return Err(Error::TaskLocked {
            id: item.id,
            state: item.state(),
            action: "checking",
        });
    }
    Ok(())
}

/// One list row: `[x] <id>  <text>`.
pub fn format_row(item: &TaskItem) -> String {
    let mark = if item.checked { "x" } else { " " };
    let trash = if item.removed { "  (trashed)" } else { "" };
    format!("[{mark}] {}  {}{trash}", item.id, item.value)
}
