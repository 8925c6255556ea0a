//! In-memory task store.
//!
//! The free functions are pure list transformations: each takes the current
//! list and returns a new one. [`TaskStore`] owns a list plus the active
//! filter and applies [`Intent`]s through those functions.
//!
//! Lookups by id touch every item carrying that id, so duplicate ids (which
//! creation never produces) are always handled consistently.

use std::collections::HashSet;

use chrono::Utc;
use serde::Serialize;

use crate::filter::{visible_items, Filter};
use crate::item::{TaskId, TaskItem};

/// A user intent that the store knows how to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Create(String),
    Edit { id: TaskId, value: String },
    ToggleChecked(TaskId),
    ToggleRemoved(TaskId),
    PurgeRemoved,
    SetFilter(Filter),
}

/// Id for a task created at `now_ms`, bumped past every existing id.
///
/// When no id above the maximum is left, the smallest unused non-negative id
/// is taken instead.
pub fn next_id(items: &[TaskItem], now_ms: i64) -> TaskId {
    let max = items.iter().map(|item| item.id.as_i64()).max();
    match max {
        Some(max) if max >= now_ms => match max.checked_add(1) {
            Some(id) => TaskId(id),
            None => smallest_unused_id(items),
        },
        _ => TaskId(now_ms),
    }
}

fn smallest_unused_id(items: &[TaskItem]) -> TaskId {
    let taken: HashSet<i64> = items.iter().map(|item| item.id.as_i64()).collect();
    let mut id = 0;
    while taken.contains(&id) {
        id += 1;
    }
    TaskId(id)
}

/// Prepend a new item. Empty text leaves the list unchanged.
pub fn create(items: &[TaskItem], text: &str, id: TaskId) -> Vec<TaskItem> {
    if text.is_empty() {
        return items.to_vec();
    }
    let mut next = Vec::with_capacity(items.len() + 1);
    next.push(TaskItem::new(id, text));
    next.extend_from_slice(items);
    next
}

pub fn edit(items: &[TaskItem], id: TaskId, value: &str) -> Vec<TaskItem> {
    update_matching(items, id, |item| item.value = value.to_string())
}

pub fn toggle_checked(items: &[TaskItem], id: TaskId) -> Vec<TaskItem> {
    update_matching(items, id, |item| item.checked = !item.checked)
}

pub fn toggle_removed(items: &[TaskItem], id: TaskId) -> Vec<TaskItem> {
    update_matching(items, id, |item| item.removed = !item.removed)
}

/// Drop every trashed item.
pub fn purge_removed(items: &[TaskItem]) -> Vec<TaskItem> {
    items.iter().filter(|item| !item.removed).cloned().collect()
}

fn update_matching<F>(items: &[TaskItem], id: TaskId, mut mutate: F) -> Vec<TaskItem>
where
    F: FnMut(&mut TaskItem),
{
    items
        .iter()
        .cloned()
        .map(|mut item| {
            if item.id == id {
                mutate(&mut item);
            }
            item
        })
        .collect()
}

/// Per-filter tallies for the side bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterCounts {
    pub all: usize,
    pub unchecked: usize,
    pub checked: usize,
    pub removed: usize,
}

impl FilterCounts {
    pub fn get(&self, filter: Filter) -> usize {
        match filter {
            Filter::All => self.all,
            Filter::Unchecked => self.unchecked,
            Filter::Checked => self.checked,
            Filter::Removed => self.removed,
            Filter::Unfiltered => self.all + self.removed,
        }
    }
}

/// Result of applying an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    /// The task list differs from before the intent.
    pub list_changed: bool,
}

/// Owned task list plus the active view filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    items: Vec<TaskItem>,
    filter: Filter,
}

impl TaskStore {
    pub fn new(items: Vec<TaskItem>) -> Self {
        Self {
            items,
            filter: Filter::default(),
        }
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filter = filter;
        self
    }

    pub fn items(&self) -> &[TaskItem] {
        &self.items
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// First item carrying `id`.
    pub fn get(&self, id: TaskId) -> Option<&TaskItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn visible(&self) -> Vec<&TaskItem> {
        visible_items(&self.items, self.filter)
    }

    pub fn counts(&self) -> FilterCounts {
        self.items
            .iter()
            .fold(FilterCounts::default(), |mut counts, item| {
                if item.removed {
                    counts.removed += 1;
                } else {
                    counts.all += 1;
                    if item.checked {
                        counts.checked += 1;
                    } else {
                        counts.unchecked += 1;
                    }
                }
                counts
            })
    }

    /// Apply an intent, stamping new tasks with the current wall clock.
    pub fn apply(&mut self, intent: Intent) -> Applied {
        let now_ms = Utc::now().timestamp_millis();
        self.apply_at(intent, now_ms)
    }

    /// Apply an intent with an explicit creation clock.
    pub fn apply_at(&mut self, intent: Intent, now_ms: i64) -> Applied {
        let next = match intent {
            Intent::Create(text) => {
                let id = next_id(&self.items, now_ms);
                create(&self.items, &text, id)
            }
            Intent::Edit { id, value } => edit(&self.items, id, &value),
            Intent::ToggleChecked(id) => toggle_checked(&self.items, id),
            Intent::ToggleRemoved(id) => toggle_removed(&self.items, id),
            Intent::PurgeRemoved => purge_removed(&self.items),
            Intent::SetFilter(filter) => {
                self.filter = filter;
                return Applied {
                    list_changed: false,
                };
            }
        };

        let list_changed = next != self.items;
        self.items = next;
        Applied { list_changed }
    }
}
