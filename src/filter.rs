//! View filters over the task list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::item::TaskItem;

/// Selects which subset of the list is visible. Never mutates the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    #[default]
    All,
    Unchecked,
    Checked,
    Removed,
    /// Any unrecognized filter name. Shows every item, trashed ones included.
    #[serde(other)]
    Unfiltered,
}

impl Filter {
    /// The named filters, in side bar order.
    pub const NAMED: [Filter; 4] = [
        Filter::All,
        Filter::Unchecked,
        Filter::Checked,
        Filter::Removed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Unchecked => "unchecked",
            Filter::Checked => "checked",
            Filter::Removed => "removed",
            Filter::Unfiltered => "unfiltered",
        }
    }

    /// Parse a filter name. Unknown names fall back to [`Filter::Unfiltered`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Filter::All,
            "unchecked" => Filter::Unchecked,
            "checked" => Filter::Checked,
            "removed" => Filter::Removed,
            _ => Filter::Unfiltered,
        }
    }

    pub fn is_named(self) -> bool {
        !matches!(self, Filter::Unfiltered)
    }

    pub fn matches(self, item: &TaskItem) -> bool {
        match self {
            Filter::All => !item.removed,
            Filter::Unchecked => !item.checked && !item.removed,
            Filter::Checked => item.checked && !item.removed,
            Filter::Removed => item.removed,
            Filter::Unfiltered => true,
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Filter {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(Filter::parse(raw))
    }
}

/// Pure projection of the list through a filter, preserving order.
pub fn visible_items(items: &[TaskItem], filter: Filter) -> Vec<&TaskItem> {
    items.iter().filter(|item| filter.matches(item)).collect()
}
