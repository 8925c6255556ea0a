//! todos empty-trash

use serde::Serialize;

use crate::error::{Error, Result};
use crate::filter::{visible_items, Filter};
use crate::item::TaskId;
use crate::output::{emit_success, HumanOutput};
use crate::store::Intent;

use super::{Context, Session};

/// Options for `todos empty-trash`
pub struct EmptyOptions {
    pub yes: bool,
}

#[derive(Serialize)]
struct EmptyReport {
    purged: Vec<TaskId>,
    remaining: usize,
}

pub async fn run_empty(ctx: &Context, options: EmptyOptions) -> Result<()> {
    let mut session = Session::open(ctx).await?;

    let trashed: Vec<TaskId> = visible_items(session.store().items(), Filter::Removed)
        .into_iter()
        .map(|item| item.id)
        .collect();

    if !trashed.is_empty() && !options.yes {
        return Err(Error::ConfirmationRequired(format!(
            "{} trashed task(s) would be deleted permanently",
            trashed.len()
        )));
    }

    session.dispatch(Intent::PurgeRemoved);
    let (store, warnings) = session.close().await;

    let header = if trashed.is_empty() {
        "todos empty-trash: trash is already empty".to_string()
    } else {
        format!("todos empty-trash: deleted {}", trashed.len())
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("remaining", store.items().len().to_string());
    for warning in warnings {
        human.push_warning(warning);
    }

    let report = EmptyReport {
        purged: trashed,
        remaining: store.items().len(),
    };
    emit_success(ctx.output, "empty-trash", &report, Some(&human))
}
