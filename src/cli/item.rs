//! todos add / edit / check / trash
//!
//! Per-task commands. Each one checks the same rules the interface enforces
//! before handing the intent to the store.

use serde::Serialize;

use crate::error::Result;
use crate::item::{TaskId, TaskItem};
use crate::output::{emit_success, HumanOutput};
use crate::store::Intent;
use crate::view;

use super::{Context, Session};

/// Options for `todos add`
pub struct AddOptions {
    pub words: Vec<String>,
}

/// Options for `todos edit`
pub struct EditOptions {
    pub id: TaskId,
    pub words: Vec<String>,
}

#[derive(Serialize)]
struct TaskReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<TaskItem>,
    changed: bool,
}

pub async fn run_add(ctx: &Context, options: AddOptions) -> Result<()> {
    let text = options.words.join(" ");
    let mut session = Session::open(ctx).await?;

    let applied = session.dispatch(Intent::Create(text));
    let created = applied
        .list_changed
        .then(|| session.store().items().first().cloned())
        .flatten();

    let (_, warnings) = session.close().await;

    let mut human = match &created {
        Some(task) => {
            let mut human = HumanOutput::new(format!("todos add: {}", task.id));
            human.push_summary("id", task.id.to_string());
            human.push_summary("text", task.value.clone());
            human
        }
        None => {
            let mut human = HumanOutput::new("todos add: nothing to add");
            human.push_next_step("todos add <text>");
            human
        }
    };
    for warning in warnings {
        human.push_warning(warning);
    }

    let report = TaskReport {
        changed: created.is_some(),
        task: created,
    };
    emit_success(ctx.output, "add", &report, Some(&human))
}

pub async fn run_edit(ctx: &Context, options: EditOptions) -> Result<()> {
    let value = options.words.join(" ");
    let mut session = Session::open(ctx).await?;

    let current = view::require(session.store(), options.id)?;
    view::ensure_editable(current)?;
    let previous = current.value.clone();

    let applied = session.dispatch(Intent::Edit {
        id: options.id,
        value,
    });
    let task = session.store().get(options.id).cloned();
    let (_, warnings) = session.close().await;

    let mut human = HumanOutput::new(format!("todos edit: {}", options.id));
    if let Some(task) = &task {
        human.push_summary("was", previous);
        human.push_summary("now", task.value.clone());
    }
    for warning in warnings {
        human.push_warning(warning);
    }

    let report = TaskReport {
        task,
        changed: applied.list_changed,
    };
    emit_success(ctx.output, "edit", &report, Some(&human))
}

pub async fn run_check(ctx: &Context, id: TaskId) -> Result<()> {
    let mut session = Session::open(ctx).await?;

    let current = view::require(session.store(), id)?;
    view::ensure_checkable(current)?;

    let applied = session.dispatch(Intent::ToggleChecked(id));
    let task = session.store().get(id).cloned();
    let (_, warnings) = session.close().await;

    let header = match &task {
        Some(task) if task.checked => format!("todos check: {id} done"),
        _ => format!("todos check: {id} open"),
    };
    let mut human = HumanOutput::new(header);
    if let Some(task) = &task {
        human.push_summary("text", task.value.clone());
    }
    for warning in warnings {
        human.push_warning(warning);
    }

    let report = TaskReport {
        task,
        changed: applied.list_changed,
    };
    emit_success(ctx.output, "check", &report, Some(&human))
}

pub async fn run_trash(ctx: &Context, id: TaskId) -> Result<()> {
    let mut session = Session::open(ctx).await?;

    view::require(session.store(), id)?;

    let applied = session.dispatch(Intent::ToggleRemoved(id));
    let task = session.store().get(id).cloned();
    let (_, warnings) = session.close().await;

    let trashed = task.as_ref().is_some_and(|task| task.removed);
    let header = if trashed {
        format!("todos trash: {id} moved to trash")
    } else {
        format!("todos trash: {id} restored")
    };
    let mut human = HumanOutput::new(header);
    if let Some(task) = &task {
        human.push_summary("text", task.value.clone());
    }
    if trashed {
        human.push_next_step(format!("todos restore {id}"));
        human.push_next_step("todos empty-trash --yes");
    }
    for warning in warnings {
        human.push_warning(warning);
    }

    let report = TaskReport {
        task,
        changed: applied.list_changed,
    };
    emit_success(ctx.output, "trash", &report, Some(&human))
}
