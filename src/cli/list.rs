//! todos list / filters

use serde::Serialize;

use crate::error::Result;
use crate::filter::Filter;
use crate::item::TaskItem;
use crate::output::{emit_success, HumanOutput};
use crate::store::{FilterCounts, Intent};
use crate::view;

use super::{Context, Session};

/// Options for `todos list`
pub struct ListOptions {
    pub filter: Option<String>,
}

#[derive(Serialize)]
struct ListReport<'a> {
    filter: Filter,
    title: &'static str,
    tasks: Vec<&'a TaskItem>,
    counts: FilterCounts,
}

#[derive(Serialize)]
struct FilterEntry {
    filter: Filter,
    title: &'static str,
    count: usize,
}

pub async fn run_list(ctx: &Context, options: ListOptions) -> Result<()> {
    let mut session = Session::open(ctx).await?;

    let mut filter_warning = None;
    if let Some(raw) = options.filter.as_deref() {
        let filter = Filter::parse(raw);
        if !filter.is_named() && !raw.trim().eq_ignore_ascii_case(filter.as_str()) {
            tracing::warn!(filter = raw, "unknown filter; showing every task");
            filter_warning = Some(format!("unknown filter '{raw}'; showing every task"));
        }
        session.dispatch(Intent::SetFilter(filter));
    }

    let (store, mut warnings) = session.close().await;
    warnings.extend(filter_warning);

    let filter = store.filter();
    let tasks = store.visible();

    let mut human = HumanOutput::new(view::title(filter));
    human.push_summary("filter", filter.as_str());
    human.push_summary("shown", tasks.len().to_string());
    for task in &tasks {
        human.push_detail(view::format_row(task));
    }
    if store.items().is_empty() {
        human.push_next_step("todos add <text>");
    }
    for warning in warnings {
        human.push_warning(warning);
    }

    let report = ListReport {
        filter,
        title: view::title(filter),
        tasks,
        counts: store.counts(),
    };
    emit_success(ctx.output, "list", &report, Some(&human))
}

pub async fn run_filters(ctx: &Context) -> Result<()> {
    let session = Session::open(ctx).await?;
    let (store, warnings) = session.close().await;
    let counts = store.counts();

    let entries: Vec<FilterEntry> = Filter::NAMED
        .iter()
        .map(|filter| FilterEntry {
            filter: *filter,
            title: view::title(*filter),
            count: counts.get(*filter),
        })
        .collect();

    let mut human = HumanOutput::new("todos filters");
    for entry in &entries {
        human.push_summary(
            entry.filter.as_str(),
            format!("{} ({})", entry.title, entry.count),
        );
    }
    for warning in warnings {
        human.push_warning(warning);
    }

    emit_success(ctx.output, "filters", &entries, Some(&human))
}
