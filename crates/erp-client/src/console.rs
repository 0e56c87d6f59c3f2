//! Commands of the `erp-console` binary
//!
//! Each command loads one page through a [`PageController`] and renders the
//! result. Without an API client the page runs on the bundled sample data.

use crate::{client::ApiClient, render, repository::HttpRepository};
use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use erp_core::{
    Patch, Record, RecordId,
    context_error::{ContextError, Result, ResultExt},
};
use erp_records::{
    AlwaysConfirm, Confirm, InMemoryRepository, PageController, PageDefinition, Repository,
    SortDirection, pages, sample,
};
use std::{fmt::Write as _, str::FromStr, sync::Arc, time::Duration};
use tracing::info;

/// Record collections the console can open
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Resource {
    /// 세금계산서
    Invoices,
    /// 자산
    Assets,
    /// 공지사항
    Notices,
    /// 백업 작업
    Backups,
    /// 전자결재
    Approvals,
}

/// What to do with the page
#[derive(Debug, Clone, Subcommand)]
pub enum Action {
    /// Filtered, sorted and paginated list
    List(ListArgs),
    /// Stat cards over every record
    Stats,
    /// Chart panel over every record
    Chart,
    /// One record in detail
    Show {
        /// Record id
        id: RecordId,
    },
    /// Create a record from the blank form plus JSON fields
    Create {
        /// Fields to fill in, as a JSON object
        #[arg(long, value_name = "JSON")]
        data: Option<String>,
    },
    /// Change fields of a record
    Update {
        /// Record id
        id: RecordId,
        /// Changed fields, as a JSON object
        #[arg(long, value_name = "JSON")]
        data: String,
    },
    /// Delete a record after confirmation
    Delete {
        /// Record id
        id: RecordId,
    },
    /// Move a record to another status
    Transition {
        /// Record id
        id: RecordId,
        /// Target status, e.g. `paid`
        status: String,
    },
}

/// Filter, sort and page options of `list`
#[derive(Debug, Clone, Default, Args)]
pub struct ListArgs {
    /// Search text matched against the page's search fields
    #[arg(short, long)]
    pub search: Option<String>,

    /// Dropdown selection, repeatable
    #[arg(short, long = "filter", value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub filters: Vec<(String, String)>,

    /// Calendar date filter
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Sort column with optional direction
    #[arg(long, value_name = "COLUMN[:asc|desc]", value_parser = parse_sort)]
    pub sort: Option<(String, SortDirection)>,

    /// Page number, starting at 1
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,
}

/// Output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text
    #[default]
    Text,
    /// Pretty JSON
    Json,
}

/// Settings shared by every command
#[derive(Debug, Clone)]
pub struct ConsoleContext {
    /// Live API; sample data when `None`
    pub client: Option<Arc<ApiClient>>,
    /// Rows per page unless `--page-size` is given
    pub page_size: usize,
    /// Latency added to sample-data calls
    pub delay: Duration,
    /// Output encoding
    pub output: OutputFormat,
    /// Skip delete confirmation
    pub assume_yes: bool,
}

impl Default for ConsoleContext {
    fn default() -> Self {
        Self {
            client: None,
            page_size: erp_records::DEFAULT_PAGE_SIZE,
            delay: Duration::ZERO,
            output: OutputFormat::Text,
            assume_yes: false,
        }
    }
}

/// Parse `KEY=VALUE`
pub fn parse_assignment(input: &str) -> std::result::Result<(String, String), String> {
    input
        .split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_string(), value.trim().to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{input}'"))
}

/// Parse `YYYY-MM-DD`
pub fn parse_date(input: &str) -> std::result::Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|e| format!("invalid date '{input}': {e}"))
}

/// Parse `column`, `column:asc` or `column:desc`
pub fn parse_sort(input: &str) -> std::result::Result<(String, SortDirection), String> {
    let (column, direction) = input.split_once(':').unwrap_or((input, "asc"));
    let direction = match direction {
        "asc" => SortDirection::Asc,
        "desc" => SortDirection::Desc,
        other => return Err(format!("unknown sort direction '{other}'")),
    };
    Ok((column.to_string(), direction))
}

/// Run `action` on the page of `resource` and return the rendered output
///
/// # Errors
///
/// Returns an error if loading fails or the action is rejected.
pub async fn run(resource: Resource, action: &Action, ctx: &ConsoleContext) -> Result<String> {
    match resource {
        Resource::Invoices => {
            run_page(pages::invoices::definition(), sample::invoices, action, ctx).await
        }
        Resource::Assets => run_page(pages::assets::definition(), sample::assets, action, ctx).await,
        Resource::Notices => {
            run_page(pages::notices::definition(), sample::notices, action, ctx).await
        }
        Resource::Backups => {
            run_page(pages::backups::definition(), sample::backups, action, ctx).await
        }
        Resource::Approvals => {
            run_page(pages::approvals::definition(), sample::approvals, action, ctx).await
        }
    }
}

async fn run_page<R: Record>(
    definition: PageDefinition<R>,
    sample: fn() -> Vec<R>,
    action: &Action,
    ctx: &ConsoleContext,
) -> Result<String> {
    let repository: Arc<dyn Repository<R>> = match &ctx.client {
        Some(client) => Arc::new(HttpRepository::new(Arc::clone(client))),
        None => Arc::new(InMemoryRepository::new(sample()).with_delay(ctx.delay)),
    };
    let controller = PageController::new(repository, definition).with_page_size(ctx.page_size);
    controller
        .reload()
        .await
        .with_context(|| format!("Failed to load {}", R::RESOURCE))?;
    info!(
        resource = R::RESOURCE,
        backend = %controller.backend(),
        records = controller.records().len(),
        "page loaded"
    );

    match action {
        Action::List(args) => list(&controller, args, ctx.output),
        Action::Stats => {
            let cards = controller.stat_cards();
            match ctx.output {
                OutputFormat::Text => Ok(format!("{}\n{}", R::TITLE, render::stat_cards(&cards))),
                OutputFormat::Json => Ok(render::json(&cards)?),
            }
        }
        Action::Chart => match (controller.chart(), ctx.output) {
            (None, _) => Ok(format!("{} 페이지에는 차트가 없습니다\n", R::TITLE)),
            (Some(data), OutputFormat::Text) => Ok(render::chart(&data)),
            (Some(data), OutputFormat::Json) => Ok(render::json(&data)?),
        },
        Action::Show { id } => show(&controller, *id, ctx.output),
        Action::Create { data } => {
            controller.open_create();
            if let Some(data) = data {
                let fields: R::Patch = serde_json::from_str(data)?;
                controller.update_draft(|draft| fields.apply(draft));
            }
            let saved = controller
                .save()
                .await
                .with_context(|| format!("Failed to create {} record", R::RESOURCE))?;
            mutation_output(&controller, saved.as_ref(), ctx.output)
        }
        Action::Update { id, data } => {
            let fields: R::Patch = serde_json::from_str(data)?;
            controller
                .open_edit(*id)
                .with_context(|| format!("Cannot edit {} record {id}", R::RESOURCE))?;
            controller.update_patch(|patch| *patch = fields);
            let saved = controller
                .save()
                .await
                .with_context(|| format!("Failed to update {} record {id}", R::RESOURCE))?;
            mutation_output(&controller, saved.as_ref(), ctx.output)
        }
        Action::Delete { id } => {
            let confirm: Box<dyn Confirm> = if ctx.assume_yes {
                Box::new(AlwaysConfirm)
            } else {
                Box::new(render::LineConfirm::stdin())
            };
            let deleted = controller
                .delete(*id, confirm.as_ref())
                .await
                .with_context(|| format!("Failed to delete {} record {id}", R::RESOURCE))?;
            if deleted {
                Ok(render::toasts(&controller.notifications()))
            } else {
                Ok("취소되었습니다\n".to_string())
            }
        }
        Action::Transition { id, status } => {
            let next = R::Status::from_str(status)
                .with_context(|| format!("Invalid status for {}", R::RESOURCE))?;
            let saved = controller
                .transition(*id, next)
                .await
                .with_context(|| format!("Failed to change status of {} record {id}", R::RESOURCE))?;
            mutation_output(&controller, saved.as_ref(), ctx.output)
        }
    }
}

fn list<R: Record>(
    controller: &PageController<R>,
    args: &ListArgs,
    output: OutputFormat,
) -> Result<String> {
    if let Some(search) = &args.search {
        controller.set_search(search.as_str());
    }
    for (key, value) in &args.filters {
        controller
            .select(key, value)
            .with_context(|| format!("Invalid filter {key}={value}"))?;
    }
    controller.set_date(args.date);
    if let Some((column, direction)) = &args.sort {
        controller
            .sort_by(column, *direction)
            .with_context(|| format!("Cannot sort by {column}"))?;
    }
    if let Some(page_size) = args.page_size {
        controller.set_page_size(page_size);
    }
    controller.go_to_page(args.page);

    let table = controller.list_view();
    match output {
        OutputFormat::Text => Ok(format!("{}\n{}", R::TITLE, table.to_text())),
        OutputFormat::Json => Ok(render::json(&table)?),
    }
}

fn show<R: Record>(
    controller: &PageController<R>,
    id: RecordId,
    output: OutputFormat,
) -> Result<String> {
    let record = controller
        .open_view(id)
        .with_context(|| format!("Cannot open {} record {id}", R::RESOURCE))?;

    if output == OutputFormat::Json {
        return Ok(render::json(record.as_ref())?);
    }

    let list = &controller.definition().list;
    let row = list.row(&record);
    let mut out = format!("{} #{id}\n", R::TITLE);
    for (header, cell) in list.headers().iter().zip(&row.cells) {
        let _ = writeln!(out, "{header}: {}", cell.display());
    }
    let verbs: Vec<&str> = row.actions.iter().map(|action| action.verb()).collect();
    let _ = writeln!(out, "actions: {}", verbs.join(", "));
    Ok(out)
}

fn mutation_output<R: Record>(
    controller: &PageController<R>,
    record: &R,
    output: OutputFormat,
) -> Result<String> {
    let mut out = render::json(record)?;
    out.push('\n');
    if output == OutputFormat::Text {
        out.push_str(&render::toasts(&controller.notifications()));
    }
    Ok(out)
}

impl From<crate::error::ClientError> for ContextError {
    fn from(error: crate::error::ClientError) -> Self {
        let message = error.to_string();
        Self::with_context(error, message)
    }
}
