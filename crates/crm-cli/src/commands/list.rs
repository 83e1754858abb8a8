//! List command implementation.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, anyhow, bail};
use chrono::Local;
use clap::Args;
use colored::Colorize;
use serde_json::json;

use crm_core::filter::{fields_for, is_sortable};
use crm_core::list::DEFAULT_PAGE_SIZE;
use crm_core::{
    Density, Filter, ListConfig, ListQueryController, ListSnapshot, LoadOutcome, QueryState,
    RecordType, SortOrder, ViewMode, ViewPreferences,
};

use crate::cli::GlobalArgs;
use crate::commands::remote_error;
use crate::output::{self, ConsoleNotifier};
use crate::session;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Record type (contact, account, lead, opportunity, case)
    pub record_type: RecordType,

    /// Search text
    #[arg(long, short)]
    pub search: Option<String>,

    /// Column to sort by (see `crm columns <type>`)
    #[arg(long)]
    pub sort_by: Option<String>,

    /// Sort direction (asc or desc)
    #[arg(long)]
    pub order: Option<SortOrder>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Records per page (1-100)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: u32,

    /// Filter row, repeatable (e.g. status:equals:New, email:is_not_empty)
    #[arg(long = "filter", short = 'f', value_name = "FIELD:OP[:VALUE]")]
    pub filters: Vec<Filter>,

    /// Comma-separated column keys to show
    #[arg(long, value_delimiter = ',')]
    pub columns: Vec<String>,

    /// Row density (compact, comfortable, spacious)
    #[arg(long, default_value_t = Density::Comfortable)]
    pub density: Density,

    /// Show records as cards instead of a table
    #[arg(long)]
    pub grid: bool,

    /// Print the page as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: ListArgs, global: &GlobalArgs) -> Result<()> {
    let record_type = args.record_type;
    let prefs = view_preferences(&args)?;
    let config = list_config(&args, global);
    let query = initial_query(&args, &config)?;

    let (api, _) = session::connect(global)?;
    let controller = ListQueryController::new(api.collection(record_type), config)
        .with_notifier(Arc::new(ConsoleNotifier))
        .with_query(query);

    if controller.reload().await == LoadOutcome::Failed {
        let action = format!("Failed to list {}", record_type.plural());
        return Err(match controller.snapshot().last_error {
            Some(err) => remote_error(err, &action),
            None => anyhow!(action),
        });
    }

    let view = controller.snapshot();

    if args.json {
        return output::json_pretty(&json!({
            "items": view.items,
            "total": view.total,
            "page": view.query.page,
            "page_size": view.query.page_size,
            "pages": view.pages,
        }));
    }

    if view.items.is_empty() {
        eprintln!("{}", format!("No {} found.", record_type.plural()).dimmed());
    } else {
        output::records(&view.items, &prefs);
    }

    eprintln!();
    eprintln!("{}", footer(&view, record_type).dimmed());

    Ok(())
}

fn view_preferences(args: &ListArgs) -> Result<ViewPreferences> {
    let mut prefs = ViewPreferences::for_record_type(args.record_type);

    if !args.columns.is_empty() && !prefs.set_visible_columns(&args.columns) {
        bail!(
            "None of the requested columns exist for {}; see 'crm columns {}'",
            args.record_type.plural(),
            args.record_type
        );
    }

    prefs.set_density(args.density);
    if args.grid {
        prefs.set_view_mode(ViewMode::Grid);
    }
    Ok(prefs)
}

fn list_config(args: &ListArgs, global: &GlobalArgs) -> ListConfig {
    ListConfig::default()
        .with_page_size(args.page_size)
        .with_timeout(Duration::from_secs(global.timeout))
}

fn initial_query(args: &ListArgs, config: &ListConfig) -> Result<QueryState> {
    let mut query = QueryState::from_config(config);

    if let Some(sort_by) = &args.sort_by {
        if !is_sortable(args.record_type, sort_by) {
            bail!(
                "'{}' is not a sortable column for {}; see 'crm columns {}'",
                sort_by,
                args.record_type.plural(),
                args.record_type
            );
        }
        query.sort_by = sort_by.clone();
        query.sort_order = SortOrder::Asc;
    }
    if let Some(order) = args.order {
        query.sort_order = order;
    }

    if let Some(search) = &args.search {
        query.search_term = search.clone();
        query.active_search = search.clone();
    }

    let catalog = fields_for(args.record_type);
    for filter in &args.filters {
        if let Err(reason) = filter.validate(catalog) {
            output::error(&format!("Ignoring filter '{}': {}", filter, reason));
        }
    }
    query.filters = args.filters.clone();
    query.page = args.page.max(1);

    Ok(query)
}

fn footer(view: &ListSnapshot, record_type: RecordType) -> String {
    let mut footer = format!(
        "Page {} of {} · {} {}",
        view.query.page,
        view.pages.max(1),
        view.total,
        record_type.plural()
    );
    if view.has_next_page() {
        footer.push_str(&format!(" · next: --page {}", view.query.page + 1));
    }
    if let Some(loaded) = view.last_loaded_at {
        footer.push_str(&format!(
            " · Updated {}",
            loaded.with_timezone(&Local).format("%H:%M:%S")
        ));
    }
    footer
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::{Cli, Commands};

    fn parse(args: &[&str]) -> (ListArgs, GlobalArgs) {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Commands::List(list) => (list, cli.global),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn sorting_by_a_column_defaults_to_ascending() {
        let (args, global) = parse(&["crm", "list", "leads", "--sort-by", "company"]);
        let query = initial_query(&args, &list_config(&args, &global)).unwrap();
        assert_eq!(query.sort_by, "company");
        assert_eq!(query.sort_order, SortOrder::Asc);
    }

    #[test]
    fn default_sort_is_newest_first() {
        let (args, global) = parse(&["crm", "list", "cases"]);
        let query = initial_query(&args, &list_config(&args, &global)).unwrap();
        assert_eq!(query.sort_by, "created_at");
        assert_eq!(query.sort_order, SortOrder::Desc);
        assert_eq!(query.page, 1);
    }

    #[test]
    fn derived_columns_cannot_be_sorted() {
        let (args, global) = parse(&["crm", "list", "leads", "--sort-by", "owner_alias"]);
        assert!(initial_query(&args, &list_config(&args, &global)).is_err());
    }

    #[test]
    fn search_is_committed_and_filters_kept() {
        let (args, global) = parse(&[
            "crm",
            "list",
            "lead",
            "--search",
            "acme",
            "-f",
            "status:equals:New",
            "-f",
            "email:is_not_empty",
        ]);
        let query = initial_query(&args, &list_config(&args, &global)).unwrap();
        assert_eq!(query.active_search, "acme");
        assert_eq!(query.filters.len(), 2);

        let params = query.fetch_params(fields_for(RecordType::Lead));
        assert_eq!(params.get("q"), Some("acme"));
        assert_eq!(params.get("filter_1_field"), Some("email"));
        assert!(!params.contains_key("filter_1_value"));
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let (args, _) = parse(&["crm", "list", "leads", "--columns", "nope,nada"]);
        assert!(view_preferences(&args).is_err());

        let (args, _) = parse(&["crm", "list", "leads", "--columns", "company,nope", "--grid"]);
        let prefs = view_preferences(&args).unwrap();
        assert_eq!(prefs.visible_columns().len(), 1);
        assert_eq!(prefs.view_mode(), ViewMode::Grid);
    }
}
