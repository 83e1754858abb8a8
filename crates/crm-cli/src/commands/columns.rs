//! Column catalog command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde_json::json;

use crm_core::RecordType;
use crm_core::filter::{columns_for, sort_options};

use crate::output;

#[derive(Args, Debug)]
pub struct ColumnsArgs {
    /// Record type (contact, account, lead, opportunity, case)
    pub record_type: RecordType,

    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: ColumnsArgs) -> Result<()> {
    let columns = columns_for(args.record_type);
    let sorts = sort_options(args.record_type);

    if args.json {
        return output::json_pretty(&json!({
            "columns": columns,
            "sort_options": sorts,
        }));
    }

    let width = columns.iter().map(|c| c.key.len()).max().unwrap_or(0);
    for column in columns {
        let marker = if column.sortable { "" } else { " (not sortable)" };
        println!(
            "{:width$}  {}{}",
            column.key,
            column.label,
            marker.dimmed(),
            width = width
        );
    }

    println!();
    println!("{}", "Sort by:".dimmed());
    for option in sorts {
        println!("  {:width$}  {}", option.key, option.label, width = width);
    }

    Ok(())
}
