//! Field catalog command implementation.

use anyhow::Result;
use clap::Args;
use colored::Colorize;

use crm_core::RecordType;
use crm_core::filter::fields_for;

use crate::output;

#[derive(Args, Debug)]
pub struct FieldsArgs {
    /// Record type (contact, account, lead, opportunity, case)
    pub record_type: RecordType,

    /// Print the catalog as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: FieldsArgs) -> Result<()> {
    let fields = fields_for(args.record_type);

    if args.json {
        return output::json_pretty(&fields);
    }

    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!(
            "{} {} {}",
            field.key.bold(),
            format!("({})", field.label).dimmed(),
            field.value_type
        );

        let operators = field
            .operators()
            .iter()
            .map(|op| op.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        output::field("  operators", &operators);

        if !field.options.is_empty() {
            output::field("  options", &field.options.join(", "));
        }
    }

    Ok(())
}
