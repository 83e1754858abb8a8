//! Update record command implementation.

use anyhow::Result;
use clap::Args;

use crm_core::{Collection, RecordId, RecordType};

use crate::cli::GlobalArgs;
use crate::commands::{read_json, remote_error};
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Record type (contact, account, lead, opportunity, case)
    pub record_type: RecordType,

    /// Record id
    pub id: RecordId,

    /// Fields to change as JSON: inline, @file, or - for stdin
    #[arg(long)]
    pub data: String,
}

pub async fn run(args: UpdateArgs, global: &GlobalArgs) -> Result<()> {
    let data = read_json(&args.data)?;
    let (api, _) = session::connect(global)?;

    let record = api
        .collection(args.record_type)
        .update(args.id, &data)
        .await
        .map_err(|e| {
            remote_error(
                e,
                &format!("Failed to update {} {}", args.record_type, args.id),
            )
        })?;

    output::success(&format!("{} {} updated", args.record_type.label(), args.id));
    output::json_pretty(&record)
}
