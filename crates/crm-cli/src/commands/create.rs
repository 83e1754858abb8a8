//! Create record command implementation.

use anyhow::Result;
use clap::Args;

use crm_core::{Collection, RecordType};

use crate::cli::GlobalArgs;
use crate::commands::{read_json, remote_error};
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Record type (contact, account, lead, opportunity, case)
    pub record_type: RecordType,

    /// Record fields as JSON: inline, @file, or - for stdin
    #[arg(long)]
    pub data: String,
}

pub async fn run(args: CreateArgs, global: &GlobalArgs) -> Result<()> {
    let data = read_json(&args.data)?;
    let (api, _) = session::connect(global)?;

    let record = api
        .collection(args.record_type)
        .create(&data)
        .await
        .map_err(|e| remote_error(e, &format!("Failed to create {}", args.record_type)))?;

    match record.id() {
        Some(id) => output::success(&format!("{} created: {}", args.record_type.label(), id)),
        None => output::success(&format!("{} created", args.record_type.label())),
    }
    output::json_pretty(&record)
}
