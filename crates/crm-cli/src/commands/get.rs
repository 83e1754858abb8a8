//! Get record command implementation.

use anyhow::Result;
use clap::Args;

use crm_core::{Collection, RecordId, RecordType};

use crate::cli::GlobalArgs;
use crate::commands::remote_error;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Record type (contact, account, lead, opportunity, case)
    pub record_type: RecordType,

    /// Record id
    pub id: RecordId,

    /// Print compact single-line JSON
    #[arg(long)]
    pub compact: bool,
}

pub async fn run(args: GetArgs, global: &GlobalArgs) -> Result<()> {
    let (api, _) = session::connect(global)?;

    let record = api
        .collection(args.record_type)
        .get(args.id)
        .await
        .map_err(|e| {
            remote_error(
                e,
                &format!("Failed to fetch {} {}", args.record_type, args.id),
            )
        })?;

    if args.compact {
        output::json(&record)
    } else {
        output::json_pretty(&record)
    }
}
