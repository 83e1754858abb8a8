//! Change owner command implementation.

use anyhow::Result;
use clap::Args;

use crm_core::{RecordId, RecordType};

use crate::cli::GlobalArgs;
use crate::commands::remote_error;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ChangeOwnerArgs {
    /// Record type (contact, account, lead, opportunity, case)
    pub record_type: RecordType,

    /// Record id
    pub id: RecordId,

    /// New owner's user id
    #[arg(long)]
    pub owner: i64,
}

pub async fn run(args: ChangeOwnerArgs, global: &GlobalArgs) -> Result<()> {
    let (api, _) = session::connect(global)?;

    let record = api
        .collection(args.record_type)
        .change_owner(args.id, args.owner)
        .await
        .map_err(|e| {
            remote_error(
                e,
                &format!("Failed to change owner of {} {}", args.record_type, args.id),
            )
        })?;

    output::success(&format!(
        "{} {} reassigned to user {}",
        args.record_type.label(),
        args.id,
        args.owner
    ));
    if let Some(alias) = record.get("owner_alias").and_then(|v| v.as_str()) {
        output::field("Owner", alias);
    }
    Ok(())
}
