//! Escalate case command implementation.

use anyhow::Result;
use clap::Args;

use crm_core::{RecordId, RecordType};

use crate::cli::GlobalArgs;
use crate::commands::remote_error;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct EscalateArgs {
    /// Case id
    pub id: RecordId,
}

pub async fn run(args: EscalateArgs, global: &GlobalArgs) -> Result<()> {
    let (api, _) = session::connect(global)?;

    let case = api
        .collection(RecordType::Case)
        .escalate_case(args.id)
        .await
        .map_err(|e| remote_error(e, &format!("Failed to escalate case {}", args.id)))?;

    output::success(&format!("Case {} escalated", args.id));
    output::field("Status", &case.display_value("status"));
    Ok(())
}
