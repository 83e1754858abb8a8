//! Delete records command implementation.

use anyhow::{Result, bail};
use clap::Args;

use crm_core::{Collection, RecordId, RecordType};

use crate::cli::GlobalArgs;
use crate::commands::remote_error;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Record type (contact, account, lead, opportunity, case)
    pub record_type: RecordType,

    /// Record ids
    #[arg(required = true)]
    pub ids: Vec<RecordId>,
}

pub async fn run(args: DeleteArgs, global: &GlobalArgs) -> Result<()> {
    let (api, _) = session::connect(global)?;
    let collection = api.collection(args.record_type);

    let mut failed = 0;
    for id in &args.ids {
        match collection.delete(*id).await {
            Ok(()) => output::success(&format!("Deleted {} {}", args.record_type, id)),
            Err(e) if e.is_session_expired() => {
                return Err(remote_error(
                    e,
                    &format!("Failed to delete {} {}", args.record_type, id),
                ));
            }
            Err(e) => {
                tracing::warn!(%id, error = %e, "delete failed");
                output::error(&format!("Failed to delete {} {}: {}", args.record_type, id, e));
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} deletions failed", failed, args.ids.len());
    }
    Ok(())
}
