//! Merge cases command implementation.

use anyhow::Result;
use clap::Args;

use crm_core::{RecordId, RecordType};

use crate::cli::GlobalArgs;
use crate::commands::remote_error;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct MergeCasesArgs {
    /// Case that survives the merge
    #[arg(long)]
    pub master: RecordId,

    /// Cases to merge, including the master
    #[arg(required = true, num_args = 2..)]
    pub ids: Vec<RecordId>,
}

pub async fn run(args: MergeCasesArgs, global: &GlobalArgs) -> Result<()> {
    let (api, _) = session::connect(global)?;

    api.collection(RecordType::Case)
        .merge_cases(&args.ids, args.master)
        .await
        .map_err(|e| remote_error(e, "Failed to merge cases"))?;

    output::success(&format!(
        "Merged {} cases into case {}",
        args.ids.len(),
        args.master
    ));
    Ok(())
}
