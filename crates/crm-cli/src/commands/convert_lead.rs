//! Convert lead command implementation.

use anyhow::Result;
use clap::Args;

use crm_core::{RecordId, RecordType};
use crm_http::LeadConversion;

use crate::cli::GlobalArgs;
use crate::commands::remote_error;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct ConvertLeadArgs {
    /// Lead id
    pub id: RecordId,

    /// Do not create an account
    #[arg(long)]
    pub no_account: bool,

    /// Do not create an opportunity
    #[arg(long)]
    pub no_opportunity: bool,

    /// Name for the new account (defaults to the lead's company)
    #[arg(long)]
    pub account_name: Option<String>,

    /// Name for the new opportunity
    #[arg(long)]
    pub opportunity_name: Option<String>,

    /// Amount for the new opportunity
    #[arg(long)]
    pub amount: Option<f64>,

    /// Owner of the created records
    #[arg(long)]
    pub owner_id: Option<i64>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl ConvertLeadArgs {
    fn conversion(&self) -> LeadConversion {
        LeadConversion {
            create_account: !self.no_account,
            create_opportunity: !self.no_opportunity,
            account_name: self.account_name.clone(),
            opportunity_name: self.opportunity_name.clone(),
            opportunity_amount: self.amount,
            owner_id: self.owner_id,
        }
    }
}

pub async fn run(args: ConvertLeadArgs, global: &GlobalArgs) -> Result<()> {
    let (api, _) = session::connect(global)?;

    let result = api
        .collection(RecordType::Lead)
        .convert_lead(args.id, &args.conversion())
        .await
        .map_err(|e| remote_error(e, &format!("Failed to convert lead {}", args.id)))?;

    if args.json {
        return output::json_pretty(&result);
    }

    output::success(&format!("Lead {} converted", args.id));
    let created = [
        ("Account", result.account_id),
        ("Contact", result.contact_id),
        ("Opportunity", result.opportunity_id),
    ];
    for (label, id) in created {
        if let Some(id) = id {
            output::field(label, &id.to_string());
        }
    }
    Ok(())
}
