//! CLI argument definitions.

use clap::{Args, Parser, Subcommand};

use crate::commands::{
    change_owner, columns, convert_lead, create, delete, escalate, fields, get, list, login,
    logout, merge_cases, update, whoami,
};

/// Default backend when neither `--api-url` nor a saved session names one.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Command-line client for the CRM backend.
#[derive(Parser, Debug)]
#[command(name = "crm")]
#[command(author, version = env!("CRM_VERSION"), about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Backend base URL (defaults to the saved session's, then http://localhost:8000)
    #[arg(long, env = "CRM_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "CRM_TIMEOUT", default_value_t = 30, global = true)]
    pub timeout: u64,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and save the session
    Login(login::LoginArgs),

    /// Forget the saved session
    Logout(logout::LogoutArgs),

    /// Show the logged-in user
    Whoami(whoami::WhoamiArgs),

    /// Show the filterable fields of a record type
    Fields(fields::FieldsArgs),

    /// Show the list columns and sort keys of a record type
    Columns(columns::ColumnsArgs),

    /// List records with search, filters, sorting and paging
    List(list::ListArgs),

    /// Fetch a single record
    Get(get::GetArgs),

    /// Create a record
    Create(create::CreateArgs),

    /// Update a record
    Update(update::UpdateArgs),

    /// Delete one or more records
    Delete(delete::DeleteArgs),

    /// Convert a lead into an account, contact and opportunity
    ConvertLead(convert_lead::ConvertLeadArgs),

    /// Escalate a case
    Escalate(escalate::EscalateArgs),

    /// Merge duplicate cases into a master case
    MergeCases(merge_cases::MergeCasesArgs),

    /// Reassign a record to another user
    ChangeOwner(change_owner::ChangeOwnerArgs),
}
