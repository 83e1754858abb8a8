//! Subcommand implementations.

pub mod change_owner;
pub mod columns;
pub mod convert_lead;
pub mod create;
pub mod delete;
pub mod escalate;
pub mod fields;
pub mod get;
pub mod list;
pub mod login;
pub mod logout;
pub mod merge_cases;
pub mod update;
pub mod whoami;

use std::borrow::Borrow;
use std::fmt;
use std::io::{self, Read};

use anyhow::{Context, Result, anyhow};
use serde_json::Value;

use crm_core::error::Error;

use crate::cli::{Commands, GlobalArgs};
use crate::session::storage;

pub async fn handle(command: Commands, global: &GlobalArgs) -> Result<()> {
    let result = dispatch(command, global).await;

    let rejected = result
        .as_ref()
        .is_err_and(|err| err.downcast_ref::<ReloginHint>().is_some());
    if rejected {
        match storage::clear_session() {
            Ok(true) => tracing::info!("Removed rejected session"),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "Failed to remove rejected session"),
        }
    }

    result
}

async fn dispatch(command: Commands, global: &GlobalArgs) -> Result<()> {
    match command {
        Commands::Login(args) => login::run(args, global).await,
        Commands::Logout(args) => logout::run(args),
        Commands::Whoami(args) => whoami::run(args, global).await,
        Commands::Fields(args) => fields::run(args),
        Commands::Columns(args) => columns::run(args),
        Commands::List(args) => list::run(args, global).await,
        Commands::Get(args) => get::run(args, global).await,
        Commands::Create(args) => create::run(args, global).await,
        Commands::Update(args) => update::run(args, global).await,
        Commands::Delete(args) => delete::run(args, global).await,
        Commands::ConvertLead(args) => convert_lead::run(args, global).await,
        Commands::Escalate(args) => escalate::run(args, global).await,
        Commands::MergeCases(args) => merge_cases::run(args, global).await,
        Commands::ChangeOwner(args) => change_owner::run(args, global).await,
    }
}

/// Outermost context on errors caused by a rejected token; `handle` drops
/// the stored session when it sees one.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ReloginHint;

impl fmt::Display for ReloginHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Session expired. Run 'crm login' again.")
    }
}

/// Wrap a library error with `action`, adding a re-login hint on 401.
pub(crate) fn remote_error<E>(err: E, action: &str) -> anyhow::Error
where
    E: Borrow<Error> + std::error::Error + Send + Sync + 'static,
{
    let expired = Borrow::<Error>::borrow(&err).is_session_expired();
    let err = anyhow::Error::new(err).context(action.to_string());
    if expired { err.context(ReloginHint) } else { err }
}

/// Read a JSON object from `-` (stdin), `@path`, or inline text.
pub(crate) fn read_json(data: &str) -> Result<Value> {
    let text = if data == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        buf
    } else if let Some(path) = data.strip_prefix('@') {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?
    } else {
        data.to_string()
    };

    let value: Value = serde_json::from_str(&text).context("Invalid JSON")?;
    if !value.is_object() {
        return Err(anyhow!("Record data must be a JSON object"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crm_core::error::{AuthError, ProtocolError};

    #[test]
    fn inline_json_must_be_object() {
        assert!(read_json(r#"{"last_name": "Hopper"}"#).is_ok());
        assert!(read_json("[1, 2]").is_err());
        assert!(read_json("not json").is_err());
    }

    #[test]
    fn json_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lead.json");
        std::fs::write(&path, r#"{"company": "Acme"}"#).unwrap();

        let value = read_json(&format!("@{}", path.display())).unwrap();
        assert_eq!(value["company"], "Acme");
    }

    #[test]
    fn unauthorized_gets_login_hint() {
        let err = remote_error(Error::from(ProtocolError::new(401, None)), "Failed to list leads");
        assert!(err.to_string().contains("crm login"));
        assert!(err.downcast_ref::<ReloginHint>().is_some());

        let err = remote_error(Error::from(ProtocolError::new(500, None)), "Failed to list leads");
        assert_eq!(err.to_string(), "Failed to list leads");
        assert!(err.downcast_ref::<ReloginHint>().is_none());
    }

    #[test]
    fn shared_errors_keep_the_hint() {
        let shared = std::sync::Arc::new(Error::from(AuthError::SessionExpired));
        let err = remote_error(shared, "Failed to list cases");
        assert!(err.downcast_ref::<ReloginHint>().is_some());
    }
}
