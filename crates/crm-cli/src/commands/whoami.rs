//! Whoami command implementation.

use anyhow::Result;
use clap::Args;

use crate::cli::GlobalArgs;
use crate::commands::remote_error;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct WhoamiArgs {
    /// Print the user as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: WhoamiArgs, global: &GlobalArgs) -> Result<()> {
    let (api, stored) = session::connect(global)?;

    let user = api
        .current_user()
        .await
        .map_err(|e| remote_error(e, "Failed to fetch current user"))?;

    if args.json {
        return output::json_pretty(&user);
    }

    output::field("User", &user.username);
    output::field("Name", &user.display_name());
    output::field("Email", &user.email);
    output::field("Role", &user.role);
    if let Some(alias) = &user.alias {
        output::field("Alias", alias);
    }
    output::field("API", api.api_url().as_str());
    output::field(
        "Logged in",
        &stored.logged_in_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    );

    Ok(())
}
