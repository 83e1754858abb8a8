//! Login command implementation.

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Args;
use colored::Colorize;

use crate::cli::GlobalArgs;
use crate::output;
use crate::session::{self, StoredSession, storage};

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Username to authenticate with
    #[arg(long, short)]
    pub username: String,

    /// Account password
    #[arg(long, env = "CRM_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, global: &GlobalArgs) -> Result<()> {
    let api = session::anonymous(global)?;
    if api.api_url().sends_plaintext_remotely() {
        tracing::warn!(
            api = %api.api_url(),
            "Sending credentials over unencrypted HTTP"
        );
    }

    eprintln!("{}", "Logging in...".dimmed());

    let token = api
        .login(&args.username, &args.password)
        .await
        .context("Failed to login")?;

    let stored = StoredSession {
        api_url: api.api_url().to_string(),
        username: args.username,
        access_token: token.as_str().to_string(),
        logged_in_at: Utc::now(),
    };
    storage::save_session(&stored).context("Failed to save session")?;

    output::success("Logged in successfully");
    println!();
    output::field("User", &stored.username);
    output::field("API", &stored.api_url);

    Ok(())
}
