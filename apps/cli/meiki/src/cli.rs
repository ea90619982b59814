//! Command-line surface of `meiki`.

use clap::{Args, Parser, Subcommand};

/// Env var consulted when `--password` is omitted.
pub const PASSWORD_ENV: &str = "MEIKI_PASSWORD";

#[derive(Debug, Parser)]
#[command(name = "meiki")]
#[command(about = "Create, log in to, and log out of a Meiki notes account", long_about = None)]
pub struct Cli {
    /// Base URL of the Meiki server (overrides MEIKI_SERVER_URL and config.toml)
    #[arg(long, value_name = "URL", global = true)]
    pub server_url: Option<String>,

    /// Print debug logs to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new account (does not log in)
    Create {
        #[command(flatten)]
        credentials: CredentialArgs,

        /// Password again, must match --password
        #[arg(long, value_name = "PASSWORD")]
        confirm_password: String,
    },

    /// Log in and save the session
    Login {
        #[command(flatten)]
        credentials: CredentialArgs,
    },

    /// Log out and forget the saved session
    Logout,

    /// Show who is logged in
    Whoami,

    /// Delete an account
    Delete {
        #[command(flatten)]
        credentials: CredentialArgs,
    },
}

#[derive(Debug, Args)]
pub struct CredentialArgs {
    /// Letters, digits, '_' and '-' only
    #[arg(short, long)]
    pub username: String,

    /// At least 5 characters
    #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: String,
}
