//! Subcommand definitions for the Tessera CLI

use clap::Subcommand;

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in through the browser and store the session token
    Login {
        /// Email address to prefill in the login form
        #[arg(long)]
        email: Option<String>,
    },

    /// Sign out and erase the stored session token
    Logout,

    /// Show the logged-in account
    Account,

    /// Show the login status
    Status,

    /// Show or change configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the active configuration
    Show,

    /// Set a configuration value (e.g. `tessera config set service.url https://id.example.test`)
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },
}
