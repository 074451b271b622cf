use crate::cli::{commands::Commands, handlers};
use crate::config::CliConfig;
use crate::error::Result;
use clap::Parser;
use clap_verbosity_flag::{OffLevel, Verbosity};

/// Tessera CLI - browser-based login for Tessera identity services
#[derive(Parser, Debug)]
#[command(
    name = "tessera",
    author = "Tessera Team",
    version,
    about = "Tessera CLI - browser-based login for Tessera identity services",
    long_about = "Command-line client for the Tessera identity SDK.

QUICK START:
  tessera login                     # Sign in through the browser
  tessera account                   # Show the logged-in account
  tessera status                    # Show the login status
  tessera logout                    # Sign out

CONFIGURATION:
  tessera config show               # Show configuration
  tessera config set <key> <value>  # Change configuration"
)]
pub struct Args {
    /// Logging verbosity (-v/-q); off by default for clean output
    #[command(flatten)]
    pub verbosity: Verbosity<OffLevel>,

    /// Output format as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Args {
    /// Execute the CLI command
    pub async fn run(self) -> Result<()> {
        let config = CliConfig::load_default().await?;

        match self.command {
            Commands::Login { email } => handlers::auth::handle_login(email, &config).await,
            Commands::Logout => handlers::auth::handle_logout(&config).await,
            Commands::Account => handlers::account::handle_account(self.json, &config).await,
            Commands::Status => handlers::account::handle_status(self.json, &config).await,
            Commands::Config { action } => handlers::config::handle_config(action, self.json).await,
        }
    }
}
