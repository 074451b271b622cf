//! Configuration command handlers

use crate::cli::commands::ConfigAction;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{compress_path, json_output, print_success};

/// Handle the config command
pub async fn handle_config(action: ConfigAction, json: bool) -> Result<()> {
    let config_path = CliConfig::config_path()?;

    match action {
        ConfigAction::Show => {
            let config = CliConfig::load_from_path(&config_path).await?;
            if json {
                json_output(&config)?;
            } else {
                println!("# {}", compress_path(&config_path));
                let rendered = toml::to_string_pretty(&config).map_err(|e| {
                    crate::error::CliError::internal(format!("Failed to render config: {e}"))
                })?;
                print!("{rendered}");
            }
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let mut config = CliConfig::load_from_path(&config_path).await?;
            config.set(&key, &value)?;
            config.save_to_path(&config_path).await?;
            print_success(&format!("Set {key} = {value}"));
            Ok(())
        }
    }
}
