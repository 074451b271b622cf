//! Account and status command handlers

use super::build_service;
use crate::config::CliConfig;
use crate::error::Result;
use crate::output::{json_output, print_info};
use crate::progress::{complete_spinner_and_clear, complete_spinner_error, create_spinner};
use crate::registry;
use console::style;
use tessera_sdk::{Account, Gender};

/// Handle the account command
pub async fn handle_account(json: bool, config: &CliConfig) -> Result<()> {
    let service = build_service(config, None).await?;
    let service = registry::install(service);
    let mut service = service.lock().await;

    if !service.is_logged_in() {
        print_info("You are not currently logged in.");
        return Ok(());
    }

    let spinner = create_spinner("Fetching account...");
    match service.fetch_account().await {
        Ok(account) => {
            complete_spinner_and_clear(spinner);
            if json {
                json_output(&account)?;
            } else {
                print_account(&account);
            }
            Ok(())
        }
        Err(error) if error.is_unauthorized() => {
            complete_spinner_error(spinner, "The session is no longer authorized");
            // Confirm against the webservice and log out if the token is
            // genuinely revoked
            service.report_unauthorization().await;
            if !service.is_logged_in() {
                print_info("You have been logged out. Run `tessera login` to sign in again.");
            }
            Ok(())
        }
        Err(error) => {
            complete_spinner_error(spinner, "Failed to fetch account");
            Err(error.into())
        }
    }
}

/// Handle the status command
pub async fn handle_status(json: bool, config: &CliConfig) -> Result<()> {
    let service = build_service(config, None).await?;
    let service = registry::install(service);
    let service = service.lock().await;

    if json {
        return json_output(&serde_json::json!({
            "service_url": config.service.url,
            "logged_in": service.is_logged_in(),
        }));
    }

    println!("Service: {}", config.service.url);
    if service.is_logged_in() {
        println!("Status:  {}", style("logged in").green());
    } else {
        println!("Status:  {}", style("logged out").dim());
    }
    Ok(())
}

fn print_account(account: &Account) {
    if let Some(display_name) = &account.display_name {
        println!("Display name: {display_name}");
    }
    if let Some(email) = &account.email_address {
        println!("Email:        {email}");
    }
    if let (Some(first), Some(last)) = (&account.first_name, &account.last_name) {
        println!("Name:         {first} {last}");
    }
    if account.gender != Gender::Unspecified {
        println!("Gender:       {:?}", account.gender);
    }
    if let Some(birthdate) = &account.birthdate {
        println!("Birthdate:    {birthdate}");
    }
    if let Some(uid) = &account.uid {
        println!("User id:      {uid}");
    }
    println!(
        "Verified:     {}",
        if account.verified { "yes" } else { "no" }
    );
}
