//! Authentication command handlers

use super::build_service;
use crate::callback::CallbackServer;
use crate::config::CliConfig;
use crate::error::{CliError, Result};
use crate::output::{print_info, print_success};
use crate::progress::{complete_spinner_and_clear, complete_spinner_error, create_spinner};
use crate::registry;
use console::style;
use std::time::Duration;
use tessera_sdk::IdentityEvent;
use tracing::debug;

/// Handle the login command
pub async fn handle_login(email: Option<String>, config: &CliConfig) -> Result<()> {
    debug!("Starting login process");

    let email = resolve_email(email)?;

    // The redirect lands on a temporary loopback server
    let port = match config.login.callback_port {
        Some(port) => port,
        None => CallbackServer::find_available_port()?,
    };
    let callback_server = CallbackServer::new(
        port,
        Duration::from_secs(config.login.callback_timeout_seconds),
    );

    let service = build_service(config, Some(callback_server.redirect_url()?)).await?;
    let service = registry::install(service);
    let mut service = service.lock().await;

    if service.is_logged_in() {
        print_info("You are already logged in.");
        return Ok(());
    }

    let mut events = service.subscribe();
    let auth_url = service.config().authorize_url(email.as_deref())?;

    print_info("Opening browser for sign in...");
    print_info("Browser didn't open? Use the URL below to sign in:");
    println!("{}", style(auth_url.as_str()).dim());

    if !service.login(email.as_deref()) {
        return Err(CliError::internal(
            "The browser could not be opened; use the URL above to sign in, or check your configuration",
        ));
    }

    let spinner = create_spinner("Waiting for authentication...");
    let callback_url = match callback_server.start_and_wait().await {
        Ok(url) => {
            complete_spinner_and_clear(spinner);
            url
        }
        Err(e) => {
            complete_spinner_error(spinner, "No login redirect received");
            service.cancel_login();
            return Err(e);
        }
    };

    if !service.handle_callback(&callback_url).await {
        service.cancel_login();
        return Err(CliError::internal(
            "The login redirect did not match the pending attempt",
        ));
    }

    if service.is_logged_in() {
        print_success("Login successful!");
        if let Some(name) = service.display_name() {
            println!("  Signed in as {name}");
        }
        return Ok(());
    }

    // The attempt resolved without a token; surface the emitted failure
    while let Ok(event) = events.try_recv() {
        match event {
            IdentityEvent::LoginFailed { error } => {
                return Err(CliError::internal(format!("Login failed: {error}")));
            }
            IdentityEvent::LoginCancelled => {
                print_info("Login cancelled.");
                return Ok(());
            }
            _ => {}
        }
    }
    Err(CliError::internal("Login did not complete"))
}

/// Handle the logout command
pub async fn handle_logout(config: &CliConfig) -> Result<()> {
    let service = build_service(config, None).await?;
    let service = registry::install(service);
    let mut service = service.lock().await;

    if !service.is_logged_in() {
        print_info("You are not currently logged in.");
        return Ok(());
    }

    let spinner = create_spinner("Clearing stored credentials...");
    if service.logout().await {
        complete_spinner_and_clear(spinner);
        print_success("Logout successful!");
    } else {
        complete_spinner_error(spinner, "Failed to log out");
    }
    Ok(())
}

// --email wins; otherwise ask interactively when a terminal is attached
fn resolve_email(email: Option<String>) -> Result<Option<String>> {
    if email.is_some() {
        return Ok(email);
    }
    if !console::user_attended() {
        return Ok(None);
    }

    let input: String = dialoguer::Input::new()
        .with_prompt("Email address (leave empty to choose in the browser)")
        .allow_empty(true)
        .interact_text()
        .map_err(|e| CliError::internal(format!("Prompt failed: {e}")))?;

    let trimmed = input.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}
