use anyhow::{Context, Result};
use colored::*;
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;

use super::AuthCommands;
use crate::api::InventoryClient;
use crate::config::Config;
use crate::session::{FileSession, SessionContext};

pub async fn handle_auth_command(cmd: AuthCommands, config: &Config) -> Result<()> {
    match cmd {
        AuthCommands::Login { email } => login(email, config).await,
        AuthCommands::Logout => logout(),
        AuthCommands::Status => status(),
    }
}

async fn login(email: Option<String>, config: &Config) -> Result<()> {
    let email = match email {
        Some(email) => email,
        None => Input::<String>::with_theme(&ColorfulTheme::default())
            .with_prompt("Email")
            .interact_text()
            .context("Failed to read email")?,
    };
    let password = rpassword::prompt_password("Password: ").context("Failed to read password")?;

    let client = InventoryClient::new(config)?;
    let session = client
        .login(email.trim(), &password)
        .await
        .context("Login failed")?;

    let mut store = FileSession::open_default()?;
    let who = format!("{} ({:?})", session.email, session.role);
    store.store(session)?;

    println!("{} Logged in as {}", "✓".green().bold(), who.bright_white());
    log::debug!("Session written to {}", store.path().display());
    Ok(())
}

fn logout() -> Result<()> {
    let mut store = FileSession::open_default()?;
    if store.current().is_none() {
        println!("Not logged in.");
        return Ok(());
    }
    store.clear()?;
    println!("{} Logged out", "✓".green().bold());
    Ok(())
}

fn status() -> Result<()> {
    let store = FileSession::open_default()?;
    match store.current().filter(|_| store.is_authenticated()) {
        Some(session) => {
            println!("Logged in as {}", session.email.bright_white());
            println!("  user id: {}", session.user_id);
            println!("  role:    {:?}", session.role);
        }
        None => println!("{}", "Not logged in.".yellow()),
    }
    Ok(())
}
