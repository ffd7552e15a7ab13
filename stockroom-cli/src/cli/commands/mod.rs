//! Subcommand definitions and their handlers

pub mod auth;
pub mod catalog;
pub mod import;

use anyhow::{Result, bail};

use super::console::ConsoleObserver;
use crate::config::Config;
use crate::guard::{GuardOutcome, RouteGuard};
use crate::session::FileSession;

/// Open the stored session and run the route guard over it.
///
/// Protected commands call this before doing anything else.
pub async fn require_session(config: &Config) -> Result<FileSession> {
    let mut session = FileSession::open_default()?;
    let mut guard = RouteGuard::new(config.guard.clone());
    let mut console = ConsoleObserver::new();

    match guard.check(&mut session, &mut console).await {
        GuardOutcome::Authorized => Ok(session),
        GuardOutcome::Redirect { to } => {
            log::debug!("Guard redirected to {}", to);
            bail!("Not logged in. Run `stockroom auth login` first.")
        }
    }
}
