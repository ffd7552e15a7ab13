//! Route guard for protected commands
//!
//! `Checking -> Authorized` when a token is present, otherwise
//! `Checking -> Unauthorized -> Redirecting`: the operator is notified, the
//! guard waits for the configured delay, clears the session and hands back
//! the landing route. Token absence is terminal; there is no retry.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::notify::{Notifier, Severity};
use crate::session::SessionContext;

/// Route guard settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// How long the "session expired" notice stays up before redirecting
    pub redirect_delay_ms: u64,
    /// Where an unauthenticated user is sent
    pub landing_route: String,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            redirect_delay_ms: 3000,
            landing_route: "/login".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Checking,
    Authorized,
    Unauthorized,
    Redirecting,
}

/// What the caller should do once the guard has resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Run the protected view
    Authorized,
    /// Session was cleared; go to the landing route
    Redirect { to: String },
}

#[derive(Debug)]
pub struct RouteGuard {
    config: GuardConfig,
    state: GuardState,
}

impl RouteGuard {
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config,
            state: GuardState::Checking,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Resolve the guard. Nothing protected may run before this returns
    /// `GuardOutcome::Authorized`.
    pub async fn check<S, N>(&mut self, session: &mut S, notifier: &mut N) -> GuardOutcome
    where
        S: SessionContext + ?Sized,
        N: Notifier + ?Sized,
    {
        match self.state {
            GuardState::Authorized => return GuardOutcome::Authorized,
            GuardState::Unauthorized | GuardState::Redirecting => {
                return GuardOutcome::Redirect {
                    to: self.config.landing_route.clone(),
                };
            }
            GuardState::Checking => {}
        }

        if session.is_authenticated() {
            self.state = GuardState::Authorized;
            return GuardOutcome::Authorized;
        }

        self.state = GuardState::Unauthorized;
        log::warn!("No session token present, redirecting to {}", self.config.landing_route);
        notifier.alert(
            "Your session has expired or you are not logged in. Please log in again.",
            Severity::Warning,
        );

        tokio::time::sleep(Duration::from_millis(self.config.redirect_delay_ms)).await;

        if let Err(e) = session.clear() {
            log::error!("Failed to clear session state: {}", e);
        }
        self.state = GuardState::Redirecting;

        GuardOutcome::Redirect {
            to: self.config.landing_route.clone(),
        }
    }
}
