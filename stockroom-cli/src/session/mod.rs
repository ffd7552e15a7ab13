//! Session context
//!
//! The logged-in identity is passed explicitly to whatever needs it (the
//! import engine reads the user id, the route guard reads the token and
//! clears the session on redirect). Nothing reads it from ambient storage.

mod file;

pub use file::FileSession;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Role granted to the logged-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    User,
}

/// Identity returned by a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Read/write contract for the current session
pub trait SessionContext {
    /// The stored session, if any
    fn current(&self) -> Option<&Session>;

    /// Replace the stored session
    fn store(&mut self, session: Session) -> Result<()>;

    /// Forget everything about the current session
    fn clear(&mut self) -> Result<()>;

    /// Bearer token, only when non-blank
    fn token(&self) -> Option<&str> {
        self.current()
            .map(|s| s.token.as_str())
            .filter(|t| !t.trim().is_empty())
    }

    /// User id, only when a usable token is present as well
    fn user_id(&self) -> Option<i64> {
        self.token()?;
        self.current().map(|s| s.user_id)
    }

    fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }
}

/// Session held in memory only
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    session: Option<Session>,
}

impl MemorySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }
}

impl SessionContext for MemorySession {
    fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn store(&mut self, session: Session) -> Result<()> {
        self.session = Some(session);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.session = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(token: &str) -> Session {
        Session {
            token: token.to_string(),
            user_id: 7,
            email: "ops@example.com".to_string(),
            role: Role::User,
        }
    }

    #[test]
    fn test_memory_session_store_and_clear() {
        let mut ctx = MemorySession::new();
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.user_id(), None);

        ctx.store(session("abc")).unwrap();
        assert_eq!(ctx.token(), Some("abc"));
        assert_eq!(ctx.user_id(), Some(7));

        ctx.clear().unwrap();
        assert!(ctx.current().is_none());
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_blank_token_is_not_authenticated() {
        let ctx = MemorySession::with_session(session("   "));
        assert!(ctx.current().is_some());
        assert_eq!(ctx.token(), None);
        assert_eq!(ctx.user_id(), None);
    }
}
