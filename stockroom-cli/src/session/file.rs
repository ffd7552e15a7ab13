//! Session persisted as a TOML file in the user's config directory

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::{Session, SessionContext};

const SESSION_FILE: &str = "session.toml";

/// Session backed by `<config_dir>/stockroom/session.toml`
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
    session: Option<Session>,
}

impl FileSession {
    /// Open the session stored in the default location
    pub fn open_default() -> Result<Self> {
        let dir = crate::config::config_dir()?;
        Self::open(dir.join(SESSION_FILE))
    }

    /// Open the session stored at `path`. A missing file means "logged out".
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let session = if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read session file: {}", path.display()))?;
            match toml::from_str::<Session>(&content) {
                Ok(session) => Some(session),
                Err(e) => {
                    log::warn!(
                        "Ignoring unreadable session file {}: {}",
                        path.display(),
                        e
                    );
                    None
                }
            }
        } else {
            None
        };

        Ok(Self { path, session })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionContext for FileSession {
    fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    fn store(&mut self, session: Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let content = toml::to_string(&session).context("Failed to serialize session")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write session file: {}", self.path.display()))?;
        self.session = Some(session);
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.session = None;
        if self.path.exists() {
            fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove session file: {}", self.path.display())
            })?;
        }
        Ok(())
    }
}
