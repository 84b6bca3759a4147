use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::error::{DashboardError, Result};
use crate::models::{Role, SessionState};

use super::config_service::get_app_data_dir;

// ============================================================================
// TOKEN ACCESS
// ============================================================================

/// Supplies the bearer token at call time. Injected into the API client at
/// construction; `None` means signed out and blocks the request.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> Option<String>;
}

impl<F> TokenSource for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn token(&self) -> Option<String> {
        self()
    }
}

/// A fixed token, mostly for tools and tests.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

impl TokenSource for StaticToken {
    fn token(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

fn is_expired(state: &SessionState) -> bool {
    // Same 60 second buffer used when deciding to re-authenticate.
    state
        .expires_at
        .map(|exp| chrono::Utc::now().timestamp() >= exp - 60)
        .unwrap_or(false)
}

fn usable_token(state: &SessionState) -> Option<String> {
    if is_expired(state) {
        return None;
    }
    state.access_token.clone().filter(|t| !t.trim().is_empty())
}

// ============================================================================
// IN-MEMORY SESSION
// ============================================================================

/// Session held in memory by the host after sign-in.
#[derive(Debug, Default)]
pub struct MemorySession {
    state: RwLock<SessionState>,
}

impl MemorySession {
    pub fn new(state: SessionState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    pub fn replace(&self, state: SessionState) {
        *self.state.write().unwrap_or_else(PoisonError::into_inner) = state;
    }

    pub fn clear(&self) {
        self.replace(SessionState::default());
    }

    pub fn role(&self) -> Role {
        self.state.read().unwrap_or_else(PoisonError::into_inner).role
    }
}

impl TokenSource for MemorySession {
    fn token(&self) -> Option<String> {
        usable_token(&self.state.read().unwrap_or_else(PoisonError::into_inner))
    }
}

// ============================================================================
// FILE-BACKED SESSION
// ============================================================================

/// Session persisted as JSON by whatever performed the sign-in. Every token
/// read goes back to disk so a re-login elsewhere is picked up.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/SchoolDesk/session.json`
    pub fn open_default() -> Result<Self> {
        Ok(Self::at(get_app_data_dir()?.join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<SessionState> {
        if !self.path.exists() {
            return Ok(SessionState::default());
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| DashboardError::Config(format!("Failed to read session: {e}")))?;
        serde_json::from_str(&content)
            .map_err(|e| DashboardError::Config(format!("Failed to parse session: {e}")))
    }

    pub fn save(&self, state: &SessionState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, content)
            .map_err(|e| DashboardError::Config(format!("Failed to write session: {e}")))?;
        Ok(())
    }

    /// Sign out.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| DashboardError::Config(format!("Failed to remove session: {e}")))?;
        }
        Ok(())
    }

    pub fn role(&self) -> Role {
        self.load().map(|s| s.role).unwrap_or_default()
    }
}

impl TokenSource for SessionStore {
    fn token(&self) -> Option<String> {
        match self.load() {
            Ok(state) => usable_token(&state),
            Err(e) => {
                tracing::warn!(target: "schooldesk::session", error = %e, "session unreadable");
                None
            }
        }
    }
}
