//! Persisted session flags
//!
//! The only state that survives a restart: a flat string map with the keys
//! `isLoggedIn`, `userEmail`, `userName` and `userRole`. [`SessionStore`] is
//! the load/save/clear seam; swapping in real authentication only touches
//! an implementation of it.

use crate::errors::Result;
use crate::models::{Role, User};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

pub const KEY_LOGGED_IN: &str = "isLoggedIn";
pub const KEY_EMAIL: &str = "userEmail";
pub const KEY_NAME: &str = "userName";
pub const KEY_ROLE: &str = "userRole";

pub const DEFAULT_NAME: &str = "Demo User";
pub const DEFAULT_EMAIL: &str = "user@example.com";

/// Session id handed to every signed-in user
pub const DEMO_USER_ID: u32 = 1;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersistedSession(BTreeMap<String, String>);

impl PersistedSession {
    pub fn for_user(user: &User) -> Self {
        let mut flags = Self::default();
        flags.set(KEY_LOGGED_IN, "true");
        flags.set(KEY_EMAIL, &user.email);
        flags.set(KEY_NAME, &user.name);
        flags.set(KEY_ROLE, user.role.as_str());
        flags
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn set(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn is_logged_in(&self) -> bool {
        self.get(KEY_LOGGED_IN) == Some("true")
    }

    pub fn email(&self) -> Option<&str> {
        self.get(KEY_EMAIL)
    }

    pub fn name(&self) -> Option<&str> {
        self.get(KEY_NAME)
    }

    pub fn role(&self) -> Role {
        self.get(KEY_ROLE).map(Role::from_flag).unwrap_or_default()
    }

    /// The user these flags describe, if they say someone is signed in
    pub fn user(&self) -> Option<User> {
        if !self.is_logged_in() {
            return None;
        }
        Some(User {
            id: DEMO_USER_ID,
            name: self.name().unwrap_or(DEFAULT_NAME).to_string(),
            email: self.email().unwrap_or(DEFAULT_EMAIL).to_string(),
            role: self.role(),
        })
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn load(&self) -> Result<PersistedSession>;

    async fn save(&self, flags: &PersistedSession) -> Result<()>;

    async fn clear(&self) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    flags: RwLock<PersistedSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flags(flags: PersistedSession) -> Self {
        Self {
            flags: RwLock::new(flags),
        }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self) -> Result<PersistedSession> {
        Ok(self.flags.read().await.clone())
    }

    async fn save(&self, flags: &PersistedSession) -> Result<()> {
        *self.flags.write().await = flags.clone();
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        *self.flags.write().await = PersistedSession::default();
        Ok(())
    }
}

/// Flags kept as a JSON object in a file
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<PersistedSession> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No persisted session");
                Ok(PersistedSession::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, flags: &PersistedSession) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let bytes = serde_json::to_vec_pretty(flags)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
