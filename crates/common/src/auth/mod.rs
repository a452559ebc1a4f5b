//! Session identity
//!
//! Provides:
//! - [`Session`]: who is signed in, passed explicitly to whatever needs it
//! - [`AuthService`]: simulated login, registration, logout and restore
//! - [`store`]: the persisted session flags behind a load/save/clear seam
//! - [`credentials`]: login and registration input rules

pub mod credentials;
pub mod store;

pub use credentials::{LoginRequest, RegisterRequest};
pub use store::{FileSessionStore, MemorySessionStore, PersistedSession, SessionStore};

use crate::config::SessionConfig;
use crate::errors::Result;
use crate::metrics;
use crate::models::{Role, User};
use crate::simulated;
use futures::future::AbortRegistration;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Identity of the current viewer. `is_authenticated` and `is_agent` are
/// derived from the user, never stored alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    current_user: Option<User>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn signed_in(user: User) -> Self {
        Self {
            current_user: Some(user),
        }
    }

    pub fn user(&self) -> Option<&User> {
        self.current_user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current_user.is_some()
    }

    pub fn is_agent(&self) -> bool {
        self.current_user.as_ref().is_some_and(User::is_agent)
    }
}

/// Simulated authentication backed by a [`SessionStore`]
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn SessionStore>,
    latency: Duration,
}

impl AuthService {
    pub fn new(store: Arc<dyn SessionStore>, latency: Duration) -> Self {
        Self { store, latency }
    }

    /// File-backed when a store path is configured, in-memory otherwise
    pub fn from_config(config: &SessionConfig) -> Self {
        let store: Arc<dyn SessionStore> = match &config.store_path {
            Some(path) => Arc::new(FileSessionStore::new(path.clone())),
            None => Arc::new(MemorySessionStore::new()),
        };
        Self::new(store, config.simulated_latency())
    }

    /// Rebuild the session from persisted flags without re-authenticating
    pub async fn restore(&self) -> Result<Session> {
        let flags = self.store.load().await?;
        Ok(match flags.user() {
            Some(user) => {
                info!(email = %user.email, role = %user.role, "Session restored");
                Session::signed_in(user)
            }
            None => Session::anonymous(),
        })
    }

    /// Sign in. Any well-formed credentials are accepted after the simulated
    /// round trip; the role comes back from the flags when the same email
    /// was stored before.
    pub async fn login(
        &self,
        request: &LoginRequest,
        abort: Option<AbortRegistration>,
    ) -> Result<Session> {
        request.check()?;
        let email = request.email.trim().to_string();

        if let Err(e) = simulated::round_trip(self.latency, abort, ()).await {
            warn!(email = %email, error = %e, "Login did not complete");
            metrics::record_session_event("login", "aborted");
            return Err(e);
        }

        let previous = self.store.load().await?;
        let (name, role) = if previous.email() == Some(email.as_str()) {
            (
                previous.name().unwrap_or(store::DEFAULT_NAME).to_string(),
                previous.role(),
            )
        } else {
            (store::DEFAULT_NAME.to_string(), Role::User)
        };

        let user = User {
            id: store::DEMO_USER_ID,
            name,
            email,
            role,
        };
        self.store.save(&PersistedSession::for_user(&user)).await?;

        info!(email = %user.email, role = %user.role, "User logged in");
        metrics::record_session_event("login", "success");
        Ok(Session::signed_in(user))
    }

    /// Create an account and sign in; the agent flag selects the agent role
    pub async fn register(
        &self,
        request: &RegisterRequest,
        abort: Option<AbortRegistration>,
    ) -> Result<Session> {
        request.check()?;

        if let Err(e) = simulated::round_trip(self.latency, abort, ()).await {
            warn!(email = %request.email, error = %e, "Registration did not complete");
            metrics::record_session_event("register", "aborted");
            return Err(e);
        }

        let user = User {
            id: store::DEMO_USER_ID,
            name: request.name.trim().to_string(),
            email: request.email.trim().to_string(),
            role: if request.register_as_agent {
                Role::Agent
            } else {
                Role::User
            },
        };
        self.store.save(&PersistedSession::for_user(&user)).await?;

        info!(email = %user.email, role = %user.role, "User registered");
        metrics::record_session_event("register", "success");
        Ok(Session::signed_in(user))
    }

    /// Sign out. Only the logged-in flag is dropped; the remaining flags let
    /// the next login with the same email keep its role.
    pub async fn logout(&self) -> Result<Session> {
        let mut flags = self.store.load().await?;
        flags.remove(store::KEY_LOGGED_IN);
        self.store.save(&flags).await?;

        info!(email = flags.email().unwrap_or_default(), "User logged out");
        metrics::record_session_event("logout", "success");
        Ok(Session::anonymous())
    }
}
