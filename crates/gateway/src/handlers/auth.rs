//! Session handlers
//!
//! The gateway serves a single viewer: the session lives in shared state and
//! is mirrored to the persisted flags by the auth service.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use rentnest_common::{
    auth::{LoginRequest, RegisterRequest},
    errors::Result,
    models::User,
    Session,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub is_authenticated: bool,
    pub is_agent: bool,
    pub user: Option<User>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            is_authenticated: session.is_authenticated(),
            is_agent: session.is_agent(),
            user: session.user().cloned(),
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let session = state.auth.login(&request, None).await?;
    let response = SessionResponse::from(&session);
    *state.session.write().await = session;
    Ok(Json(response))
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>> {
    let session = state.auth.register(&request, None).await?;
    let response = SessionResponse::from(&session);
    *state.session.write().await = session;
    Ok(Json(response))
}

pub async fn logout(State(state): State<AppState>) -> Result<Json<SessionResponse>> {
    let session = state.auth.logout().await?;
    let response = SessionResponse::from(&session);
    *state.session.write().await = session;
    Ok(Json(response))
}

pub async fn current(State(state): State<AppState>) -> Json<SessionResponse> {
    Json(SessionResponse::from(&*state.session.read().await))
}
