//! Add-property form handlers

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;
use rentnest_common::{
    errors::FieldErrors,
    form::{FormOptions, FormPhase, FormState},
};

pub async fn options() -> Json<FormOptions> {
    Json(FormOptions::default())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormStatus {
    pub phase: FormPhase,
    pub values: FormState,
    pub photo_count: usize,
    pub errors: FieldErrors,
    pub form_error: Option<String>,
}

/// Where the shared form stands: values, errors, and whether a submission
/// is in flight
pub async fn status(State(state): State<AppState>) -> Json<FormStatus> {
    let form = state.form.lock().await;
    Json(FormStatus {
        phase: form.phase(),
        values: form.state().clone(),
        photo_count: form.photos().len(),
        errors: form.errors().clone(),
        form_error: form.form_error().map(str::to_string),
    })
}
