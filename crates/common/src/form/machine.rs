//! Lifecycle of one add-property form
//!
//! ```text
//! Editing --submit--> Validating --ok--> Submitting --done--> Editing (reset)
//!    ^                    |                   |
//!    +------errors--------+------failed-------+
//! ```
//!
//! While a submission is in flight the form rejects edits and a second
//! submit with [`AppError::SubmissionInFlight`].

use super::payload::{package, PhotoUpload, SubmissionPayload};
use super::validation::FormValidator;
use super::{FormField, FormState};
use crate::auth::Session;
use crate::errors::{AppError, FieldErrors, Result};
use crate::metrics;
use crate::submission::{SubmissionReceipt, Submitter};
use futures::future::AbortRegistration;
use serde::Serialize;
use tracing::{info, warn};

pub const SUBMIT_FAILED: &str = "Failed to submit property. Please try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum FormPhase {
    #[default]
    Editing,
    Validating,
    Submitting,
}

#[derive(Debug, Clone, Default)]
pub struct PropertyForm {
    state: FormState,
    photos: Vec<PhotoUpload>,
    errors: FieldErrors,
    form_error: Option<String>,
    phase: FormPhase,
    validator: FormValidator,
}

impl PropertyForm {
    pub fn new(validator: FormValidator) -> Self {
        Self {
            validator,
            ..Default::default()
        }
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn photos(&self) -> &[PhotoUpload] {
        &self.photos
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == FormPhase::Submitting
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.is_submitting() {
            return Err(AppError::SubmissionInFlight);
        }
        Ok(())
    }

    /// Change a scalar field; its error, if any, goes away
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> Result<()> {
        self.ensure_editable()?;
        self.state.set(field, value)?;
        self.errors.remove(field.as_str());
        Ok(())
    }

    pub fn set_list(&mut self, field: FormField, values: Vec<String>) -> Result<()> {
        self.ensure_editable()?;
        self.state.set_list(field, values)?;
        self.errors.remove(field.as_str());
        Ok(())
    }

    pub fn toggle(&mut self, field: FormField, item: &str) -> Result<bool> {
        self.ensure_editable()?;
        let added = self.state.toggle(field, item)?;
        self.errors.remove(field.as_str());
        Ok(added)
    }

    pub fn attach_photos(&mut self, photos: impl IntoIterator<Item = PhotoUpload>) -> Result<()> {
        self.ensure_editable()?;
        self.photos.extend(photos);
        self.errors.remove(FormField::Photos.as_str());
        Ok(())
    }

    /// Replace all attached photos
    pub fn set_photos(&mut self, photos: Vec<PhotoUpload>) -> Result<()> {
        self.ensure_editable()?;
        self.photos = photos;
        self.errors.remove(FormField::Photos.as_str());
        Ok(())
    }

    pub fn remove_photo(&mut self, index: usize) -> Result<Option<PhotoUpload>> {
        self.ensure_editable()?;
        Ok((index < self.photos.len()).then(|| self.photos.remove(index)))
    }

    /// Replace every field, e.g. from a quick-add sample
    pub fn prefill(&mut self, state: FormState) -> Result<()> {
        self.ensure_editable()?;
        self.state = state;
        self.errors.clear();
        self.form_error = None;
        Ok(())
    }

    /// Validate and package the form, entering `Submitting` on success.
    ///
    /// On validation failure the form is back in `Editing` holding the full
    /// error set, which is also returned.
    pub fn begin_submit(&mut self, session: &Session) -> Result<SubmissionPayload> {
        if !session.is_authenticated() {
            return Err(AppError::Unauthorized {
                message: "Sign in to add a property".to_string(),
            });
        }
        self.ensure_editable()?;

        self.phase = FormPhase::Validating;
        self.form_error = None;

        match package(&self.validator, &self.state, &self.photos) {
            Ok(payload) => {
                self.errors.clear();
                self.phase = FormPhase::Submitting;
                Ok(payload)
            }
            Err(err) => {
                if let Some(errors) = err.field_errors() {
                    for field in errors.fields() {
                        metrics::record_validation_failure(field);
                    }
                    info!(fields = errors.len(), "Property form has validation errors");
                    self.errors = errors.clone();
                }
                self.phase = FormPhase::Editing;
                Err(err)
            }
        }
    }

    /// Settle an in-flight submission. Success clears the form; failure
    /// keeps every value and sets a form-level message.
    pub fn finish_submit(&mut self, outcome: &Result<SubmissionReceipt>) {
        match outcome {
            Ok(receipt) => {
                info!(receipt = %receipt.id, "Property submitted");
                metrics::record_submission("accepted");
                *self = Self::new(self.validator);
            }
            Err(err) => {
                warn!(error = %err, "Property submission failed");
                metrics::record_submission(if matches!(err, AppError::Aborted) {
                    "aborted"
                } else {
                    "failed"
                });
                self.form_error = Some(SUBMIT_FAILED.to_string());
                self.phase = FormPhase::Editing;
            }
        }
    }

    /// Validate, hand the payload to `submitter` and settle the outcome
    pub async fn submit(
        &mut self,
        session: &Session,
        submitter: &dyn Submitter,
        abort: Option<AbortRegistration>,
    ) -> Result<SubmissionReceipt> {
        let payload = self.begin_submit(session)?;
        let outcome = submitter.submit(payload, abort).await;
        self.finish_submit(&outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::validation::tests::valid_form;
    use crate::models::{Role, User};
    use crate::submission::SimulatedSubmitter;
    use async_trait::async_trait;
    use std::time::Duration;

    struct FailingSubmitter;

    #[async_trait]
    impl Submitter for FailingSubmitter {
        async fn submit(
            &self,
            _payload: SubmissionPayload,
            _abort: Option<AbortRegistration>,
        ) -> Result<SubmissionReceipt> {
            Err(AppError::Internal {
                message: "listing service unavailable".into(),
            })
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    fn user() -> Session {
        Session::signed_in(User {
            id: 1,
            name: "Demo User".into(),
            email: "user@example.com".into(),
            role: Role::User,
        })
    }

    fn photos(n: usize) -> Vec<PhotoUpload> {
        (0..n)
            .map(|i| PhotoUpload::new(format!("{}.jpg", i), "image/jpeg", vec![1, 2, 3]))
            .collect()
    }

    fn filled_form() -> PropertyForm {
        let mut form = PropertyForm::default();
        form.prefill(valid_form()).unwrap();
        form.attach_photos(photos(5)).unwrap();
        form
    }

    #[test]
    fn test_anonymous_cannot_submit() {
        let mut form = filled_form();
        let err = form.begin_submit(&Session::anonymous()).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[test]
    fn test_errors_then_edit_clears_field_error() {
        let mut form = PropertyForm::default();
        assert!(form.begin_submit(&user()).is_err());
        assert_eq!(form.phase(), FormPhase::Editing);
        assert!(form.errors().contains("firstName"));
        assert!(form.errors().contains("photos"));

        form.set_field(FormField::FirstName, "Asha").unwrap();
        assert!(!form.errors().contains("firstName"));

        form.attach_photos(photos(1)).unwrap();
        assert!(!form.errors().contains("photos"));
    }

    #[test]
    fn test_in_flight_guard() {
        let mut form = filled_form();
        form.begin_submit(&user()).unwrap();
        assert!(form.is_submitting());

        assert!(matches!(form.begin_submit(&user()), Err(AppError::SubmissionInFlight)));
        assert!(matches!(
            form.set_field(FormField::Rent, "1"),
            Err(AppError::SubmissionInFlight)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_successful_submit_resets_form() {
        let mut form = filled_form();
        let submitter = SimulatedSubmitter::new(Duration::from_millis(1000));

        let receipt = form.submit(&user(), &submitter, None).await.unwrap();
        assert_eq!(receipt.photo_count, 5);
        assert_eq!(form.state(), &FormState::default());
        assert!(form.photos().is_empty());
        assert_eq!(form.phase(), FormPhase::Editing);
    }

    #[tokio::test]
    async fn test_failed_submit_keeps_values() {
        let mut form = filled_form();

        assert!(form.submit(&user(), &FailingSubmitter, None).await.is_err());
        assert_eq!(form.form_error(), Some(SUBMIT_FAILED));
        assert_eq!(form.state().rent, "25000");
        assert_eq!(form.photos().len(), 5);
        assert_eq!(form.phase(), FormPhase::Editing);
    }
}
