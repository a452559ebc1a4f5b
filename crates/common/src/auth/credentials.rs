//! Login and registration input
//!
//! Field rules are declared with `validator`; the cross-field password
//! confirmation is checked by hand. Failures surface as
//! [`AppError::Credentials`] with one message per field.

use crate::errors::{AppError, FieldErrors, Result};
use regex_lite::Regex;
use serde::Deserialize;
use std::borrow::Cow;
use std::sync::OnceLock;
use validator::{Validate, ValidationError};

pub const MIN_PASSWORD_LEN: usize = 6;

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"))
}

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

fn validate_email(email: &str) -> std::result::Result<(), ValidationError> {
    if email.trim().is_empty() {
        return Err(rule("required", "Email is required"));
    }
    if !email_pattern().is_match(email) {
        return Err(rule("email", "Email is invalid"));
    }
    Ok(())
}

fn validate_login_password(password: &str) -> std::result::Result<(), ValidationError> {
    if password.is_empty() {
        return Err(rule("required", "Password is required"));
    }
    Ok(())
}

fn validate_new_password(password: &str) -> std::result::Result<(), ValidationError> {
    validate_login_password(password)?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(rule("length", "Password must be at least 6 characters"));
    }
    Ok(())
}

fn validate_name(name: &str) -> std::result::Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(rule("required", "Name is required"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(custom(function = "validate_login_password"))]
    pub password: String,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn check(&self) -> Result<()> {
        self.validate().map_err(credentials_error)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_email"))]
    pub email: String,
    #[validate(custom(function = "validate_new_password"))]
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub register_as_agent: bool,
}

impl RegisterRequest {
    pub fn check(&self) -> Result<()> {
        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => FieldErrors::from_validation(&e, failure_message),
        };

        if self.confirm_password.is_empty() {
            errors.insert("confirmPassword", "Please confirm your password");
        } else if self.password != self.confirm_password {
            errors.insert("confirmPassword", "Passwords do not match");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Credentials { errors })
        }
    }
}

fn credentials_error(errors: validator::ValidationErrors) -> AppError {
    AppError::Credentials {
        errors: FieldErrors::from_validation(&errors, failure_message),
    }
}

fn failure_message(field: &str, failure: &ValidationError) -> String {
    failure
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("{} is invalid", field))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(password: &str, confirm: &str) -> RegisterRequest {
        RegisterRequest {
            name: "Meera".into(),
            email: "meera@example.com".into(),
            password: password.into(),
            confirm_password: confirm.into(),
            register_as_agent: false,
        }
    }

    fn messages(err: AppError) -> FieldErrors {
        err.field_errors().cloned().unwrap()
    }

    #[test]
    fn test_login_rules() {
        assert!(LoginRequest::new("a@b.co", "x").check().is_ok());

        let errors = messages(LoginRequest::new("", "").check().unwrap_err());
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("password"), Some("Password is required"));

        let errors = messages(LoginRequest::new("not-an-email", "pw").check().unwrap_err());
        assert_eq!(errors.get("email"), Some("Email is invalid"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_register_rules() {
        assert!(register("secret1", "secret1").check().is_ok());

        let errors = messages(register("abc", "abc").check().unwrap_err());
        assert_eq!(errors.get("password"), Some("Password must be at least 6 characters"));

        let errors = messages(register("secret1", "secret2").check().unwrap_err());
        assert_eq!(errors.get("confirmPassword"), Some("Passwords do not match"));

        let errors = messages(register("secret1", "").check().unwrap_err());
        assert_eq!(errors.get("confirmPassword"), Some("Please confirm your password"));
    }

    #[test]
    fn test_register_reports_every_field() {
        let err = RegisterRequest::default().check().unwrap_err();
        let errors = messages(err);
        let fields: Vec<_> = errors.fields().collect();
        assert_eq!(fields, vec!["confirmPassword", "email", "name", "password"]);
    }

    #[test]
    fn test_register_request_wire_names() {
        let raw = r#"{"name":"A","email":"a@b.co","password":"p","confirmPassword":"p","registerAsAgent":true}"#;
        let request: RegisterRequest = serde_json::from_str(raw).unwrap();
        assert!(request.register_as_agent);
        assert_eq!(request.confirm_password, "p");
    }
}
