//! Add-property validation
//!
//! Every rule runs independently and every violation is reported, so the
//! user sees all problems at once. An empty [`FieldErrors`] means the form
//! can be packaged. Per-field presence and phone rules are `validator`
//! attributes on [`FormState`]; rules spanning fields, options or photo
//! counts are checked here.

use super::options::{AMENITIES, APPLIANCES, BHK_OPTIONS};
use super::{FormField, FormState};
use crate::errors::FieldErrors;
use crate::models::{
    BachelorsGender, CoolingFacility, Furnishing, Preference, SpaceType, WashroomType, YesNo,
};
use regex_lite::Regex;
use std::borrow::Cow;
use std::str::FromStr;
use std::sync::OnceLock;
use validator::{Validate, ValidationError};

/// Minimum photo count for a listing
pub const MIN_PHOTOS: usize = 5;

fn phone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{10}$").expect("phone pattern is valid"))
}

pub(super) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

pub(super) fn ten_digit_contact(value: &str) -> Result<(), ValidationError> {
    not_blank(value)?;
    ten_digits(value, "Contact number must be 10 digits")
}

/// Optional, but checked once typed
pub(super) fn ten_digit_alternate(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    ten_digits(value, "Alternate contact number must be 10 digits")
}

fn ten_digits(value: &str, message: &'static str) -> Result<(), ValidationError> {
    if phone_pattern().is_match(value.trim()) {
        return Ok(());
    }
    let mut error = ValidationError::new("phone");
    error.message = Some(Cow::Borrowed(message));
    Err(error)
}

/// The Rust field name differs from the wire name for `type`
fn form_field(key: &str) -> Option<FormField> {
    match key {
        "furnishing" => Some(FormField::Furnishing),
        other => other.parse().ok(),
    }
}

fn rule_message(key: &str, failure: &ValidationError) -> String {
    if let Some(message) = &failure.message {
        return message.to_string();
    }
    let label = form_field(key).map_or_else(|| key.to_string(), |f| f.label());
    match failure.code.as_ref() {
        "required" => format!("{} is required", label),
        _ => format!("{} is invalid", label),
    }
}

/// Validate with the default photo minimum
pub fn validate(form: &FormState, photo_count: usize) -> FieldErrors {
    FormValidator::default().validate(form, photo_count)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormValidator {
    min_photos: usize,
}

impl Default for FormValidator {
    fn default() -> Self {
        Self::new(MIN_PHOTOS)
    }
}

impl FormValidator {
    pub fn new(min_photos: usize) -> Self {
        Self { min_photos }
    }

    pub fn min_photos(&self) -> usize {
        self.min_photos
    }

    pub fn validate(&self, form: &FormState, photo_count: usize) -> FieldErrors {
        let mut errors = match form.validate() {
            Ok(()) => FieldErrors::new(),
            Err(failures) => FieldErrors::from_validation(&failures, rule_message),
        };
        if let Some(message) = errors.remove("furnishing") {
            errors.insert(FormField::Furnishing.as_str(), message);
        }

        let preference = form.preference.trim();
        if Preference::from_str(preference).is_ok_and(|p| p.requires_bachelors())
            && form.bachelors.trim().is_empty()
        {
            errors.insert(FormField::Bachelors.as_str(), "Bachelors preference is required");
        }

        if photo_count < self.min_photos {
            errors.insert(
                FormField::Photos.as_str(),
                format!("At least {} photos are required", self.min_photos),
            );
        }

        for (field, message) in [
            (FormField::Rent, "Rent must be a number"),
            (FormField::Maintenance, "Maintenance must be a number"),
            (FormField::SquareFeet, "Square feet must be a number"),
        ] {
            let raw = form.value(field).unwrap_or_default().trim();
            if !raw.is_empty() && !is_number(raw) {
                errors.insert(field.as_str(), message);
            }
        }

        let floor = form.floor.trim();
        if !floor.is_empty() && floor.parse::<u32>().is_err() {
            errors.insert(FormField::Floor.as_str(), "Floor must be a whole number");
        }

        check_choice::<SpaceType>(&mut errors, form, FormField::SpaceType);
        check_choice::<Furnishing>(&mut errors, form, FormField::Furnishing);
        check_choice::<WashroomType>(&mut errors, form, FormField::WashroomType);
        check_choice::<CoolingFacility>(&mut errors, form, FormField::CoolingFacility);
        check_choice::<YesNo>(&mut errors, form, FormField::CarParking);
        check_choice::<YesNo>(&mut errors, form, FormField::PetsAllowed);
        check_choice::<Preference>(&mut errors, form, FormField::Preference);
        check_choice::<BachelorsGender>(&mut errors, form, FormField::Bachelors);

        let bhk = form.bhk.trim();
        if !bhk.is_empty() && !BHK_OPTIONS.contains(&bhk) {
            errors.insert(FormField::Bhk.as_str(), "Select a valid Bhk");
        }

        check_list(&mut errors, &form.appliances, FormField::Appliances, APPLIANCES);
        check_list(&mut errors, &form.amenities, FormField::Amenities, AMENITIES);

        errors
    }
}

/// Finite and non-negative
fn is_number(raw: &str) -> bool {
    raw.parse::<f64>().is_ok_and(|v| v.is_finite() && v >= 0.0)
}

fn check_choice<T: FromStr>(errors: &mut FieldErrors, form: &FormState, field: FormField) {
    let raw = form.value(field).unwrap_or_default().trim();
    if !raw.is_empty() && !errors.contains(field.as_str()) && raw.parse::<T>().is_err() {
        errors.insert(field.as_str(), format!("Select a valid {}", field.label()));
    }
}

fn check_list(errors: &mut FieldErrors, values: &[String], field: FormField, allowed: &[&str]) {
    if let Some(unknown) = values.iter().find(|v| !allowed.contains(&v.as_str())) {
        errors.insert(field.as_str(), format!("Unknown option: {}", unknown));
    }
}
