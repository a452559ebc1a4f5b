//! Submission payload packaging
//!
//! A validated form becomes a multi-part message: one text part per scalar
//! field, `appliances` and `amenities` as JSON lists, and one binary part per
//! photo named `photo0`, `photo1`, ...
//!
//! `bachelors` is only sent for a preference that asks for it; otherwise the
//! part is empty.

use super::validation::FormValidator;
use super::{FormField, FormState};
use crate::errors::{AppError, Result};
use crate::models::Preference;
use serde::Serialize;

/// A photo as uploaded by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PhotoUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum PartBody {
    Text { value: String },
    Json { value: String },
    Binary {
        file_name: String,
        content_type: String,
        #[serde(rename = "size")]
        #[serde(serialize_with = "byte_len")]
        bytes: Vec<u8>,
    },
}

fn byte_len<B, S>(bytes: &B, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    B: AsRef<[u8]>,
    S: serde::Serializer,
{
    serializer.serialize_u64(bytes.as_ref().len() as u64)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Part {
    pub name: String,
    #[serde(flatten)]
    pub body: PartBody,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SubmissionPayload {
    parts: Vec<Part>,
}

impl SubmissionPayload {
    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Value of a text or JSON part
    pub fn text(&self, name: &str) -> Option<&str> {
        match &self.part(name)?.body {
            PartBody::Text { value } | PartBody::Json { value } => Some(value),
            PartBody::Binary { .. } => None,
        }
    }

    pub fn photos(&self) -> impl Iterator<Item = &Part> {
        self.parts
            .iter()
            .filter(|p| matches!(p.body, PartBody::Binary { .. }))
    }

    pub fn photo_count(&self) -> usize {
        self.photos().count()
    }

    /// Number of non-photo parts
    pub fn field_count(&self) -> usize {
        self.parts.len() - self.photo_count()
    }
}

/// Validate `form` and package it with `photos`.
///
/// Fails with the complete per-field error set; a payload is only produced
/// for a form that passes every rule.
pub fn package(
    validator: &FormValidator,
    form: &FormState,
    photos: &[PhotoUpload],
) -> Result<SubmissionPayload> {
    let errors = validator.validate(form, photos.len());
    if !errors.is_empty() {
        return Err(AppError::Validation { errors });
    }

    let wants_bachelors = form
        .preference
        .trim()
        .parse::<Preference>()
        .is_ok_and(|p| p.requires_bachelors());

    let mut parts = Vec::with_capacity(FormField::ALL.len() + photos.len());

    for field in FormField::ALL.iter().filter(|f| f.is_scalar()) {
        let value = match field {
            FormField::Bachelors if !wants_bachelors => String::new(),
            _ => form.value(*field).unwrap_or_default().trim().to_string(),
        };
        parts.push(Part {
            name: field.as_str().to_string(),
            body: PartBody::Text { value },
        });
    }

    for (field, values) in [
        (FormField::Appliances, &form.appliances),
        (FormField::Amenities, &form.amenities),
    ] {
        parts.push(Part {
            name: field.as_str().to_string(),
            body: PartBody::Json {
                value: serde_json::to_string(values)?,
            },
        });
    }

    for (index, photo) in photos.iter().enumerate() {
        parts.push(Part {
            name: format!("photo{}", index),
            body: PartBody::Binary {
                file_name: photo.file_name.clone(),
                content_type: photo.content_type.clone(),
                bytes: photo.bytes.clone(),
            },
        });
    }

    Ok(SubmissionPayload { parts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::validation::tests::valid_form;

    fn photos(n: usize) -> Vec<PhotoUpload> {
        (0..n)
            .map(|i| PhotoUpload::new(format!("room{}.jpg", i), "image/jpeg", vec![i as u8; 4]))
            .collect()
    }

    #[test]
    fn test_valid_form_with_five_photos() {
        let payload = package(&FormValidator::default(), &valid_form(), &photos(5)).unwrap();

        assert_eq!(payload.photo_count(), 5);
        let names: Vec<_> = payload.photos().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["photo0", "photo1", "photo2", "photo3", "photo4"]);

        assert_eq!(payload.text("rent"), Some("25000"));
        assert_eq!(payload.text("type"), Some("Semi Furnished"));
        assert_eq!(payload.text("maintenance"), Some(""));
        assert_eq!(payload.text("amenities"), Some(r#"["Lift","Security"]"#));
        assert_eq!(payload.field_count(), 23);
    }

    #[test]
    fn test_invalid_form_is_not_packaged() {
        let mut form = valid_form();
        form.rent = "lots".into();

        let err = package(&FormValidator::default(), &form, &photos(3)).unwrap_err();
        let errors = err.field_errors().unwrap();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["photos", "rent"]);
    }

    #[test]
    fn test_bachelors_dropped_when_preference_does_not_ask() {
        let mut form = valid_form();
        form.preference = "Family".into();
        form.bachelors = "Male".into();

        let payload = package(&FormValidator::default(), &form, &photos(5)).unwrap();
        assert_eq!(payload.text("preference"), Some("Family"));
        assert_eq!(payload.text("bachelors"), Some(""));

        form.preference = "Any".into();
        let payload = package(&FormValidator::default(), &form, &photos(5)).unwrap();
        assert_eq!(payload.text("bachelors"), Some("Male"));
    }

    #[test]
    fn test_photo_part_serializes_size() {
        let payload = package(&FormValidator::default(), &valid_form(), &photos(5)).unwrap();
        let json = serde_json::to_value(payload.part("photo2").unwrap()).unwrap();
        assert_eq!(json["kind"], "binary");
        assert_eq!(json["size"], 4);
        assert_eq!(json["fileName"], "room2.jpg");
    }
}
