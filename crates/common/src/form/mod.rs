//! Add-property form
//!
//! - [`FormState`]: raw text of every field, as typed
//! - [`validation`]: per-field rules producing a field -> message map
//! - [`payload`]: the multi-part message handed to a submitter
//! - [`machine`]: editing/validating/submitting lifecycle of one form
//! - [`options`]: the choice lists the form offers

pub mod machine;
pub mod options;
pub mod payload;
pub mod validation;

pub use machine::{FormPhase, PropertyForm};
pub use options::FormOptions;
pub use payload::{package, Part, PartBody, PhotoUpload, SubmissionPayload};
pub use validation::{validate, FormValidator};

use crate::auth::Session;
use crate::errors::{AppError, Result};
use crate::models::SampleListing;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::info;
use validation::{not_blank, ten_digit_alternate, ten_digit_contact};
use validator::Validate;

macro_rules! form_fields {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        /// A named input of the add-property form
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum FormField {
            $(#[serde(rename = $name)] $variant,)+
        }

        impl FormField {
            pub const ALL: &'static [FormField] = &[$(FormField::$variant),+];

            /// Wire name, also the key in error maps and payload parts
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(FormField::$variant => $name,)+
                }
            }
        }

        impl FromStr for FormField {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self> {
                match s {
                    $($name => Ok(FormField::$variant),)+
                    other => Err(AppError::InvalidFormat {
                        message: format!("unknown form field: {:?}", other),
                    }),
                }
            }
        }
    };
}

form_fields! {
    FirstName => "firstName",
    LastName => "lastName",
    ContactNumber => "contactNumber",
    AlternateContactNumber => "alternateContactNumber",
    Locality => "locality",
    Address => "address",
    NearestLandmark => "nearestLandmark",
    SpaceType => "spaceType",
    PetsAllowed => "petsAllowed",
    Preference => "preference",
    Bachelors => "bachelors",
    Furnishing => "type",
    Bhk => "bhk",
    Floor => "floor",
    WashroomType => "washroomType",
    CoolingFacility => "coolingFacility",
    CarParking => "carParking",
    Rent => "rent",
    Maintenance => "maintenance",
    SquareFeet => "squareFeet",
    About => "about",
    Appliances => "appliances",
    Amenities => "amenities",
    Photos => "photos",
}

impl FormField {
    /// Fields holding one text value
    pub fn is_scalar(&self) -> bool {
        !matches!(self, FormField::Appliances | FormField::Amenities | FormField::Photos)
    }

    /// Human label: `squareFeet` -> `Square Feet`
    pub fn label(&self) -> String {
        let mut label = String::new();
        for (i, c) in self.as_str().chars().enumerate() {
            if i == 0 {
                label.extend(c.to_uppercase());
            } else if c.is_uppercase() {
                label.push(' ');
                label.push(c);
            } else {
                label.push(c);
            }
        }
        label
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything typed into the form so far. Values are kept verbatim;
/// interpretation happens in the validator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", default)]
pub struct FormState {
    #[validate(custom(function = "not_blank"))]
    pub first_name: String,
    #[validate(custom(function = "not_blank"))]
    pub last_name: String,
    #[validate(custom(function = "ten_digit_contact"))]
    pub contact_number: String,
    #[validate(custom(function = "ten_digit_alternate"))]
    pub alternate_contact_number: String,
    #[validate(custom(function = "not_blank"))]
    pub locality: String,
    #[validate(custom(function = "not_blank"))]
    pub address: String,
    pub nearest_landmark: String,
    #[validate(custom(function = "not_blank"))]
    pub space_type: String,
    #[validate(custom(function = "not_blank"))]
    pub pets_allowed: String,
    #[validate(custom(function = "not_blank"))]
    pub preference: String,
    pub bachelors: String,
    #[serde(rename = "type")]
    #[validate(custom(function = "not_blank"))]
    pub furnishing: String,
    #[validate(custom(function = "not_blank"))]
    pub bhk: String,
    #[validate(custom(function = "not_blank"))]
    pub floor: String,
    #[validate(custom(function = "not_blank"))]
    pub washroom_type: String,
    #[validate(custom(function = "not_blank"))]
    pub cooling_facility: String,
    #[validate(custom(function = "not_blank"))]
    pub car_parking: String,
    #[validate(custom(function = "not_blank"))]
    pub rent: String,
    pub maintenance: String,
    #[validate(custom(function = "not_blank"))]
    pub square_feet: String,
    #[validate(custom(function = "not_blank"))]
    pub about: String,
    pub appliances: Vec<String>,
    pub amenities: Vec<String>,
}

impl FormState {
    fn slot_mut(&mut self, field: FormField) -> Option<&mut String> {
        let slot = match field {
            FormField::FirstName => &mut self.first_name,
            FormField::LastName => &mut self.last_name,
            FormField::ContactNumber => &mut self.contact_number,
            FormField::AlternateContactNumber => &mut self.alternate_contact_number,
            FormField::Locality => &mut self.locality,
            FormField::Address => &mut self.address,
            FormField::NearestLandmark => &mut self.nearest_landmark,
            FormField::SpaceType => &mut self.space_type,
            FormField::PetsAllowed => &mut self.pets_allowed,
            FormField::Preference => &mut self.preference,
            FormField::Bachelors => &mut self.bachelors,
            FormField::Furnishing => &mut self.furnishing,
            FormField::Bhk => &mut self.bhk,
            FormField::Floor => &mut self.floor,
            FormField::WashroomType => &mut self.washroom_type,
            FormField::CoolingFacility => &mut self.cooling_facility,
            FormField::CarParking => &mut self.car_parking,
            FormField::Rent => &mut self.rent,
            FormField::Maintenance => &mut self.maintenance,
            FormField::SquareFeet => &mut self.square_feet,
            FormField::About => &mut self.about,
            FormField::Appliances | FormField::Amenities | FormField::Photos => return None,
        };
        Some(slot)
    }

    /// Text value of a scalar field
    pub fn value(&self, field: FormField) -> Option<&str> {
        let value = match field {
            FormField::FirstName => &self.first_name,
            FormField::LastName => &self.last_name,
            FormField::ContactNumber => &self.contact_number,
            FormField::AlternateContactNumber => &self.alternate_contact_number,
            FormField::Locality => &self.locality,
            FormField::Address => &self.address,
            FormField::NearestLandmark => &self.nearest_landmark,
            FormField::SpaceType => &self.space_type,
            FormField::PetsAllowed => &self.pets_allowed,
            FormField::Preference => &self.preference,
            FormField::Bachelors => &self.bachelors,
            FormField::Furnishing => &self.furnishing,
            FormField::Bhk => &self.bhk,
            FormField::Floor => &self.floor,
            FormField::WashroomType => &self.washroom_type,
            FormField::CoolingFacility => &self.cooling_facility,
            FormField::CarParking => &self.car_parking,
            FormField::Rent => &self.rent,
            FormField::Maintenance => &self.maintenance,
            FormField::SquareFeet => &self.square_feet,
            FormField::About => &self.about,
            FormField::Appliances | FormField::Amenities | FormField::Photos => return None,
        };
        Some(value.as_str())
    }

    /// Set a scalar field
    pub fn set(&mut self, field: FormField, value: impl Into<String>) -> Result<()> {
        let slot = self.slot_mut(field).ok_or_else(|| AppError::InvalidFormat {
            message: format!("{} is not a text field", field),
        })?;
        *slot = value.into();
        Ok(())
    }

    pub fn list(&self, field: FormField) -> Option<&[String]> {
        match field {
            FormField::Appliances => Some(&self.appliances),
            FormField::Amenities => Some(&self.amenities),
            _ => None,
        }
    }

    fn list_mut(&mut self, field: FormField) -> Result<&mut Vec<String>> {
        match field {
            FormField::Appliances => Ok(&mut self.appliances),
            FormField::Amenities => Ok(&mut self.amenities),
            other => Err(AppError::InvalidFormat {
                message: format!("{} is not a list field", other),
            }),
        }
    }

    pub fn set_list(&mut self, field: FormField, values: Vec<String>) -> Result<()> {
        *self.list_mut(field)? = values;
        Ok(())
    }

    /// Checkbox behaviour: add `item` if absent, remove it if present
    pub fn toggle(&mut self, field: FormField, item: &str) -> Result<bool> {
        let list = self.list_mut(field)?;
        if let Some(pos) = list.iter().position(|v| v == item) {
            list.remove(pos);
            Ok(false)
        } else {
            list.push(item.to_string());
            Ok(true)
        }
    }

    /// Prefill from an agent sample listing
    pub fn from_sample(sample: &SampleListing) -> Self {
        Self {
            first_name: sample.first_name.clone(),
            last_name: sample.last_name.clone(),
            contact_number: sample.contact_number.clone(),
            alternate_contact_number: sample.alternate_contact_number.clone(),
            locality: sample.locality.clone(),
            address: sample.address.clone(),
            nearest_landmark: sample.nearest_landmark.clone(),
            space_type: sample.space_type.clone(),
            pets_allowed: sample.pets_allowed.clone(),
            preference: sample.preference.clone(),
            bachelors: sample.bachelors.clone(),
            furnishing: sample.furnishing.clone(),
            bhk: sample.bhk.clone(),
            floor: sample.floor.clone(),
            washroom_type: sample.washroom_type.clone(),
            cooling_facility: sample.cooling_facility.clone(),
            car_parking: sample.car_parking.clone(),
            rent: sample.rent.clone(),
            maintenance: sample.maintenance.clone(),
            square_feet: sample.square_feet.clone(),
            about: sample.about.clone(),
            appliances: sample.appliances.clone(),
            amenities: sample.amenities.clone(),
        }
    }
}

/// Agent-only quick-add: a form prefilled from sample `index`
pub fn quick_add(session: &Session, samples: &[SampleListing], index: usize) -> Result<FormState> {
    let user = session.user().ok_or_else(|| AppError::Unauthorized {
        message: "Sign in to add a property".to_string(),
    })?;
    if !user.is_agent() {
        return Err(AppError::Forbidden {
            message: "Quick-add is available to agents only".to_string(),
        });
    }

    let sample = samples.get(index).ok_or_else(|| AppError::InvalidFormat {
        message: format!("no sample listing at index {} (have {})", index, samples.len()),
    })?;

    info!(email = %user.email, index, locality = %sample.locality, "Quick-add prefilled form");
    Ok(FormState::from_sample(sample))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::models::{Role, User};

    fn session(role: Role) -> Session {
        Session::signed_in(User {
            id: 1,
            name: "Test".into(),
            email: "test@example.com".into(),
            role,
        })
    }

    #[test]
    fn test_labels() {
        assert_eq!(FormField::FirstName.label(), "First Name");
        assert_eq!(FormField::SquareFeet.label(), "Square Feet");
        assert_eq!(FormField::Bhk.label(), "Bhk");
        assert_eq!(FormField::Furnishing.label(), "Type");
        assert_eq!(FormField::ALL.len(), 24);
    }

    #[test]
    fn test_field_names_parse() {
        for field in FormField::ALL {
            assert_eq!(field.as_str().parse::<FormField>().unwrap(), *field);
        }
        assert!("photo0".parse::<FormField>().is_err());
    }

    #[test]
    fn test_set_and_toggle() {
        let mut form = FormState::default();
        form.set(FormField::Rent, "18000").unwrap();
        assert_eq!(form.value(FormField::Rent), Some("18000"));
        assert!(form.set(FormField::Amenities, "Gym").is_err());

        assert!(form.toggle(FormField::Amenities, "Gym").unwrap());
        assert!(!form.toggle(FormField::Amenities, "Gym").unwrap());
        assert!(form.amenities.is_empty());
        assert!(form.toggle(FormField::Rent, "Gym").is_err());
    }

    #[test]
    fn test_quick_add_requires_agent() {
        let samples = catalog::sample_listings().unwrap();

        let form = quick_add(&session(Role::Agent), &samples, 0).unwrap();
        assert_eq!(form.locality, "Marathahalli");
        assert_eq!(form.rent, "22000");

        assert!(matches!(
            quick_add(&session(Role::User), &samples, 0),
            Err(AppError::Forbidden { .. })
        ));
        assert!(matches!(
            quick_add(&Session::anonymous(), &samples, 0),
            Err(AppError::Unauthorized { .. })
        ));
        assert!(quick_add(&session(Role::Agent), &samples, 99).is_err());
    }
}
