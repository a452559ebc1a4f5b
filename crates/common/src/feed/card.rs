//! Listing card projection
//!
//! What a list view needs from a listing. A missing listing still yields a
//! card, filled with placeholders, so one bad entry never breaks a page.

use crate::models::{Property, PropertyId};
use serde::Serialize;

pub const NO_IMAGE_PHOTO: &str = "https://via.placeholder.com/800x600?text=No+Image";
const UNAVAILABLE: &str = "Property information unavailable";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCard {
    pub id: Option<PropertyId>,
    pub owner_name: String,
    pub headline: String,
    pub locality: String,
    pub space_type: String,
    pub furnishing: String,
    pub rent: u32,
    pub formatted_rent: String,
    pub square_feet: u32,
    pub cover_photo: String,
    pub views: u32,
    pub is_agent_property: bool,
    pub detail_path: Option<String>,
}

impl PropertyCard {
    pub fn from_property(property: Option<&Property>) -> Self {
        let Some(property) = property else {
            return Self::unavailable();
        };

        Self {
            id: Some(property.id),
            owner_name: property.owner_name(),
            headline: property.headline(),
            locality: property.locality.clone(),
            space_type: property.space_type.to_string(),
            furnishing: property.furnishing.to_string(),
            rent: property.rent,
            formatted_rent: format_rent(property.rent),
            square_feet: property.square_feet,
            cover_photo: property
                .photos
                .first()
                .filter(|p| !p.trim().is_empty())
                .cloned()
                .unwrap_or_else(|| NO_IMAGE_PHOTO.to_string()),
            views: property.views,
            is_agent_property: property.is_agent_property,
            detail_path: Some(format!("/property/{}", property.id)),
        }
    }

    fn unavailable() -> Self {
        Self {
            id: None,
            owner_name: String::new(),
            headline: UNAVAILABLE.to_string(),
            locality: String::new(),
            space_type: String::new(),
            furnishing: String::new(),
            rent: 0,
            formatted_rent: "0".to_string(),
            square_feet: 0,
            cover_photo: NO_IMAGE_PHOTO.to_string(),
            views: 0,
            is_agent_property: false,
            detail_path: None,
        }
    }
}

impl From<&Property> for PropertyCard {
    fn from(property: &Property) -> Self {
        Self::from_property(Some(property))
    }
}

/// Rent with thousands separators, e.g. `25,000`
pub fn format_rent(rent: u32) -> String {
    let digits = rent.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_format_rent() {
        assert_eq!(format_rent(0), "0");
        assert_eq!(format_rent(950), "950");
        assert_eq!(format_rent(25000), "25,000");
        assert_eq!(format_rent(1250000), "1,250,000");
    }

    #[test]
    fn test_card_from_listing() {
        let property = &catalog::base_listings().unwrap()[0];
        let card = PropertyCard::from(property);

        assert_eq!(card.id, Some(1));
        assert_eq!(card.owner_name, "John Doe");
        assert_eq!(card.headline, "2 BHK in Indiranagar");
        assert_eq!(card.formatted_rent, "25,000");
        assert_eq!(card.detail_path.as_deref(), Some("/property/1"));
    }

    #[test]
    fn test_missing_listing_degrades_to_placeholder() {
        let card = PropertyCard::from_property(None);
        assert_eq!(card.id, None);
        assert_eq!(card.cover_photo, NO_IMAGE_PHOTO);
        assert_eq!(card.headline, UNAVAILABLE);
    }

    #[test]
    fn test_listing_without_photos_uses_no_image() {
        let mut property = catalog::base_listings().unwrap().remove(2);
        property.photos.clear();
        assert_eq!(PropertyCard::from(&property).cover_photo, NO_IMAGE_PHOTO);
    }
}
