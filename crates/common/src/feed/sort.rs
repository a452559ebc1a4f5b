//! Listing orderings
//!
//! Each sort key is bound to one field and one direction. Sorting is
//! stable, so listings that tie keep their aggregation order.

use crate::models::Property;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Newest first; the id stands in for upload time
    #[default]
    DateUploaded,
    RentLowToHigh,
    RentHighToLow,
    /// Most viewed first
    Popularity,
    /// Leaves listings in aggregation order
    #[serde(other)]
    Unsorted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Rent,
    Views,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::DateUploaded,
        SortKey::RentLowToHigh,
        SortKey::RentHighToLow,
        SortKey::Popularity,
    ];

    /// Parse a sort key from a query value. Unknown keys are not an
    /// error: they select [`SortKey::Unsorted`].
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "dateUploaded" => SortKey::DateUploaded,
            "rentLowToHigh" => SortKey::RentLowToHigh,
            "rentHighToLow" => SortKey::RentHighToLow,
            "popularity" => SortKey::Popularity,
            _ => SortKey::Unsorted,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateUploaded => "dateUploaded",
            SortKey::RentLowToHigh => "rentLowToHigh",
            SortKey::RentHighToLow => "rentHighToLow",
            SortKey::Popularity => "popularity",
            SortKey::Unsorted => "unsorted",
        }
    }

    /// Label shown in the sort selector
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::DateUploaded => "Latest Listings",
            SortKey::RentLowToHigh => "Price: Low to High",
            SortKey::RentHighToLow => "Price: High to Low",
            SortKey::Popularity => "Most Popular",
            SortKey::Unsorted => "Unsorted",
        }
    }

    /// The field and direction this key orders by
    pub fn ordering(&self) -> Option<(SortField, SortDirection)> {
        match self {
            SortKey::DateUploaded => Some((SortField::Id, SortDirection::Descending)),
            SortKey::RentLowToHigh => Some((SortField::Rent, SortDirection::Ascending)),
            SortKey::RentHighToLow => Some((SortField::Rent, SortDirection::Descending)),
            SortKey::Popularity => Some((SortField::Views, SortDirection::Descending)),
            SortKey::Unsorted => None,
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn compare(a: &Property, b: &Property, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Rent => a.rent.cmp(&b.rent),
        SortField::Views => a.views.cmp(&b.views),
    }
}

/// Order listings by `key`
pub fn sort_listings(mut listings: Vec<Property>, key: SortKey) -> Vec<Property> {
    if let Some((field, direction)) = key.ordering() {
        listings.sort_by(|a, b| match direction {
            SortDirection::Ascending => compare(a, b, field),
            SortDirection::Descending => compare(b, a, field),
        });
    }
    listings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    fn listing(id: u32, rent: u32, views: u32) -> Property {
        let mut property = catalog::base_listings().unwrap().remove(1);
        property.id = id;
        property.rent = rent;
        property.views = views;
        property
    }

    fn ids(listings: &[Property]) -> Vec<u32> {
        listings.iter().map(|p| p.id).collect()
    }

    #[test]
    fn test_date_uploaded_is_id_descending() {
        let sorted = sort_listings(
            vec![listing(2, 0, 0), listing(9, 0, 0), listing(5, 0, 0)],
            SortKey::DateUploaded,
        );
        assert_eq!(ids(&sorted), vec![9, 5, 2]);
    }

    #[test]
    fn test_rent_low_to_high_is_stable() {
        let input = vec![
            listing(1, 30000, 0),
            listing(2, 12000, 0),
            listing(3, 30000, 0),
            listing(4, 12000, 0),
        ];
        let sorted = sort_listings(input, SortKey::RentLowToHigh);

        assert_eq!(ids(&sorted), vec![2, 4, 1, 3]);
        assert!(sorted.windows(2).all(|w| w[0].rent <= w[1].rent));
    }

    #[test]
    fn test_rent_high_to_low_is_stable() {
        let input = vec![
            listing(1, 12000, 0),
            listing(2, 30000, 0),
            listing(3, 12000, 0),
            listing(4, 30000, 0),
        ];
        let sorted = sort_listings(input, SortKey::RentHighToLow);

        assert_eq!(ids(&sorted), vec![2, 4, 1, 3]);
        assert!(sorted.windows(2).all(|w| w[0].rent >= w[1].rent));
    }

    #[test]
    fn test_popularity_is_views_descending() {
        let base = catalog::base_listings().unwrap();
        let sorted = sort_listings(base, SortKey::Popularity);
        assert_eq!(ids(&sorted), vec![3, 6, 5, 1, 2, 4]);
    }

    #[test]
    fn test_unknown_key_keeps_order() {
        let key = SortKey::parse("cheapestFirst");
        assert_eq!(key, SortKey::Unsorted);

        let input = vec![listing(3, 1, 1), listing(1, 3, 3), listing(2, 2, 2)];
        assert_eq!(ids(&sort_listings(input, key)), vec![3, 1, 2]);
    }

    #[test]
    fn test_unknown_key_deserializes_to_unsorted() {
        let key: SortKey = serde_json::from_str("\"byDistance\"").unwrap();
        assert_eq!(key, SortKey::Unsorted);
        let key: SortKey = serde_json::from_str("\"rentHighToLow\"").unwrap();
        assert_eq!(key, SortKey::RentHighToLow);
    }
}
