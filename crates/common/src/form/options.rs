//! Choice lists offered by the add-property form

use crate::models::{
    BachelorsGender, CoolingFacility, Furnishing, Preference, SpaceType, WashroomType, YesNo,
};
use serde::Serialize;

pub const APPLIANCES: &[&str] = &[
    "Refrigerator",
    "Washing Machine",
    "Microwave",
    "TV",
    "Water Purifier",
    "Geyser",
];

pub const AMENITIES: &[&str] = &[
    "Swimming Pool",
    "Gym",
    "Park",
    "Security",
    "Power Backup",
    "Lift",
    "Parking",
    "Club House",
];

pub const BHK_OPTIONS: &[&str] = &["1", "2", "3", "4", "5"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormOptions {
    pub space_types: Vec<&'static str>,
    pub bhk: Vec<&'static str>,
    #[serde(rename = "type")]
    pub furnishing: Vec<&'static str>,
    pub washroom_types: Vec<&'static str>,
    pub cooling_facilities: Vec<&'static str>,
    pub yes_no: Vec<&'static str>,
    pub preferences: Vec<&'static str>,
    pub bachelors: Vec<&'static str>,
    pub appliances: Vec<&'static str>,
    pub amenities: Vec<&'static str>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            space_types: SpaceType::labels(),
            bhk: BHK_OPTIONS.to_vec(),
            furnishing: Furnishing::labels(),
            washroom_types: WashroomType::labels(),
            cooling_facilities: CoolingFacility::labels(),
            yes_no: YesNo::labels(),
            preferences: Preference::labels(),
            bachelors: BachelorsGender::labels(),
            appliances: APPLIANCES.to_vec(),
            amenities: AMENITIES.to_vec(),
        }
    }
}
