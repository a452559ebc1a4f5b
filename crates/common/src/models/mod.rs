//! Domain models
//!
//! Listings as shown in the catalog, raw agent sample listings as they
//! arrive before normalization, and the session user.

mod property;
mod user;

pub use property::{
    coerce_whole_number, BachelorsGender, Choice, CoolingFacility, Furnishing, Preference, Property,
    PropertyId, SampleListing, SpaceType, WashroomType, YesNo,
};
pub use user::{Role, User};
