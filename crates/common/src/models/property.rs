//! Rental listing models

use crate::errors::{AppError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

pub type PropertyId = u32;

/// Closed set of choices with a fixed display label per variant.
///
/// The label is the wire and form value; parsing accepts exactly the label.
macro_rules! labelled_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $what:literal {
            $($variant:ident => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $label)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            pub fn labels() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.as_str()).collect()
            }
        }

        impl FromStr for $name {
            type Err = AppError;

            fn from_str(s: &str) -> Result<Self> {
                match s.trim() {
                    $($label => Ok($name::$variant),)+
                    other => Err(AppError::InvalidFormat {
                        message: format!("unknown {}: {:?}", $what, other),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

labelled_enum!(SpaceType, "space type" {
    Flat => "Flat",
    House => "House",
    Pg => "PG",
    Warehouse => "Warehouse",
    Office => "Office",
    Shop => "Shop",
});

labelled_enum!(
    /// Furnishing level, the listing's `type`
    Furnishing, "furnishing" {
        SemiFurnished => "Semi Furnished",
        FullyFurnished => "Fully Furnished",
        NonFurnished => "Non Furnished",
    }
);

labelled_enum!(WashroomType, "washroom type" {
    Western => "Western",
    Indian => "Indian",
});

labelled_enum!(CoolingFacility, "cooling facility" {
    Ac => "AC",
    Fan => "Fan",
});

labelled_enum!(YesNo, "yes/no option" {
    Yes => "Yes",
    No => "No",
});

labelled_enum!(
    /// Who the owner wants to rent to
    Preference, "preference" {
        Family => "Family",
        Bachelors => "Bachelors",
        Any => "Any",
    }
);

labelled_enum!(BachelorsGender, "bachelors preference" {
    Female => "Female",
    Male => "Male",
});

/// A labelled value that may fall outside the offered options.
///
/// Sample listings carry free text. A label matching no option is kept
/// verbatim instead of being discarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Choice<T> {
    Listed(T),
    Unlisted(String),
}

impl<T: FromStr> Choice<T> {
    /// Parse trimmed text. Blank text is kept as an empty unlisted label.
    pub fn parse_lenient(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse() {
            Ok(value) => Choice::Listed(value),
            Err(_) => Choice::Unlisted(trimmed.to_string()),
        }
    }

    /// Like [`Choice::parse_lenient`], but blank text means no choice
    pub fn parse_optional(raw: &str) -> Option<Self> {
        if raw.trim().is_empty() {
            return None;
        }
        Some(Self::parse_lenient(raw))
    }
}

impl<T> Choice<T> {
    pub fn listed(&self) -> Option<&T> {
        match self {
            Choice::Listed(value) => Some(value),
            Choice::Unlisted(_) => None,
        }
    }
}

impl<T> From<T> for Choice<T> {
    fn from(value: T) -> Self {
        Choice::Listed(value)
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Listed(value) => value.fmt(f),
            Choice::Unlisted(raw) => f.write_str(raw),
        }
    }
}

impl Preference {
    /// Bachelors and Any listings must say which bachelors they accept
    pub fn requires_bachelors(&self) -> bool {
        matches!(self, Preference::Bachelors | Preference::Any)
    }
}

/// One rental listing as held in the catalog.
///
/// `rent` and `square_feet` are always numeric here; raw text from sample
/// listings is coerced at the aggregation boundary. Labels keep unlisted
/// text as [`Choice::Unlisted`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,

    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternate_contact_number: Option<String>,

    pub locality: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nearest_landmark: Option<String>,

    pub space_type: Choice<SpaceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bhk: Option<u8>,
    #[serde(rename = "type")]
    pub furnishing: Choice<Furnishing>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor: Option<u32>,
    pub square_feet: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub washroom_type: Option<Choice<WashroomType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooling_facility: Option<Choice<CoolingFacility>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub car_parking: Option<Choice<YesNo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pets_allowed: Option<Choice<YesNo>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preference: Option<Choice<Preference>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bachelors: Option<Choice<BachelorsGender>>,

    /// Monthly rent
    pub rent: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maintenance: Option<u32>,

    #[serde(default)]
    pub photos: Vec<String>,
    #[serde(default)]
    pub appliances: Vec<String>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub about: Option<String>,

    #[serde(default)]
    pub views: u32,
    #[serde(default)]
    pub is_agent_property: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_uploaded: Option<NaiveDate>,
}

impl Property {
    pub fn owner_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Short title, e.g. "2 BHK in Indiranagar"
    pub fn headline(&self) -> String {
        match self.bhk {
            Some(bhk) => format!("{} BHK in {}", bhk, self.locality),
            None => format!("{} in {}", self.space_type, self.locality),
        }
    }
}

/// An agent sample listing as it arrives, before normalization.
///
/// Every field is text, exactly as a filled-in listing form would hold it.
/// Numbers may arrive either quoted or bare; both are kept as text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SampleListing {
    pub first_name: String,
    pub last_name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub contact_number: String,
    #[serde(deserialize_with = "text_or_number")]
    pub alternate_contact_number: String,
    pub locality: String,
    pub address: String,
    pub nearest_landmark: String,
    pub space_type: String,
    pub pets_allowed: String,
    pub preference: String,
    pub bachelors: String,
    #[serde(rename = "type")]
    pub furnishing: String,
    #[serde(deserialize_with = "text_or_number")]
    pub bhk: String,
    #[serde(deserialize_with = "text_or_number")]
    pub floor: String,
    pub washroom_type: String,
    pub cooling_facility: String,
    pub car_parking: String,
    #[serde(deserialize_with = "text_or_number")]
    pub rent: String,
    #[serde(deserialize_with = "text_or_number")]
    pub maintenance: String,
    #[serde(deserialize_with = "text_or_number")]
    pub square_feet: String,
    pub photos: Option<Vec<String>>,
    pub appliances: Vec<String>,
    pub amenities: Vec<String>,
    pub about: String,
}

fn text_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(D::Error::custom(format!(
            "expected text or number, found {}",
            other
        ))),
    }
}

/// Coerce raw text to a whole number the way integer parsing of form
/// input does: surrounding whitespace is ignored and a fractional part is
/// truncated. Anything else is a data-shape defect.
pub fn coerce_whole_number(field: &str, raw: &str) -> Result<u32> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<u32>() {
        return Ok(value);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value <= u32::MAX as f64 => {
            Ok(value.trunc() as u32)
        }
        _ => Err(AppError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_back() {
        for space in SpaceType::ALL {
            assert_eq!(space.as_str().parse::<SpaceType>().unwrap(), *space);
        }
        assert_eq!("Semi Furnished".parse::<Furnishing>().unwrap(), Furnishing::SemiFurnished);
        assert!("semi furnished".parse::<Furnishing>().is_err());
    }

    #[test]
    fn test_preference_requires_bachelors() {
        assert!(Preference::Bachelors.requires_bachelors());
        assert!(Preference::Any.requires_bachelors());
        assert!(!Preference::Family.requires_bachelors());
    }

    #[test]
    fn test_coerce_whole_number() {
        assert_eq!(coerce_whole_number("rent", "25000").unwrap(), 25000);
        assert_eq!(coerce_whole_number("rent", " 1200 ").unwrap(), 1200);
        assert_eq!(coerce_whole_number("squareFeet", "850.75").unwrap(), 850);
        assert!(matches!(
            coerce_whole_number("rent", "twenty"),
            Err(AppError::InvalidNumber { .. })
        ));
        assert!(coerce_whole_number("rent", "").is_err());
        assert!(coerce_whole_number("rent", "-5").is_err());
        assert!(coerce_whole_number("rent", "NaN").is_err());
    }

    #[test]
    fn test_sample_listing_accepts_bare_numbers() {
        let raw = r#"{"firstName":"Asha","rent":32000,"squareFeet":"1400","type":"Fully Furnished"}"#;
        let sample: SampleListing = serde_json::from_str(raw).unwrap();
        assert_eq!(sample.rent, "32000");
        assert_eq!(sample.square_feet, "1400");
        assert_eq!(sample.furnishing, "Fully Furnished");
        assert!(sample.photos.is_none());
    }

    #[test]
    fn test_property_wire_names() {
        let raw = r#"{
            "id": 7, "firstName": "A", "lastName": "B", "locality": "HSR Layout",
            "spaceType": "PG", "bhk": 1, "type": "Non Furnished",
            "squareFeet": 400, "rent": 9000
        }"#;
        let property: Property = serde_json::from_str(raw).unwrap();
        assert_eq!(property.space_type, Choice::Listed(SpaceType::Pg));
        assert_eq!(property.furnishing, Choice::Listed(Furnishing::NonFurnished));
        assert_eq!(property.views, 0);
        assert!(!property.is_agent_property);
        assert_eq!(property.headline(), "1 BHK in HSR Layout");
    }

    #[test]
    fn test_unlisted_labels_are_kept() {
        let raw = r#"{
            "id": 8, "firstName": "A", "lastName": "B", "locality": "Hebbal",
            "spaceType": "Villa", "type": "", "squareFeet": 2400, "rent": 90000
        }"#;
        let property: Property = serde_json::from_str(raw).unwrap();
        assert_eq!(property.space_type, Choice::Unlisted("Villa".into()));
        assert_eq!(property.furnishing, Choice::Unlisted(String::new()));
        assert_eq!(property.bhk, None);
        assert_eq!(property.headline(), "Villa in Hebbal");

        let json = serde_json::to_value(&property).unwrap();
        assert_eq!(json["spaceType"], "Villa");
    }

    #[test]
    fn test_choice_parsing() {
        assert_eq!(Choice::<YesNo>::parse_lenient(" Yes "), Choice::Listed(YesNo::Yes));
        assert_eq!(Choice::<YesNo>::parse_lenient("Maybe"), Choice::Unlisted("Maybe".into()));
        assert_eq!(Choice::<YesNo>::parse_optional("  "), None);
        assert_eq!(Choice::from(SpaceType::Shop).to_string(), "Shop");
    }
}
