//! Merges the base catalog with agent sample listings
//!
//! Sample listings arrive as raw text. Each one is normalized into a
//! [`Property`]: a fresh id from a range disjoint from the base ids,
//! numeric rent and area, a placeholder photo when none is given, a
//! synthetic view count and the agent provenance flag.
//!
//! Labels outside the offered options are kept verbatim and optional
//! numbers that do not parse are left empty. Only a rent or area that is not
//! a number is a data defect: such a sample is logged and left out, since a
//! bogus rent would make every rent ordering undefined. A sample is also
//! left out when the id space is exhausted.

use crate::config::FeedConfig;
use crate::errors::Result;
use crate::metrics;
use crate::models::{coerce_whole_number, Choice, Preference, Property, PropertyId, SampleListing};
use rand::Rng;
use std::ops::RangeInclusive;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct Aggregator {
    id_offset: PropertyId,
    views: RangeInclusive<u32>,
    placeholder_photo: String,
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::from_config(&FeedConfig::default())
    }
}

impl Aggregator {
    pub fn new(id_offset: PropertyId, views: RangeInclusive<u32>, placeholder_photo: String) -> Self {
        Self {
            id_offset,
            views,
            placeholder_photo,
        }
    }

    pub fn from_config(config: &FeedConfig) -> Self {
        Self::new(
            config.supplemental_id_offset,
            config.views_min..=config.views_max,
            config.placeholder_photo.clone(),
        )
    }

    /// Base listings, followed by the normalized samples when requested.
    ///
    /// Base listings are passed through unchanged. View counts for the
    /// samples are drawn from `rng`, so a seeded generator gives a
    /// reproducible catalog.
    pub fn aggregate<R: Rng + ?Sized>(
        &self,
        base: &[Property],
        supplemental: &[SampleListing],
        include_supplemental: bool,
        rng: &mut R,
    ) -> Vec<Property> {
        let mut listings = base.to_vec();
        if !include_supplemental {
            debug!(base = base.len(), "Aggregated base listings only");
            return listings;
        }

        let first_id = self.first_supplemental_id(base);
        listings.reserve(supplemental.len());

        for (index, sample) in supplemental.iter().enumerate() {
            let next_id = first_id.and_then(|first| {
                PropertyId::try_from(index)
                    .ok()
                    .and_then(|offset| first.checked_add(offset))
            });
            let Some(id) = next_id else {
                warn!(index, "No id left for sample listing");
                metrics::record_malformed_sample();
                continue;
            };

            match self.normalize(id, sample, rng) {
                Ok(property) => listings.push(property),
                Err(e) => {
                    warn!(
                        id,
                        owner = %format!("{} {}", sample.first_name, sample.last_name),
                        error = %e,
                        "Dropping malformed sample listing"
                    );
                    metrics::record_malformed_sample();
                }
            }
        }

        debug!(
            base = base.len(),
            supplemental = listings.len() - base.len(),
            "Aggregated listings with agent samples"
        );
        listings
    }

    /// First id handed to samples: the configured offset, moved past the
    /// highest base id if the two ranges would otherwise overlap. `None` when
    /// a base listing already holds the largest id.
    fn first_supplemental_id(&self, base: &[Property]) -> Option<PropertyId> {
        let past_base = match base.iter().map(|p| p.id).max() {
            Some(highest) => highest.checked_add(1)?,
            None => 0,
        };
        Some(self.id_offset.max(past_base))
    }

    /// Turn one raw sample into a catalog listing
    pub fn normalize<R: Rng + ?Sized>(
        &self,
        id: PropertyId,
        sample: &SampleListing,
        rng: &mut R,
    ) -> Result<Property> {
        let rent = coerce_whole_number("rent", &sample.rent)?;
        let square_feet = coerce_whole_number("squareFeet", &sample.square_feet)?;

        let preference = Choice::<Preference>::parse_optional(&sample.preference);
        let bachelors = match preference.as_ref().and_then(Choice::listed) {
            Some(p) if p.requires_bachelors() => Choice::parse_optional(&sample.bachelors),
            _ => None,
        };

        let photos = match &sample.photos {
            Some(photos) if !photos.is_empty() => photos.clone(),
            _ => vec![self.placeholder_photo.clone()],
        };

        Ok(Property {
            id,
            first_name: sample.first_name.trim().to_string(),
            last_name: sample.last_name.trim().to_string(),
            contact_number: non_empty(&sample.contact_number),
            alternate_contact_number: non_empty(&sample.alternate_contact_number),
            locality: sample.locality.trim().to_string(),
            address: non_empty(&sample.address),
            nearest_landmark: non_empty(&sample.nearest_landmark),
            space_type: Choice::parse_lenient(&sample.space_type),
            bhk: optional_number(id, "bhk", &sample.bhk).and_then(|b| u8::try_from(b).ok()),
            furnishing: Choice::parse_lenient(&sample.furnishing),
            floor: optional_number(id, "floor", &sample.floor),
            square_feet,
            washroom_type: Choice::parse_optional(&sample.washroom_type),
            cooling_facility: Choice::parse_optional(&sample.cooling_facility),
            car_parking: Choice::parse_optional(&sample.car_parking),
            pets_allowed: Choice::parse_optional(&sample.pets_allowed),
            preference,
            bachelors,
            rent,
            maintenance: optional_number(id, "maintenance", &sample.maintenance),
            photos,
            appliances: sample.appliances.clone(),
            amenities: sample.amenities.clone(),
            about: non_empty(&sample.about),
            views: rng.gen_range(self.views.clone()),
            is_agent_property: true,
            date_uploaded: None,
        })
    }
}

fn non_empty(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Blank or unparseable text leaves the field empty
fn optional_number(id: PropertyId, field: &str, raw: &str) -> Option<u32> {
    if raw.trim().is_empty() {
        return None;
    }
    match coerce_whole_number(field, raw) {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(id, error = %e, "Ignoring unparseable optional number");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::models::{BachelorsGender, Furnishing, SpaceType};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn sample(rent: &str, square_feet: &str) -> SampleListing {
        SampleListing {
            first_name: "Rahul".into(),
            last_name: "Sharma".into(),
            locality: "Marathahalli".into(),
            space_type: "Flat".into(),
            furnishing: "Semi Furnished".into(),
            bhk: "2".into(),
            rent: rent.into(),
            square_feet: square_feet.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_base_only_without_supplemental() {
        let base = catalog::base_listings().unwrap();
        let samples = catalog::sample_listings().unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let listings = Aggregator::default().aggregate(&base, &samples, false, &mut rng);
        assert_eq!(listings, base);
    }

    #[test]
    fn test_length_and_unique_ids() {
        let base = catalog::base_listings().unwrap();
        let samples = catalog::sample_listings().unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        let listings = Aggregator::default().aggregate(&base, &samples, true, &mut rng);
        assert_eq!(listings.len(), base.len() + samples.len());

        let ids: HashSet<_> = listings.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), listings.len());
        assert_eq!(listings[base.len()].id, 100);
        assert!(listings[base.len()..].iter().all(|p| p.is_agent_property));
    }

    #[test]
    fn test_ids_move_past_large_base_ids() {
        let mut base = catalog::base_listings().unwrap();
        base[0].id = 150;
        let samples = vec![sample("1000", "100"), sample("2000", "200")];
        let mut rng = StdRng::seed_from_u64(1);

        let listings = Aggregator::default().aggregate(&base, &samples, true, &mut rng);
        let sample_ids: Vec<_> = listings[base.len()..].iter().map(|p| p.id).collect();
        assert_eq!(sample_ids, vec![151, 152]);
    }

    #[test]
    fn test_coerces_text_numbers() {
        let mut rng = StdRng::seed_from_u64(3);
        let property = Aggregator::default()
            .normalize(100, &sample(" 22000 ", "1100.6"), &mut rng)
            .unwrap();

        assert_eq!(property.rent, 22000);
        assert_eq!(property.square_feet, 1100);
        assert_eq!(property.space_type, Choice::Listed(SpaceType::Flat));
        assert_eq!(property.furnishing, Choice::Listed(Furnishing::SemiFurnished));
        assert_eq!(property.bhk, Some(2));
    }

    #[test]
    fn test_placeholder_photo_when_absent() {
        let aggregator = Aggregator::new(100, 50..=249, "placeholder.jpg".into());
        let mut rng = StdRng::seed_from_u64(3);

        let property = aggregator.normalize(100, &sample("1", "1"), &mut rng).unwrap();
        assert_eq!(property.photos, vec!["placeholder.jpg".to_string()]);

        let mut with_photos = sample("1", "1");
        with_photos.photos = Some(vec!["a.jpg".into(), "b.jpg".into()]);
        let property = aggregator.normalize(101, &with_photos, &mut rng).unwrap();
        assert_eq!(property.photos.len(), 2);
    }

    #[test]
    fn test_views_within_range_and_seeded() {
        let base = catalog::base_listings().unwrap();
        let samples = catalog::sample_listings().unwrap();
        let aggregator = Aggregator::default();

        let first = aggregator.aggregate(&base, &samples, true, &mut StdRng::seed_from_u64(42));
        let second = aggregator.aggregate(&base, &samples, true, &mut StdRng::seed_from_u64(42));
        assert_eq!(first, second);

        for property in &first[base.len()..] {
            assert!((50..=249).contains(&property.views));
        }
    }

    #[test]
    fn test_drops_malformed_rent() {
        let base = catalog::base_listings().unwrap();
        let samples = vec![sample("twenty thousand", "900"), sample("15000", "900")];
        let mut rng = StdRng::seed_from_u64(9);

        let listings = Aggregator::default().aggregate(&base, &samples, true, &mut rng);
        assert_eq!(listings.len(), base.len() + 1);
        assert_eq!(listings.last().unwrap().rent, 15000);
    }

    #[test]
    fn test_bachelors_kept_only_when_required() {
        let mut rng = StdRng::seed_from_u64(5);
        let aggregator = Aggregator::default();

        let mut family = sample("1", "1");
        family.preference = "Family".into();
        family.bachelors = "Male".into();
        assert_eq!(aggregator.normalize(100, &family, &mut rng).unwrap().bachelors, None);

        let mut bachelors = sample("1", "1");
        bachelors.preference = "Bachelors".into();
        bachelors.bachelors = "Female".into();
        assert_eq!(
            aggregator.normalize(101, &bachelors, &mut rng).unwrap().bachelors,
            Some(Choice::Listed(BachelorsGender::Female))
        );

        bachelors.bachelors = String::new();
        assert_eq!(aggregator.normalize(102, &bachelors, &mut rng).unwrap().bachelors, None);
    }

    #[test]
    fn test_unlisted_labels_keep_every_sample() {
        let base = catalog::base_listings().unwrap();
        let mut samples = catalog::sample_listings().unwrap();
        samples[0].space_type = "Villa".into();
        samples[1].furnishing = String::new();
        samples[2].washroom_type = "Marble".into();
        samples[3].bhk = "two".into();
        samples[4].floor = "ground".into();
        samples[5].maintenance = "included".into();
        samples[6].preference = "Students".into();
        samples[7].bachelors = String::new();

        let listings =
            Aggregator::default().aggregate(&base, &samples, true, &mut StdRng::seed_from_u64(4));
        assert_eq!(listings.len(), base.len() + samples.len());
        let ids: HashSet<_> = listings.iter().map(|p| p.id).collect();
        assert_eq!(ids.len(), listings.len());

        let emitted = &listings[base.len()..];
        assert_eq!(emitted[0].space_type, Choice::Unlisted("Villa".into()));
        assert_eq!(emitted[1].furnishing, Choice::Unlisted(String::new()));
        assert_eq!(emitted[2].washroom_type, Some(Choice::Unlisted("Marble".into())));
        assert_eq!(emitted[3].bhk, None);
        assert_eq!(emitted[4].floor, None);
        assert_eq!(emitted[5].maintenance, None);
        assert_eq!(emitted[6].preference, Some(Choice::Unlisted("Students".into())));
        assert_eq!(emitted[6].bachelors, None);
        assert_eq!(emitted[7].bachelors, None);
    }

    #[test]
    fn test_ids_never_overflow() {
        let mut base = catalog::base_listings().unwrap();
        base[0].id = PropertyId::MAX - 1;
        let samples = vec![sample("1000", "100"), sample("2000", "200")];
        let mut rng = StdRng::seed_from_u64(2);

        let listings = Aggregator::default().aggregate(&base, &samples, true, &mut rng);
        assert_eq!(listings.len(), base.len() + 1);
        assert_eq!(listings.last().map(|p| p.id), Some(PropertyId::MAX));

        base[0].id = PropertyId::MAX;
        let listings = Aggregator::default().aggregate(&base, &samples, true, &mut rng);
        assert_eq!(listings, base);
    }
}
