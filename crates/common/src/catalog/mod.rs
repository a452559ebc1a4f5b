//! Bundled listing catalog
//!
//! Base listings and agent samples ship as JSON inside the crate. A
//! [`Catalog`] aggregates them once, so view counts stay fixed for the life
//! of the process and every page of a feed agrees on them.

mod gallery;

pub use gallery::PhotoCarousel;

use crate::auth::Session;
use crate::errors::{AppError, Result};
use crate::feed::Aggregator;
use crate::models::{Property, PropertyId, SampleListing};
use rand::Rng;
use tracing::info;

const BASE_LISTINGS: &str = include_str!("../../data/base_listings.json");
const SAMPLE_LISTINGS: &str = include_str!("../../data/sample_listings.json");

/// The built-in base listings
pub fn base_listings() -> Result<Vec<Property>> {
    Ok(serde_json::from_str(BASE_LISTINGS)?)
}

/// The built-in agent sample listings, still in raw form
pub fn sample_listings() -> Result<Vec<SampleListing>> {
    Ok(serde_json::from_str(SAMPLE_LISTINGS)?)
}

/// Look a listing up by id
pub fn find_property(listings: &[Property], id: PropertyId) -> Result<&Property> {
    listings
        .iter()
        .find(|p| p.id == id)
        .ok_or_else(|| AppError::PropertyNotFound { id: id.to_string() })
}

#[derive(Debug, Clone)]
pub struct Catalog {
    public: Vec<Property>,
    agent: Vec<Property>,
    samples: Vec<SampleListing>,
}

impl Catalog {
    /// Aggregate `base` and `samples` into the anonymous/user view and the
    /// agent view
    pub fn build<R: Rng + ?Sized>(
        aggregator: &Aggregator,
        base: Vec<Property>,
        samples: Vec<SampleListing>,
        rng: &mut R,
    ) -> Self {
        let agent = aggregator.aggregate(&base, &samples, true, rng);
        info!(
            base = base.len(),
            agent = agent.len(),
            samples = samples.len(),
            "Catalog built"
        );

        Self {
            public: base,
            agent,
            samples,
        }
    }

    /// Catalog from the bundled data
    pub fn bundled<R: Rng + ?Sized>(aggregator: &Aggregator, rng: &mut R) -> Result<Self> {
        Ok(Self::build(aggregator, base_listings()?, sample_listings()?, rng))
    }

    /// Listings visible to `session`
    pub fn listings(&self, session: &Session) -> &[Property] {
        if session.is_agent() {
            &self.agent
        } else {
            &self.public
        }
    }

    pub fn find(&self, session: &Session, id: PropertyId) -> Result<&Property> {
        find_property(self.listings(session), id)
    }

    pub fn samples(&self) -> &[SampleListing] {
        &self.samples
    }
}
