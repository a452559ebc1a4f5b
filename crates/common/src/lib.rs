//! RentNest Common Library
//!
//! Core of the RentNest rental listing service:
//! - Listing models and the bundled catalog
//! - Feed pipeline: aggregation, sorting, pagination
//! - Add-property form: validation, payload packaging, submission lifecycle
//! - Session identity with persisted flags
//! - Error types, configuration, metrics

pub mod auth;
pub mod catalog;
pub mod config;
pub mod errors;
pub mod feed;
pub mod form;
pub mod metrics;
pub mod models;
pub mod simulated;
pub mod submission;

// Re-export commonly used types
pub use auth::{AuthService, Session};
pub use catalog::Catalog;
pub use config::AppConfig;
pub use errors::{AppError, Result};
pub use feed::{Feed, FeedPage, FeedState, SortKey};
pub use form::{FormState, PropertyForm};
pub use models::{Property, PropertyId, Role, User};
pub use submission::{SimulatedSubmitter, Submitter};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
