//! API handlers module

pub mod auth;
pub mod form;
pub mod health;
pub mod properties;
