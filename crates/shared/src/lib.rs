//! Shared types, keys, and configuration for Bankfeed.
//!
//! This crate provides common types used across all other crates:
//! - Money as an integer unscaled value plus scale (no floating point, ever)
//! - Typed string keys for provider-scoped and relink-stable identifiers
//! - Application configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
pub use types::money::Money;
