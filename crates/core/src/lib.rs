//! Core sync and aggregation pipeline for Bankfeed.
//!
//! This crate contains the financial data synchronization pipeline with ZERO
//! web or database dependencies. The open-banking provider and the durable
//! store are consumed behind traits; everything else is deterministic logic.
//!
//! # Modules
//!
//! - `model` - Typed account and transaction records
//! - `identity` - Relink-stable account IDs and transaction dedup keys
//! - `provider` - The `BankProvider` collaborator contract
//! - `store` - The `Store` collaborator contract
//! - `sync` - The sync orchestrator
//! - `category` - Narration-to-category classification
//! - `spending` - Monthly spend aggregation and budgets
//! - `recurring` - Recurring-payment detection
//! - `pipeline` - The facade consumed by the serving layer

pub mod category;
pub mod identity;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod recurring;
pub mod spending;
pub mod store;
pub mod sync;

pub use pipeline::Pipeline;
