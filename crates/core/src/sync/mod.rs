//! The sync orchestrator: provider ingestion, dedup upsert, post-ingest
//! aggregation.

pub mod error;
pub mod service;
pub mod types;


pub use error::SyncError;
pub use service::SyncService;
pub use types::{SyncFailure, SyncOptions, SyncResult, SyncStage};
