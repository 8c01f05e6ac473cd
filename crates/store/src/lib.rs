//! Store implementations for Bankfeed.
//!
//! Currently a single in-memory backend. The pipeline only depends on the
//! [`bankfeed_core::store::Store`] trait, so a durable backend slots in
//! without touching the core crate.

pub mod memory;

pub use memory::MemoryStore;
