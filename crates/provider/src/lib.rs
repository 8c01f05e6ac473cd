//! HTTP adapter for the open-banking provider API.
//!
//! Implements [`bankfeed_core::provider::BankProvider`] over REST: token
//! exchange, account listing, and cursor-paginated transaction listing.
//! Wire decoding is lenient per record and strict per page: a malformed
//! transaction is logged and dropped, a malformed page body is a
//! [`bankfeed_core::provider::ProviderError::Decode`].

pub mod client;
mod wire;

pub use client::HttpBankProvider;
