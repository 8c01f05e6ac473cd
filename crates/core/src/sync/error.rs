//! Fatal sync errors.
//!
//! Only failures that leave nothing meaningful to continue with abort a
//! sync. Everything else (per-account fetch failures, per-record write
//! failures, malformed records) is accumulated inside
//! [`super::SyncResult`] and never thrown past the orchestrator boundary.

use crate::provider::ProviderError;

/// Errors that abort a sync outright.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// The provider rejected the authorization code. Without a token there
    /// is no partial state worth keeping.
    #[error("token exchange failed: {0}")]
    AuthExchange(#[source] ProviderError),

    /// The account list could not be fetched; there are no accounts to
    /// isolate failures across.
    #[error("account listing failed: {0}")]
    AccountList(#[source] ProviderError),
}
