//! Linked bank account records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bankfeed_shared::types::{AccountUniqueId, CustomerId, ProviderAccountId};
use bankfeed_shared::Money;

/// A linked bank account.
///
/// Upserted by `provider_id` on every sync. Never hard-deleted by a sync,
/// only on explicit user unlink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Provider-assigned ID. Volatile: changes when the user re-links.
    pub provider_id: ProviderAccountId,
    /// Relink-stable ID derived from bank routing data. The durable foreign
    /// key for transactions; never derived from `provider_id`.
    pub unique_id: AccountUniqueId,
    /// The customer who linked this account.
    pub customer_id: CustomerId,
    /// Display name reported by the bank.
    pub name: String,
    /// Account type as reported by the provider (e.g. "CHECKING").
    pub account_type: String,
    /// Booked balance.
    pub booked: Money,
    /// Available balance.
    pub available: Money,
    /// Opaque provider metadata. Retained so `unique_id` can be recomputed
    /// if the derivation ever changes.
    pub identifiers: serde_json::Value,
    /// When this account's data was last refreshed from the provider.
    pub last_refreshed: DateTime<Utc>,
    /// The bank this account belongs to.
    pub financial_institution_id: String,
    /// Provider-reported customer segment, if any.
    pub customer_segment: Option<String>,
}

impl Account {
    /// The fields a re-sync is allowed to touch, as an update record.
    #[must_use]
    pub fn as_update(&self) -> AccountUpdate {
        AccountUpdate {
            name: Some(self.name.clone()),
            account_type: Some(self.account_type.clone()),
            booked: Some(self.booked.clone()),
            available: Some(self.available.clone()),
            identifiers: Some(self.identifiers.clone()),
            last_refreshed: Some(self.last_refreshed),
            customer_segment: self.customer_segment.clone(),
        }
    }

    /// Applies an update in place. Identity fields (`provider_id`,
    /// `unique_id`, `customer_id`) are deliberately not updatable.
    pub fn apply_update(&mut self, update: AccountUpdate) {
        let AccountUpdate {
            name,
            account_type,
            booked,
            available,
            identifiers,
            last_refreshed,
            customer_segment,
        } = update;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(account_type) = account_type {
            self.account_type = account_type;
        }
        if let Some(booked) = booked {
            self.booked = booked;
        }
        if let Some(available) = available {
            self.available = available;
        }
        if let Some(identifiers) = identifiers {
            self.identifiers = identifiers;
        }
        if let Some(last_refreshed) = last_refreshed {
            self.last_refreshed = last_refreshed;
        }
        if let Some(customer_segment) = customer_segment {
            self.customer_segment = Some(customer_segment);
        }
    }
}

/// The statically enumerable set of account fields a sync may update.
///
/// One conspicuous field per updatable property, so the upsert contract can
/// be read off the type instead of inferred from ad-hoc partial objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountUpdate {
    /// New display name, if refreshed.
    pub name: Option<String>,
    /// New account type, if refreshed.
    pub account_type: Option<String>,
    /// New booked balance, if refreshed.
    pub booked: Option<Money>,
    /// New available balance, if refreshed.
    pub available: Option<Money>,
    /// New provider metadata blob, if refreshed.
    pub identifiers: Option<serde_json::Value>,
    /// New refresh timestamp.
    pub last_refreshed: Option<DateTime<Utc>>,
    /// New customer segment, if reported.
    pub customer_segment: Option<String>,
}
