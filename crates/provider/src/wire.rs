//! Wire DTOs for the provider's REST payloads.
//!
//! Decoding is lenient per record: missing amount parts degrade to the zero
//! amount, unknown statuses to `Undefined`, and records missing identity
//! fields convert to `None` so the caller can drop them without failing the
//! surrounding page.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use bankfeed_core::model::TransactionStatus;
use bankfeed_core::provider::{ProviderAccount, ProviderTransaction};
use bankfeed_shared::Money;
use bankfeed_shared::types::{ProviderAccountId, ProviderTransactionId};

/// Token exchange response body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TokenResponse {
    pub access_token: String,
}

/// Account listing response body.
///
/// Records are kept raw here so that one undecodable account does not fail
/// the whole listing.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct AccountsResponse {
    pub accounts: Vec<serde_json::Value>,
}

/// One page of the transaction listing, records kept raw for per-record
/// decoding.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct TransactionsResponse {
    pub transactions: Vec<serde_json::Value>,
    pub next_page_token: Option<String>,
}

/// A bank account record on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct WireAccount {
    pub id: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub account_type: Option<String>,
    pub booked_balance: Option<WireAmount>,
    pub available_balance: Option<WireAmount>,
    pub financial_institution_id: Option<String>,
    pub customer_segment: Option<String>,
    pub identifiers: Option<WireAccountIdentifiers>,
}

/// Account routing identifiers, plus whatever else the provider attaches.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct WireAccountIdentifiers {
    pub sort_code: Option<String>,
    pub account_number: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl WireAccount {
    /// Converts to the typed record, or `None` when the provider ID or any
    /// routing component is missing. The routing triplet is what account
    /// identity derives from, so a record without it cannot be stored.
    pub(crate) fn into_provider_account(self) -> Option<ProviderAccount> {
        let id = self.id?;
        let institution_id = self.financial_institution_id?;
        let identifiers = self.identifiers?;
        let blob = serde_json::to_value(&identifiers).unwrap_or(serde_json::Value::Null);
        let sort_code = identifiers.sort_code?;
        let account_number = identifiers.account_number?;
        Some(ProviderAccount {
            provider_id: ProviderAccountId::new(id),
            name: self.name.unwrap_or_default(),
            account_type: self.account_type.unwrap_or_else(|| "UNDEFINED".to_owned()),
            booked: money_or_zero(self.booked_balance),
            available: money_or_zero(self.available_balance),
            institution_id,
            sort_code,
            account_number,
            customer_segment: self.customer_segment,
            identifiers: blob,
        })
    }
}

/// A transaction record on the wire.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct WireTransaction {
    pub id: Option<String>,
    pub amount: Option<WireAmount>,
    pub descriptions: WireDescriptions,
    pub dates: WireDates,
    pub status: Option<String>,
    pub types: Vec<String>,
    pub provider_mutability: Option<String>,
    pub identifiers: serde_json::Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct WireDescriptions {
    pub original: Option<String>,
    pub display: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct WireDates {
    pub booked: Option<NaiveDate>,
}

impl WireTransaction {
    /// Converts to the typed record, or `None` when the ID or booked date is
    /// missing. Everything else degrades: amounts to zero, statuses to
    /// `Undefined`, narrations to the empty string.
    pub(crate) fn into_provider_transaction(self) -> Option<ProviderTransaction> {
        let id = self.id?;
        let booked_date = self.dates.booked?;
        let narration = self
            .descriptions
            .display
            .or(self.descriptions.original)
            .unwrap_or_default();
        let status = self
            .status
            .as_deref()
            .unwrap_or("")
            .parse()
            .unwrap_or(TransactionStatus::Undefined);
        Some(ProviderTransaction {
            provider_id: ProviderTransactionId::new(id),
            amount: money_or_zero(self.amount),
            narration,
            booked_date,
            status,
            types: self.types,
            mutability: self
                .provider_mutability
                .unwrap_or_else(|| "UNDEFINED".to_owned()),
            identifiers: self.identifiers,
        })
    }
}

/// A monetary amount on the wire: `{value: {unscaledValue, scale},
/// currencyCode}`. Some provider backends serialize the numeric parts as
/// strings, so both are accepted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct WireAmount {
    pub value: Option<WireScaledValue>,
    pub currency_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct WireScaledValue {
    #[serde(deserialize_with = "lenient_i64")]
    pub unscaled_value: Option<i64>,
    #[serde(deserialize_with = "lenient_u32")]
    pub scale: Option<u32>,
}

impl WireAmount {
    fn into_money(self) -> Money {
        let value = self.value.unwrap_or_default();
        Money::from_parts(value.unscaled_value, value.scale, self.currency_code)
    }
}

fn money_or_zero(amount: Option<WireAmount>) -> Money {
    amount
        .map(WireAmount::into_money)
        .unwrap_or_else(|| Money::from_parts(None, None, None))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString<T> {
    Number(T),
    Text(String),
}

fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrString<i64>>::deserialize(deserializer)? {
        None => None,
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
    })
}

fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrString<u32>>::deserialize(deserializer)? {
        None => None,
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
    })
}
