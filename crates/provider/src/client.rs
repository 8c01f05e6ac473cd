//! `reqwest`-backed provider client.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, warn};

use bankfeed_core::provider::{
    AccessToken, BankProvider, ProviderAccount, ProviderError, TransactionPage,
};
use bankfeed_shared::config::ProviderConfig;
use bankfeed_shared::types::ProviderAccountId;

use crate::wire;

/// HTTP implementation of [`BankProvider`].
///
/// Holds one connection-pooled client with a per-call timeout, so a single
/// slow account cannot stall accounts that have already finished.
pub struct HttpBankProvider {
    http: reqwest::Client,
    base_url: String,
    client_id: String,
    client_secret: String,
    page_size: u32,
}

impl HttpBankProvider {
    /// Builds the client from provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ProviderConfig) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            page_size: config.page_size,
        })
    }

    fn transactions_url(&self, account_id: &ProviderAccountId, page_token: Option<&str>) -> String {
        let mut url = format!(
            "{}/accounts/{}/transactions?pageSize={}",
            self.base_url,
            account_id.as_str(),
            self.page_size
        );
        if let Some(token) = page_token {
            url.push_str("&pageToken=");
            url.push_str(token);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &AccessToken,
    ) -> Result<T, ProviderError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&token.0)
            .send()
            .await
            .map_err(|error| ProviderError::Fetch(error.to_string()))?
            .error_for_status()
            .map_err(|error| ProviderError::Fetch(error.to_string()))?;
        response
            .json::<T>()
            .await
            .map_err(|error| ProviderError::Decode(error.to_string()))
    }
}

#[async_trait]
impl BankProvider for HttpBankProvider {
    async fn exchange_token(&self, code: &str) -> Result<AccessToken, ProviderError> {
        let url = format!("{}/oauth/token", self.base_url);
        let body = json!({
            "clientId": self.client_id,
            "clientSecret": self.client_secret,
            "grantType": "authorization_code",
            "code": code,
        });
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|error| ProviderError::AuthExchange(error.to_string()))?
            .error_for_status()
            .map_err(|error| ProviderError::AuthExchange(error.to_string()))?;
        let token: wire::TokenResponse = response
            .json()
            .await
            .map_err(|error| ProviderError::AuthExchange(error.to_string()))?;
        Ok(AccessToken(token.access_token))
    }

    async fn list_accounts(
        &self,
        token: &AccessToken,
    ) -> Result<Vec<ProviderAccount>, ProviderError> {
        let url = format!("{}/accounts", self.base_url);
        let body: wire::AccountsResponse = self.get_json(&url, token).await?;

        let mut accounts = Vec::with_capacity(body.accounts.len());
        for raw in body.accounts {
            match serde_json::from_value::<wire::WireAccount>(raw) {
                Ok(record) => match record.into_provider_account() {
                    Some(account) => accounts.push(account),
                    None => warn!("account record missing routing identity, skipping"),
                },
                Err(error) => warn!(%error, "undecodable account record, skipping"),
            }
        }
        debug!(accounts = accounts.len(), "account listing fetched");
        Ok(accounts)
    }

    async fn list_transactions(
        &self,
        token: &AccessToken,
        account_id: &ProviderAccountId,
        page_token: Option<&str>,
    ) -> Result<TransactionPage, ProviderError> {
        let url = self.transactions_url(account_id, page_token);
        let body: wire::TransactionsResponse = self.get_json(&url, token).await?;

        let mut items = Vec::with_capacity(body.transactions.len());
        for raw in body.transactions {
            match serde_json::from_value::<wire::WireTransaction>(raw) {
                Ok(record) => match record.into_provider_transaction() {
                    Some(transaction) => items.push(transaction),
                    None => {
                        warn!(account_id = %account_id.as_str(), "transaction record missing id or booked date, skipping");
                    }
                },
                Err(error) => {
                    warn!(account_id = %account_id.as_str(), %error, "undecodable transaction record, skipping");
                }
            }
        }
        Ok(TransactionPage {
            items,
            next_page_token: body.next_page_token,
        })
    }
}
