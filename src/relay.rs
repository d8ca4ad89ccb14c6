//! Block-engine relay client
//!
//! Thin JSON-RPC wrappers over the relay surface: single-transaction
//! submission, bundle submission, and the two batched status queries.
//! Acceptance of a submission yields a handle and nothing more — it never
//! implies anything about eventual inclusion.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use solana_sdk::pubkey::Pubkey;
use std::time::Duration;
use tracing::{debug, info};

use crate::endpoints::{tip_account_at, MAINNET_BLOCK_ENGINES, TESTNET_BLOCK_ENGINES, TIP_ACCOUNTS};
use crate::errors::RelayError;
use crate::types::{
    BundleHandle, BundleStatusesResult, BundleSubmission, EncodedTransaction, JsonRpcRequest,
    JsonRpcResponse, RawBundleStatus,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for one block-engine base URL
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
    uuid: Option<String>,
}

impl RelayClient {
    /// Client for the given block-engine base URL (trailing slash trimmed)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            uuid: None,
        }
    }

    /// Client for the global mainnet block engine
    pub fn mainnet() -> Self {
        Self::new(MAINNET_BLOCK_ENGINES[0])
    }

    /// Client for the global testnet block engine
    pub fn testnet() -> Self {
        Self::new(TESTNET_BLOCK_ENGINES[0])
    }

    /// Attach an endpoint UUID credential, passed through as an opaque
    /// query parameter on every call
    pub fn with_uuid(mut self, uuid: impl Into<String>) -> Self {
        self.uuid = Some(uuid.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a single pre-signed transaction, returning its signature
    ///
    /// `bundle_only` selects the relay's bundle-only lane (the transaction
    /// is withheld from normal propagation); it changes relay-side routing
    /// only, not this client's contract.
    pub async fn send_transaction(
        &self,
        transaction: &EncodedTransaction,
        bundle_only: bool,
    ) -> Result<String, RelayError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if bundle_only {
            query.push(("bundleOnly", "true"));
        }

        let params = json!([
            transaction.as_str(),
            { "encoding": transaction.encoding().as_str() },
        ]);
        let response: JsonRpcResponse<String> = self
            .post_rpc("/transactions", JsonRpcRequest::new("sendTransaction", params), &query)
            .await?;
        let signature = response.into_result()?;

        info!(
            signature = %signature,
            bundle_only,
            "transaction accepted by relay"
        );
        Ok(signature)
    }

    /// Submit a bundle for atomic inclusion, returning its handle
    pub async fn send_bundle(
        &self,
        submission: &BundleSubmission,
    ) -> Result<BundleHandle, RelayError> {
        submission.validate()?;

        let encoded: Vec<&str> = submission
            .transactions
            .iter()
            .map(|tx| tx.as_str())
            .collect();
        let params = json!([
            encoded,
            { "encoding": submission.options.encoding.as_str() },
        ]);

        let response: JsonRpcResponse<String> = self
            .post_rpc("/bundles", JsonRpcRequest::new("sendBundle", params), &[])
            .await?;
        let bundle_id = BundleHandle::from(response.into_result()?);

        info!(
            bundle_id = %bundle_id,
            tx_count = submission.transactions.len(),
            encoding = %submission.options.encoding,
            "bundle accepted by relay"
        );
        Ok(bundle_id)
    }

    /// Batched final-status query (`getBundleStatuses`)
    ///
    /// Entries come back in request order; bundles the relay has no record
    /// of are `None`.
    pub async fn get_bundle_statuses(
        &self,
        handles: &[BundleHandle],
    ) -> Result<Vec<Option<RawBundleStatus>>, RelayError> {
        self.status_query("getBundleStatuses", handles).await
    }

    /// Batched inflight-status query (`getInflightBundleStatuses`)
    pub async fn get_inflight_bundle_statuses(
        &self,
        handles: &[BundleHandle],
    ) -> Result<Vec<Option<RawBundleStatus>>, RelayError> {
        self.status_query("getInflightBundleStatuses", handles).await
    }

    /// Uniform-random pick over the 8 fixed tip-receiving accounts
    ///
    /// No network call; callers must not assume anything about the
    /// sequence of picks beyond uniformity.
    pub fn random_tip_account(&self) -> Pubkey {
        tip_account_at(fastrand::usize(..TIP_ACCOUNTS.len()))
    }

    async fn status_query(
        &self,
        method: &'static str,
        handles: &[BundleHandle],
    ) -> Result<Vec<Option<RawBundleStatus>>, RelayError> {
        let ids: Vec<&str> = handles.iter().map(|h| h.as_str()).collect();
        let params = json!([ids]);

        let response: JsonRpcResponse<BundleStatusesResult> = self
            .post_rpc("/bundles", JsonRpcRequest::new(method, params), &[])
            .await?;
        let result = response.into_result()?;

        debug!(
            method,
            requested = handles.len(),
            returned = result.value.len(),
            "bundle status query"
        );
        Ok(result.value)
    }

    async fn post_rpc<P: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        request: JsonRpcRequest<P>,
        query: &[(&str, &str)],
    ) -> Result<T, RelayError> {
        let url = format!("{}{}", self.base_url, path);
        let mut builder = self
            .http
            .post(&url)
            .timeout(REQUEST_TIMEOUT)
            .json(&request);
        for (key, value) in query {
            builder = builder.query(&[(key, value)]);
        }
        if let Some(uuid) = &self.uuid {
            builder = builder.query(&[("uuid", uuid.as_str())]);
        }

        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Transport {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(response.json().await?)
    }
}
