//! Bundle simulation against a caller-supplied RPC endpoint
//!
//! `simulateBundle` is a capability not every RPC provider supports, so
//! there is deliberately no default endpoint here: the caller must name
//! one, and an empty endpoint is a configuration error rather than a
//! silent fallback.

use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::errors::RelayError;
use crate::types::{EncodedTransaction, JsonRpcRequest, JsonRpcResponse, RpcContext};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Flags forwarded to `simulateBundle`
#[derive(Debug, Clone)]
pub struct SimulationOptions {
    pub skip_sig_verify: bool,
    pub replace_recent_blockhash: bool,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            skip_sig_verify: true,
            replace_recent_blockhash: true,
        }
    }
}

/// Normalized outcome of a bundle simulation
///
/// `logs`, when present, holds one inner sequence of log lines per
/// submitted transaction, in submission order. Callers surfacing
/// diagnostics must preserve that grouping, which is why the error arm
/// carries it too.
#[derive(Debug, Clone)]
pub enum SimulationOutcome {
    Ok {
        slot: u64,
        units_consumed: Option<u64>,
        logs: Option<Vec<Vec<String>>>,
        return_data: Option<serde_json::Value>,
    },
    SimError {
        err: serde_json::Value,
        logs: Option<Vec<Vec<String>>>,
    },
}

impl SimulationOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok { .. })
    }

    /// Per-transaction log groups, if the endpoint returned any
    pub fn logs(&self) -> Option<&[Vec<String>]> {
        match self {
            Self::Ok { logs, .. } | Self::SimError { logs, .. } => logs.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimulateBundleValue {
    #[serde(default)]
    err: Option<serde_json::Value>,
    #[serde(default)]
    logs: Option<Vec<Vec<String>>>,
    #[serde(default)]
    units_consumed: Option<u64>,
    #[serde(default)]
    return_data: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct SimulateBundleResult {
    context: Option<RpcContext>,
    value: SimulateBundleValue,
}

/// Submits candidate bundles to a `simulateBundle`-capable RPC endpoint
#[derive(Debug, Clone, Default)]
pub struct BundleSimulator {
    http: reqwest::Client,
}

impl BundleSimulator {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    /// Simulate an encoded transaction set without submitting it
    ///
    /// Issues a single JSON-RPC `simulateBundle` call with a one-element
    /// params array carrying the transactions and flags. A simulation
    /// failure is reported as [`SimulationOutcome::SimError`], not as an
    /// `Err`: the call itself succeeded and the caller decides whether to
    /// abort the submission.
    pub async fn simulate(
        &self,
        transactions: &[EncodedTransaction],
        options: &SimulationOptions,
        endpoint: &str,
    ) -> Result<SimulationOutcome, RelayError> {
        if endpoint.trim().is_empty() {
            return Err(RelayError::configuration(
                "simulation endpoint is required: simulateBundle is not supported by every RPC provider",
            ));
        }

        let encoded: Vec<&str> = transactions.iter().map(|tx| tx.as_str()).collect();
        let request = JsonRpcRequest::new(
            "simulateBundle",
            json!([{
                "encodedTransactions": encoded,
                "skipSigVerify": options.skip_sig_verify,
                "replaceRecentBlockhash": options.replace_recent_blockhash,
            }]),
        );

        let response = self
            .http
            .post(endpoint)
            .timeout(REQUEST_TIMEOUT)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Transport {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let envelope: JsonRpcResponse<SimulateBundleResult> = response.json().await?;
        let result = envelope.into_result()?;
        let slot = result.context.map(|c| c.slot).unwrap_or_default();

        match result.value.err {
            Some(err) if !err.is_null() => {
                warn!(
                    tx_count = transactions.len(),
                    error = %err,
                    "bundle simulation reported failure"
                );
                Ok(SimulationOutcome::SimError {
                    err,
                    logs: result.value.logs,
                })
            }
            _ => {
                debug!(
                    tx_count = transactions.len(),
                    slot,
                    units_consumed = ?result.value.units_consumed,
                    "bundle simulation succeeded"
                );
                Ok(SimulationOutcome::Ok {
                    slot,
                    units_consumed: result.value.units_consumed,
                    logs: result.value.logs,
                    return_data: result.value.return_data,
                })
            }
        }
    }
}
