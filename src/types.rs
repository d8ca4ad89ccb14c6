//! Wire and domain types shared across the crate
//!
//! Transactions pass through this layer as opaque pre-signed blobs. The
//! only things the crate ever looks at are the encoding tag and how many
//! transactions a bundle carries; byte-level construction and signing
//! live with the caller.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use serde::{Deserialize, Serialize};

use crate::errors::RelayError;

/// Relay-imposed ceiling on transactions per bundle
pub const MAX_BUNDLE_TRANSACTIONS: usize = 5;

/// Encoding of an opaque transaction blob
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxEncoding {
    Base64,
    Base58,
}

impl TxEncoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base64 => "base64",
            Self::Base58 => "base58",
        }
    }
}

impl std::fmt::Display for TxEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An already-signed transaction, kept as an opaque encoded string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTransaction {
    payload: String,
    encoding: TxEncoding,
}

impl EncodedTransaction {
    /// Wrap an externally produced encoded string
    pub fn new(payload: impl Into<String>, encoding: TxEncoding) -> Self {
        Self {
            payload: payload.into(),
            encoding,
        }
    }

    /// Encode raw signed-transaction bytes as base64
    pub fn from_base64_bytes(bytes: &[u8]) -> Self {
        Self {
            payload: BASE64_STANDARD.encode(bytes),
            encoding: TxEncoding::Base64,
        }
    }

    /// Encode raw signed-transaction bytes as base58
    ///
    /// Most block-engine deployments accept base58; some also take base64.
    pub fn from_base58_bytes(bytes: &[u8]) -> Self {
        Self {
            payload: bs58::encode(bytes).into_string(),
            encoding: TxEncoding::Base58,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.payload
    }

    pub fn encoding(&self) -> TxEncoding {
        self.encoding
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}

/// Submission options for `sendBundle`
#[derive(Debug, Clone, Serialize)]
pub struct BundleOptions {
    pub encoding: TxEncoding,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            encoding: TxEncoding::Base64,
        }
    }
}

/// An ordered set of 1-5 transactions submitted for atomic inclusion
#[derive(Debug, Clone)]
pub struct BundleSubmission {
    pub transactions: Vec<EncodedTransaction>,
    pub options: BundleOptions,
}

impl BundleSubmission {
    pub fn new(transactions: Vec<EncodedTransaction>, options: BundleOptions) -> Self {
        Self {
            transactions,
            options,
        }
    }

    /// Defensive validation ahead of submission
    ///
    /// The relay enforces the 1-5 ceiling on its side too, but rejecting
    /// locally gives the caller a clear error instead of an opaque RPC
    /// rejection. The relay also expects one encoding for the whole bundle,
    /// so mixed encodings are refused here.
    pub fn validate(&self) -> Result<(), RelayError> {
        if self.transactions.is_empty() {
            return Err(RelayError::invalid_bundle("bundle has no transactions"));
        }
        if self.transactions.len() > MAX_BUNDLE_TRANSACTIONS {
            return Err(RelayError::invalid_bundle(format!(
                "bundle has {} transactions, relay maximum is {}",
                self.transactions.len(),
                MAX_BUNDLE_TRANSACTIONS
            )));
        }
        if let Some(tx) = self
            .transactions
            .iter()
            .find(|tx| tx.encoding() != self.options.encoding)
        {
            return Err(RelayError::invalid_bundle(format!(
                "bundle declares {} encoding but contains a {} transaction",
                self.options.encoding,
                tx.encoding()
            )));
        }
        Ok(())
    }
}

/// Relay-issued bundle identifier, the sole key for status queries
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleHandle(String);

impl BundleHandle {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for BundleHandle {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for BundleHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// JSON-RPC envelope
// ============================================================================

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcRequest<P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: P,
}

impl<P> JsonRpcRequest<P> {
    pub fn new(method: &'static str, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        }
    }
}

/// JSON-RPC 2.0 error object
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, Deserialize)]
pub struct JsonRpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

impl<T> JsonRpcResponse<T> {
    /// Extract the result, mapping an absent result to a submission error
    pub fn into_result(self) -> Result<T, RelayError> {
        match (self.result, self.error) {
            (Some(result), _) => Ok(result),
            (None, Some(err)) => Err(RelayError::Submission {
                code: err.code,
                message: err.message,
            }),
            (None, None) => Err(RelayError::Submission {
                code: 0,
                message: "response carried neither result nor error".to_string(),
            }),
        }
    }
}

// ============================================================================
// Bundle status wire shapes
// ============================================================================

/// Context object carried by RPC status responses
#[derive(Debug, Clone, Deserialize)]
pub struct RpcContext {
    pub slot: u64,
}

/// One entry from `getBundleStatuses` or `getInflightBundleStatuses`.
///
/// The relay answers in two incompatible shapes depending on the query:
/// an inflight shape carrying a `status` field (`Pending`/`Landed`/
/// `Failed`/`Invalid`, with `landed_slot` when landed) and a final shape
/// carrying `confirmation_status`, `slot`, and transaction signatures.
/// Every recognized field is optional here; the tracker derives an
/// explicit classification from which ones are present rather than
/// trusting either shape exclusively.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawBundleStatus {
    pub bundle_id: Option<String>,
    pub confirmation_status: Option<String>,
    pub status: Option<String>,
    #[serde(default)]
    pub err: Option<serde_json::Value>,
    pub landed_slot: Option<u64>,
    pub slot: Option<u64>,
    pub transactions: Option<Vec<String>>,
}

/// `result` payload of the batched status queries
///
/// Bundles the relay has no record of come back as `null` entries.
#[derive(Debug, Clone, Deserialize)]
pub struct BundleStatusesResult {
    pub context: Option<RpcContext>,
    pub value: Vec<Option<RawBundleStatus>>,
}
