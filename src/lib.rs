//! Client-side orchestration for Jito block-engine bundle submission
//!
//! This library covers the workflow around getting transactions included
//! through a priority-inclusion relay:
//!
//! 1. Read the live tip-floor market ([`tip_market`])
//! 2. Derive a priority-fee / Jito-tip split ([`fee`])
//! 3. Simulate the candidate bundle ([`simulate`])
//! 4. Submit transactions or bundles to the relay ([`relay`])
//! 5. Poll the bundle until terminal, timed out, or cancelled ([`tracker`])
//!
//! Wallets, signing, and transaction construction stay with the caller;
//! transactions cross this boundary only as opaque base64/base58 blobs.

pub mod endpoints;
pub mod errors;
pub mod fee;
pub mod observability;
pub mod relay;
pub mod simulate;
pub mod tip_market;
pub mod tracker;
pub mod types;

pub use errors::RelayError;
pub use fee::{compute_split, FeeEngine, FeeRecommendation, MIN_TIP_LAMPORTS};
pub use relay::RelayClient;
pub use simulate::{BundleSimulator, SimulationOptions, SimulationOutcome};
pub use tip_market::{TipFloorClient, TipPercentile, TipSample};
pub use tracker::{classify, BundleStatusClassification, BundleStatusTracker, POLL_INTERVAL};
pub use types::{
    BundleHandle, BundleOptions, BundleSubmission, EncodedTransaction, TxEncoding,
    MAX_BUNDLE_TRANSACTIONS,
};
