//! Bundle status tracking
//!
//! Classifies the relay's two incompatible status shapes into one
//! explicit terminal/non-terminal enum, and drives the fixed-interval
//! polling loop that waits for a submitted bundle to reach a terminal
//! state. The loop ends three ways: a terminal classification, the
//! caller's timeout, or the caller's cancellation token.

use std::time::Duration;
use tokio::time::{interval, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::errors::RelayError;
use crate::relay::RelayClient;
use crate::types::{BundleHandle, RawBundleStatus};

/// Fixed polling interval, no backoff
pub const POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Normalized classification of one polled status response
///
/// `Unknown` is a deliberate escape hatch for responses matching none of
/// the recognized shapes: non-terminal, logged, never fatal. Callers must
/// treat it as "poll again".
#[derive(Debug, Clone, PartialEq)]
pub enum BundleStatusClassification {
    /// Final shape reported `confirmation_status == "confirmed"`
    Confirmed { slot: Option<u64> },
    /// Inflight shape reported `Landed`; slot is unknown when the relay
    /// omitted `landed_slot`
    Landed { slot: Option<u64> },
    /// Inflight shape reported `Failed`, or a bare truthy `err` payload
    Failed { err: Option<serde_json::Value> },
    /// Inflight shape reported `Invalid`
    Invalid,
    /// Still in flight
    Pending,
    /// Response matched no recognized shape
    Unknown,
}

impl BundleStatusClassification {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Confirmed { .. } | Self::Landed { .. } | Self::Failed { .. } | Self::Invalid
        )
    }

    /// Terminal and successful (the bundle made it on-chain)
    pub fn is_landed(&self) -> bool {
        matches!(self, Self::Confirmed { .. } | Self::Landed { .. })
    }
}

impl std::fmt::Display for BundleStatusClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed { slot: Some(slot) } => write!(f, "Confirmed (slot {slot})"),
            Self::Confirmed { slot: None } => write!(f, "Confirmed"),
            Self::Landed { slot: Some(slot) } => write!(f, "Landed (slot {slot})"),
            Self::Landed { slot: None } => write!(f, "Landed (slot unknown)"),
            Self::Failed { .. } => write!(f, "Failed"),
            Self::Invalid => write!(f, "Invalid"),
            Self::Pending => write!(f, "Pending"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Classify one raw status entry
///
/// The discriminant is derived from which fields are present, checked in
/// a fixed order: `confirmation_status` first, then the inflight `status`
/// field, then a bare truthy `err`, and `Unknown` as the catch-all.
pub fn classify(raw: &RawBundleStatus) -> BundleStatusClassification {
    if raw.confirmation_status.as_deref() == Some("confirmed") {
        return BundleStatusClassification::Confirmed { slot: raw.slot };
    }

    match raw.status.as_deref() {
        Some("Landed") => BundleStatusClassification::Landed {
            slot: raw.landed_slot,
        },
        Some("Failed") => BundleStatusClassification::Failed { err: None },
        Some("Invalid") => BundleStatusClassification::Invalid,
        Some("Pending") => BundleStatusClassification::Pending,
        Some(other) => {
            warn!(status = other, "unrecognized bundle status value");
            BundleStatusClassification::Unknown
        }
        None => match &raw.err {
            Some(err) if !err.is_null() => BundleStatusClassification::Failed {
                err: Some(err.clone()),
            },
            _ => BundleStatusClassification::Unknown,
        },
    }
}

/// Polls one bundle handle until terminal, timed out, or cancelled
///
/// Holds no cross-bundle state; track multiple bundles by running
/// independent `wait_for_landing` calls.
#[derive(Debug, Clone)]
pub struct BundleStatusTracker {
    relay: RelayClient,
    poll_interval: Duration,
}

impl BundleStatusTracker {
    pub fn new(relay: RelayClient) -> Self {
        Self {
            relay,
            poll_interval: POLL_INTERVAL,
        }
    }

    /// Override the fixed poll interval (tests, aggressive callers)
    pub fn with_poll_interval(relay: RelayClient, poll_interval: Duration) -> Self {
        Self {
            relay,
            poll_interval,
        }
    }

    /// Poll until the bundle reaches a terminal state
    ///
    /// Re-queries on a fixed interval with no backoff. `Pending` and
    /// `Unknown` classifications keep the loop running; transport errors
    /// mid-poll are logged and retried rather than surfaced, since a flaky
    /// status endpoint must not fabricate a terminal verdict. On timeout
    /// the bundle's inclusion is undetermined, not failed. The
    /// cancellation token aborts the loop at the next suspension point.
    pub async fn wait_for_landing(
        &self,
        handle: &BundleHandle,
        timeout: Duration,
        cancel: CancellationToken,
    ) -> Result<BundleStatusClassification, RelayError> {
        let started = std::time::Instant::now();
        let deadline = Instant::now() + timeout;

        let mut ticker = interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            bundle_id = %handle,
            timeout_ms = timeout.as_millis() as u64,
            interval_ms = self.poll_interval.as_millis() as u64,
            "starting bundle status polling"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(bundle_id = %handle, "bundle status polling cancelled");
                    return Err(RelayError::Cancelled {
                        bundle_id: handle.to_string(),
                    });
                }
                _ = tokio::time::sleep_until(deadline) => {
                    let elapsed = started.elapsed();
                    warn!(
                        bundle_id = %handle,
                        elapsed_ms = elapsed.as_millis() as u64,
                        "bundle not terminal before timeout, inclusion undetermined"
                    );
                    return Err(RelayError::ConfirmationTimeout {
                        bundle_id: handle.to_string(),
                        elapsed,
                    });
                }
                _ = ticker.tick() => {}
            }

            match self
                .relay
                .get_inflight_bundle_statuses(std::slice::from_ref(handle))
                .await
            {
                Ok(statuses) => {
                    let classification = statuses
                        .first()
                        .and_then(|entry| entry.as_ref())
                        .map(classify)
                        .unwrap_or(BundleStatusClassification::Unknown);

                    if classification.is_terminal() {
                        info!(
                            bundle_id = %handle,
                            status = %classification,
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            "bundle reached terminal state"
                        );
                        return Ok(classification);
                    }

                    match classification {
                        BundleStatusClassification::Unknown => warn!(
                            bundle_id = %handle,
                            "status response matched no recognized shape, polling again"
                        ),
                        _ => debug!(bundle_id = %handle, status = %classification, "bundle still pending"),
                    }
                }
                Err(e) => {
                    warn!(
                        bundle_id = %handle,
                        error = %e,
                        "status poll failed, will retry until timeout"
                    );
                }
            }
        }
    }
}
