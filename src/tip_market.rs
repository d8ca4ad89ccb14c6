//! Tip-floor market reader
//!
//! Fetches the percentile-bucketed series of recently landed Jito tips.
//! The endpoint returns values denominated in SOL (fractional), newest
//! sample first. This module exposes the raw samples; the fee engine
//! consumes only the most recent one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::endpoints::TIP_FLOOR_URL;
use crate::errors::RelayError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Percentile buckets the fee engine may select against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TipPercentile {
    P50,
    P75,
    P95,
    P99,
}

/// One timestamped tip-floor observation, SOL-denominated
///
/// Field names match the wire format of the tip-floor endpoint exactly.
/// Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipSample {
    pub time: String,
    pub landed_tips_25th_percentile: f64,
    pub landed_tips_50th_percentile: f64,
    pub landed_tips_75th_percentile: f64,
    pub landed_tips_95th_percentile: f64,
    pub landed_tips_99th_percentile: f64,
    pub ema_landed_tips_50th_percentile: f64,
}

impl TipSample {
    /// Tip value for the given percentile bucket, in SOL
    pub fn percentile(&self, percentile: TipPercentile) -> f64 {
        match percentile {
            TipPercentile::P50 => self.landed_tips_50th_percentile,
            TipPercentile::P75 => self.landed_tips_75th_percentile,
            TipPercentile::P95 => self.landed_tips_95th_percentile,
            TipPercentile::P99 => self.landed_tips_99th_percentile,
        }
    }

    /// Parse the sample timestamp, if it is well-formed RFC 3339
    pub fn parsed_time(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.time)
            .ok()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Client for the public tip-floor endpoint
///
/// Every call re-fetches; there is no caching and no retry. The caller
/// decides whether a failed fetch is worth retrying.
#[derive(Debug, Clone)]
pub struct TipFloorClient {
    http: reqwest::Client,
    url: String,
}

impl TipFloorClient {
    pub fn new() -> Self {
        Self::with_url(TIP_FLOOR_URL)
    }

    /// Point the reader at a different URL (tests, proxies)
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
        }
    }

    /// Fetch the current tip-floor series, newest sample first
    ///
    /// The source orders the series newest-first; no client-side sort or
    /// recency check is applied beyond trusting that ordering.
    pub async fn fetch_tip_samples(&self) -> Result<Vec<TipSample>, RelayError> {
        let response = self
            .http
            .get(&self.url)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Transport {
                status: status.as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }

        let samples: Vec<TipSample> = response.json().await?;
        if samples.is_empty() {
            return Err(RelayError::EmptyTipData);
        }

        debug!(
            count = samples.len(),
            newest = %samples[0].time,
            p50 = samples[0].landed_tips_50th_percentile,
            p75 = samples[0].landed_tips_75th_percentile,
            "fetched tip floor samples"
        );
        Ok(samples)
    }
}

impl Default for TipFloorClient {
    fn default() -> Self {
        Self::new()
    }
}
