//! Fee recommendation engine
//!
//! Turns a total fee budget, or a percentile pick against the live tip
//! floor, into a deterministic split between the priority fee (paid to
//! the execution layer inside the transaction) and the Jito tip (paid to
//! the relay operator). The split is 70/30 with a minimum-tip floor.

use serde::{Deserialize, Serialize};
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use tracing::debug;

use crate::errors::RelayError;
use crate::tip_market::{TipFloorClient, TipPercentile};

/// Share of the total budget allocated to the priority fee
pub const PRIORITY_FEE_SHARE: f64 = 0.7;

/// Share of the total budget allocated to the Jito tip
pub const JITO_TIP_SHARE: f64 = 0.3;

/// Minimum tip the relay will consider, in lamports
pub const MIN_TIP_LAMPORTS: u64 = 1_000;

/// A derived fee/tip split, in both lamports and SOL
///
/// `total_fee_lamports` is the recomputed sum of the two post-floor
/// components, not the requested budget: when the minimum-tip floor kicks
/// in, the realized total exceeds the nominal 70/30 split of the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeRecommendation {
    pub priority_fee_lamports: u64,
    pub jito_tip_lamports: u64,
    pub total_fee_lamports: u64,
    pub priority_fee_sol: f64,
    pub jito_tip_sol: f64,
    pub total_fee_sol: f64,
}

/// Split a total fee budget (in SOL) into priority fee and Jito tip
///
/// All lamport components are floor-rounded; the tip is floored at
/// [`MIN_TIP_LAMPORTS`]. The invariant
/// `total_fee_lamports == priority_fee_lamports + jito_tip_lamports`
/// holds even when the floor overrides the proportional split.
pub fn compute_split(total_fee_sol: f64) -> FeeRecommendation {
    let total_lamports = (total_fee_sol * LAMPORTS_PER_SOL as f64).floor();

    let priority_fee_lamports = (total_lamports * PRIORITY_FEE_SHARE).floor() as u64;
    let jito_tip_lamports =
        ((total_lamports * JITO_TIP_SHARE).floor() as u64).max(MIN_TIP_LAMPORTS);

    // Recomputed sum, not the input: the tip floor can push the realized
    // total past the requested budget.
    let total_fee_lamports = priority_fee_lamports + jito_tip_lamports;

    FeeRecommendation {
        priority_fee_lamports,
        jito_tip_lamports,
        total_fee_lamports,
        priority_fee_sol: priority_fee_lamports as f64 / LAMPORTS_PER_SOL as f64,
        jito_tip_sol: jito_tip_lamports as f64 / LAMPORTS_PER_SOL as f64,
        total_fee_sol: total_fee_lamports as f64 / LAMPORTS_PER_SOL as f64,
    }
}

/// Fee engine combining the tip-floor market signal with the split policy
#[derive(Debug, Clone)]
pub struct FeeEngine {
    tip_floor: TipFloorClient,
}

impl FeeEngine {
    pub fn new(tip_floor: TipFloorClient) -> Self {
        Self { tip_floor }
    }

    /// Recommend a fee split from a live tip-floor percentile
    ///
    /// The selected percentile value is taken as the *tip* component only,
    /// and an implied total budget is reconstructed by inverting the 30%
    /// allocation (`total = tip / 0.3`) before delegating to
    /// [`compute_split`]. The priority fee is therefore derived from this
    /// engine's own split convention, not observed in the market — the
    /// tip floor never reported a matching priority fee. Kept as a
    /// compatibility behavior.
    pub async fn recommend_from_percentile(
        &self,
        percentile: TipPercentile,
    ) -> Result<FeeRecommendation, RelayError> {
        let samples = self.tip_floor.fetch_tip_samples().await?;
        // Newest sample is index 0, trusting source ordering.
        let newest = samples.first().ok_or(RelayError::EmptyTipData)?;

        let tip_sol = newest.percentile(percentile);
        let implied_total_sol = tip_sol / JITO_TIP_SHARE;
        let recommendation = compute_split(implied_total_sol);

        debug!(
            percentile = ?percentile,
            tip_sol,
            implied_total_sol,
            priority_fee_lamports = recommendation.priority_fee_lamports,
            jito_tip_lamports = recommendation.jito_tip_lamports,
            "derived fee recommendation from tip floor"
        );
        Ok(recommendation)
    }
}
