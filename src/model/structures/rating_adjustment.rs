use serde::{Deserialize, Serialize};

use crate::model::structures::rating_adjustment_type::RatingAdjustmentType;

/// One entry of a player's rating ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingAdjustment {
    pub adjustment_type: RatingAdjustmentType,
    /// The match that caused the adjustment. For proven potential this is the
    /// match after which the batch was finalized, `None` at simulation end.
    pub match_number: Option<u32>,
    pub rating_before: f64,
    pub rating_after: f64
}

impl RatingAdjustment {
    pub fn rating_delta(&self) -> f64 {
        self.rating_after - self.rating_before
    }
}
