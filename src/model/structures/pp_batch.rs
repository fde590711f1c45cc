use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::structures::pp_trigger::TriggerId;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FinalizationPoint {
    Match(u32),
    SimulationEnd
}

impl fmt::Display for FinalizationPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalizationPoint::Match(n) => write!(f, "match {}", n),
            FinalizationPoint::SimulationEnd => write!(f, "end of simulation")
        }
    }
}

/// All pending triggers of one new player, finalized together and applied as
/// a single rating change per participant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PpBatch {
    pub new_player: String,
    pub applied_at: FinalizationPoint,
    pub rating_before: f64,
    pub rating_after: f64,
    pub total_new_adjustment: f64,
    pub triggers: Vec<TriggerId>,
    pub trigger_matches: Vec<u32>,
    /// Summed adjustment per established opponent. Opponents missing from the
    /// roster are left out.
    pub established_adjustments: IndexMap<String, f64>
}
