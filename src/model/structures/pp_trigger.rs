use serde::{Deserialize, Serialize};

/// Index of a trigger in the proven potential arena.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(pub usize);

/// A match between an established and a new player, eligible for a later
/// proven potential correction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PpTrigger {
    pub id: TriggerId,
    pub match_number: u32,
    pub new_player: String,
    pub established_player: String,
    pub new_rating_before: f64,
    pub established_rating_before: f64,
    /// Change applied to the new player at match time
    pub new_change: f64,
    /// Change applied to the established player at match time
    pub established_change: f64,
    pub established_won: bool,
    /// `match_number + lookback_window`
    pub tracking_end: u32,
    /// New player's rating after each later appearance, capped at the lookback window
    pub snapshots: Vec<f64>,
    pub state: TriggerState
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum TriggerState {
    Pending,
    Finalized(PpResolution)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PpResolution {
    pub crossed_thresholds: u32,
    pub closure_fraction: f64,
    pub scaling: f64,
    /// `(scaling - 1) * new_change`, added to the live rating at finalization
    pub new_adjustment: f64,
    /// `(scaling - 1) * established_change`
    pub established_adjustment: f64
}

impl PpTrigger {
    pub fn gap(&self) -> f64 {
        (self.established_rating_before - self.new_rating_before).abs()
    }

    pub fn initial_new_after(&self) -> f64 {
        self.new_rating_before + self.new_change
    }

    pub fn is_applied(&self) -> bool {
        matches!(self.state, TriggerState::Finalized(_))
    }

    pub fn resolution(&self) -> Option<&PpResolution> {
        match &self.state {
            TriggerState::Finalized(resolution) => Some(resolution),
            TriggerState::Pending => None
        }
    }
}
