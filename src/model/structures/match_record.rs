use serde::{Deserialize, Serialize};

use crate::model::structures::pp_trigger::TriggerId;

/// A match seen from one participant's perspective. Every match produces two
/// records, the second being [`MatchRecord::mirrored`].
///
/// The `*_rating_change` fields always hold the change computed at match time.
/// Proven potential never rewrites them; the rescaled values live in
/// [`MatchRecord::proven_potential`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MatchRecord {
    pub match_number: u32,
    pub player: String,
    pub opponent: String,
    pub player_rating_before: f64,
    pub opponent_rating_before: f64,
    pub player_confidence: f64,
    pub opponent_confidence: f64,
    pub player_games_before: u32,
    pub opponent_games_before: u32,
    pub player_won: bool,
    pub win_probability: f64,
    pub player_rating_change: f64,
    pub opponent_rating_change: f64,
    pub player_variety_bonus: f64,
    pub opponent_variety_bonus: f64,
    pub player_multiplier: f64,
    pub opponent_multiplier: f64,
    pub proven_potential: Option<PpAdjustment>
}

/// The retroactive rescaling applied to a historical match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PpAdjustment {
    pub trigger: TriggerId,
    pub scaling: f64,
    pub crossed_thresholds: u32,
    pub closure_fraction: f64,
    pub player_adjusted_change: f64,
    pub opponent_adjusted_change: f64
}

impl PpAdjustment {
    pub fn mirrored(&self) -> PpAdjustment {
        PpAdjustment {
            player_adjusted_change: self.opponent_adjusted_change,
            opponent_adjusted_change: self.player_adjusted_change,
            ..self.clone()
        }
    }
}

impl MatchRecord {
    pub fn player_rating_after(&self) -> f64 {
        self.player_rating_before + self.player_rating_change
    }

    pub fn opponent_rating_after(&self) -> f64 {
        self.opponent_rating_before + self.opponent_rating_change
    }

    /// The same match from the opponent's point of view.
    pub fn mirrored(&self) -> MatchRecord {
        MatchRecord {
            match_number: self.match_number,
            player: self.opponent.clone(),
            opponent: self.player.clone(),
            player_rating_before: self.opponent_rating_before,
            opponent_rating_before: self.player_rating_before,
            player_confidence: self.opponent_confidence,
            opponent_confidence: self.player_confidence,
            player_games_before: self.opponent_games_before,
            opponent_games_before: self.player_games_before,
            player_won: !self.player_won,
            win_probability: 1.0 - self.win_probability,
            player_rating_change: self.opponent_rating_change,
            opponent_rating_change: self.player_rating_change,
            player_variety_bonus: self.opponent_variety_bonus,
            opponent_variety_bonus: self.player_variety_bonus,
            player_multiplier: self.opponent_multiplier,
            opponent_multiplier: self.player_multiplier,
            proven_potential: self.proven_potential.as_ref().map(PpAdjustment::mirrored)
        }
    }

    pub fn winner(&self) -> &str {
        if self.player_won {
            &self.player
        } else {
            &self.opponent
        }
    }
}
