use serde::{Deserialize, Serialize};

/// A ladder participant. `target_rating` is the hidden true skill the
/// scenario uses to decide outcomes; `rating` is what the model observes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub name: String,
    pub rating: f64,
    pub target_rating: i32,
    pub games_played: u32,
    /// Matchmaking-only selection weight
    pub activity_weight: f64,
    /// Updated whenever the leaderboard is sorted
    pub global_rank: u32,
    /// Updated whenever the leaderboard is sorted
    pub percentile: f64
}

impl Player {
    pub fn new(name: impl Into<String>, rating: f64, target_rating: i32, activity_weight: f64) -> Player {
        Player {
            name: name.into(),
            rating,
            target_rating,
            games_played: 0,
            activity_weight,
            global_rank: 0,
            percentile: 0.0
        }
    }

    /// Distance between the observed rating and the true skill.
    pub fn rating_error(&self) -> f64 {
        self.rating - self.target_rating as f64
    }
}
