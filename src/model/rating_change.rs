use serde::{Deserialize, Serialize};

use crate::model::{
    confidence::is_full_confidence,
    config::{CatchUpConfig, EloConfig, RatingConfig, VarietyConfig},
    variety::cosine_falloff
};

/// Both participants of a match as seen immediately before it was played.
#[derive(Debug, Clone, PartialEq)]
pub struct RatingChangeInput {
    pub winner_rating: f64,
    pub loser_rating: f64,
    pub winner_confidence: f64,
    pub loser_confidence: f64,
    pub winner_variety: f64,
    pub loser_variety: f64,
    /// Highest minus lowest rating in the population
    pub rating_range: f64
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingChange {
    /// Always non-negative
    pub winner_delta: f64,
    /// Always non-positive
    pub loser_delta: f64,
    /// Clamped multiplier, before catch-up
    pub winner_multiplier: f64,
    /// Clamped multiplier, before catch-up
    pub loser_multiplier: f64,
    /// Factor applied to the higher-rated side
    pub gap_scaling: f64,
    pub winner_catch_up: f64,
    pub loser_catch_up: f64
}

/// ELO expectation of `rating` scoring against `opponent_rating`.
pub fn expected_score(config: &EloConfig, rating: f64, opponent_rating: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent_rating - rating) / config.elo_divisor))
}

/// Anti shadow-boxing factor for the higher-rated side of a match.
///
/// Returns 1.0 when the population has no spread, when the gap is outside the
/// window, or when the lower-rated side is not fully confident.
pub fn gap_scaling(config: &VarietyConfig, rating_gap: f64, lower_established: bool, rating_range: f64) -> f64 {
    if rating_range <= 0.0 || !lower_established {
        return 1.0;
    }

    let max_gap = config.neighbor_window(rating_range);
    if rating_gap > max_gap {
        return 1.0;
    }

    cosine_falloff(rating_gap / max_gap)
}

/// Additive multiplier bonus for players far below the intended average.
pub fn catch_up_bonus(config: &CatchUpConfig, rating: f64) -> f64 {
    let distance = config.target_rating - rating;
    if distance <= config.convergence_threshold {
        return 0.0;
    }

    let scale = config.convergence_threshold / 2.0;
    let progress = 1.0 - (-distance / scale).exp();

    progress * config.max_bonus
}

fn multiplier(config: &RatingConfig, variety: f64, confidence: f64) -> f64 {
    let confidence_multiplier = 2.0 - confidence;

    ((1.0 + variety) * confidence_multiplier).clamp(config.multiplier.min_multiplier, config.multiplier.max_multiplier)
}

/// Computes the signed rating change of both sides of a match.
///
/// The higher-rated side's delta carries the gap scaling, the lower-rated
/// side's never does. Winner and loser magnitudes are independent; the
/// result is not zero-sum.
pub fn rating_change(config: &RatingConfig, input: &RatingChangeInput) -> RatingChange {
    let expected = expected_score(&config.elo, input.winner_rating, input.loser_rating);
    let base_change = config.elo.base_rating_change * (1.0 - expected);

    let winner_multiplier = multiplier(config, input.winner_variety, input.winner_confidence);
    let loser_multiplier = multiplier(config, input.loser_variety, input.loser_confidence);

    let rating_gap = (input.winner_rating - input.loser_rating).abs();
    let winner_is_higher = input.winner_rating > input.loser_rating;
    let loser_is_higher = input.loser_rating > input.winner_rating;

    let gap_scaling = if winner_is_higher {
        let established = is_full_confidence(&config.confidence, input.loser_confidence);
        gap_scaling(&config.variety, rating_gap, established, input.rating_range)
    } else if loser_is_higher {
        let established = is_full_confidence(&config.confidence, input.winner_confidence);
        gap_scaling(&config.variety, rating_gap, established, input.rating_range)
    } else {
        1.0
    };

    let (winner_catch_up, loser_catch_up) = match config.catch_up.as_ref().filter(|c| c.enabled) {
        Some(catch_up) => {
            let winner = catch_up_bonus(catch_up, input.winner_rating);
            let loser = if catch_up.apply_to_loser {
                catch_up_bonus(catch_up, input.loser_rating)
            } else {
                0.0
            };
            (winner, loser)
        }
        None => (0.0, 0.0)
    };

    let mut winner_delta = base_change * (winner_multiplier + winner_catch_up);
    let mut loser_delta = -base_change * (loser_multiplier + loser_catch_up);

    if winner_is_higher {
        winner_delta *= gap_scaling;
    } else if loser_is_higher {
        loser_delta *= gap_scaling;
    }

    RatingChange {
        winner_delta,
        loser_delta,
        winner_multiplier,
        loser_multiplier,
        gap_scaling,
        winner_catch_up,
        loser_catch_up
    }
}
