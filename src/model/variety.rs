use std::collections::HashMap;

use indexmap::IndexMap;
use statrs::statistics::{Data, Median};

use crate::model::{
    config::VarietyConfig,
    constants::{
        COSINE_FALLOFF, DEFAULT_AVERAGE_ENTROPY, TAIL_CURVE_FLOOR, TAIL_CURVE_GROWTH_RATE, TAIL_CURVE_MIDPOINT,
        TAIL_PERCENTILE_DISTANCE
    }
};

/// Population-wide values the variety bonus is measured against. Rebuilt
/// before every match.
#[derive(Debug, Clone, Default)]
pub struct PopulationSnapshot {
    /// Current rating of every active player
    pub ratings: HashMap<String, f64>,
    /// Highest minus lowest current rating
    pub rating_range: f64,
    /// Median games played, never zero
    pub median_games_played: f64,
    /// Mean player entropy, already scaled by the difficulty multiplier
    pub average_entropy: f64
}

/// Per-player inputs to [`variety_bonus`].
#[derive(Debug, Clone)]
pub struct VarietyInput<'a> {
    pub player_rating: f64,
    /// Matches played against each opponent, by name
    pub opponent_counts: &'a IndexMap<String, u32>,
    pub games_played: u32,
    /// Placement in the population, 0 to 100
    pub percentile: Option<f64>
}

/// Weight of an opponent in the diversity measure.
///
/// Opponents rated at or above the player count fully, lower rated ones fall
/// off along a cosine curve, and anyone beyond the neighbor window is
/// excluded (`None`).
pub fn opponent_weight(player_rating: f64, opponent_rating: f64, neighbor_window: f64) -> Option<f64> {
    let gap = (player_rating - opponent_rating).abs();
    if gap > neighbor_window {
        return None;
    }

    if opponent_rating >= player_rating {
        return Some(1.0);
    }

    let normalized_gap = gap / neighbor_window;
    Some(cosine_falloff(normalized_gap))
}

/// `(1 + cos(pi * x * 0.7)) / 2`: 1.0 at `x = 0`, about 0.2 at `x = 1`.
pub fn cosine_falloff(normalized_gap: f64) -> f64 {
    (1.0 + (std::f64::consts::PI * normalized_gap * COSINE_FALLOFF).cos()) / 2.0
}

/// Shannon entropy (base 2) of the weighted opponent distribution. `None`
/// when no opponent carries any weight.
pub fn weighted_entropy(
    player_rating: f64,
    opponent_counts: &IndexMap<String, u32>,
    ratings: &HashMap<String, f64>,
    neighbor_window: f64
) -> Option<f64> {
    let weighted: Vec<f64> = opponent_counts
        .iter()
        .filter_map(|(name, count)| {
            let opponent_rating = *ratings.get(name)?;
            let weight = opponent_weight(player_rating, opponent_rating, neighbor_window)?;
            Some(*count as f64 * weight)
        })
        .filter(|w| *w > 0.0)
        .collect();

    let total: f64 = weighted.iter().sum();
    if total <= 0.0 {
        return None;
    }

    Some(
        weighted
            .iter()
            .map(|w| {
                let p = w / total;
                -p * p.log2()
            })
            .sum()
    )
}

/// Mean of the given player entropies scaled by the difficulty multiplier.
pub fn average_entropy(entropies: &[f64], difficulty_multiplier: f64) -> f64 {
    if entropies.is_empty() {
        return DEFAULT_AVERAGE_ENTROPY;
    }

    let mean = entropies.iter().sum::<f64>() / entropies.len() as f64;
    mean * difficulty_multiplier
}

/// Median of the games-played counts. Returns 1.0 instead of zero so it can
/// be used as a divisor.
pub fn median_games_played(games_played: &[u32]) -> f64 {
    if games_played.is_empty() {
        return 1.0;
    }

    let data = Data::new(games_played.iter().map(|g| *g as f64).collect::<Vec<f64>>());
    let median = data.median();

    if median > 0.0 {
        median
    } else {
        1.0
    }
}

/// Tie-aware percentile of `value` within `values`:
/// `(count_below + 0.5 * count_equal) / n * 100`.
pub fn percentile_of(value: f64, values: &[f64]) -> f64 {
    if values.is_empty() {
        return 50.0;
    }

    let below = values.iter().filter(|v| **v < value).count() as f64;
    let equal = values.iter().filter(|v| **v == value).count() as f64;

    (below + 0.5 * equal) / values.len() as f64 * 100.0
}

/// Sigmoid amplification for the outer tail, 90 to 100. Returns 0.1 at 90 and
/// 1.0 at 99 and above.
pub fn tail_curve(percentile: u32) -> f64 {
    let sigmoid = |x: f64| 1.0 / (1.0 + (-TAIL_CURVE_GROWTH_RATE * (x - TAIL_CURVE_MIDPOINT)).exp());

    let x = percentile.clamp(90, 100) as f64 - 89.0;
    let min_raw = sigmoid(1.0);
    let max_raw = sigmoid(10.0);
    let scaled = ((sigmoid(x) - min_raw) / (max_raw - min_raw)).clamp(0.0, 1.0);

    TAIL_CURVE_FLOOR + scaled * (1.0 - TAIL_CURVE_FLOOR)
}

/// Increase factor in `[1.1, 2.0]` for players in the top or bottom 10%,
/// `None` for everyone else. The bottom tail mirrors the top.
pub fn tail_increase_factor(percentile: f64) -> Option<f64> {
    let distance_from_middle = (percentile - 50.0).abs() / 50.0;
    if distance_from_middle <= TAIL_PERCENTILE_DISTANCE {
        return None;
    }

    let mirrored = if percentile >= 90.0 {
        percentile
    } else {
        100.0 - percentile
    };

    Some(1.0 + tail_curve(mirrored.floor() as u32))
}

/// Bonus or penalty in `[min_variety_bonus, max_variety_bonus]` for the
/// diversity of a player's opponents relative to the population.
///
/// 1. No history earns the maximum bonus.
/// 2. Opponents are weighted by [`opponent_weight`] and the entropy of the
///    weighted distribution is compared to the population average.
/// 3. The relative difference is scaled quadratically by games played against
///    the median, so young accounts swing less.
/// 4. Players in the outer 10% tails, who structurally have fewer same-tier
///    opponents, have bonuses increased and penalties shrunk.
pub fn variety_bonus(config: &VarietyConfig, input: &VarietyInput, population: &PopulationSnapshot) -> f64 {
    if input.opponent_counts.is_empty() {
        return config.max_variety_bonus;
    }

    let neighbor_window = config.neighbor_window(population.rating_range);
    let entropy = match weighted_entropy(
        input.player_rating,
        input.opponent_counts,
        &population.ratings,
        neighbor_window
    ) {
        Some(entropy) => entropy,
        None => return config.max_variety_bonus
    };

    let baseline = population.average_entropy;
    let denominator = if baseline != 0.0 { baseline.abs() } else { 1.0 };
    let relative_diff = (entropy - baseline) / denominator;

    let median = if population.median_games_played > 0.0 {
        population.median_games_played
    } else {
        1.0
    };
    let games_ratio = (input.games_played as f64 / median).min(1.0);
    let scaling = config.min_scaling_factor + (1.0 - config.min_scaling_factor) * games_ratio * games_ratio;

    let mut bonus = relative_diff * scaling * config.max_variety_bonus;

    if let Some(factor) = input.percentile.and_then(tail_increase_factor) {
        if bonus >= 0.0 {
            bonus *= factor;
        } else {
            bonus *= 2.0 - factor;
        }
    }

    bonus.clamp(config.min_variety_bonus, config.max_variety_bonus)
}
