use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};
use thiserror::Error;

use crate::model::constants;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be {expected}, found {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64
    },

    #[error("{min_field} ({min}) must not exceed {max_field} ({max})")]
    InvertedBounds {
        min_field: &'static str,
        max_field: &'static str,
        min: f64,
        max: f64
    }
}

fn check(ok: bool, field: &'static str, expected: &'static str, value: f64) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, expected, value })
    }
}

/// Ratings used for percentile placement in the variety bonus.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum PercentileBasis {
    Current,
    Target
}

/// Immutable parameter set for the rating core. One instance is built at
/// startup, validated, and passed by reference into every component.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct RatingConfig {
    pub elo: EloConfig,
    pub confidence: ConfidenceConfig,
    pub variety: VarietyConfig,
    pub multiplier: MultiplierConfig,
    pub proven_potential: ProvenPotentialConfig,
    pub catch_up: Option<CatchUpConfig>
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EloConfig {
    pub starting_rating: f64,
    /// K-factor
    pub base_rating_change: f64,
    pub elo_divisor: f64
}

impl Default for EloConfig {
    fn default() -> Self {
        Self {
            starting_rating: constants::STARTING_RATING,
            base_rating_change: constants::BASE_RATING_CHANGE,
            elo_divisor: constants::ELO_DIVISOR
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ConfidenceConfig {
    pub max_confidence_games: u32,
    pub max_confidence: f64
}

impl Default for ConfidenceConfig {
    fn default() -> Self {
        Self {
            max_confidence_games: constants::MAX_CONFIDENCE_GAMES,
            max_confidence: constants::MAX_CONFIDENCE
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VarietyConfig {
    pub max_variety_bonus: f64,
    pub min_variety_bonus: f64,
    /// Share of the population rating range spanned by the neighbor window
    /// (half on each side). Also sizes the gap scaling window.
    pub max_gap_percent: f64,
    pub min_scaling_factor: f64,
    /// Applied to the population average entropy. Lower values make bonuses easier.
    pub difficulty_multiplier: f64,
    pub percentile_basis: PercentileBasis
}

impl Default for VarietyConfig {
    fn default() -> Self {
        Self {
            max_variety_bonus: constants::MAX_VARIETY_BONUS,
            min_variety_bonus: constants::MIN_VARIETY_BONUS,
            max_gap_percent: constants::MAX_GAP_PERCENT,
            min_scaling_factor: constants::MIN_SCALING_FACTOR,
            difficulty_multiplier: constants::VARIETY_DIFFICULTY_MULTIPLIER,
            percentile_basis: PercentileBasis::Target
        }
    }
}

impl VarietyConfig {
    /// Half-width of the neighbor window for a population spanning `rating_range`.
    pub fn neighbor_window(&self, rating_range: f64) -> f64 {
        rating_range * self.max_gap_percent / 2.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MultiplierConfig {
    pub min_multiplier: f64,
    pub max_multiplier: f64
}

impl Default for MultiplierConfig {
    fn default() -> Self {
        Self {
            min_multiplier: constants::MIN_MULTIPLIER,
            max_multiplier: constants::MAX_MULTIPLIER
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProvenPotentialConfig {
    /// Number of later appearances tracked per trigger
    pub lookback_window: u32,
    /// Fraction of the original gap represented by one threshold
    pub gap_threshold: f64,
    /// Games the established side must have played for a match to trigger
    pub min_established_games: u32
}

impl Default for ProvenPotentialConfig {
    fn default() -> Self {
        Self {
            lookback_window: constants::PP_LOOKBACK_WINDOW,
            gap_threshold: constants::PP_GAP_THRESHOLD,
            min_established_games: constants::PP_MIN_ESTABLISHED_GAMES
        }
    }
}

impl ProvenPotentialConfig {
    /// Number of whole thresholds that fit in the original gap. A threshold
    /// that does not divide 1 leaves the remainder uncounted.
    pub fn threshold_count(&self) -> u32 {
        (1.0 / self.gap_threshold + 1e-9).floor() as u32
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatchUpConfig {
    pub enabled: bool,
    pub apply_to_loser: bool,
    /// Intended population average
    pub target_rating: f64,
    /// Minimum shortfall below the target before any bonus is given
    pub convergence_threshold: f64,
    pub max_bonus: f64
}

impl Default for CatchUpConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            apply_to_loser: false,
            target_rating: constants::CATCH_UP_TARGET_RATING,
            convergence_threshold: constants::CATCH_UP_CONVERGENCE_THRESHOLD,
            max_bonus: constants::CATCH_UP_MAX_BONUS
        }
    }
}

impl RatingConfig {
    /// The parameter set used by the ladder reset scenario.
    pub fn ladder_reset() -> RatingConfig {
        RatingConfig {
            catch_up: Some(CatchUpConfig {
                target_rating: constants::LADDER_RESET_TARGET_RATING,
                convergence_threshold: constants::LADDER_RESET_CONVERGENCE_THRESHOLD,
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let elo = &self.elo;
        check(elo.elo_divisor > 0.0, "elo_divisor", "positive", elo.elo_divisor)?;
        check(
            elo.base_rating_change > 0.0,
            "base_rating_change",
            "positive",
            elo.base_rating_change
        )?;

        let confidence = &self.confidence;
        check(
            confidence.max_confidence_games > 0,
            "max_confidence_games",
            "positive",
            confidence.max_confidence_games as f64
        )?;
        check(
            confidence.max_confidence > 0.0 && confidence.max_confidence <= 1.0,
            "max_confidence",
            "in (0, 1]",
            confidence.max_confidence
        )?;

        let variety = &self.variety;
        if variety.min_variety_bonus > variety.max_variety_bonus {
            return Err(ConfigError::InvertedBounds {
                min_field: "min_variety_bonus",
                max_field: "max_variety_bonus",
                min: variety.min_variety_bonus,
                max: variety.max_variety_bonus
            });
        }
        check(
            variety.min_variety_bonus <= 0.0,
            "min_variety_bonus",
            "at most 0",
            variety.min_variety_bonus
        )?;
        check(
            variety.max_variety_bonus >= 0.0,
            "max_variety_bonus",
            "at least 0",
            variety.max_variety_bonus
        )?;
        check(
            variety.max_gap_percent > 0.0 && variety.max_gap_percent <= 1.0,
            "max_gap_percent",
            "in (0, 1]",
            variety.max_gap_percent
        )?;
        check(
            (0.0..=1.0).contains(&variety.min_scaling_factor),
            "min_scaling_factor",
            "in [0, 1]",
            variety.min_scaling_factor
        )?;
        check(
            variety.difficulty_multiplier > 0.0,
            "difficulty_multiplier",
            "positive",
            variety.difficulty_multiplier
        )?;

        let multiplier = &self.multiplier;
        check(
            multiplier.max_multiplier > 0.0,
            "max_multiplier",
            "positive",
            multiplier.max_multiplier
        )?;
        if multiplier.min_multiplier > multiplier.max_multiplier {
            return Err(ConfigError::InvertedBounds {
                min_field: "min_multiplier",
                max_field: "max_multiplier",
                min: multiplier.min_multiplier,
                max: multiplier.max_multiplier
            });
        }

        let pp = &self.proven_potential;
        check(
            pp.lookback_window > 0,
            "lookback_window",
            "positive",
            pp.lookback_window as f64
        )?;
        check(
            pp.gap_threshold > 0.0 && pp.gap_threshold <= 1.0,
            "gap_threshold",
            "in (0, 1]",
            pp.gap_threshold
        )?;

        if let Some(catch_up) = &self.catch_up {
            check(
                catch_up.convergence_threshold > 0.0,
                "convergence_threshold",
                "positive",
                catch_up.convergence_threshold
            )?;
            check(catch_up.max_bonus >= 0.0, "max_bonus", "at least 0", catch_up.max_bonus)?;
        }

        Ok(())
    }
}
