use rand::{
    distr::{weighted::WeightedIndex, Distribution},
    seq::IndexedRandom,
    Rng, RngCore
};
use rand_distr::StandardNormal;

use crate::model::structures::player::Player;

/// What a simulated ladder looks like: who plays, who gets paired, and who
/// wins. The rating model never sees any of this beyond match results.
pub trait Scenario {
    fn name(&self) -> &str;

    fn generate_players(&self, count: usize, rng: &mut dyn RngCore) -> Vec<Player>;

    /// Player joining after the start. `index` starts at 1.
    fn generate_late_joiner(&self, index: usize, rng: &mut dyn RngCore) -> Player;

    /// Indices of the challenger and opponent in `players`. `None` when no
    /// match can be made.
    fn select_matchup(&self, players: &[&Player], rng: &mut dyn RngCore) -> Option<(usize, usize)>;

    /// Probability that `player` beats `opponent`.
    fn win_probability(&self, player: &Player, opponent: &Player) -> f64;
}

const TARGET_MEAN: f64 = 1700.0;
const TARGET_STD_DEV: f64 = 300.0;
const TARGET_MIN: i32 = 1000;
const TARGET_MAX: i32 = 2400;
const EXTREME_PLAYERS: usize = 10;
const MAX_MATCH_GAP_PERCENT: f64 = 0.4;

/// Every player starts from the same rating after a reset while their true
/// skill follows a bell curve. Stronger players tend to be more active.
pub struct LadderReset {
    starting_rating: f64
}

impl LadderReset {
    pub fn new(starting_rating: f64) -> LadderReset {
        LadderReset { starting_rating }
    }

    fn target_rating(rng: &mut dyn RngCore) -> i32 {
        let z: f64 = rng.sample(StandardNormal);

        ((TARGET_MEAN + z * TARGET_STD_DEV).round() as i32).clamp(TARGET_MIN, TARGET_MAX)
    }

    fn activity_weight(target_rating: i32, rng: &mut dyn RngCore) -> f64 {
        let normalized_skill = (target_rating - TARGET_MIN) as f64 / (TARGET_MAX - TARGET_MIN) as f64;
        let base_activity = 0.5 + normalized_skill * 2.5;

        // Most players vary a little, some are outliers in either direction
        let factor = if rng.random::<f64>() < 0.7 {
            rng.random_range(0.8..1.2)
        } else {
            rng.random_range(0.5..1.5)
        };

        (base_activity * factor).clamp(0.3, 4.5)
    }
}

impl Scenario for LadderReset {
    fn name(&self) -> &str {
        "Ladder Reset"
    }

    fn generate_players(&self, count: usize, rng: &mut dyn RngCore) -> Vec<Player> {
        let mut targets: Vec<i32> = (0..count).map(|_| Self::target_rating(rng)).collect();

        // Guarantee both tails are populated
        let half = EXTREME_PLAYERS / 2;
        for (i, target) in targets.iter_mut().enumerate().take(EXTREME_PLAYERS) {
            *target = if i < half {
                rng.random_range(2200..=2400)
            } else {
                rng.random_range(1000..=1200)
            };
        }

        targets
            .into_iter()
            .enumerate()
            .map(|(i, target)| {
                let activity = Self::activity_weight(target, rng);
                Player::new(format!("Player_{}", i + 1), self.starting_rating, target, activity)
            })
            .collect()
    }

    fn generate_late_joiner(&self, index: usize, rng: &mut dyn RngCore) -> Player {
        let target = Self::target_rating(rng);

        Player::new(format!("LateJoiner_{}", index), self.starting_rating, target, 1.0)
    }

    fn select_matchup(&self, players: &[&Player], rng: &mut dyn RngCore) -> Option<(usize, usize)> {
        if players.len() < 2 {
            return None;
        }

        let activity = WeightedIndex::new(players.iter().map(|p| p.activity_weight)).ok()?;
        let challenger = activity.sample(rng);

        let (lowest, highest) = players
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), p| (lo.min(p.target_rating), hi.max(p.target_rating)));
        let max_gap = (highest - lowest) as f64 * MAX_MATCH_GAP_PERCENT;

        let (candidates, weights): (Vec<usize>, Vec<f64>) = players
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != challenger)
            .filter_map(|(i, opponent)| {
                let gap = (players[challenger].target_rating - opponent.target_rating).abs() as f64;
                if max_gap > 0.0 && gap <= max_gap {
                    Some((i, 1.0 - gap / max_gap))
                } else {
                    None
                }
            })
            .unzip();

        // Weights are all zero when the only candidates sit exactly at the gap limit
        let opponent = match WeightedIndex::new(&weights) {
            Ok(acceptance) => candidates[acceptance.sample(rng)],
            Err(_) => {
                let others: Vec<usize> = (0..players.len()).filter(|i| *i != challenger).collect();
                *others.choose(rng)?
            }
        };

        Some((challenger, opponent))
    }

    fn win_probability(&self, player: &Player, opponent: &Player) -> f64 {
        let rating_diff = (player.target_rating - opponent.target_rating) as f64;

        1.0 / (1.0 + 10f64.powf(-rating_diff / 400.0))
    }
}
