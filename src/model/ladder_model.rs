use indexmap::IndexMap;
use thiserror::Error;
use tracing::debug;

use crate::model::{
    confidence::confidence,
    config::{ConfigError, RatingConfig},
    proven_potential::ProvenPotentialTracker,
    rating_change::{rating_change, RatingChangeInput},
    rating_tracker::RatingTracker,
    structures::{match_record::MatchRecord, player::Player, pp_batch::PpBatch, pp_trigger::TriggerId},
    variety::{variety_bonus, VarietyInput}
};

#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("unknown player {0}")]
    UnknownPlayer(String),

    #[error("{0} cannot play against themselves")]
    SelfMatch(String),

    #[error("match {found} registered out of order, expected {expected}")]
    OutOfOrder { expected: u32, found: u32 }
}

/// Everything that happened as a result of one match.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// The match from the winner's perspective
    pub record: MatchRecord,
    pub trigger: Option<TriggerId>,
    /// Proven potential batches finalized after this match
    pub batches: Vec<PpBatch>
}

pub struct LadderModel {
    pub config: RatingConfig,
    pub rating_tracker: RatingTracker,
    pub proven_potential: ProvenPotentialTracker,
    match_count: u32
}

impl LadderModel {
    pub fn new(config: RatingConfig, initial_players: Vec<Player>) -> Result<LadderModel, ConfigError> {
        config.validate()?;

        let mut tracker = RatingTracker::new();
        for player in initial_players {
            tracker.insert_player(player, None);
        }

        Ok(LadderModel {
            proven_potential: ProvenPotentialTracker::new(&config),
            rating_tracker: tracker,
            config,
            match_count: 0
        })
    }

    /// Adds a player between matches. Their ledger starts at the current match count.
    pub fn add_player(&mut self, player: Player) {
        let match_number = Some(self.match_count).filter(|n| *n > 0);
        self.rating_tracker.insert_player(player, match_number);
    }

    /// Number of matches registered so far. Also the number of the latest match.
    pub fn match_count(&self) -> u32 {
        self.match_count
    }

    pub fn confidence(&self, name: &str) -> Option<f64> {
        self.rating_tracker
            .get_player(name)
            .map(|p| confidence(&self.config.confidence, p.games_played))
    }

    /// # Match Processing
    ///
    /// Steps:
    /// 1. Compute the rating change against the current population, see [`LadderModel::compute_match`].
    /// 2. Apply it and record the match, creating a proven potential trigger if it qualifies.
    /// 3. Advance proven potential tracking, finalizing any batches that became ready.
    pub fn process_match(&mut self, winner: &str, loser: &str, win_probability: f64) -> Result<MatchOutcome, ModelError> {
        let record = self.compute_match(winner, loser, win_probability)?;
        let match_number = record.match_number;

        let trigger = self.register_match(record.clone())?;
        let batches = self.advance_pp_tracking(match_number);

        Ok(MatchOutcome {
            record,
            trigger,
            batches
        })
    }

    /// Builds the record of the next match without applying it.
    /// `win_probability` is the chance the winner was given to win.
    pub fn compute_match(&self, winner: &str, loser: &str, win_probability: f64) -> Result<MatchRecord, ModelError> {
        if winner == loser {
            return Err(ModelError::SelfMatch(winner.to_string()));
        }

        let winner_player = self
            .rating_tracker
            .get_player(winner)
            .ok_or_else(|| ModelError::UnknownPlayer(winner.to_string()))?;
        let loser_player = self
            .rating_tracker
            .get_player(loser)
            .ok_or_else(|| ModelError::UnknownPlayer(loser.to_string()))?;

        let population = self.rating_tracker.population_snapshot(&self.config.variety);
        let basis = self.config.variety.percentile_basis;
        let no_history = IndexMap::new();

        let winner_confidence = confidence(&self.config.confidence, winner_player.games_played);
        let loser_confidence = confidence(&self.config.confidence, loser_player.games_played);

        let winner_variety = variety_bonus(
            &self.config.variety,
            &VarietyInput {
                player_rating: winner_player.rating,
                opponent_counts: self.rating_tracker.opponent_counts(winner).unwrap_or(&no_history),
                games_played: winner_player.games_played,
                percentile: self.rating_tracker.percentile(winner, basis)
            },
            &population
        );
        let loser_variety = variety_bonus(
            &self.config.variety,
            &VarietyInput {
                player_rating: loser_player.rating,
                opponent_counts: self.rating_tracker.opponent_counts(loser).unwrap_or(&no_history),
                games_played: loser_player.games_played,
                percentile: self.rating_tracker.percentile(loser, basis)
            },
            &population
        );

        let change = rating_change(
            &self.config,
            &RatingChangeInput {
                winner_rating: winner_player.rating,
                loser_rating: loser_player.rating,
                winner_confidence,
                loser_confidence,
                winner_variety,
                loser_variety,
                rating_range: population.rating_range
            }
        );

        Ok(MatchRecord {
            match_number: self.match_count + 1,
            player: winner.to_string(),
            opponent: loser.to_string(),
            player_rating_before: winner_player.rating,
            opponent_rating_before: loser_player.rating,
            player_confidence: winner_confidence,
            opponent_confidence: loser_confidence,
            player_games_before: winner_player.games_played,
            opponent_games_before: loser_player.games_played,
            player_won: true,
            win_probability,
            player_rating_change: change.winner_delta,
            opponent_rating_change: change.loser_delta,
            player_variety_bonus: winner_variety,
            opponent_variety_bonus: loser_variety,
            player_multiplier: change.winner_multiplier,
            opponent_multiplier: change.loser_multiplier,
            proven_potential: None
        })
    }

    /// Applies a computed match to the roster and appends it to the history.
    /// Match numbers must be registered strictly in order.
    pub fn register_match(&mut self, record: MatchRecord) -> Result<Option<TriggerId>, ModelError> {
        let expected = self.match_count + 1;
        if record.match_number != expected {
            return Err(ModelError::OutOfOrder {
                expected,
                found: record.match_number
            });
        }

        for name in [&record.player, &record.opponent] {
            if !self.rating_tracker.contains(name) {
                return Err(ModelError::UnknownPlayer(name.clone()));
            }
        }

        debug!(
            "Match {}: {} {:+.2}, {} {:+.2}",
            record.match_number,
            record.player,
            record.player_rating_change,
            record.opponent,
            record.opponent_rating_change
        );

        let trigger = self.proven_potential.register_match(&record);
        self.rating_tracker.apply_match(record);
        self.match_count = expected;

        Ok(trigger)
    }

    pub fn advance_pp_tracking(&mut self, current_match_number: u32) -> Vec<PpBatch> {
        self.proven_potential
            .advance(current_match_number, &mut self.rating_tracker)
    }

    pub fn finalize_all_pending(&mut self) -> Vec<PpBatch> {
        self.proven_potential.finalize_all_pending(&mut self.rating_tracker)
    }
}
