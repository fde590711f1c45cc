pub mod config;
pub mod scenario;
pub mod summary;

use std::collections::VecDeque;

use indicatif::ProgressBar;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Exp};
use thiserror::Error;
use tracing::info;

use crate::{
    model::{
        config::{ConfigError, RatingConfig},
        ladder_model::{LadderModel, MatchOutcome, ModelError},
        structures::player::Player
    },
    simulation::{
        config::{LateJoinerConfig, SimulationConfig},
        scenario::Scenario,
        summary::SimulationSummary
    }
};

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("no matchup possible between {0} active players")]
    NotEnoughPlayers(usize),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error)
}

/// Players waiting to join, released by match index.
#[derive(Debug, Clone)]
pub enum LateJoinerQueue {
    /// Sorted by planned join time
    Curved(VecDeque<(Player, f64)>),
    Linear {
        queue: VecDeque<Player>,
        join_after: u32,
        interval: u32
    }
}

impl LateJoinerQueue {
    /// Builds the queue for `count` joiners. Curved join times follow an
    /// exponential distribution with mean 30% of the run, capped at 90%.
    pub fn generate<S: Scenario>(
        scenario: &S,
        config: &LateJoinerConfig,
        count: usize,
        num_matches: u32,
        rng: &mut ChaCha8Rng
    ) -> LateJoinerQueue {
        let players: Vec<Player> = (1..=count).map(|k| scenario.generate_late_joiner(k, rng)).collect();

        if !config.curved_join {
            return LateJoinerQueue::Linear {
                queue: players.into(),
                join_after: config.join_after_matches,
                interval: config.join_interval
            };
        }

        let buffer_end = num_matches as f64 * 0.9;
        let lambda = if buffer_end > 0.0 { 3.0 / buffer_end } else { 1.0 };
        let join_times = Exp::new(lambda).ok();

        let mut joiners: Vec<(Player, f64)> = players
            .into_iter()
            .map(|player| {
                let join_time = join_times.map_or(buffer_end, |exp| exp.sample(rng)).min(buffer_end);
                (player, join_time)
            })
            .collect();
        joiners.sort_by(|(_, a), (_, b)| a.total_cmp(b));

        LateJoinerQueue::Curved(joiners.into())
    }

    pub fn len(&self) -> usize {
        match self {
            LateJoinerQueue::Curved(queue) => queue.len(),
            LateJoinerQueue::Linear { queue, .. } => queue.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes and returns everyone due to join before match `match_index` (0-based).
    pub fn due(&mut self, match_index: u32) -> Vec<Player> {
        match self {
            LateJoinerQueue::Curved(queue) => {
                let mut due = Vec::new();
                while queue.front().is_some_and(|(_, t)| *t <= match_index as f64) {
                    if let Some((player, _)) = queue.pop_front() {
                        due.push(player);
                    }
                }
                due
            }
            LateJoinerQueue::Linear {
                queue,
                join_after,
                interval
            } => {
                if match_index >= *join_after && (match_index - *join_after) % *interval == 0 {
                    queue.pop_front().into_iter().collect()
                } else {
                    Vec::new()
                }
            }
        }
    }
}

/// Runs a scenario against the rating model. All randomness comes from one
/// seeded generator, so a run is fully determined by its configuration.
pub struct Simulator<S: Scenario> {
    scenario: S,
    config: SimulationConfig,
    pub model: LadderModel,
    rng: ChaCha8Rng,
    late_joiners: LateJoinerQueue,
    joined_late: usize
}

impl<S: Scenario> Simulator<S> {
    pub fn new(scenario: S, rating_config: RatingConfig, config: SimulationConfig) -> Result<Simulator<S>, SimulationError> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let initial_players = scenario.generate_players(config.initial_player_count(), &mut rng);

        let late_joiner_count = if config.late_joiners.enabled {
            config.late_joiner_count()
        } else {
            0
        };
        let late_joiners = LateJoinerQueue::generate(
            &scenario,
            &config.late_joiners,
            late_joiner_count,
            config.num_matches,
            &mut rng
        );

        let model = LadderModel::new(rating_config, initial_players)?;

        Ok(Simulator {
            scenario,
            config,
            model,
            rng,
            late_joiners,
            joined_late: 0
        })
    }

    pub fn waiting_late_joiners(&self) -> usize {
        self.late_joiners.len()
    }

    /// Plays every configured match, finalizes outstanding proven potential
    /// and summarizes the result.
    pub fn run(&mut self, progress: Option<&ProgressBar>) -> Result<SimulationSummary, SimulationError> {
        info!(
            "Starting {} simulation: {} initial players, {} late joiners, {} matches, seed {}",
            self.scenario.name(),
            self.model.rating_tracker.len(),
            self.late_joiners.len(),
            self.config.num_matches,
            self.config.seed
        );

        for match_index in 0..self.config.num_matches {
            self.admit_late_joiners(match_index);
            self.step()?;

            if let Some(bar) = progress {
                bar.inc(1);
            }
        }

        if let Some(bar) = progress {
            bar.finish_and_clear();
        }

        let final_batches = self.model.finalize_all_pending();
        info!(
            "Simulation complete: {} matches, {} PP batches finalized at end of run",
            self.model.match_count(),
            final_batches.len()
        );

        Ok(SimulationSummary::from_model(
            self.scenario.name(),
            self.config.seed,
            self.joined_late,
            &self.model
        ))
    }

    fn admit_late_joiners(&mut self, match_index: u32) {
        for player in self.late_joiners.due(match_index) {
            info!("Late joiner {} joined before match {}", player.name, match_index + 1);
            self.model.add_player(player);
            self.joined_late += 1;
        }
    }

    /// Selects a matchup, draws the result and feeds it to the model.
    pub fn step(&mut self) -> Result<MatchOutcome, SimulationError> {
        let players: Vec<&Player> = self.model.rating_tracker.leaderboard().collect();
        let (challenger, opponent) = self
            .scenario
            .select_matchup(&players, &mut self.rng)
            .ok_or(SimulationError::NotEnoughPlayers(players.len()))?;

        let challenger = players[challenger];
        let opponent = players[opponent];
        let win_probability = self.scenario.win_probability(challenger, opponent);
        let challenger_won = self.rng.random::<f64>() < win_probability;

        let (winner, loser, winner_probability) = if challenger_won {
            (challenger.name.clone(), opponent.name.clone(), win_probability)
        } else {
            (opponent.name.clone(), challenger.name.clone(), 1.0 - win_probability)
        };

        Ok(self.model.process_match(&winner, &loser, winner_probability)?)
    }
}
