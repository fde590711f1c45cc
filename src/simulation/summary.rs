use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::info;

use crate::{
    model::{ladder_model::LadderModel, structures::pp_batch::PpBatch},
    simulation::SimulationError
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    pub rank: u32,
    pub name: String,
    /// Rounded for display
    pub rating: i64,
    pub target_rating: i32,
    pub games_played: u32,
    /// Unrounded rating minus target
    pub error: f64
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimulationSummary {
    pub scenario: String,
    pub seed: u64,
    pub matches_played: u32,
    pub player_count: usize,
    pub late_joiners: usize,
    pub standings: Vec<Standing>,
    pub mean_absolute_error: f64,
    pub triggers_created: usize,
    pub triggers_finalized: usize,
    pub batches: Vec<PpBatch>
}

impl SimulationSummary {
    pub fn from_model(scenario: &str, seed: u64, late_joiners: usize, model: &LadderModel) -> SimulationSummary {
        let standings: Vec<Standing> = model
            .rating_tracker
            .leaderboard()
            .map(|p| Standing {
                rank: p.global_rank,
                name: p.name.clone(),
                rating: p.rating.round() as i64,
                target_rating: p.target_rating,
                games_played: p.games_played,
                error: p.rating_error()
            })
            .collect();

        SimulationSummary {
            scenario: scenario.to_string(),
            seed,
            matches_played: model.match_count(),
            player_count: standings.len(),
            late_joiners,
            mean_absolute_error: mean_absolute_error(&standings),
            standings,
            triggers_created: model.proven_potential.triggers().len(),
            triggers_finalized: model.proven_potential.finalized_count(),
            batches: model.proven_potential.batches().to_vec()
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<(), SimulationError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        Ok(())
    }

    /// Logs the headline numbers and the top `top` standings.
    pub fn log(&self, top: usize) {
        info!(
            "{} (seed {}): {} matches, {} players ({} late), mean absolute error {:.1}",
            self.scenario,
            self.seed,
            self.matches_played,
            self.player_count,
            self.late_joiners,
            self.mean_absolute_error
        );
        info!(
            "Proven potential: {} triggers, {} finalized in {} batches",
            self.triggers_created,
            self.triggers_finalized,
            self.batches.len()
        );

        info!("{:>4}  {:<16} {:>7} {:>7} {:>6} {:>8}", "Rank", "Player", "Rating", "Target", "Games", "Error");
        for standing in self.standings.iter().take(top) {
            info!(
                "{:>4}  {:<16} {:>7} {:>7} {:>6} {:>+8.1}",
                standing.rank,
                standing.name,
                standing.rating,
                standing.target_rating,
                standing.games_played,
                standing.error
            );
        }
    }
}

fn mean_absolute_error(standings: &[Standing]) -> f64 {
    if standings.is_empty() {
        return 0.0;
    }

    standings.iter().map(|s| s.error.abs()).mean()
}
