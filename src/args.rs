use std::path::PathBuf;

use clap::Parser;

use crate::simulation::config::LadderConfig;

#[derive(Parser, Clone)]
#[command(
    display_name = "Ladder Simulator",
    long_about = "Simulates a rating ladder to check that the rating algorithm converges players \
    toward their true skill"
)]
pub struct Args {
    /// JSON file with `rating` and `simulation` sections. Missing values use
    /// the ladder reset defaults.
    #[arg(short, long, env = "LADDER_CONFIG", help = "Path to a JSON configuration file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, env = "LADDER_SEED", help = "Seed for the random number generator")]
    pub seed: Option<u64>,

    #[arg(short, long, help = "Number of matches to simulate")]
    pub matches: Option<u32>,

    #[arg(short, long, help = "Total number of players, including late joiners")]
    pub players: Option<usize>,

    /// Every player is present from the first match
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub no_late_joiners: bool,

    #[arg(short, long, help = "Write the run summary as JSON to this path")]
    pub output: Option<PathBuf>,

    /// Hides the progress bar
    #[arg(short, long, action = clap::ArgAction::SetTrue)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(
        short,
        long,
        env = "RUST_LOG",
        default_value = "info",
        value_parser = ["trace", "debug", "info", "warn", "error"],
        help = "Sets the logging verbosity"
    )]
    pub log_level: String
}

impl Args {
    /// Applies the flags given on the command line on top of `config`.
    pub fn apply_overrides(&self, config: &mut LadderConfig) {
        if let Some(seed) = self.seed {
            config.simulation.seed = seed;
        }
        if let Some(matches) = self.matches {
            config.simulation.num_matches = matches;
        }
        if let Some(players) = self.players {
            config.simulation.num_players = players;
        }
        if self.no_late_joiners {
            config.simulation.late_joiners.enabled = false;
        }
    }
}
