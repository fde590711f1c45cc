use std::sync::Once;

use ladder_sim::simulation::config::{LateJoinerConfig, SimulationConfig};

static INIT: Once = Once::new();

/// Initialize test environment with RUST_LOG=WARN
pub fn init_test_env() {
    INIT.call_once(|| {
        std::env::set_var("RUST_LOG", "warn");
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .try_init();
    });
}

/// A run small enough for tests but long enough for proven potential to fire.
pub fn small_simulation(seed: u64, late_joiners: bool) -> SimulationConfig {
    SimulationConfig {
        seed,
        num_players: 30,
        num_matches: 1500,
        late_joiners: LateJoinerConfig {
            enabled: late_joiners,
            ..Default::default()
        }
    }
}
