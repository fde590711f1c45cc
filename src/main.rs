use clap::Parser;
use ladder_sim::{
    args::Args,
    simulation::{config::LadderConfig, scenario::LadderReset, SimulationError, Simulator},
    utils::progress_utils::progress_bar
};
use tracing::{error, info};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    init_tracing(&args.log_level);

    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(EnvFilter::new(log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

fn run(args: &Args) -> Result<(), SimulationError> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            LadderConfig::from_file(path)?
        }
        None => LadderConfig::default()
    };
    args.apply_overrides(&mut config);
    config.validate()?;

    let num_matches = config.simulation.num_matches;
    let scenario = LadderReset::new(config.rating.elo.starting_rating);
    let mut simulator = Simulator::new(scenario, config.rating, config.simulation)?;

    let progress = if args.quiet {
        None
    } else {
        progress_bar(num_matches as u64, "Simulating matches".to_string())
    };
    let summary = simulator.run(progress.as_ref())?;

    summary.log(10);

    if let Some(path) = &args.output {
        summary.write_json(path)?;
        info!("Summary written to {}", path.display());
    }

    Ok(())
}
