//! Agora engine binary.
//!
//! Loads configuration, builds the economy, runs it to completion and
//! writes result files. Command line flags override the matching
//! configuration keys.
//!
//! # Modules
//!
//! - [`error`] -- top-level error type
//! - [`export`] -- CSV and JSON result files plus the progress observer

mod error;
mod export;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use agora_agents::CompletionBackend;
use agora_core::{Simulation, SimulationConfig};

use crate::error::EngineError;
use crate::export::{ResultsObserver, ResultsWriter};

/// Command line arguments for the engine.
#[derive(Parser, Debug)]
#[command(name = "agora-engine")]
#[command(about = "Run the Agora agent economy simulation")]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(long, default_value = "agora-config.yaml")]
    config: PathBuf,

    /// Override the number of rounds.
    #[arg(long)]
    rounds: Option<u64>,

    /// Override the random seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of households.
    #[arg(long)]
    households: Option<u32>,

    /// Override the number of businesses.
    #[arg(long)]
    businesses: Option<u32>,

    /// Override the results directory.
    #[arg(long)]
    results: Option<PathBuf>,

    /// Do not write result files.
    #[arg(long)]
    no_save: bool,

    /// Back households with the configured language model.
    #[arg(long)]
    llm: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Agora engine starting");

    run(&args)?;
    Ok(())
}

fn run(args: &Args) -> Result<(), EngineError> {
    let mut config = load_config(&args.config)?;
    apply_args(&mut config, args);
    config.validate()?;

    info!(
        households = config.simulation.households,
        businesses = config.simulation.businesses,
        rounds = config.simulation.rounds,
        seed = config.simulation.seed,
        llm = config.llm.enabled,
        "configuration loaded"
    );

    let backend: Option<Arc<dyn CompletionBackend>> = if config.llm.enabled {
        Some(agora_llm::create_backend(&config.llm)?)
    } else {
        None
    };

    let writer = if config.output.save_results {
        let writer = ResultsWriter::create(&config.output.results_path)?;
        info!(dir = %writer.dir().display(), "saving results");
        Some(writer)
    } else {
        None
    };
    let mut observer = ResultsObserver::new(writer, config.simulation.plot_interval);

    let mut simulation = Simulation::new(config, backend)?;
    simulation.set_running(true);
    let rounds = simulation.run_with(None, &mut observer)?;

    let state = simulation.state();
    if let Some(writer) = observer.writer() {
        writer.write_final(&state)?;
    }

    let final_gini = state.gini_history.last().copied().unwrap_or_default();
    info!(
        rounds,
        phase = ?simulation.phase(),
        gini = final_gini,
        ubi = state.policies.ubi,
        "simulation complete"
    );
    Ok(())
}

/// Load configuration from `path`, falling back to defaults when the file
/// does not exist.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if path.exists() {
        info!(path = %path.display(), "loading configuration");
        Ok(SimulationConfig::from_file(path)?)
    } else {
        warn!(path = %path.display(), "config file not found, using defaults");
        let mut config = SimulationConfig::default();
        config.llm.apply_env_overrides();
        Ok(config)
    }
}

fn apply_args(config: &mut SimulationConfig, args: &Args) {
    if let Some(rounds) = args.rounds {
        config.simulation.rounds = rounds;
    }
    if let Some(seed) = args.seed {
        config.simulation.seed = seed;
    }
    if let Some(households) = args.households {
        config.simulation.households = households;
    }
    if let Some(businesses) = args.businesses {
        config.simulation.businesses = businesses;
    }
    if let Some(results) = &args.results {
        config.output.results_path.clone_from(results);
    }
    if args.no_save {
        config.output.save_results = false;
    }
    if args.llm {
        config.llm.enabled = true;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = Args::parse_from([
            "agora-engine",
            "--rounds",
            "25",
            "--seed",
            "9",
            "--households",
            "12",
            "--results",
            "out",
            "--no-save",
        ]);
        let mut config = SimulationConfig::default();
        apply_args(&mut config, &args);
        assert_eq!(config.simulation.rounds, 25);
        assert_eq!(config.simulation.seed, 9);
        assert_eq!(config.simulation.households, 12);
        assert_eq!(config.simulation.businesses, 10);
        assert_eq!(config.output.results_path, PathBuf::from("out"));
        assert!(!config.output.save_results);
        assert!(!config.llm.enabled);
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let config = load_config(Path::new("/nonexistent/agora-config.yaml")).unwrap();
        assert_eq!(config.simulation.households, 200);
    }

    #[test]
    fn run_writes_results_without_llm() {
        let scratch = tempfile::tempdir().unwrap();
        let results = scratch.path().join("results");
        let args = Args::parse_from([
            "agora-engine",
            "--config",
            "/nonexistent/agora-config.yaml",
            "--rounds",
            "4",
            "--households",
            "5",
            "--businesses",
            "1",
            "--results",
            results.to_str().unwrap(),
        ]);
        run(&args).unwrap();
        assert!(results.join("wealth_3.csv").is_file());
        assert!(results.join("gini.csv").is_file());
        assert!(results.join("state.json").is_file());
    }
}
