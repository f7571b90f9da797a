//! Result files written to the configured results directory.
//!
//! Layout of a results directory:
//!
//! - `wealth_{round}.csv` -- household wealth after each round (`agent_id,wealth`)
//! - `{good}_prices.csv` -- one recorded price per round (`price`)
//! - `gini.csv` -- household Gini coefficient per round (`gini`)
//! - `state.json` -- the latest [`StateSnapshot`]

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use agora_agents::Agent;
use agora_core::{Market, RoundObserver, SimulationState};
use agora_types::{RoundSummary, StateSnapshot};

/// Errors raised while writing result files.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// A file or directory could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// The path being written.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The state snapshot could not be serialized.
    #[error("failed to serialize state snapshot: {source}")]
    Json {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Writes CSV and JSON result files into a single directory.
#[derive(Debug, Clone)]
pub struct ResultsWriter {
    dir: PathBuf,
}

impl ResultsWriter {
    /// Open a writer over `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] if the directory cannot be created.
    pub fn create(dir: &Path) -> Result<Self, ExportError> {
        fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    /// The directory result files are written into.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write `wealth_{round}.csv` for the given households.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] on any write failure.
    pub fn write_wealth(&self, round: u64, households: &[Agent]) -> Result<PathBuf, ExportError> {
        let path = self.dir.join(format!("wealth_{round}.csv"));
        write_lines(&path, |out| {
            writeln!(out, "agent_id,wealth")?;
            for household in households {
                writeln!(out, "{},{}", household.id(), household.wealth())?;
            }
            Ok(())
        })?;
        Ok(path)
    }

    /// Write one `{good}_prices.csv` per good in the market.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] on any write failure.
    pub fn write_price_histories(&self, market: &Market) -> Result<Vec<PathBuf>, ExportError> {
        let mut written = Vec::new();
        for (good, history) in market.histories() {
            let path = self.dir.join(format!("{good}_prices.csv"));
            write_column(&path, "price", history)?;
            written.push(path);
        }
        Ok(written)
    }

    /// Write `gini.csv` from the per-round Gini history.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Io`] on any write failure.
    pub fn write_gini(&self, history: &[f64]) -> Result<PathBuf, ExportError> {
        let path = self.dir.join("gini.csv");
        write_column(&path, "gini", history)?;
        Ok(path)
    }

    /// Write `state.json`, replacing any previous snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::Json`] if serialization fails or
    /// [`ExportError::Io`] if the file cannot be written.
    pub fn write_state(&self, snapshot: &StateSnapshot) -> Result<PathBuf, ExportError> {
        let path = self.dir.join("state.json");
        let json = serde_json::to_string_pretty(snapshot)?;
        fs::write(&path, json).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }

    /// Write the end-of-run files: price histories, Gini history and state.
    ///
    /// # Errors
    ///
    /// Returns the first export failure.
    pub fn write_final(&self, state: &SimulationState<'_>) -> Result<(), ExportError> {
        let prices = self.write_price_histories(state.market)?;
        self.write_gini(state.gini_history)?;
        self.write_state(&state.to_snapshot())?;
        info!(
            dir = %self.dir.display(),
            price_files = prices.len(),
            rounds = state.round,
            "results written"
        );
        Ok(())
    }
}

fn write_column(path: &Path, header: &str, values: &[f64]) -> Result<(), ExportError> {
    write_lines(path, |out| {
        writeln!(out, "{header}")?;
        for value in values {
            writeln!(out, "{value}")?;
        }
        Ok(())
    })
}

fn write_lines(
    path: &Path,
    body: impl FnOnce(&mut BufWriter<File>) -> io::Result<()>,
) -> Result<(), ExportError> {
    let wrap = |source: io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(wrap)?;
    let mut out = BufWriter::new(file);
    body(&mut out).map_err(wrap)?;
    out.flush().map_err(wrap)
}

// ---------------------------------------------------------------------------
// Observer
// ---------------------------------------------------------------------------

/// Round observer that logs progress and persists results as the run goes.
///
/// Every round it writes the household wealth file. Every `plot_interval`
/// rounds it logs a progress line and refreshes `state.json`. With no
/// writer it only logs.
#[derive(Debug)]
pub struct ResultsObserver {
    writer: Option<ResultsWriter>,
    plot_interval: u64,
}

impl ResultsObserver {
    /// Create an observer. A zero `plot_interval` is treated as 1.
    pub const fn new(writer: Option<ResultsWriter>, plot_interval: u64) -> Self {
        let plot_interval = if plot_interval == 0 { 1 } else { plot_interval };
        Self {
            writer,
            plot_interval,
        }
    }

    /// The writer, if results are being saved.
    pub const fn writer(&self) -> Option<&ResultsWriter> {
        self.writer.as_ref()
    }

    fn is_checkpoint(&self, round: u64) -> bool {
        round.checked_rem(self.plot_interval) == Some(0)
    }
}

impl RoundObserver for ResultsObserver {
    type Error = ExportError;

    fn on_round(
        &mut self,
        summary: &RoundSummary,
        state: &SimulationState<'_>,
    ) -> Result<(), Self::Error> {
        debug!(
            round = summary.round,
            news = %summary.news,
            buys = summary.buys,
            sells = summary.sells,
            "round complete"
        );

        if let Some(writer) = &self.writer {
            writer.write_wealth(summary.round, state.households)?;
        }

        if self.is_checkpoint(summary.round) {
            info!(
                round = summary.round,
                max_rounds = state.max_rounds,
                gini = summary.gini,
                ubi = summary.policies.ubi,
                shock = summary.shock,
                "progress"
            );
            if let Some(writer) = &self.writer {
                writer.write_state(&state.to_snapshot())?;
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use agora_core::{Simulation, SimulationConfig};

    use super::*;

    fn small_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.simulation.households = 4;
        config.simulation.businesses = 1;
        config.simulation.rounds = 6;
        config.simulation.plot_interval = 3;
        config
    }

    #[test]
    fn creates_missing_directory() {
        let scratch = tempfile::tempdir().unwrap();
        let dir = scratch.path().join("nested").join("results");
        let writer = ResultsWriter::create(&dir).unwrap();
        assert!(dir.is_dir());
        assert_eq!(writer.dir(), dir.as_path());
    }

    #[test]
    fn gini_file_has_header_and_one_row_per_round() {
        let scratch = tempfile::tempdir().unwrap();
        let writer = ResultsWriter::create(scratch.path()).unwrap();
        let path = writer.write_gini(&[0.0, 0.125, 0.25]).unwrap();
        let contents = fs::read_to_string(path).unwrap();
        assert_eq!(contents, "gini\n0\n0.125\n0.25\n");
    }

    #[test]
    fn observer_writes_wealth_every_round_and_state_at_checkpoints() {
        let scratch = tempfile::tempdir().unwrap();
        let writer = ResultsWriter::create(scratch.path()).unwrap();
        let mut observer = ResultsObserver::new(Some(writer), 3);

        let mut sim = Simulation::new(small_config(), None).unwrap();
        sim.set_running(true);
        let steps = sim.run_with(None, &mut observer).unwrap();
        assert_eq!(steps, 6);

        for round in 0..6 {
            let path = scratch.path().join(format!("wealth_{round}.csv"));
            let contents = fs::read_to_string(path).unwrap();
            let mut lines = contents.lines();
            assert_eq!(lines.next(), Some("agent_id,wealth"));
            assert_eq!(lines.count(), 4);
        }
        assert!(scratch.path().join("state.json").is_file());
    }

    #[test]
    fn final_export_writes_prices_gini_and_state() {
        let scratch = tempfile::tempdir().unwrap();
        let writer = ResultsWriter::create(scratch.path()).unwrap();
        let mut sim = Simulation::new(small_config(), None).unwrap();
        sim.set_running(true);
        sim.run(None);

        writer.write_final(&sim.state()).unwrap();

        let prices = fs::read_to_string(scratch.path().join("GoodA_prices.csv")).unwrap();
        assert_eq!(prices.lines().next(), Some("price"));
        assert_eq!(prices.lines().count(), 7);

        let gini = fs::read_to_string(scratch.path().join("gini.csv")).unwrap();
        assert_eq!(gini.lines().count(), 7);

        let state: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(scratch.path().join("state.json")).unwrap())
                .unwrap();
        assert_eq!(state["round"], 6);
        assert_eq!(state["phase"], "done");
    }

    #[test]
    fn observer_without_writer_only_logs() {
        let mut observer = ResultsObserver::new(None, 0);
        assert!(observer.writer().is_none());
        let mut sim = Simulation::new(small_config(), None).unwrap();
        sim.set_running(true);
        assert_eq!(sim.run_with(Some(2), &mut observer).unwrap(), 2);
    }
}
