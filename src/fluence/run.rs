//! Run lifecycle around the accumulator.
//!
//! A [`RunController`] owns everything one run needs: the configuration, the
//! bin table, the spectra, the accumulator and the output sinks. Lifecycle
//! calls are checked against [`RunState`] so that a host calling them out of
//! order gets an error instead of silently wrong spectra.

use super::accumulator::FluenceAccumulator;
use super::binning::EnergyBinTable;
use super::config::FluenceConfig;
use super::error::Error;
use super::stopping::StoppingPower;
use crate::io::sink::{BinarySink, SpectrumSink, TextSink};
use crate::model::histogram::HistogramSet;
use crate::model::step::TransportStep;
use std::fmt;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Configured,
    Running,
    Finalized,
    /// A step failed with a fatal error; the spectra are discarded unless a
    /// new run is started.
    Aborted,
}

impl RunState {
    pub fn name(&self) -> &'static str {
        match self {
            RunState::Idle => "idle",
            RunState::Configured => "configured",
            RunState::Running => "running",
            RunState::Finalized => "finalized",
            RunState::Aborted => "aborted",
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Drives one scoring run: begin, events of steps, end.
///
/// A controller has a single writer. Use one controller per worker thread,
/// and serialize the calls when several threads share one.
///
/// A step that fails to score (out-of-range energy, missing stopping power,
/// malformed step) moves the run to [`RunState::Aborted`]. Every call except
/// [`RunController::begin_run`] is then rejected and nothing is saved.
///
/// # Examples
///
/// ```
/// use tle_fluence::{FluenceConfig, ParticleKind, RunController, RunState, TransportStep};
///
/// let config = FluenceConfig {
///     min_energy: 0.1,
///     max_energy: 10.0,
///     bin_count: 10,
///     save_as_binary: false,
///     ..Default::default()
/// };
/// let stopping = |_e: f64, _p: ParticleKind, _m: &str| Some(2.0);
/// let mut run = RunController::new(config, stopping)?;
///
/// run.begin_run()?;
/// run.begin_event()?;
/// run.process_step(&TransportStep::charged(ParticleKind::Electron, 5.0, 4.0, "G4_WATER"))?;
/// run.end_event()?;
/// run.end_run()?;
///
/// assert_eq!(run.state(), RunState::Finalized);
/// assert_eq!(run.spectra().events(), 1);
/// # Ok::<(), tle_fluence::FluenceError>(())
/// ```
pub struct RunController<S> {
    config: FluenceConfig,
    table: EnergyBinTable,
    spectra: HistogramSet,
    accumulator: FluenceAccumulator<S>,
    sinks: Vec<Box<dyn SpectrumSink + Send>>,
    state: RunState,
}

impl<S: StoppingPower> RunController<S> {
    /// Validates `config` and opens the sinks it enables.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for invalid settings and
    /// [`Error::Output`] when an output file cannot be created.
    pub fn new(config: FluenceConfig, stopping: S) -> Result<Self, Error> {
        let table = config.bin_table()?;
        let mut sinks: Vec<Box<dyn SpectrumSink + Send>> = Vec::new();
        if config.save_as_binary {
            sinks.push(Box::new(BinarySink::create(&config.output)?));
        }
        if config.save_as_text {
            sinks.push(Box::new(TextSink::new(&config.output)?));
        }
        Ok(Self::assemble(config, table, stopping, sinks))
    }

    /// Like [`RunController::new`], but writes to `sinks` instead of the
    /// sinks named by the configuration.
    pub fn with_sinks(
        config: FluenceConfig,
        stopping: S,
        sinks: Vec<Box<dyn SpectrumSink + Send>>,
    ) -> Result<Self, Error> {
        let table = config.energy_bins()?;
        Ok(Self::assemble(config, table, stopping, sinks))
    }

    fn assemble(
        config: FluenceConfig,
        table: EnergyBinTable,
        stopping: S,
        sinks: Vec<Box<dyn SpectrumSink + Send>>,
    ) -> Self {
        debug!(
            min_energy = table.min_energy(),
            max_energy = table.max_energy(),
            bins = table.bin_count(),
            log_scale = table.is_log_scale(),
            sinks = sinks.len(),
            "configured fluence run"
        );
        Self {
            spectra: HistogramSet::new(&table),
            accumulator: FluenceAccumulator::new(stopping),
            config,
            table,
            sinks,
            state: RunState::Configured,
        }
    }

    /// Starts a run with zeroed spectra. Allowed again after a run ended or
    /// was aborted.
    pub fn begin_run(&mut self) -> Result<(), Error> {
        match self.state {
            RunState::Configured | RunState::Finalized | RunState::Aborted => {
                self.spectra.reset();
                self.state = RunState::Running;
                debug!("fluence run started");
                Ok(())
            }
            state => Err(transition(state, "begin a run")),
        }
    }

    pub fn begin_event(&mut self) -> Result<(), Error> {
        self.expect_running("begin an event")?;
        trace!(event = self.spectra.events(), "event started");
        Ok(())
    }

    /// Scores one step into the spectra.
    ///
    /// # Errors
    ///
    /// Any scoring error aborts the run before it is returned.
    pub fn process_step(&mut self, step: &TransportStep<'_>) -> Result<(), Error> {
        self.expect_running("process a step")?;
        let result = self
            .accumulator
            .process(&self.table, &mut self.spectra, step);
        if let Err(e) = &result {
            warn!(error = %e, events = self.spectra.events(), "fluence run aborted");
            self.state = RunState::Aborted;
        }
        result
    }

    pub fn end_event(&mut self) -> Result<(), Error> {
        self.expect_running("end an event")?;
        self.spectra.record_event();
        trace!(events = self.spectra.events(), "event ended");
        Ok(())
    }

    /// Normalizes the spectra by bin width and hands them to every sink.
    ///
    /// The run is finalized even when a sink fails; the first failure is
    /// returned after all sinks have been tried.
    pub fn end_run(&mut self) -> Result<(), Error> {
        self.expect_running("end the run")?;

        let events = self.spectra.events();
        if events == 0 {
            warn!("fluence run ended without any event");
        }
        self.spectra.scale_by_bin_width();
        self.state = RunState::Finalized;
        debug!(events, "fluence run finalized");

        let mut first_error = None;
        for sink in &mut self.sinks {
            match sink.save(&self.spectra) {
                Ok(()) => debug!(sink = %sink.describe(), "spectra saved"),
                Err(e) => {
                    warn!(sink = %sink.describe(), error = %e, "failed to save spectra");
                    first_error.get_or_insert(e);
                }
            }
        }
        match first_error {
            Some(e) => Err(Error::Output(e)),
            None => Ok(()),
        }
    }

    fn expect_running(&self, action: &'static str) -> Result<(), Error> {
        match self.state {
            RunState::Running => Ok(()),
            state => Err(transition(state, action)),
        }
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    #[inline]
    pub fn table(&self) -> &EnergyBinTable {
        &self.table
    }

    #[inline]
    pub fn spectra(&self) -> &HistogramSet {
        &self.spectra
    }

    #[inline]
    pub fn config(&self) -> &FluenceConfig {
        &self.config
    }

    /// Sinks the spectra are written to at run end.
    pub fn sinks(&self) -> impl Iterator<Item = &(dyn SpectrumSink + Send + 'static)> {
        self.sinks.iter().map(|s| s.as_ref())
    }
}

impl<S> fmt::Debug for RunController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunController")
            .field("state", &self.state)
            .field("bins", &self.table.bin_count())
            .field("events", &self.spectra.events())
            .field("sinks", &self.sinks)
            .finish()
    }
}

fn transition(state: RunState, action: &'static str) -> Error {
    Error::InvalidTransition {
        state: state.name(),
        action,
    }
}
