//! Track-length estimator for energy-differential particle fluence.
//!
//! A transport engine reports every step a particle takes inside a scoring
//! volume. This crate turns those steps into three energy spectra: the
//! fluence of all electrons and positrons, the fluence of primary electrons
//! only, and the track length of photons. Charged-particle steps are split at
//! the energy-bin edges they cross and each piece is scored as `ΔE / S(E)`,
//! the path length implied by the continuous-slowing-down approximation.
//!
//! # Features
//!
//! - **Energy binning** — Logarithmic or linear bin tables with exact end
//!   edges and half-open bins
//! - **Track-length scoring** — Exact per-bin split of charged-particle steps
//!   using a pluggable stopping-power provider
//! - **Stopping-power tables** — Log-log interpolated per-material tables,
//!   with an embedded liquid-water table
//! - **Run lifecycle** — Checked begin/end calls, normalization by bin width
//!   and output at run end
//! - **Persistence** — Plain-text spectra tables and a binary histogram
//!   container that can be read back
//!
//! # Quick Start
//!
//! ```
//! use tle_fluence::{FluenceConfig, FluenceError, ParticleKind, RunController};
//! use tle_fluence::{SpectrumKind, TabulatedStoppingPower, TransportStep};
//!
//! let config = FluenceConfig {
//!     min_energy: 0.01,
//!     max_energy: 10.0,
//!     bin_count: 30,
//!     save_as_binary: false,
//!     ..Default::default()
//! };
//! let mut run = RunController::new(config, TabulatedStoppingPower::embedded().clone())?;
//!
//! run.begin_run()?;
//! run.begin_event()?;
//! // A primary electron slowing down from 2 MeV to 1.5 MeV in water.
//! let electron = TransportStep::charged(ParticleKind::Electron, 2.0, 1.5, "G4_WATER")
//!     .with_primary(true);
//! run.process_step(&electron)?;
//! // A 1 MeV photon crossing 10 mm of water.
//! run.process_step(&TransportStep::photon(1.0, 10.0, "G4_WATER"))?;
//! run.end_event()?;
//! run.end_run()?;
//!
//! let spectra = run.spectra();
//! assert_eq!(spectra.events(), 1);
//! assert!(spectra.histogram(SpectrumKind::Electron).integral() > 0.0);
//! assert_eq!(
//!     spectra.histogram(SpectrumKind::Electron),
//!     spectra.histogram(SpectrumKind::PrimaryElectron),
//! );
//! # Ok::<(), FluenceError>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`] — Text and binary spectrum files, step traces, output sinks
//! - [`RunController`] — Run lifecycle and output
//! - [`FluenceAccumulator`] — Per-step scoring
//!
//! # Data Types
//!
//! - [`TransportStep`] — One step as reported by the transport engine
//! - [`ParticleKind`] — Photon, electron, positron or other
//! - [`EnergyBinTable`] — Bin edges shared by all spectra
//! - [`HistogramSet`] — The three spectra and the event count of a run
//! - [`SpectrumKind`] — Selects one of the three spectra
//!
//! ## Configuration
//!
//! - [`FluenceConfig`] — Energy range, binning and outputs
//! - [`StoppingPower`] — Stopping-power provider interface
//! - [`TabulatedStoppingPower`] — Table-driven provider

mod fluence;
mod model;

pub mod io;

pub use model::histogram::{Histogram, HistogramSet};
pub use model::step::TransportStep;
pub use model::types::{ParseSpectrumKindError, ParticleKind, SpectrumKind};

pub use fluence::{
    BinLocation, DEFAULT_CUT_ENERGY, EnergyBinTable, FluenceAccumulator, FluenceConfig,
    RunController, RunState, StepSpan, StoppingPower, TabulatedStoppingPower, TrackSegment,
    segments,
};

pub use fluence::Error as FluenceError;
