mod accumulator;
mod binning;
mod config;
mod error;
mod run;
mod stopping;

pub use accumulator::{FluenceAccumulator, StepSpan, TrackSegment, segments};
pub use binning::{BinLocation, EnergyBinTable};
pub use config::FluenceConfig;
pub use error::Error;
pub use run::{RunController, RunState};
pub use stopping::{DEFAULT_CUT_ENERGY, StoppingPower, TabulatedStoppingPower};
