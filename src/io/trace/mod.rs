//! Line-oriented step traces recorded from a transport engine.
//!
//! ```text
//! # particle E_start E_end length weight primary material
//! step e- 1.2 0.9 0.3 1 1 G4_WATER
//! step gamma 2.0 2.0 5.0 1 0 G4_WATER
//! event
//! ```
//!
//! Blank lines and `#` comments are ignored. `event` closes the current
//! event; energies are in MeV and lengths in mm.

mod reader;

pub use reader::{TraceReader, read};

use crate::model::step::TransportStep;
use crate::model::types::ParticleKind;

/// Owned form of a [`TransportStep`] as parsed from a trace line.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceStep {
    pub particle: ParticleKind,
    pub start_energy: f64,
    pub end_energy: f64,
    pub step_length: f64,
    pub weight: f64,
    pub is_primary: bool,
    pub material: String,
}

impl TraceStep {
    pub fn as_step(&self) -> TransportStep<'_> {
        TransportStep {
            start_energy: self.start_energy,
            end_energy: self.end_energy,
            step_length: self.step_length,
            weight: self.weight,
            particle: self.particle,
            is_primary: self.is_primary,
            material: &self.material,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceRecord {
    Step(TraceStep),
    EndEvent,
}
