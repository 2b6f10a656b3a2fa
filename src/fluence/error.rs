//! Error types for fluence scoring.
//!
//! Every variant is fatal for the run that raised it: configuration mistakes
//! are reported before any step is processed, and physics-validity violations
//! abort the run rather than bias the spectra.

use crate::model::types::ParticleKind;
use thiserror::Error;

/// Errors that can occur while configuring or running the track-length
/// estimator.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid energy range, bin count, or output settings.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A step entered the scoring volume above the configured maximum energy.
    ///
    /// The energy range must be widened; steps are never clamped or skipped.
    #[error(
        "particle energy {energy} MeV exceeds the configured maximum of {limit} MeV; increase the maximum energy"
    )]
    EnergyRangeExceeded {
        /// Pre-step kinetic energy in MeV.
        energy: f64,
        /// Configured maximum energy in MeV.
        limit: f64,
    },

    /// The stopping-power provider could not evaluate the stopping power.
    #[error(
        "stopping power unavailable for {particle} at {energy} MeV in material '{material}'"
    )]
    StoppingPowerUnavailable {
        /// Kinetic energy in MeV at which the stopping power was requested.
        energy: f64,
        /// Particle species.
        particle: ParticleKind,
        /// Material name.
        material: String,
    },

    /// A transport step violates the step-record invariants.
    #[error("invalid transport step: {0}")]
    InvalidStep(String),

    /// A lifecycle call arrived in a state that does not accept it.
    #[error("cannot {action} while the run is {state}")]
    InvalidTransition {
        /// Current run state.
        state: &'static str,
        /// Attempted action.
        action: &'static str,
    },

    /// Failed to parse a stopping-power table TOML.
    #[error("failed to parse stopping-power table: {0}")]
    StoppingTableParse(#[from] toml::de::Error),

    /// A stopping-power table is structurally invalid.
    #[error("invalid stopping-power table: {0}")]
    StoppingTable(String),

    /// Writing the spectra to a sink failed.
    #[error("failed to save spectra: {0}")]
    Output(#[from] crate::io::error::Error),
}

impl Error {
    /// Creates a [`Configuration`](Error::Configuration) error.
    pub fn configuration(detail: impl Into<String>) -> Self {
        Self::Configuration(detail.into())
    }

    /// Creates a [`StoppingPowerUnavailable`](Error::StoppingPowerUnavailable) error.
    pub fn stopping_power_unavailable(energy: f64, particle: ParticleKind, material: &str) -> Self {
        Self::StoppingPowerUnavailable {
            energy,
            particle,
            material: material.to_string(),
        }
    }

    /// Creates an [`InvalidStep`](Error::InvalidStep) error.
    pub fn invalid_step(detail: impl Into<String>) -> Self {
        Self::InvalidStep(detail.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_error_reports_energy_and_limit() {
        let err = Error::EnergyRangeExceeded {
            energy: 12.5,
            limit: 10.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("12.5 MeV"));
        assert!(msg.contains("10 MeV"));
    }

    #[test]
    fn stopping_power_error_names_material() {
        let err = Error::stopping_power_unavailable(0.5, ParticleKind::Positron, "G4_LUNG");
        assert_eq!(
            err.to_string(),
            "stopping power unavailable for e+ at 0.5 MeV in material 'G4_LUNG'"
        );
    }

    #[test]
    fn transition_error_message() {
        let err = Error::InvalidTransition {
            state: "configured",
            action: "process a step",
        };
        assert_eq!(
            err.to_string(),
            "cannot process a step while the run is configured"
        );
    }
}
