use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid spectrum name: '{0}'")]
pub struct ParseSpectrumKindError(String);

/// Particle species as reported by the transport engine.
///
/// Only photons and charged leptons are scored; every other species passes
/// through the estimator untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParticleKind {
    Photon,
    Electron,
    Positron,
    #[default]
    Other,
}

impl ParticleKind {
    /// Maps a transport-engine particle name (`gamma`, `e-`, `e+`, ...) to a kind.
    ///
    /// Unknown names map to [`ParticleKind::Other`]; this never fails.
    pub fn from_name(name: &str) -> Self {
        match name {
            "gamma" => ParticleKind::Photon,
            "e-" => ParticleKind::Electron,
            "e+" => ParticleKind::Positron,
            _ => ParticleKind::Other,
        }
    }

    /// Returns the transport-engine name of the species.
    pub fn name(&self) -> &'static str {
        match self {
            ParticleKind::Photon => "gamma",
            ParticleKind::Electron => "e-",
            ParticleKind::Positron => "e+",
            ParticleKind::Other => "other",
        }
    }

    /// `true` for electrons and positrons, the species scored through
    /// stopping power.
    #[inline]
    pub fn is_charged_lepton(&self) -> bool {
        matches!(self, ParticleKind::Electron | ParticleKind::Positron)
    }
}

impl fmt::Display for ParticleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies one of the three fluence spectra of a
/// [`HistogramSet`](super::histogram::HistogramSet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SpectrumKind {
    /// Track-length fluence of photons.
    Photon,
    /// Track-length fluence of electrons and positrons.
    Electron,
    /// Track-length fluence of primary electrons and positrons.
    PrimaryElectron,
}

impl SpectrumKind {
    /// All spectra, in the order they are persisted.
    pub const ALL: [SpectrumKind; 3] = [
        SpectrumKind::Electron,
        SpectrumKind::PrimaryElectron,
        SpectrumKind::Photon,
    ];

    /// Histogram name used for persisted files.
    pub fn histogram_name(&self) -> &'static str {
        match self {
            SpectrumKind::Photon => "PhotonTrackLength",
            SpectrumKind::Electron => "ElectronTrackLengthFluence",
            SpectrumKind::PrimaryElectron => "PrimaryElectronTrackLengthFluence",
        }
    }

    /// Short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SpectrumKind::Photon => "Photon",
            SpectrumKind::Electron => "Electron",
            SpectrumKind::PrimaryElectron => "Primary electron",
        }
    }
}

impl fmt::Display for SpectrumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.histogram_name())
    }
}

impl FromStr for SpectrumKind {
    type Err = ParseSpectrumKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "photon" | "gamma" | "photontracklength" => Ok(SpectrumKind::Photon),
            "electron" | "electrontracklengthfluence" => Ok(SpectrumKind::Electron),
            "primary" | "primary-electron" | "primaryelectrontracklengthfluence" => {
                Ok(SpectrumKind::PrimaryElectron)
            }
            _ => Err(ParseSpectrumKindError(s.to_string())),
        }
    }
}
