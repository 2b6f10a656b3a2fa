//! Stopping-power providers.
//!
//! The estimator never models energy loss itself; it asks an injected
//! [`StoppingPower`] for the mean electronic stopping power at a given energy.
//! Hosts with their own physics implement the trait directly, tests pass
//! closures, and [`TabulatedStoppingPower`] serves tabulated data loaded from
//! TOML.

use super::error::Error;
use crate::model::types::ParticleKind;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Energy cut forwarded with every stopping-power query.
pub const DEFAULT_CUT_ENERGY: f64 = 1.0;

const DEFAULT_TABLE_TOML: &str = include_str!("../../resources/default.stopping.toml");

static DEFAULT_TABLE: OnceLock<TabulatedStoppingPower> = OnceLock::new();

/// Mean electronic stopping power (MeV/mm) as a function of kinetic energy,
/// particle species and material.
pub trait StoppingPower {
    /// Returns the stopping power, or `None` when it cannot be evaluated for
    /// this energy, species and material.
    fn electronic_dedx(
        &self,
        energy: f64,
        particle: ParticleKind,
        material: &str,
        cut: f64,
    ) -> Option<f64>;
}

impl<F> StoppingPower for F
where
    F: Fn(f64, ParticleKind, &str) -> Option<f64>,
{
    fn electronic_dedx(
        &self,
        energy: f64,
        particle: ParticleKind,
        material: &str,
        _cut: f64,
    ) -> Option<f64> {
        self(energy, particle, material)
    }
}

#[derive(Debug, Deserialize)]
struct TableFile {
    #[serde(default)]
    materials: HashMap<String, MaterialColumns>,
}

#[derive(Debug, Deserialize)]
struct MaterialColumns {
    energy: Vec<f64>,
    electron: Vec<f64>,
    #[serde(default)]
    positron: Option<Vec<f64>>,
}

/// Log-log interpolation table for one material.
#[derive(Debug, Clone)]
struct MaterialTable {
    log_energy: Vec<f64>,
    log_electron: Vec<f64>,
    log_positron: Option<Vec<f64>>,
}

impl MaterialTable {
    fn from_columns(name: &str, columns: MaterialColumns) -> Result<Self, Error> {
        let n = columns.energy.len();
        if n < 2 {
            return Err(Error::StoppingTable(format!(
                "material '{name}' needs at least two energy points, found {n}"
            )));
        }
        if columns.electron.len() != n {
            return Err(Error::StoppingTable(format!(
                "material '{name}' has {n} energies but {} electron values",
                columns.electron.len()
            )));
        }
        if let Some(positron) = &columns.positron {
            if positron.len() != n {
                return Err(Error::StoppingTable(format!(
                    "material '{name}' has {n} energies but {} positron values",
                    positron.len()
                )));
            }
        }
        if columns.energy.iter().any(|&e| !(e.is_finite() && e > 0.0)) {
            return Err(Error::StoppingTable(format!(
                "material '{name}' has a non-positive energy"
            )));
        }
        if columns.energy.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::StoppingTable(format!(
                "material '{name}' energies are not strictly increasing"
            )));
        }

        let ln_column = |values: &[f64], species: &str| -> Result<Vec<f64>, Error> {
            values
                .iter()
                .map(|&v| {
                    if v.is_finite() && v > 0.0 {
                        Ok(v.ln())
                    } else {
                        Err(Error::StoppingTable(format!(
                            "material '{name}' has a non-positive {species} stopping power ({v})"
                        )))
                    }
                })
                .collect()
        };

        Ok(Self {
            log_energy: columns.energy.iter().map(|e| e.ln()).collect(),
            log_electron: ln_column(&columns.electron, "electron")?,
            log_positron: columns
                .positron
                .as_deref()
                .map(|p| ln_column(p, "positron"))
                .transpose()?,
        })
    }

    fn interpolate(&self, energy: f64, particle: ParticleKind) -> Option<f64> {
        let column = match particle {
            ParticleKind::Electron => &self.log_electron,
            ParticleKind::Positron => self.log_positron.as_ref().unwrap_or(&self.log_electron),
            ParticleKind::Photon | ParticleKind::Other => return None,
        };
        if energy.is_nan() || energy <= 0.0 {
            return None;
        }

        let x = energy.ln();
        let first = *self.log_energy.first()?;
        let last = *self.log_energy.last()?;
        if x < first || x > last {
            return None;
        }

        let hi = self
            .log_energy
            .partition_point(|&e| e < x)
            .clamp(1, self.log_energy.len() - 1);
        let lo = hi - 1;
        let (x0, x1) = (self.log_energy[lo], self.log_energy[hi]);
        let (y0, y1) = (column[lo], column[hi]);
        let t = (x - x0) / (x1 - x0);
        Some((y0 + t * (y1 - y0)).exp())
    }
}

/// Stopping powers interpolated from per-material tables.
///
/// # Examples
///
/// ```
/// use tle_fluence::{ParticleKind, StoppingPower, TabulatedStoppingPower, DEFAULT_CUT_ENERGY};
///
/// let toml = r#"
///     [materials.SLAB]
///     energy = [0.1, 10.0]
///     electron = [0.4, 0.2]
/// "#;
/// let table = TabulatedStoppingPower::from_toml(toml)?;
/// let dedx = table.electronic_dedx(1.0, ParticleKind::Electron, "SLAB", DEFAULT_CUT_ENERGY);
/// assert!((dedx.unwrap() - 0.4 / 2f64.sqrt()).abs() < 1e-12);
/// # Ok::<(), tle_fluence::FluenceError>(())
/// ```
#[derive(Debug, Clone)]
pub struct TabulatedStoppingPower {
    materials: HashMap<String, MaterialTable>,
}

impl TabulatedStoppingPower {
    /// Parses tables from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StoppingTableParse`] for malformed TOML and
    /// [`Error::StoppingTable`] for tables with mismatched columns,
    /// non-increasing energies or non-positive values.
    pub fn from_toml(toml: &str) -> Result<Self, Error> {
        let file: TableFile = toml::from_str(toml)?;
        let materials = file
            .materials
            .into_iter()
            .map(|(name, columns)| {
                let table = MaterialTable::from_columns(&name, columns)?;
                Ok((name, table))
            })
            .collect::<Result<HashMap<_, _>, Error>>()?;
        Ok(Self { materials })
    }

    /// Loads a custom table if given, otherwise the embedded default.
    pub fn load(custom_toml: Option<&str>) -> Result<Self, Error> {
        match custom_toml {
            Some(toml) => Self::from_toml(toml),
            None => Ok(Self::embedded().clone()),
        }
    }

    /// The embedded default tables (liquid water).
    pub fn embedded() -> &'static Self {
        DEFAULT_TABLE.get_or_init(|| {
            Self::from_toml(DEFAULT_TABLE_TOML)
                .expect("Failed to parse embedded stopping-power table. This is a library bug.")
        })
    }

    /// Names of the tabulated materials, sorted.
    pub fn materials(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.materials.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Tabulated energy range `(min, max)` in MeV for a material.
    pub fn energy_range(&self, material: &str) -> Option<(f64, f64)> {
        let table = self.materials.get(material)?;
        Some((
            table.log_energy.first()?.exp(),
            table.log_energy.last()?.exp(),
        ))
    }
}

impl StoppingPower for TabulatedStoppingPower {
    fn electronic_dedx(
        &self,
        energy: f64,
        particle: ParticleKind,
        material: &str,
        _cut: f64,
    ) -> Option<f64> {
        self.materials.get(material)?.interpolate(energy, particle)
    }
}
