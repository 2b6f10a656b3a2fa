//! Energy bin edges shared by every fluence spectrum.
//!
//! Bins are half-open intervals `[edges[i], edges[i + 1])` spaced either
//! linearly or logarithmically between the configured minimum and maximum
//! energies. The table is built once per run and never mutated afterwards.

use super::error::Error;
use serde::{Deserialize, Serialize};

/// Where an energy falls relative to the bin edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinLocation {
    /// Below the first edge.
    Underflow,
    /// Inside bin `i`.
    Bin(usize),
    /// At or above the last edge.
    Overflow,
}

/// Ordered energy bin edges (MeV).
///
/// # Examples
///
/// ```
/// use tle_fluence::EnergyBinTable;
///
/// let table = EnergyBinTable::build(0.01, 10.0, 3, true)?;
/// assert_eq!(table.bin_count(), 3);
/// assert!((table.edges()[1] - 0.1).abs() < 1e-12);
/// assert_eq!(table.find_lower_bin(0.5), Some(2));
/// assert_eq!(table.find_upper_bin(0.5), Some(1));
/// # Ok::<(), tle_fluence::FluenceError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyBinTable {
    min_energy: f64,
    max_energy: f64,
    log_scale: bool,
    edges: Vec<f64>,
}

impl EnergyBinTable {
    /// Builds `bin_count + 1` edges between `min_energy` and `max_energy`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `min_energy <= 0`,
    /// `max_energy <= min_energy`, `bin_count == 0`, either bound is not
    /// finite, or the requested binning is too fine to produce strictly
    /// increasing edges.
    pub fn build(
        min_energy: f64,
        max_energy: f64,
        bin_count: usize,
        log_scale: bool,
    ) -> Result<Self, Error> {
        if !min_energy.is_finite() || !max_energy.is_finite() {
            return Err(Error::configuration(format!(
                "energy bounds must be finite (min = {min_energy}, max = {max_energy})"
            )));
        }
        if min_energy <= 0.0 {
            return Err(Error::configuration(format!(
                "minimum energy must be positive, got {min_energy} MeV"
            )));
        }
        if max_energy <= min_energy {
            return Err(Error::configuration(format!(
                "maximum energy {max_energy} MeV must exceed minimum energy {min_energy} MeV"
            )));
        }
        if bin_count == 0 {
            return Err(Error::configuration("number of bins must be positive"));
        }

        let mut edges: Vec<f64> = if log_scale {
            let log_min = min_energy.ln();
            let increment = (max_energy.ln() - log_min) / bin_count as f64;
            (0..=bin_count)
                .map(|i| (log_min + i as f64 * increment).exp())
                .collect()
        } else {
            let increment = (max_energy - min_energy) / bin_count as f64;
            (0..=bin_count)
                .map(|i| min_energy + i as f64 * increment)
                .collect()
        };
        edges[0] = min_energy;
        edges[bin_count] = max_energy;

        if let Some(i) = edges.windows(2).position(|w| w[1] <= w[0]) {
            return Err(Error::configuration(format!(
                "{bin_count} bins between {min_energy} and {max_energy} MeV give non-increasing edges at index {i}"
            )));
        }

        Ok(Self {
            min_energy,
            max_energy,
            log_scale,
            edges,
        })
    }

    #[inline]
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    #[inline]
    pub fn bin_count(&self) -> usize {
        self.edges.len() - 1
    }

    #[inline]
    pub fn min_energy(&self) -> f64 {
        self.min_energy
    }

    #[inline]
    pub fn max_energy(&self) -> f64 {
        self.max_energy
    }

    #[inline]
    pub fn is_log_scale(&self) -> bool {
        self.log_scale
    }

    /// Width of bin `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i >= bin_count()`.
    #[inline]
    pub fn bin_width(&self, i: usize) -> f64 {
        self.edges[i + 1] - self.edges[i]
    }

    /// Smallest edge index `i` with `edges[i] >= energy`.
    ///
    /// Returns `None` when `energy` lies above the last edge.
    pub fn find_lower_bin(&self, energy: f64) -> Option<usize> {
        let i = self.edges.partition_point(|&edge| edge < energy);
        (i < self.edges.len()).then_some(i)
    }

    /// Largest edge index `j` with `edges[j] < energy`.
    ///
    /// Returns `None` when `energy` lies at or below the first edge.
    pub fn find_upper_bin(&self, energy: f64) -> Option<usize> {
        self.edges
            .partition_point(|&edge| edge < energy)
            .checked_sub(1)
    }

    /// Locates the half-open bin containing `energy`.
    pub fn locate(&self, energy: f64) -> BinLocation {
        if energy < self.min_energy || energy.is_nan() {
            return BinLocation::Underflow;
        }
        let i = self.edges.partition_point(|&edge| edge <= energy);
        if i >= self.edges.len() {
            BinLocation::Overflow
        } else {
            BinLocation::Bin(i - 1)
        }
    }

    /// `true` if both tables have the same edges.
    pub fn same_binning(&self, other: &EnergyBinTable) -> bool {
        self.edges == other.edges
    }
}
