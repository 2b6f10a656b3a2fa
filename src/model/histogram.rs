use super::types::SpectrumKind;
use crate::fluence::{BinLocation, EnergyBinTable};
use serde::{Deserialize, Serialize};

/// Per-bin accumulated content of one spectrum.
///
/// Fills outside the bin range are kept apart in the underflow and overflow
/// accumulators and never contribute to [`Histogram::integral`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    contents: Vec<f64>,
    underflow: f64,
    overflow: f64,
    entries: u64,
}

impl Histogram {
    fn new(bin_count: usize) -> Self {
        Self {
            contents: vec![0.0; bin_count],
            underflow: 0.0,
            overflow: 0.0,
            entries: 0,
        }
    }

    #[inline]
    pub fn contents(&self) -> &[f64] {
        &self.contents
    }

    #[inline]
    pub fn underflow(&self) -> f64 {
        self.underflow
    }

    #[inline]
    pub fn overflow(&self) -> f64 {
        self.overflow
    }

    /// Number of fills since the last reset, including out-of-range ones.
    #[inline]
    pub fn entries(&self) -> u64 {
        self.entries
    }

    /// Sum of the in-range bin contents.
    pub fn integral(&self) -> f64 {
        self.contents.iter().sum()
    }

    fn fill(&mut self, location: BinLocation, amount: f64) {
        match location {
            BinLocation::Underflow => self.underflow += amount,
            BinLocation::Bin(i) => self.contents[i] += amount,
            BinLocation::Overflow => self.overflow += amount,
        }
        self.entries += 1;
    }

    fn reset(&mut self) {
        self.contents.fill(0.0);
        self.underflow = 0.0;
        self.overflow = 0.0;
        self.entries = 0;
    }

    fn scale_by_width(&mut self, bins: &EnergyBinTable) {
        for (i, content) in self.contents.iter_mut().enumerate() {
            *content /= bins.bin_width(i);
        }
        self.underflow /= bins.bin_width(0);
        self.overflow /= bins.bin_width(bins.bin_count() - 1);
    }
}

/// The photon, electron and primary-electron fluence spectra of one run.
///
/// All three spectra share the same energy bins, and the set carries the
/// run's event counter.
///
/// # Examples
///
/// ```
/// use tle_fluence::{EnergyBinTable, HistogramSet, SpectrumKind};
///
/// let table = EnergyBinTable::build(1.0, 3.0, 2, false)?;
/// let mut spectra = HistogramSet::new(&table);
/// spectra.accumulate(SpectrumKind::Photon, 2.5, 4.0);
/// spectra.scale_by_bin_width();
/// assert_eq!(spectra.histogram(SpectrumKind::Photon).contents(), &[0.0, 4.0]);
/// # Ok::<(), tle_fluence::FluenceError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramSet {
    bins: EnergyBinTable,
    photon: Histogram,
    electron: Histogram,
    primary_electron: Histogram,
    events: u64,
}

impl HistogramSet {
    /// Creates three empty spectra binned like `bins`.
    pub fn new(bins: &EnergyBinTable) -> Self {
        let n = bins.bin_count();
        Self {
            bins: bins.clone(),
            photon: Histogram::new(n),
            electron: Histogram::new(n),
            primary_electron: Histogram::new(n),
            events: 0,
        }
    }

    #[inline]
    pub fn bins(&self) -> &EnergyBinTable {
        &self.bins
    }

    #[inline]
    pub fn edges(&self) -> &[f64] {
        self.bins.edges()
    }

    #[inline]
    pub fn bin_count(&self) -> usize {
        self.bins.bin_count()
    }

    #[inline]
    pub fn events(&self) -> u64 {
        self.events
    }

    pub fn histogram(&self, kind: SpectrumKind) -> &Histogram {
        match kind {
            SpectrumKind::Photon => &self.photon,
            SpectrumKind::Electron => &self.electron,
            SpectrumKind::PrimaryElectron => &self.primary_electron,
        }
    }

    fn histogram_mut(&mut self, kind: SpectrumKind) -> &mut Histogram {
        match kind {
            SpectrumKind::Photon => &mut self.photon,
            SpectrumKind::Electron => &mut self.electron,
            SpectrumKind::PrimaryElectron => &mut self.primary_electron,
        }
    }

    /// Adds `amount` to the bin of `kind` containing `energy`.
    pub fn accumulate(&mut self, kind: SpectrumKind, energy: f64, amount: f64) {
        let location = self.bins.locate(energy);
        self.histogram_mut(kind).fill(location, amount);
    }

    /// Counts one completed event.
    pub fn record_event(&mut self) {
        self.events += 1;
    }

    /// Zeroes every spectrum and the event counter.
    pub fn reset(&mut self) {
        for kind in SpectrumKind::ALL {
            self.histogram_mut(kind).reset();
        }
        self.events = 0;
    }

    /// Converts accumulated fluence into fluence per unit energy by dividing
    /// every bin by its width.
    ///
    /// This is not idempotent: call it exactly once per run.
    pub fn scale_by_bin_width(&mut self) {
        let bins = &self.bins;
        self.photon.scale_by_width(bins);
        self.electron.scale_by_width(bins);
        self.primary_electron.scale_by_width(bins);
    }

    /// Serialized view of one spectrum: `(low edge, content)` per bin followed
    /// by the terminal row `(last edge, overflow)`.
    pub fn rows(&self, kind: SpectrumKind) -> impl Iterator<Item = (f64, f64)> + '_ {
        let histogram = self.histogram(kind);
        self.edges()
            .iter()
            .copied()
            .zip(
                histogram
                    .contents()
                    .iter()
                    .copied()
                    .chain(std::iter::once(histogram.overflow())),
            )
    }

    /// `true` if every spectrum has one content per bin.
    pub fn is_consistent(&self) -> bool {
        let n = self.bin_count();
        SpectrumKind::ALL
            .iter()
            .all(|&kind| self.histogram(kind).contents().len() == n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn decade_spectra() -> HistogramSet {
        let table = EnergyBinTable::build(0.01, 10.0, 3, true).unwrap();
        HistogramSet::new(&table)
    }

    #[test]
    fn new_set_is_empty_and_shares_bins() {
        let spectra = decade_spectra();
        assert_eq!(spectra.bin_count(), 3);
        assert_eq!(spectra.events(), 0);
        for kind in SpectrumKind::ALL {
            let h = spectra.histogram(kind);
            assert_eq!(h.contents(), &[0.0, 0.0, 0.0]);
            assert_eq!(h.entries(), 0);
        }
        assert!(spectra.is_consistent());
    }

    #[test]
    fn accumulate_routes_to_bins_and_flows() {
        let mut spectra = decade_spectra();
        spectra.accumulate(SpectrumKind::Electron, 0.05, 1.0);
        spectra.accumulate(SpectrumKind::Electron, 4.5, 2.0);
        spectra.accumulate(SpectrumKind::Electron, 4.5, 0.5);
        spectra.accumulate(SpectrumKind::Electron, 0.001, 7.0);
        spectra.accumulate(SpectrumKind::Electron, 10.0, 3.0);

        let h = spectra.histogram(SpectrumKind::Electron);
        assert_eq!(h.contents(), &[1.0, 0.0, 2.5]);
        assert_eq!(h.underflow(), 7.0);
        assert_eq!(h.overflow(), 3.0);
        assert_eq!(h.entries(), 5);
        assert_eq!(h.integral(), 3.5);
        assert_eq!(spectra.histogram(SpectrumKind::Photon).entries(), 0);
    }

    #[test]
    fn reset_clears_contents_and_events() {
        let mut spectra = decade_spectra();
        spectra.accumulate(SpectrumKind::Photon, 1.5, 1.0);
        spectra.accumulate(SpectrumKind::PrimaryElectron, 1e-4, 1.0);
        spectra.record_event();
        spectra.record_event();
        assert_eq!(spectra.events(), 2);

        spectra.reset();
        assert_eq!(spectra, decade_spectra());
    }

    #[test]
    fn scale_divides_by_bin_width_once() {
        let mut spectra = decade_spectra();
        let totals = [0.9, 1.8, 9.0];
        for (i, total) in totals.iter().enumerate() {
            let mid = 0.5 * (spectra.edges()[i] + spectra.edges()[i + 1]);
            spectra.accumulate(SpectrumKind::Electron, mid, *total);
        }
        spectra.scale_by_bin_width();

        let widths = [0.09, 0.9, 9.0];
        let h = spectra.histogram(SpectrumKind::Electron);
        for i in 0..3 {
            assert!(approx_eq(h.contents()[i], totals[i] / widths[i], 1e-9));
        }
    }

    #[test]
    fn scaling_twice_divides_twice() {
        let mut spectra = decade_spectra();
        spectra.accumulate(SpectrumKind::Photon, 5.0, 9.0);
        spectra.scale_by_bin_width();
        let once = spectra.histogram(SpectrumKind::Photon).contents()[2];
        spectra.scale_by_bin_width();
        let twice = spectra.histogram(SpectrumKind::Photon).contents()[2];
        assert!(approx_eq(once, 1.0, 1e-9));
        assert!(approx_eq(twice, 1.0 / 9.0, 1e-9));
    }

    #[test]
    fn scale_uses_edge_widths_for_flows() {
        let table = EnergyBinTable::build(1.0, 4.0, 2, false).unwrap();
        let mut spectra = HistogramSet::new(&table);
        spectra.accumulate(SpectrumKind::Photon, 0.5, 3.0);
        spectra.accumulate(SpectrumKind::Photon, 4.0, 6.0);
        spectra.scale_by_bin_width();
        let h = spectra.histogram(SpectrumKind::Photon);
        assert_eq!(h.underflow(), 2.0);
        assert_eq!(h.overflow(), 4.0);
    }

    #[test]
    fn rows_end_with_last_edge_and_overflow() {
        let table = EnergyBinTable::build(1.0, 3.0, 2, false).unwrap();
        let mut spectra = HistogramSet::new(&table);
        spectra.accumulate(SpectrumKind::Electron, 1.2, 1.0);
        spectra.accumulate(SpectrumKind::Electron, 3.5, 2.0);
        let rows: Vec<_> = spectra.rows(SpectrumKind::Electron).collect();
        assert_eq!(rows, vec![(1.0, 1.0), (2.0, 0.0), (3.0, 2.0)]);
    }
}
