//! Track-length scoring of individual transport steps.
//!
//! A charged lepton loses energy continuously along a step, from `Ei` down to
//! `Ef`. Its contribution to the fluence spectrum is the residual-range
//! integral `∫ dE / S(E)` over `[Ef, Ei]`, which is split at every bin edge
//! crossed by the step. Each piece is approximated with the stopping power
//! evaluated once, at the higher end of the piece, and deposited at the
//! piece's mean energy.

use super::binning::EnergyBinTable;
use super::error::Error;
use super::stopping::{DEFAULT_CUT_ENERGY, StoppingPower};
use crate::model::histogram::HistogramSet;
use crate::model::step::TransportStep;
use crate::model::types::{ParticleKind, SpectrumKind};

/// How a charged step lies across the energy bins.
///
/// Built from `x`, the first edge at or above `Ef`, and `y`, the last edge
/// below `Ei`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSpan {
    /// The step stays within one bin (`y < x`).
    SingleBin,
    /// The step crosses exactly one edge (`y == x`).
    TwoBin {
        /// Index of the crossed edge.
        boundary: usize,
    },
    /// The step crosses the edges `low..=high` (`y > x`).
    MultiBin {
        /// First crossed edge, nearest `Ef`.
        low: usize,
        /// Last crossed edge, nearest `Ei`.
        high: usize,
    },
}

impl StepSpan {
    /// Classifies a step from its lower (`x`) and upper (`y`) edge indices.
    pub fn classify(x: usize, y: Option<usize>) -> Self {
        match y {
            Some(y) if y == x => StepSpan::TwoBin { boundary: x },
            Some(y) if y > x => StepSpan::MultiBin { low: x, high: y },
            _ => StepSpan::SingleBin,
        }
    }
}

/// An energy interval of a step scored as one deposit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackSegment {
    /// Lower energy of the interval.
    pub low: f64,
    /// Upper energy of the interval.
    pub high: f64,
    /// Energy at which the stopping power is evaluated.
    pub dedx_energy: f64,
}

impl TrackSegment {
    #[inline]
    pub fn mean_energy(&self) -> f64 {
        0.5 * (self.high + self.low)
    }

    #[inline]
    pub fn energy_loss(&self) -> f64 {
        self.high - self.low
    }
}

/// Splits the step `[ef, ei]` into the segments scored for `span`.
///
/// The segments cover `[ef, ei]` without gaps or overlap.
pub fn segments(
    span: StepSpan,
    table: &EnergyBinTable,
    ei: f64,
    ef: f64,
) -> impl Iterator<Item = TrackSegment> + '_ {
    let edges = table.edges();
    let (head, interior, tail) = match span {
        StepSpan::SingleBin => (
            Some(TrackSegment {
                low: ef,
                high: ei,
                dedx_energy: ei,
            }),
            0..0,
            None,
        ),
        StepSpan::TwoBin { boundary } => {
            let e = edges[boundary];
            (
                Some(TrackSegment {
                    low: ef,
                    high: e,
                    dedx_energy: e,
                }),
                0..0,
                Some(TrackSegment {
                    low: e,
                    high: ei,
                    dedx_energy: ei,
                }),
            )
        }
        StepSpan::MultiBin { low, high } => (
            Some(TrackSegment {
                low: ef,
                high: edges[low],
                dedx_energy: edges[low],
            }),
            low..high,
            Some(TrackSegment {
                low: edges[high],
                high: ei,
                dedx_energy: ei,
            }),
        ),
    };

    head.into_iter()
        .chain(interior.map(move |i| TrackSegment {
            low: edges[i],
            high: edges[i + 1],
            dedx_energy: edges[i + 1],
        }))
        .chain(tail)
}

/// Deposits transport steps into the fluence spectra.
///
/// The accumulator holds no run state; it owns only the stopping-power
/// provider and writes into the [`HistogramSet`] it is handed.
#[derive(Debug, Clone)]
pub struct FluenceAccumulator<S> {
    stopping: S,
}

impl<S: StoppingPower> FluenceAccumulator<S> {
    pub fn new(stopping: S) -> Self {
        Self { stopping }
    }

    pub fn stopping(&self) -> &S {
        &self.stopping
    }

    /// Scores one step.
    ///
    /// Photons deposit `step_length × weight` at their pre-step energy.
    /// Electrons and positrons deposit `weight × ΔE / S(E)` per segment of
    /// the step, into the electron spectrum and, for primaries, also into the
    /// primary-electron spectrum. Other species are ignored.
    ///
    /// # Errors
    ///
    /// - [`Error::EnergyRangeExceeded`] if the pre-step energy of any
    ///   particle is above the table's maximum energy.
    /// - [`Error::InvalidStep`] if a scored step has a negative weight or
    ///   length, a non-finite energy, or gains energy.
    /// - [`Error::StoppingPowerUnavailable`] if the provider returns no
    ///   positive, finite stopping power.
    pub fn process(
        &self,
        table: &EnergyBinTable,
        spectra: &mut HistogramSet,
        step: &TransportStep<'_>,
    ) -> Result<(), Error> {
        if step.start_energy > table.max_energy() {
            return Err(Error::EnergyRangeExceeded {
                energy: step.start_energy,
                limit: table.max_energy(),
            });
        }

        match step.particle {
            ParticleKind::Photon => {
                check_step(step)?;
                spectra.accumulate(
                    SpectrumKind::Photon,
                    step.start_energy,
                    step.step_length * step.weight,
                );
                Ok(())
            }
            ParticleKind::Electron | ParticleKind::Positron => {
                check_step(step)?;
                self.process_charged(table, spectra, step)
            }
            ParticleKind::Other => Ok(()),
        }
    }

    fn process_charged(
        &self,
        table: &EnergyBinTable,
        spectra: &mut HistogramSet,
        step: &TransportStep<'_>,
    ) -> Result<(), Error> {
        let (ei, ef) = (step.start_energy, step.end_energy);

        if ei == ef {
            self.deposit(spectra, step, ei, 0.0);
            return Ok(());
        }

        let x = table
            .find_lower_bin(ef)
            .ok_or(Error::EnergyRangeExceeded {
                energy: ef,
                limit: table.max_energy(),
            })?;
        let span = StepSpan::classify(x, table.find_upper_bin(ei));

        for segment in segments(span, table, ei, ef) {
            let fluence = self.segment_fluence(step, &segment)?;
            self.deposit(spectra, step, segment.mean_energy(), fluence);
        }
        Ok(())
    }

    fn segment_fluence(
        &self,
        step: &TransportStep<'_>,
        segment: &TrackSegment,
    ) -> Result<f64, Error> {
        let dedx = self
            .stopping
            .electronic_dedx(
                segment.dedx_energy,
                step.particle,
                step.material,
                DEFAULT_CUT_ENERGY,
            )
            .filter(|d| d.is_finite() && *d > 0.0)
            .ok_or_else(|| {
                Error::stopping_power_unavailable(segment.dedx_energy, step.particle, step.material)
            })?;
        Ok(step.weight * segment.energy_loss() / dedx)
    }

    fn deposit(
        &self,
        spectra: &mut HistogramSet,
        step: &TransportStep<'_>,
        energy: f64,
        fluence: f64,
    ) {
        spectra.accumulate(SpectrumKind::Electron, energy, fluence);
        if step.is_primary {
            spectra.accumulate(SpectrumKind::PrimaryElectron, energy, fluence);
        }
    }
}

fn check_step(step: &TransportStep<'_>) -> Result<(), Error> {
    if !step.start_energy.is_finite() || !step.end_energy.is_finite() {
        return Err(Error::invalid_step(format!(
            "non-finite energy ({} -> {} MeV)",
            step.start_energy, step.end_energy
        )));
    }
    if step.end_energy > step.start_energy {
        return Err(Error::invalid_step(format!(
            "{} gains energy along the step ({} -> {} MeV)",
            step.particle, step.start_energy, step.end_energy
        )));
    }
    if step.weight.is_nan() || step.weight < 0.0 {
        return Err(Error::invalid_step(format!(
            "statistical weight must be non-negative, got {}",
            step.weight
        )));
    }
    if step.step_length.is_nan() || step.step_length < 0.0 {
        return Err(Error::invalid_step(format!(
            "step length must be non-negative, got {} mm",
            step.step_length
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn approx_eq(a: f64, b: f64, eps: f64) -> bool {
        (a - b).abs() <= eps
    }

    fn decades() -> EnergyBinTable {
        EnergyBinTable::build(0.01, 10.0, 3, true).unwrap()
    }

    /// Stopping power equal to the energy, so `ΔE / S(E)` is easy to check.
    fn linear_dedx(e: f64, _: ParticleKind, _: &str) -> Option<f64> {
        Some(e)
    }

    fn electron_bin(spectra: &HistogramSet, i: usize) -> f64 {
        spectra.histogram(SpectrumKind::Electron).contents()[i]
    }

    #[test]
    fn classify_covers_all_spans() {
        assert_eq!(StepSpan::classify(3, Some(2)), StepSpan::SingleBin);
        assert_eq!(StepSpan::classify(0, None), StepSpan::SingleBin);
        assert_eq!(
            StepSpan::classify(2, Some(2)),
            StepSpan::TwoBin { boundary: 2 }
        );
        assert_eq!(
            StepSpan::classify(1, Some(3)),
            StepSpan::MultiBin { low: 1, high: 3 }
        );
    }

    #[test]
    fn segments_tile_the_step() {
        let table = EnergyBinTable::build(0.1, 100.0, 12, true).unwrap();
        let (ei, ef) = (57.0, 0.13);
        let x = table.find_lower_bin(ef).unwrap();
        let span = StepSpan::classify(x, table.find_upper_bin(ei));
        assert!(matches!(span, StepSpan::MultiBin { .. }));

        let segs: Vec<_> = segments(span, &table, ei, ef).collect();
        assert_eq!(segs.first().unwrap().low, ef);
        assert_eq!(segs.last().unwrap().high, ei);
        for w in segs.windows(2) {
            assert_eq!(w[0].high, w[1].low);
        }
        let total: f64 = segs.iter().map(TrackSegment::energy_loss).sum();
        assert!(approx_eq(total, ei - ef, 1e-9));
    }

    #[test]
    fn single_bin_deposit_at_mean_energy() {
        let table = decades();
        let mut spectra = HistogramSet::new(&table);
        let acc = FluenceAccumulator::new(|_: f64, _: ParticleKind, _: &str| Some(2.0));

        let step = TransportStep::charged(ParticleKind::Electron, 5.0, 4.0, "W").with_weight(0.8);
        acc.process(&table, &mut spectra, &step).unwrap();

        assert!(approx_eq(electron_bin(&spectra, 2), 0.5 * 0.8, 1e-12));
        assert_eq!(spectra.histogram(SpectrumKind::Electron).entries(), 1);
        assert_eq!(spectra.histogram(SpectrumKind::PrimaryElectron).entries(), 0);
    }

    #[test]
    fn single_bin_uses_entry_energy_for_stopping_power() {
        let table = decades();
        let queried = RefCell::new(Vec::new());
        let acc = FluenceAccumulator::new(|e: f64, _: ParticleKind, _: &str| {
            queried.borrow_mut().push(e);
            Some(2.0)
        });
        let mut spectra = HistogramSet::new(&table);
        let step = TransportStep::charged(ParticleKind::Electron, 5.0, 4.0, "W");
        acc.process(&table, &mut spectra, &step).unwrap();
        assert_eq!(*queried.borrow(), vec![5.0]);
    }

    #[test]
    fn primary_steps_are_mirrored() {
        let table = decades();
        let mut spectra = HistogramSet::new(&table);
        let acc = FluenceAccumulator::new(|_: f64, _: ParticleKind, _: &str| Some(2.0));

        let step = TransportStep::charged(ParticleKind::Positron, 5.0, 4.0, "W").with_primary(true);
        acc.process(&table, &mut spectra, &step).unwrap();

        let electron = spectra.histogram(SpectrumKind::Electron).contents().to_vec();
        let primary = spectra
            .histogram(SpectrumKind::PrimaryElectron)
            .contents()
            .to_vec();
        assert_eq!(electron, primary);
        assert!(approx_eq(primary[2], 0.5, 1e-12));
    }

    #[test]
    fn two_bin_split_at_boundary() {
        let table = decades();
        let mut spectra = HistogramSet::new(&table);
        let acc = FluenceAccumulator::new(linear_dedx);

        let step = TransportStep::charged(ParticleKind::Electron, 5.0, 0.5, "W").with_weight(2.0);
        let x = table.find_lower_bin(0.5).unwrap();
        assert_eq!(
            StepSpan::classify(x, table.find_upper_bin(5.0)),
            StepSpan::TwoBin { boundary: 2 }
        );

        acc.process(&table, &mut spectra, &step).unwrap();

        // low half (1 - 0.5) / S(1) at 0.75, high half (5 - 1) / S(5) at 3.0
        assert!(approx_eq(electron_bin(&spectra, 1), 2.0 * 0.5 / 1.0, 1e-9));
        assert!(approx_eq(electron_bin(&spectra, 2), 2.0 * 4.0 / 5.0, 1e-9));
        assert_eq!(electron_bin(&spectra, 0), 0.0);
    }

    #[test]
    fn two_bin_queries_boundary_and_entry_energy() {
        let table = decades();
        let queried = RefCell::new(Vec::new());
        let acc = FluenceAccumulator::new(|e: f64, _: ParticleKind, _: &str| {
            queried.borrow_mut().push(e);
            Some(1.0)
        });
        let mut spectra = HistogramSet::new(&table);
        let step = TransportStep::charged(ParticleKind::Electron, 5.0, 0.5, "W");
        acc.process(&table, &mut spectra, &step).unwrap();

        let q = queried.borrow();
        assert_eq!(q.len(), 2);
        assert!(approx_eq(q[0], 1.0, 1e-12));
        assert_eq!(q[1], 5.0);
    }

    #[test]
    fn multi_bin_scores_interior_bins_whole() {
        let table = decades();
        let mut spectra = HistogramSet::new(&table);
        let acc = FluenceAccumulator::new(linear_dedx);

        let step = TransportStep::charged(ParticleKind::Electron, 5.0, 0.05, "W");
        acc.process(&table, &mut spectra, &step).unwrap();

        // low piece [0.05, 0.1] / S(0.1), interior [0.1, 1] / S(1), high [1, 5] / S(5)
        assert!(approx_eq(electron_bin(&spectra, 0), 0.05 / 0.1, 1e-9));
        assert!(approx_eq(electron_bin(&spectra, 1), 0.9 / 1.0, 1e-9));
        assert!(approx_eq(electron_bin(&spectra, 2), 4.0 / 5.0, 1e-9));
        assert_eq!(spectra.histogram(SpectrumKind::Electron).entries(), 3);
    }

    #[test]
    fn deposits_sum_to_energy_loss_with_unit_stopping_power() {
        let table = EnergyBinTable::build(0.001, 20.0, 50, true).unwrap();
        let mut spectra = HistogramSet::new(&table);
        let acc = FluenceAccumulator::new(|_: f64, _: ParticleKind, _: &str| Some(1.0));

        let steps = [(18.0, 0.002), (3.0, 2.9), (1.0, 0.5), (0.7, 0.0015)];
        for &(ei, ef) in &steps {
            let step = TransportStep::charged(ParticleKind::Electron, ei, ef, "W");
            acc.process(&table, &mut spectra, &step).unwrap();
        }
        let expected: f64 = steps.iter().map(|(ei, ef)| ei - ef).sum();
        let h = spectra.histogram(SpectrumKind::Electron);
        assert!(approx_eq(h.integral() + h.underflow(), expected, 1e-9));
    }

    #[test]
    fn exit_below_table_goes_to_underflow() {
        let table = decades();
        let mut spectra = HistogramSet::new(&table);
        let acc = FluenceAccumulator::new(|_: f64, _: ParticleKind, _: &str| Some(1.0));

        let step = TransportStep::charged(ParticleKind::Electron, 0.05, 0.0, "W");
        acc.process(&table, &mut spectra, &step).unwrap();

        let h = spectra.histogram(SpectrumKind::Electron);
        assert!(approx_eq(h.underflow(), 0.01, 1e-12));
        assert!(approx_eq(h.contents()[0], 0.04, 1e-12));
    }

    #[test]
    fn photon_scored_at_entry_energy() {
        let table = decades();
        let mut spectra = HistogramSet::new(&table);
        let acc = FluenceAccumulator::new(|_: f64, _: ParticleKind, _: &str| None);

        let step = TransportStep::photon(0.5, 3.0, "W").with_weight(0.25);
        acc.process(&table, &mut spectra, &step).unwrap();

        let h = spectra.histogram(SpectrumKind::Photon);
        assert_eq!(h.contents(), &[0.0, 0.75, 0.0]);
        assert_eq!(spectra.histogram(SpectrumKind::Electron).entries(), 0);
    }

    #[test]
    fn entry_energy_equal_to_maximum_is_accepted() {
        let table = decades();
        let mut spectra = HistogramSet::new(&table);
        let acc = FluenceAccumulator::new(|_: f64, _: ParticleKind, _: &str| Some(1.0));

        let step = TransportStep::charged(ParticleKind::Electron, 10.0, 9.0, "W");
        assert!(acc.process(&table, &mut spectra, &step).is_ok());
        let photon = TransportStep::photon(10.0, 1.0, "W");
        assert!(acc.process(&table, &mut spectra, &photon).is_ok());
    }

    #[test]
    fn entry_energy_above_maximum_fails() {
        let table = decades();
        let mut spectra = HistogramSet::new(&table);
        let acc = FluenceAccumulator::new(|_: f64, _: ParticleKind, _: &str| Some(1.0));

        for particle in [
            ParticleKind::Electron,
            ParticleKind::Photon,
            ParticleKind::Other,
        ] {
            let step = TransportStep::charged(particle, 11.0, 9.0, "W");
            match acc.process(&table, &mut spectra, &step) {
                Err(Error::EnergyRangeExceeded { energy, limit }) => {
                    assert_eq!(energy, 11.0);
                    assert_eq!(limit, 10.0);
                }
                other => panic!("expected range error, got {other:?}"),
            }
        }
    }

    #[test]
    fn zero_length_step_deposits_nothing_without_query() {
        let table = decades();
        let mut spectra = HistogramSet::new(&table);
        let acc = FluenceAccumulator::new(|_: f64, _: ParticleKind, _: &str| -> Option<f64> {
            panic!("stopping power must not be queried")
        });

        let step = TransportStep::charged(ParticleKind::Electron, 1.0, 1.0, "W").with_primary(true);
        acc.process(&table, &mut spectra, &step).unwrap();

        let h = spectra.histogram(SpectrumKind::Electron);
        assert_eq!(h.entries(), 1);
        assert_eq!(h.integral(), 0.0);
        assert_eq!(spectra.histogram(SpectrumKind::PrimaryElectron).entries(), 1);
    }

    #[test]
    fn missing_stopping_power_is_fatal() {
        let table = decades();
        let mut spectra = HistogramSet::new(&table);

        for answer in [None, Some(0.0), Some(-1.0), Some(f64::NAN)] {
            let acc = FluenceAccumulator::new(move |_: f64, _: ParticleKind, _: &str| answer);
            let step = TransportStep::charged(ParticleKind::Electron, 5.0, 4.0, "G4_LUNG");
            match acc.process(&table, &mut spectra, &step) {
                Err(Error::StoppingPowerUnavailable {
                    energy, material, ..
                }) => {
                    assert_eq!(energy, 5.0);
                    assert_eq!(material, "G4_LUNG");
                }
                other => panic!("expected stopping power error, got {other:?}"),
            }
        }
    }

    #[test]
    fn other_particles_are_ignored() {
        let table = decades();
        let mut spectra = HistogramSet::new(&table);
        let acc = FluenceAccumulator::new(|_: f64, _: ParticleKind, _: &str| Some(1.0));

        let step = TransportStep::charged(ParticleKind::Other, 5.0, 1.0, "W");
        acc.process(&table, &mut spectra, &step).unwrap();
        assert_eq!(spectra, HistogramSet::new(&table));
    }

    #[test]
    fn rejects_invalid_steps() {
        let table = decades();
        let mut spectra = HistogramSet::new(&table);
        let acc = FluenceAccumulator::new(|_: f64, _: ParticleKind, _: &str| Some(1.0));

        let gaining = TransportStep::charged(ParticleKind::Electron, 1.0, 2.0, "W");
        let negative_weight =
            TransportStep::charged(ParticleKind::Electron, 2.0, 1.0, "W").with_weight(-1.0);
        let negative_length = TransportStep::photon(1.0, -0.1, "W");
        let nan_energy = TransportStep::charged(ParticleKind::Electron, 2.0, f64::NAN, "W");

        for step in [gaining, negative_weight, negative_length, nan_energy] {
            assert!(matches!(
                acc.process(&table, &mut spectra, &step),
                Err(Error::InvalidStep(_))
            ));
        }
    }
}
