//! Core data structures flowing through `tle-fluence`:
//!
//! - [`types`] – Particle species and spectrum identifiers.
//! - [`step`] – Transport-step records delivered by the transport engine.
//! - [`histogram`] – The three energy-binned fluence spectra of a run.
//!
//! Step records are borrowed and ephemeral; the [`HistogramSet`] is the only
//! state that lives for a whole run.
//!
//! [`HistogramSet`]: histogram::HistogramSet

pub mod histogram;
pub mod step;
pub mod types;
