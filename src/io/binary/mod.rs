//! Self-describing binary container for a [`HistogramSet`].
//!
//! The file starts with the four magic bytes `TLEF` and a little-endian
//! `u16` format version, followed by the set encoded with bincode's standard
//! configuration.
//!
//! [`HistogramSet`]: crate::model::histogram::HistogramSet

mod reader;
mod writer;

pub use reader::read;
pub use writer::write;

pub(crate) const MAGIC: &[u8; 4] = b"TLEF";
pub(crate) const VERSION: u16 = 1;

fn config() -> bincode::config::Configuration {
    bincode::config::standard()
}
