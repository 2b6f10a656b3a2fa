//! Persistence of fluence spectra and ingestion of step traces.
//!
//! Writers take any [`std::io::Write`] and readers any [`std::io::Read`] or
//! [`std::io::BufRead`], so files, buffers and pipes are interchangeable.
//! The [`sink`] module wires the writers to the output path of a run.

use std::fmt;

pub mod error;

pub mod binary;
pub mod sink;
pub mod text;
pub mod trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Binary,
    Trace,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Text => write!(f, "spectrum text"),
            Format::Binary => write!(f, "histogram container"),
            Format::Trace => write!(f, "step trace"),
        }
    }
}
