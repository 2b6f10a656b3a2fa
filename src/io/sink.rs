//! Destinations for the finalized spectra of a run.

use super::error::Error;
use super::{binary, text};
use crate::model::histogram::HistogramSet;
use crate::model::types::SpectrumKind;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

/// Persists a finalized [`HistogramSet`].
pub trait SpectrumSink: fmt::Debug {
    fn save(&mut self, spectra: &HistogramSet) -> Result<(), Error>;

    /// Short human-readable description of where the data goes.
    fn describe(&self) -> String;
}

/// Writes one plain-text table per spectrum next to the output path.
#[derive(Debug, Clone)]
pub struct TextSink {
    output: PathBuf,
}

impl TextSink {
    /// Fails if the directory that will hold the files does not exist.
    pub fn new(output: impl Into<PathBuf>) -> Result<Self, Error> {
        let output = output.into();
        ensure_parent_dir(&output)?;
        Ok(Self { output })
    }

    /// Paths of the files written by [`SpectrumSink::save`], in write order.
    pub fn paths(&self) -> Vec<PathBuf> {
        SpectrumKind::ALL
            .iter()
            .map(|&kind| text::spectrum_path(&self.output, kind))
            .collect()
    }
}

impl SpectrumSink for TextSink {
    fn save(&mut self, spectra: &HistogramSet) -> Result<(), Error> {
        for kind in SpectrumKind::ALL {
            let path = text::spectrum_path(&self.output, kind);
            let file = File::create(&path)?;
            text::write(BufWriter::new(file), spectra, kind)?;
        }
        Ok(())
    }

    fn describe(&self) -> String {
        let paths: Vec<String> = self
            .paths()
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        format!("text tables {}", paths.join(", "))
    }
}

/// Writes the binary histogram container to the output path.
///
/// The file is created (and truncated) when the sink is opened, so an
/// unwritable destination is reported before any event is processed.
#[derive(Debug)]
pub struct BinarySink {
    output: PathBuf,
    file: Option<File>,
}

impl BinarySink {
    pub fn create(output: impl Into<PathBuf>) -> Result<Self, Error> {
        let output = output.into();
        let file = File::create(&output)?;
        Ok(Self {
            output,
            file: Some(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.output
    }
}

impl SpectrumSink for BinarySink {
    fn save(&mut self, spectra: &HistogramSet) -> Result<(), Error> {
        let file = match self.file.take() {
            Some(file) => file,
            None => File::create(&self.output)?,
        };
        binary::write(BufWriter::new(file), spectra)
    }

    fn describe(&self) -> String {
        format!("histogram container {}", self.output.display())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), Error> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => Err(Error::from(
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("output directory '{}' does not exist", dir.display()),
            ),
        )),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fluence::EnergyBinTable;
    use std::fs;

    fn sample() -> HistogramSet {
        let table = EnergyBinTable::build(0.1, 10.0, 2, true).unwrap();
        let mut spectra = HistogramSet::new(&table);
        spectra.accumulate(SpectrumKind::Electron, 0.5, 1.0);
        spectra.record_event();
        spectra
    }

    #[test]
    fn text_sink_writes_three_tables() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = TextSink::new(dir.path().join("run.tlef")).unwrap();
        sink.save(&sample()).unwrap();

        let names: Vec<_> = sink
            .paths()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            [
                "run_ElectronTrackLengthFluence.txt",
                "run_PrimaryElectronTrackLengthFluence.txt",
                "run_PhotonTrackLength.txt",
            ]
        );
        let electron = fs::read_to_string(&sink.paths()[0]).unwrap();
        assert!(electron.starts_with("Number of bins = 2\nNumber of events: 1\n"));
        assert!(electron.contains("\n0.1 1\n1 0\n10 0\n"));
    }

    #[test]
    fn text_sink_needs_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = TextSink::new(dir.path().join("missing/run.tlef")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn binary_sink_creates_file_when_opened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.tlef");
        let mut sink = BinarySink::create(&path).unwrap();
        assert!(path.exists());

        let spectra = sample();
        sink.save(&spectra).unwrap();
        let restored = binary::read(File::open(&path).unwrap()).unwrap();
        assert_eq!(restored, spectra);
    }

    #[test]
    fn binary_sink_reports_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BinarySink::create(dir.path().join("nope/run.tlef")).is_err());
    }
}
