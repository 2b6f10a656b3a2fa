use super::{MAGIC, VERSION, config};
use crate::fluence::EnergyBinTable;
use crate::io::error::Error;
use crate::model::histogram::HistogramSet;
use std::io::Read;

/// Reads a container written by [`super::write`].
///
/// # Errors
///
/// Returns [`Error::Corrupt`] when the header is wrong or the decoded set is
/// structurally inconsistent, and [`Error::Decode`] when the payload cannot
/// be decoded.
pub fn read<R: Read>(mut reader: R) -> Result<HistogramSet, Error> {
    let mut magic = [0u8; 4];
    reader.read_exact(&mut magic)?;
    if &magic != MAGIC {
        return Err(Error::Corrupt("missing TLEF header".to_string()));
    }

    let mut version = [0u8; 2];
    reader.read_exact(&mut version)?;
    let version = u16::from_le_bytes(version);
    if version != VERSION {
        return Err(Error::Corrupt(format!(
            "unsupported container version {version} (expected {VERSION})"
        )));
    }

    let spectra: HistogramSet = bincode::serde::decode_from_std_read(&mut reader, config())?;
    verify(&spectra)?;
    Ok(spectra)
}

fn verify(spectra: &HistogramSet) -> Result<(), Error> {
    if spectra.edges().len() < 2 {
        return Err(Error::Corrupt("fewer than two bin edges".to_string()));
    }
    if !spectra.is_consistent() {
        return Err(Error::Corrupt(
            "spectrum length does not match the bin count".to_string(),
        ));
    }

    let bins = spectra.bins();
    let rebuilt = EnergyBinTable::build(
        bins.min_energy(),
        bins.max_energy(),
        bins.bin_count(),
        bins.is_log_scale(),
    )
    .map_err(|e| Error::Corrupt(format!("invalid energy binning: {e}")))?;
    if !rebuilt.same_binning(bins) {
        return Err(Error::Corrupt(
            "stored bin edges do not match the stored range".to_string(),
        ));
    }
    Ok(())
}
