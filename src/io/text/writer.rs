use super::number::format_g;
use crate::io::error::Error;
use crate::model::histogram::HistogramSet;
use crate::model::types::SpectrumKind;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes one spectrum as a plain-text table.
///
/// Three header lines are followed by one `edge content` row per bin and a
/// terminal row holding the last edge and the overflow accumulator.
pub fn write<W: Write>(
    mut writer: W,
    spectra: &HistogramSet,
    kind: SpectrumKind,
) -> Result<(), Error> {
    writeln!(writer, "Number of bins = {}", spectra.bin_count())?;
    writeln!(writer, "Number of events: {}", spectra.events())?;
    writeln!(writer, " Energy Fluence differential in energy")?;
    for (edge, value) in spectra.rows(kind) {
        writeln!(writer, "{} {}", format_g(edge), format_g(value))?;
    }
    writer.flush()?;
    Ok(())
}

/// Path of the text file for `kind`: the output path with its extension
/// dropped and `_<histogram name>.txt` appended.
pub fn spectrum_path(output: &Path, kind: SpectrumKind) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output.with_file_name(format!("{stem}_{}.txt", kind.histogram_name()))
}
