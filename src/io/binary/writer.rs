use super::{MAGIC, VERSION, config};
use crate::io::error::Error;
use crate::model::histogram::HistogramSet;
use std::io::Write;

pub fn write<W: Write>(mut writer: W, spectra: &HistogramSet) -> Result<(), Error> {
    writer.write_all(MAGIC)?;
    writer.write_all(&VERSION.to_le_bytes())?;
    bincode::serde::encode_into_std_write(spectra, &mut writer, config())?;
    writer.flush()?;
    Ok(())
}
