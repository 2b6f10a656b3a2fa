use anyhow::{Context, Result};

use tle_fluence::SpectrumKind;
use tle_fluence::io::{binary, text};

use crate::cli::ShowArgs;
use crate::display::{Context as DisplayContext, print_run_summary, print_spectra};
use crate::io::{create_table_target, open_container};

pub fn run_show(args: ShowArgs, ctx: DisplayContext) -> Result<()> {
    let reader = open_container(&args.file)?;
    let spectra = binary::read(reader)
        .with_context(|| format!("Failed to read histogram container: {}", args.file.display()))?;

    if ctx.interactive {
        print_run_summary(&spectra);
        print_spectra(&spectra);
    }

    let kind = SpectrumKind::from(args.spectrum);
    let target = create_table_target(args.output.as_deref())?;
    text::write(target, &spectra, kind)
        .with_context(|| format!("Failed to write the {} table", kind.label()))?;

    Ok(())
}
