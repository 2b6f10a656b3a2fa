use std::io::{self, Write};

use anyhow::Error;

use super::text::wrap;

#[rustfmt::skip]
pub fn print_error(err: &Error) {
    let mut stderr = io::stderr().lock();

    let _ = writeln!(stderr);
    let _ = writeln!(stderr, "   ╔══════════════════════════════════════════════════════════════╗");
    let _ = writeln!(stderr, "   ║  ✗ Error                                                     ║");
    let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");

    for line in wrap(&err.to_string(), 59) {
        let _ = writeln!(stderr, "   ║  {:<59} ║", line);
    }

    let mut source = err.source();
    while let Some(cause) = source {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Caused by:                                                  ║");
        for line in wrap(&cause.to_string(), 57) {
            let _ = writeln!(stderr, "   ║    {:<57} ║", line);
        }
        source = cause.source();
    }

    let hints = HintCollector::collect(err);
    if !hints.is_empty() {
        let _ = writeln!(stderr, "   ╟──────────────────────────────────────────────────────────────╢");
        let _ = writeln!(stderr, "   ║  Hints:                                                      ║");
        for hint in hints {
            let wrapped = wrap(&hint, 55);
            if let Some((first, rest)) = wrapped.split_first() {
                let _ = writeln!(stderr, "   ║    • {:<55} ║", first);
                for line in rest {
                    let _ = writeln!(stderr, "   ║      {:<55} ║", line);
                }
            }
        }
    }

    let _ = writeln!(stderr, "   ╚══════════════════════════════════════════════════════════════╝");
    let _ = writeln!(stderr);
}

#[derive(Default)]
struct HintCollector {
    hints: Vec<String>,
    has_typed_hints: bool,
}

impl HintCollector {
    fn collect(err: &Error) -> Vec<String> {
        let mut collector = Self::default();

        for cause in err.chain() {
            if let Some(e) = cause.downcast_ref::<tle_fluence::FluenceError>() {
                collector.collect_fluence_hints(e);
            } else if let Some(e) = cause.downcast_ref::<tle_fluence::io::error::Error>() {
                collector.collect_io_hints(e);
            }
            if collector.has_typed_hints {
                break;
            }
        }

        if !collector.has_typed_hints {
            collector.collect_fallback_hints(err);
        }
        collector.hints
    }

    fn add(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
        self.has_typed_hints = true;
    }

    fn collect_fluence_hints(&mut self, err: &tle_fluence::FluenceError) {
        use tle_fluence::FluenceError;

        match err {
            FluenceError::Configuration(_) => {
                self.add("Check --emin, --emax and --bins (or the config file)");
                self.add("Energies must be positive with emin below emax");
            }
            FluenceError::EnergyRangeExceeded { energy, .. } => {
                self.add(format!(
                    "Raise the maximum energy above {energy} MeV with --emax"
                ));
                self.add("Steps are never clamped; the whole trace must fit the range");
            }
            FluenceError::StoppingPowerUnavailable { material, .. } => {
                self.add(format!(
                    "No stopping power for material '{material}' at this energy"
                ));
                self.add("Provide tables covering it with --stopping");
                self.add("Or narrow the binning so steps stay inside the tabulated range");
            }
            FluenceError::InvalidStep(_) => {
                self.add("The trace contains a physically invalid step");
                self.add("Check energies, weight and length on the reported line");
            }
            FluenceError::InvalidTransition { .. } => {
                self.add("Run lifecycle calls arrived out of order");
            }
            FluenceError::StoppingTableParse(_) | FluenceError::StoppingTable(_) => {
                self.add("Stopping-power tables are malformed");
                self.add("Each material needs increasing 'energy' and matching 'electron' columns");
            }
            FluenceError::Output(e) => self.collect_io_hints(e),
        }
    }

    fn collect_io_hints(&mut self, err: &tle_fluence::io::error::Error) {
        use tle_fluence::io::error::Error as IoError;

        match err {
            IoError::Io { source } => self.collect_std_io_hints(source),
            IoError::Parse { line, .. } => {
                self.add(format!("Inspect the input around line {line}"));
                self.add("Step lines read: step <particle> <E_start> <E_end> <length> <weight> <0|1> <material>");
            }
            IoError::Encode(_) => {
                self.add("Encoding the histogram container failed");
            }
            IoError::Decode(_) | IoError::Corrupt(_) => {
                self.add("The file is not a valid histogram container");
                self.add("It may be truncated or written by another tool");
            }
        }
    }

    fn collect_std_io_hints(&mut self, source: &io::Error) {
        use std::io::ErrorKind;

        match source.kind() {
            ErrorKind::NotFound => {
                self.add("File or directory not found");
                self.add("Check the path and that the output directory exists");
            }
            ErrorKind::PermissionDenied => {
                self.add("Permission denied accessing the file");
                self.add("Check file and directory permissions");
            }
            ErrorKind::UnexpectedEof => {
                self.add("Unexpected end of file");
                self.add("The file may be truncated");
            }
            ErrorKind::BrokenPipe => {
                self.add("Output consumer terminated early");
            }
            _ => {
                self.add("I/O operation failed");
                self.add("Check the file path, permissions and disk space");
            }
        }
    }

    fn collect_fallback_hints(&mut self, err: &Error) {
        let msg = error_chain_text(err);

        if msg.contains("terminal") || msg.contains("stdin") {
            self.hints
                .push("Provide a trace via -i/--input or pipe it to stdin".to_string());
        } else if msg.contains("no such file") || msg.contains("not found") {
            self.hints
                .push("Check that the file path is correct".to_string());
        } else if msg.contains("config") {
            self.hints
                .push("Config keys: min_energy, max_energy, bin_count, log_scale, save_as_binary, save_as_text, output".to_string());
        }
    }
}

fn error_chain_text(err: &Error) -> String {
    err.chain()
        .map(|cause| cause.to_string())
        .collect::<Vec<_>>()
        .join("\n")
        .to_lowercase()
}
