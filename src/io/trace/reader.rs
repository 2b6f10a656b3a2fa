use super::{TraceRecord, TraceStep};
use crate::io::{Format, error::Error};
use crate::model::types::ParticleKind;
use std::io::{BufRead, Lines};

/// Streams records out of a step trace, one line at a time.
///
/// Yields `Err` for the first unreadable or malformed line; callers are
/// expected to stop there.
pub struct TraceReader<R> {
    lines: Lines<R>,
    line_no: usize,
}

impl<R: BufRead> TraceReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    /// Number of the last line consumed, starting at 1.
    pub fn line_no(&self) -> usize {
        self.line_no
    }
}

impl<R: BufRead> Iterator for TraceReader<R> {
    type Item = Result<TraceRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(Error::from(e))),
            };
            self.line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            return Some(parse_line(trimmed, self.line_no));
        }
    }
}

/// Reads a whole trace into memory.
pub fn read<R: BufRead>(reader: R) -> Result<Vec<TraceRecord>, Error> {
    TraceReader::new(reader).collect()
}

fn parse_line(line: &str, line_no: usize) -> Result<TraceRecord, Error> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    match parts[0] {
        "event" if parts.len() == 1 => Ok(TraceRecord::EndEvent),
        "event" => Err(Error::parse(
            Format::Trace,
            line_no,
            "'event' takes no arguments",
        )),
        "step" => parse_step(&parts[1..], line_no).map(TraceRecord::Step),
        other => Err(Error::parse(
            Format::Trace,
            line_no,
            format!("unknown record '{other}'"),
        )),
    }
}

fn parse_step(fields: &[&str], line_no: usize) -> Result<TraceStep, Error> {
    if fields.len() != 7 {
        return Err(Error::parse(
            Format::Trace,
            line_no,
            format!("step record needs 7 fields, found {}", fields.len()),
        ));
    }

    let number = |idx: usize, what: &str| {
        fields[idx].parse::<f64>().map_err(|_| {
            Error::parse(
                Format::Trace,
                line_no,
                format!("invalid {what} '{}'", fields[idx]),
            )
        })
    };

    let is_primary = match fields[5] {
        "1" | "true" => true,
        "0" | "false" => false,
        other => {
            return Err(Error::parse(
                Format::Trace,
                line_no,
                format!("invalid primary flag '{other}' (expected 0 or 1)"),
            ));
        }
    };

    Ok(TraceStep {
        particle: ParticleKind::from_name(fields[0]),
        start_energy: number(1, "start energy")?,
        end_energy: number(2, "end energy")?,
        step_length: number(3, "step length")?,
        weight: number(4, "weight")?,
        is_primary,
        material: fields[6].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE: &str = "\
# two events
step e- 1.2 0.9 0.3 1 1 G4_WATER

step gamma 2 2 5.0 0.5 0 G4_WATER
event
step e+ 0.4 0 0.1 1 0 G4_AIR
event
";

    #[test]
    fn parses_steps_and_event_markers() {
        let records = read(Cursor::new(SAMPLE)).unwrap();
        assert_eq!(records.len(), 5);

        let TraceRecord::Step(first) = &records[0] else {
            panic!("expected a step, got {:?}", records[0]);
        };
        assert_eq!(first.particle, ParticleKind::Electron);
        assert_eq!(first.start_energy, 1.2);
        assert_eq!(first.end_energy, 0.9);
        assert!(first.is_primary);
        assert_eq!(first.material, "G4_WATER");

        let TraceRecord::Step(photon) = &records[1] else {
            panic!("expected a step");
        };
        assert_eq!(photon.particle, ParticleKind::Photon);
        assert_eq!(photon.weight, 0.5);
        assert_eq!(photon.step_length, 5.0);

        assert_eq!(records[2], TraceRecord::EndEvent);
        assert_eq!(records[4], TraceRecord::EndEvent);
    }

    #[test]
    fn as_step_borrows_material() {
        let records = read(Cursor::new("step e+ 0.4 0 0.1 2 0 G4_AIR\n")).unwrap();
        let TraceRecord::Step(owned) = &records[0] else {
            panic!("expected a step");
        };
        let step = owned.as_step();
        assert_eq!(step.particle, ParticleKind::Positron);
        assert_eq!(step.material, "G4_AIR");
        assert_eq!(step.weight, 2.0);
        assert!(!step.is_primary);
    }

    #[test]
    fn unknown_particle_is_other() {
        let records = read(Cursor::new("step proton 10 9 1 1 0 G4_WATER\n")).unwrap();
        let TraceRecord::Step(step) = &records[0] else {
            panic!("expected a step");
        };
        assert_eq!(step.particle, ParticleKind::Other);
    }

    #[test]
    fn errors_report_line_numbers() {
        let input = "# header\n\nstep e- 1.0 abc 0.1 1 0 G4_WATER\n";
        match read(Cursor::new(input)) {
            Err(Error::Parse { format, line, details }) => {
                assert_eq!(format, Format::Trace);
                assert_eq!(line, 3);
                assert!(details.contains("end energy"));
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_records() {
        for bad in [
            "step e- 1 0.5 0.1 1 0\n",
            "step e- 1 0.5 0.1 1 2 G4_WATER\n",
            "event now\n",
            "track e- 1 0.5\n",
        ] {
            assert!(
                matches!(read(Cursor::new(bad)), Err(Error::Parse { line: 1, .. })),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn reader_tracks_consumed_lines() {
        let mut reader = TraceReader::new(Cursor::new(SAMPLE));
        assert!(matches!(reader.next(), Some(Ok(TraceRecord::Step(_)))));
        assert_eq!(reader.line_no(), 2);
        assert!(matches!(reader.next(), Some(Ok(TraceRecord::Step(_)))));
        assert_eq!(reader.line_no(), 4);
    }
}
