use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, IsTerminal, Read, Stdin, StdoutLock, Write};
use std::path::Path;

use anyhow::{Context, Result};

/// Returns `true` if stderr is a terminal (interactive).
pub fn stderr_is_tty() -> bool {
    io::stderr().is_terminal()
}

pub fn stdin_is_tty() -> bool {
    io::stdin().is_terminal()
}

/// A step trace coming from a file or from stdin.
pub enum TraceSource {
    File(BufReader<File>),
    Stdin(BufReader<Stdin>),
}

impl Read for TraceSource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            TraceSource::File(r) => r.read(buf),
            TraceSource::Stdin(r) => r.read(buf),
        }
    }
}

impl BufRead for TraceSource {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        match self {
            TraceSource::File(r) => r.fill_buf(),
            TraceSource::Stdin(r) => r.fill_buf(),
        }
    }

    fn consume(&mut self, amt: usize) {
        match self {
            TraceSource::File(r) => r.consume(amt),
            TraceSource::Stdin(r) => r.consume(amt),
        }
    }
}

pub fn open_trace(path: Option<&Path>) -> Result<TraceSource> {
    match path {
        Some(p) => {
            let file = File::open(p)
                .with_context(|| format!("Failed to open step trace: {}", p.display()))?;
            Ok(TraceSource::File(BufReader::new(file)))
        }
        None => Ok(TraceSource::Stdin(BufReader::new(io::stdin()))),
    }
}

pub fn open_container(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open histogram container: {}", path.display()))?;
    Ok(BufReader::new(file))
}

pub enum TableTarget {
    File(BufWriter<File>),
    Stdout(BufWriter<StdoutLock<'static>>),
}

impl Write for TableTarget {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            TableTarget::File(w) => w.write(buf),
            TableTarget::Stdout(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            TableTarget::File(w) => w.flush(),
            TableTarget::Stdout(w) => w.flush(),
        }
    }
}

pub fn create_table_target(path: Option<&Path>) -> Result<TableTarget> {
    match path {
        Some(p) => {
            let file = File::create(p)
                .with_context(|| format!("Failed to create output file: {}", p.display()))?;
            Ok(TableTarget::File(BufWriter::new(file)))
        }
        None => Ok(TableTarget::Stdout(BufWriter::new(io::stdout().lock()))),
    }
}
