use super::Format;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("failed to parse {format} data: {details} (at line {line})")]
    Parse {
        format: Format,
        line: usize,
        details: String,
    },

    #[error("failed to encode histogram container: {0}")]
    Encode(#[from] bincode::error::EncodeError),

    #[error("failed to decode histogram container: {0}")]
    Decode(#[from] bincode::error::DecodeError),

    #[error("histogram container is corrupt: {0}")]
    Corrupt(String),
}

impl Error {
    pub fn parse(format: Format, line: usize, details: impl Into<String>) -> Self {
        Self::Parse {
            format,
            line,
            details: details.into(),
        }
    }
}
