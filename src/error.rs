//! Error types for huf-compress

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompressError {
    #[error("input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("cannot read input file {}: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write output file {}: {source}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a .HUF container (magic {0:02x?})")]
    InvalidMagic([u8; 4]),

    #[error("truncated container: {0}")]
    TruncatedContainer(String),

    #[error("code for symbol {symbol:#04x} is {length} bits, limit is 16")]
    CodeLengthOverflow { symbol: u8, length: usize },

    #[error("malformed header: {0}")]
    MalformedHeader(String),

    #[error("invalid code table: {0}")]
    InvalidCodeTable(String),

    #[error("input is {size} bytes, limit is {limit}")]
    InputTooLarge { size: usize, limit: usize },

    #[error("too many symbols for the entry count field: {0}")]
    TooManySymbols(usize),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CompressError>;
