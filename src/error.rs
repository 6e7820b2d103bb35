use thiserror::Error;

use crate::symbol::Symbol;

/// Top-level error type for archive operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Underlying byte source or sink failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive contents are inconsistent or truncated
    #[error("malformed archive: {0}")]
    MalformedArchive(#[from] MalformedArchive),

    /// A Huffman tree needs at least two leaves
    #[error("degenerate alphabet: {distinct} distinct symbol(s), need at least 2")]
    DegenerateAlphabet { distinct: usize },

    #[error("an archive must contain at least one file")]
    EmptyArchive,

    #[error("archive already ended with its last record")]
    ArchiveSealed,

    #[error("archive finished without a last record")]
    UnterminatedArchive,

    /// Entry name unusable as a path or not representable in the archive
    #[error("invalid entry name {name:?}: {reason}")]
    InvalidEntryName { name: String, reason: &'static str },
}

/// Ways an archive stream can fail to describe a valid sequence of records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedArchive {
    #[error("unexpected end of archive")]
    Truncated,

    #[error("record declares {0} symbols, need at least 2")]
    TooFewSymbols(u16),

    #[error("symbol value {0} is out of range")]
    SymbolOutOfRange(u16),

    #[error("symbol {0} is listed more than once")]
    DuplicateSymbol(Symbol),

    /// Code length histogram does not add up to the symbol count
    #[error("code length counts sum to {actual}, expected {expected}")]
    LengthCountMismatch { expected: usize, actual: usize },

    #[error("code lengths over-subscribe the code space")]
    OversubscribedCodes,

    /// Bit path has no continuation in the decode trie
    #[error("bit sequence does not match any code")]
    DeadEnd,

    #[error("symbol {symbol} cannot appear in {context}")]
    UnexpectedSymbol {
        symbol: Symbol,
        context: &'static str,
    },

    #[error("file name is not valid UTF-8")]
    NonUtf8Name,
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
