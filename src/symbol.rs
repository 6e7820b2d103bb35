//! Literal bytes plus three sentinels, each 9 bits on the wire.

use std::fmt;

/// Structural markers that never correspond to file data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum Sentinel {
    /// Terminates the file name sub-stream.
    FilenameEnd = 256,
    /// Terminates file content when more records follow.
    OneMoreFile = 257,
    /// Terminates file content of the final record.
    ArchiveEnd = 258,
}

impl Sentinel {
    pub const ALL: [Sentinel; 3] = [
        Sentinel::FilenameEnd,
        Sentinel::OneMoreFile,
        Sentinel::ArchiveEnd,
    ];
}

/// A literal byte (0-255) or a [`Sentinel`] (256-258).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u16);

/// What a decoded symbol stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Byte(u8),
    Sentinel(Sentinel),
}

impl Symbol {
    /// Width of a symbol (and of every header field) on the wire.
    pub const BITS: u32 = 9;

    /// Number of distinct valid symbols.
    pub const ALPHABET_SIZE: usize = 259;

    pub const FILENAME_END: Symbol = Symbol(Sentinel::FilenameEnd as u16);
    pub const ONE_MORE_FILE: Symbol = Symbol(Sentinel::OneMoreFile as u16);
    pub const ARCHIVE_END: Symbol = Symbol(Sentinel::ArchiveEnd as u16);

    pub const fn from_byte(byte: u8) -> Self {
        Symbol(byte as u16)
    }

    /// Accepts any valid symbol value, rejecting anything at or above
    /// [`Symbol::ALPHABET_SIZE`].
    pub fn new(value: u16) -> Option<Self> {
        ((value as usize) < Self::ALPHABET_SIZE).then_some(Symbol(value))
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub fn kind(self) -> SymbolKind {
        // every constructor keeps the value below ALPHABET_SIZE
        match u8::try_from(self.0) {
            Ok(byte) => SymbolKind::Byte(byte),
            Err(_) => SymbolKind::Sentinel(Sentinel::ALL[self.index() - 256]),
        }
    }
}

impl From<Sentinel> for Symbol {
    fn from(sentinel: Sentinel) -> Self {
        Symbol(sentinel as u16)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            SymbolKind::Byte(b) if b.is_ascii_graphic() => write!(f, "'{}'", b as char),
            SymbolKind::Byte(b) => write!(f, "0x{b:02x}"),
            SymbolKind::Sentinel(s) => write!(f, "{s:?}"),
        }
    }
}
