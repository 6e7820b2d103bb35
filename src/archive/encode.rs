//! Archive encoding: one Huffman code per record, one shared bit stream.

use std::io::{self, Write};

use tracing::debug;

use crate::archive::header::write_header;
use crate::archive::ArchiveEntry;
use crate::bitstream::BitSink;
use crate::canonical::{Code, CodeTable};
use crate::error::{Error, Result};
use crate::huffman::{canonical_code, Alphabet};
use crate::symbol::Symbol;

/// Size breakdown of one encoded record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordStats {
    pub symbols: usize,
    pub header_bits: u64,
    pub payload_bits: u64,
}

/// Writes records into a single archive stream.
///
/// Records must be appended in file order; the record flagged `last` closes
/// the archive and [`ArchiveEncoder::finish`] pads the final byte.
pub struct ArchiveEncoder<W: Write> {
    sink: BitSink<W>,
    records: usize,
    sealed: bool,
}

fn lookup(table: &CodeTable, symbol: Symbol) -> io::Result<&Code> {
    table
        .get(symbol)
        .ok_or_else(|| io::Error::other(format!("no code assigned to symbol {symbol}")))
}

impl<W: Write> ArchiveEncoder<W> {
    pub fn new(writer: W) -> Self {
        ArchiveEncoder {
            sink: BitSink::new(writer),
            records: 0,
            sealed: false,
        }
    }

    /// Encode one file as a record.
    ///
    /// # Errors
    /// - `ArchiveSealed` if the last record was already written
    /// - `Io` if the underlying writer fails
    pub fn append(&mut self, name: &str, contents: &[u8], last: bool) -> Result<RecordStats> {
        if self.sealed {
            return Err(Error::ArchiveSealed);
        }

        let alphabet = Alphabet::for_record(name.as_bytes(), contents);
        let code = canonical_code(&alphabet)?;
        let table = code.code_table();

        let start = self.sink.bits_written();
        write_header(&mut self.sink, &code)?;
        let header_end = self.sink.bits_written();

        for &b in name.as_bytes() {
            self.sink.write_code(lookup(&table, Symbol::from_byte(b))?)?;
        }
        self.sink.write_code(lookup(&table, Symbol::FILENAME_END)?)?;

        for &b in contents {
            self.sink.write_code(lookup(&table, Symbol::from_byte(b))?)?;
        }

        let terminator = if last {
            Symbol::ARCHIVE_END
        } else {
            Symbol::ONE_MORE_FILE
        };
        self.sink.write_code(lookup(&table, terminator)?)?;

        self.records += 1;
        self.sealed = last;

        let stats = RecordStats {
            symbols: code.len(),
            header_bits: header_end - start,
            payload_bits: self.sink.bits_written() - header_end,
        };
        debug!(
            record = self.records,
            name,
            bytes = contents.len(),
            symbols = stats.symbols,
            header_bits = stats.header_bits,
            payload_bits = stats.payload_bits,
            "encoded record"
        );
        Ok(stats)
    }

    /// Pad the last byte and hand back the writer.
    ///
    /// # Errors
    /// `EmptyArchive` if nothing was written, `UnterminatedArchive` if no
    /// record was flagged `last`.
    pub fn finish(self) -> Result<W> {
        if self.records == 0 {
            return Err(Error::EmptyArchive);
        }
        if !self.sealed {
            return Err(Error::UnterminatedArchive);
        }
        Ok(self.sink.finish()?)
    }
}

/// Encode `entries` in order, marking the final one as the archive end.
pub fn write_archive<W: Write>(entries: &[ArchiveEntry], writer: W) -> Result<W> {
    if entries.is_empty() {
        return Err(Error::EmptyArchive);
    }

    let mut encoder = ArchiveEncoder::new(writer);
    let last = entries.len() - 1;
    for (i, entry) in entries.iter().enumerate() {
        encoder.append(&entry.name, &entry.contents, i == last)?;
    }
    encoder.finish()
}
