// src/archive/decode.rs

use std::io::Read;

use tracing::debug;

use crate::archive::header::read_header;
use crate::archive::ArchiveEntry;
use crate::bitstream::BitSource;
use crate::error::{MalformedArchive, Result};
use crate::symbol::{Sentinel, Symbol, SymbolKind};
use crate::trie::{Node, Trie};

/// Reads records from an archive stream until `ARCHIVE_END`.
pub struct ArchiveDecoder<R: Read> {
    source: BitSource<R>,
    records: usize,
    finished: bool,
}

impl<R: Read> ArchiveDecoder<R> {
    pub fn new(reader: R) -> Self {
        ArchiveDecoder {
            source: BitSource::new(reader),
            records: 0,
            finished: false,
        }
    }

    /// True once the `ARCHIVE_END` record has been decoded (or decoding
    /// failed).
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Decode the next record, or `None` after the last one.
    pub fn next_entry(&mut self) -> Result<Option<ArchiveEntry>> {
        if self.finished {
            return Ok(None);
        }
        match self.decode_record() {
            Ok(entry) => Ok(Some(entry)),
            Err(e) => {
                self.finished = true;
                Err(e)
            }
        }
    }

    fn decode_record(&mut self) -> Result<ArchiveEntry> {
        let code = read_header(&mut self.source)?;
        let trie = code.decode_trie()?;

        let mut name = Vec::new();
        loop {
            let symbol = self.next_symbol(&trie)?;
            match symbol.kind() {
                SymbolKind::Byte(b) => name.push(b),
                SymbolKind::Sentinel(Sentinel::FilenameEnd) => break,
                SymbolKind::Sentinel(_) => {
                    return Err(MalformedArchive::UnexpectedSymbol {
                        symbol,
                        context: "a file name",
                    }
                    .into());
                }
            }
        }
        let name = String::from_utf8(name).map_err(|_| MalformedArchive::NonUtf8Name)?;

        let mut contents = Vec::new();
        let more = loop {
            let symbol = self.next_symbol(&trie)?;
            match symbol.kind() {
                SymbolKind::Byte(b) => contents.push(b),
                SymbolKind::Sentinel(Sentinel::OneMoreFile) => break true,
                SymbolKind::Sentinel(Sentinel::ArchiveEnd) => break false,
                SymbolKind::Sentinel(Sentinel::FilenameEnd) => {
                    return Err(MalformedArchive::UnexpectedSymbol {
                        symbol,
                        context: "file contents",
                    }
                    .into());
                }
            }
        };

        self.records += 1;
        self.finished = !more;
        debug!(
            record = self.records,
            name = %name,
            bytes = contents.len(),
            symbols = code.len(),
            last = !more,
            "decoded record"
        );
        Ok(ArchiveEntry { name, contents })
    }

    /// Walk the trie from the root, one bit per edge, until a leaf.
    fn next_symbol(&mut self, trie: &Trie) -> Result<Symbol> {
        let mut node = trie.root();
        loop {
            if let Node::Leaf(symbol) = trie.node(node) {
                return Ok(*symbol);
            }
            let bit = self.source.read_bit()?;
            if self.source.is_stopped() {
                return Err(MalformedArchive::Truncated.into());
            }
            node = trie.child(node, bit).ok_or(MalformedArchive::DeadEnd)?;
        }
    }
}

impl<R: Read> Iterator for ArchiveDecoder<R> {
    type Item = Result<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}

/// Decode every record of an archive.
///
/// Either all entries are returned or none: the first malformed record fails
/// the whole call.
pub fn read_archive<R: Read>(reader: R) -> Result<Vec<ArchiveEntry>> {
    ArchiveDecoder::new(reader).collect()
}
