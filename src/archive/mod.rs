//! Records packed into one bit stream with no padding between them:
//!
//! ```text
//! +----------------------------------------------+
//! | symbol_count              (9 bits)           |
//! | symbol × symbol_count     (9 bits each)      |  canonical order
//! | length counts             (9 bits each)      |  lengths 1, 2, ... until
//! |                                              |  the sum hits symbol_count
//! +----------------------------------------------+
//! | name bytes                (Huffman codes)    |
//! | FILENAME_END              (Huffman code)     |
//! | content bytes             (Huffman codes)    |
//! | ONE_MORE_FILE | ARCHIVE_END (Huffman code)   |
//! +----------------------------------------------+
//! ```
//!
//! Only the end of the last record is padded to a byte boundary.

pub mod decode;
pub mod encode;
pub mod header;

pub use decode::{read_archive, ArchiveDecoder};
pub use encode::{write_archive, ArchiveEncoder, RecordStats};

/// One archived file: its stored name and raw contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    pub name: String,
    pub contents: Vec<u8>,
}

impl ArchiveEntry {
    pub fn new(name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        ArchiveEntry {
            name: name.into(),
            contents: contents.into(),
        }
    }
}
