//! Multi-file archiver with one canonical Huffman code per file.

pub mod archive;
pub mod archiver;
pub mod bitstream;
pub mod canonical;
pub mod error;
pub mod heap;
pub mod huffman;
pub mod symbol;
pub mod trie;

pub use archive::{read_archive, write_archive, ArchiveDecoder, ArchiveEncoder, ArchiveEntry};
pub use error::{Error, MalformedArchive, Result};
pub use symbol::{Sentinel, Symbol};
