//! Canonical code assignment shared by the encoder (from tree depths) and the
//! decoder (from a record header).

use std::fmt;

use crate::error::{Error, MalformedArchive, Result};
use crate::symbol::Symbol;
use crate::trie::Trie;

/// A prefix code word, first transmitted bit first.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn from_bits(bits: Vec<bool>) -> Self {
        Code(bits)
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// This code extended by one bit.
    pub fn with_bit(&self, bit: bool) -> Code {
        let mut bits = Vec::with_capacity(self.0.len() + 1);
        bits.extend_from_slice(&self.0);
        bits.push(bit);
        Code(bits)
    }

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.0 {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Assign canonical code words for `total` symbols given how many codes
/// exist at each length (`length_counts[0]` is length 1).
///
/// # Errors
/// - `OversubscribedCodes` if the counts ask for more words than the code
///   space holds
/// - `LengthCountMismatch` if the counts cover fewer than `total` symbols
pub fn assign_codes(
    length_counts: &[u16],
    total: usize,
) -> std::result::Result<Vec<Code>, MalformedArchive> {
    let mut remaining = length_counts.to_vec();
    let mut path = vec![false];
    let mut codes = Vec::with_capacity(total);

    while codes.len() < total {
        let len = path.len();
        if len == 0 {
            return Err(MalformedArchive::OversubscribedCodes);
        }
        if len > remaining.len() {
            return Err(MalformedArchive::LengthCountMismatch {
                expected: total,
                actual: codes.len(),
            });
        }

        if remaining[len - 1] == 0 {
            path.push(false);
            continue;
        }
        remaining[len - 1] -= 1;
        codes.push(Code(path.clone()));

        while path.last() == Some(&true) {
            path.pop();
        }
        if let Some(last) = path.last_mut() {
            *last = true;
        }
    }

    Ok(codes)
}

/// A complete canonical code table for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalCode {
    /// Ascending by code length, then by symbol value.
    symbols: Vec<Symbol>,
    /// Codes per length, from length 1 up to the longest length used.
    length_counts: Vec<u16>,
    /// Parallel to `symbols`.
    codes: Vec<Code>,
}

impl CanonicalCode {
    /// Build the canonical code from per-symbol code lengths (leaf depths).
    ///
    /// # Errors
    /// - `DegenerateAlphabet` for fewer than two symbols or a zero length
    /// - `MalformedArchive` if the lengths cannot form a prefix code
    pub fn from_lengths<I>(lengths: I) -> Result<Self>
    where
        I: IntoIterator<Item = (Symbol, usize)>,
    {
        let mut by_length: Vec<(usize, Symbol)> =
            lengths.into_iter().map(|(s, len)| (len, s)).collect();
        by_length.sort_unstable();

        let distinct = by_length.len();
        if distinct < 2 || by_length.iter().any(|&(len, _)| len == 0) {
            return Err(Error::DegenerateAlphabet { distinct });
        }
        let mut seen = [false; Symbol::ALPHABET_SIZE];
        for &(_, symbol) in &by_length {
            if std::mem::replace(&mut seen[symbol.index()], true) {
                return Err(MalformedArchive::DuplicateSymbol(symbol).into());
            }
        }

        let max_len = by_length.last().map_or(0, |&(len, _)| len);
        let mut length_counts = vec![0u16; max_len];
        for &(len, _) in &by_length {
            length_counts[len - 1] += 1;
        }

        let symbols: Vec<Symbol> = by_length.into_iter().map(|(_, s)| s).collect();
        let codes = assign_codes(&length_counts, symbols.len())?;
        Ok(CanonicalCode {
            symbols,
            length_counts,
            codes,
        })
    }

    /// Rebuild the canonical code from the fields of a record header.
    pub fn from_header(
        symbols: Vec<Symbol>,
        length_counts: Vec<u16>,
    ) -> std::result::Result<Self, MalformedArchive> {
        if symbols.len() < 2 {
            return Err(MalformedArchive::TooFewSymbols(symbols.len() as u16));
        }

        let declared: usize = length_counts.iter().map(|&c| c as usize).sum();
        if declared != symbols.len() {
            return Err(MalformedArchive::LengthCountMismatch {
                expected: symbols.len(),
                actual: declared,
            });
        }

        let mut seen = [false; Symbol::ALPHABET_SIZE];
        for &symbol in &symbols {
            if std::mem::replace(&mut seen[symbol.index()], true) {
                return Err(MalformedArchive::DuplicateSymbol(symbol));
            }
        }

        let codes = assign_codes(&length_counts, symbols.len())?;
        Ok(CanonicalCode {
            symbols,
            length_counts,
            codes,
        })
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn length_counts(&self) -> &[u16] {
        &self.length_counts
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// (symbol, code) pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Code)> {
        self.symbols.iter().copied().zip(self.codes.iter())
    }

    /// Symbol-indexed lookup for encoding.
    pub fn code_table(&self) -> CodeTable {
        let mut codes = vec![None; Symbol::ALPHABET_SIZE];
        for (symbol, code) in self.iter() {
            codes[symbol.index()] = Some(code.clone());
        }
        CodeTable { codes }
    }

    /// Build the decode trie holding every code.
    pub fn decode_trie(&self) -> std::result::Result<Trie, MalformedArchive> {
        let mut trie = Trie::new();
        for (symbol, code) in self.iter() {
            trie.insert(code, symbol)?;
        }
        Ok(trie)
    }
}

/// Codes indexed by symbol value.
#[derive(Debug, Clone)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    pub fn get(&self, symbol: Symbol) -> Option<&Code> {
        self.codes[symbol.index()].as_ref()
    }
}
