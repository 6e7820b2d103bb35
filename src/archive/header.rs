//! Record header: symbol count, symbols in canonical order, then the code
//! length histogram cut off once it sums to the symbol count.

use std::io::{Read, Write};

use crate::bitstream::{BitOrder, BitSink, BitSource};
use crate::canonical::CanonicalCode;
use crate::error::{MalformedArchive, Result};
use crate::symbol::Symbol;

fn write_field<W: Write>(sink: &mut BitSink<W>, value: u16) -> std::io::Result<()> {
    sink.write(u64::from(value), Symbol::BITS, BitOrder::MsbFirst)
}

fn read_field<R: Read>(source: &mut BitSource<R>) -> Result<u16> {
    let value = source.read(Symbol::BITS, BitOrder::MsbFirst)?;
    if source.is_stopped() {
        return Err(MalformedArchive::Truncated.into());
    }
    Ok(value as u16)
}

pub fn write_header<W: Write>(sink: &mut BitSink<W>, code: &CanonicalCode) -> Result<()> {
    let total = code.len();
    write_field(sink, total as u16)?;

    for symbol in code.symbols() {
        write_field(sink, symbol.value())?;
    }

    let mut running = 0usize;
    for &count in code.length_counts() {
        write_field(sink, count)?;
        running += count as usize;
        if running == total {
            break;
        }
    }
    Ok(())
}

/// Read one record header and rebuild its canonical code.
///
/// # Errors
/// - `Truncated` if the source ends inside the header
/// - `TooFewSymbols`, `SymbolOutOfRange`, `DuplicateSymbol`
/// - `LengthCountMismatch` if the histogram overshoots or never reaches the
///   symbol count
/// - `OversubscribedCodes` if the histogram describes an impossible code
pub fn read_header<R: Read>(source: &mut BitSource<R>) -> Result<CanonicalCode> {
    let total = read_field(source)?;
    if total < 2 {
        return Err(MalformedArchive::TooFewSymbols(total).into());
    }
    let total = total as usize;

    let mut symbols = Vec::with_capacity(total);
    for _ in 0..total {
        let value = read_field(source)?;
        let symbol = Symbol::new(value).ok_or(MalformedArchive::SymbolOutOfRange(value))?;
        symbols.push(symbol);
    }

    // No code can be longer than total - 1, so `total` lengths always suffice.
    let mut length_counts = Vec::new();
    let mut running = 0usize;
    for _ in 0..total {
        let count = read_field(source)?;
        length_counts.push(count);
        running += count as usize;
        if running >= total {
            break;
        }
    }
    if running != total {
        return Err(MalformedArchive::LengthCountMismatch {
            expected: total,
            actual: running,
        }
        .into());
    }

    Ok(CanonicalCode::from_header(symbols, length_counts)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::huffman::{canonical_code, Alphabet};

    fn header_bytes(code: &CanonicalCode) -> Vec<u8> {
        let mut sink = BitSink::new(Vec::new());
        write_header(&mut sink, code).unwrap();
        sink.finish().unwrap()
    }

    /// Pack 9-bit fields by hand.
    fn fields(values: &[u16]) -> Vec<u8> {
        let mut sink = BitSink::new(Vec::new());
        for &v in values {
            sink.write(u64::from(v), 9, BitOrder::MsbFirst).unwrap();
        }
        sink.finish().unwrap()
    }

    #[test]
    fn test_header_round_trip() {
        let code = canonical_code(&Alphabet::for_record(b"notes.txt", b"hello, world")).unwrap();
        let bytes = header_bytes(&code);

        let mut source = BitSource::new(bytes.as_slice());
        let decoded = read_header(&mut source).unwrap();
        assert_eq!(decoded, code);
    }

    #[test]
    fn test_histogram_is_cut_at_total() {
        let code = canonical_code(&Alphabet::for_record(b"a", b"")).unwrap();
        assert_eq!(code.length_counts(), &[0, 4]);

        // count + 4 symbols + 2 length classes
        let mut sink = BitSink::new(Vec::new());
        write_header(&mut sink, &code).unwrap();
        assert_eq!(sink.bits_written(), 9 * (1 + 4 + 2));
    }

    #[test]
    fn test_reader_stops_exactly_at_total() {
        // 2 symbols, both of length 1; a trailing field must be left unread
        let bytes = fields(&[2, 10, 20, 2, 0x1FF]);
        let mut source = BitSource::new(bytes.as_slice());
        let code = read_header(&mut source).unwrap();
        assert_eq!(code.length_counts(), &[2]);
        assert_eq!(source.read(9, BitOrder::MsbFirst).unwrap(), 0x1FF);
    }

    #[test]
    fn test_truncated_header() {
        let bytes = fields(&[3, 10, 20]);
        let mut source = BitSource::new(bytes.as_slice());
        assert!(matches!(
            read_header(&mut source),
            Err(Error::MalformedArchive(MalformedArchive::Truncated))
        ));
    }

    #[test]
    fn test_length_counts_overshoot() {
        let bytes = fields(&[2, 10, 20, 1, 5]);
        let mut source = BitSource::new(bytes.as_slice());
        assert!(matches!(
            read_header(&mut source),
            Err(Error::MalformedArchive(MalformedArchive::LengthCountMismatch {
                expected: 2,
                actual: 6
            }))
        ));
    }

    #[test]
    fn test_length_counts_never_reach_total() {
        // two symbols but only one code across the two allowed lengths
        let bytes = fields(&[2, 10, 20, 0, 1]);
        let mut source = BitSource::new(bytes.as_slice());
        assert!(matches!(
            read_header(&mut source),
            Err(Error::MalformedArchive(MalformedArchive::LengthCountMismatch {
                expected: 2,
                actual: 1
            }))
        ));
    }

    #[test]
    fn test_symbol_out_of_range() {
        let bytes = fields(&[2, 10, 259, 2]);
        let mut source = BitSource::new(bytes.as_slice());
        assert!(matches!(
            read_header(&mut source),
            Err(Error::MalformedArchive(MalformedArchive::SymbolOutOfRange(259)))
        ));
    }

    #[test]
    fn test_too_few_symbols() {
        let bytes = fields(&[1, 10, 1]);
        let mut source = BitSource::new(bytes.as_slice());
        assert!(matches!(
            read_header(&mut source),
            Err(Error::MalformedArchive(MalformedArchive::TooFewSymbols(1)))
        ));
    }
}
