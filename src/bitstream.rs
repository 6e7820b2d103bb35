//! Bit packing over `bitstream-io`, first bit in the most significant
//! position. A value must be read back with the [`BitOrder`] it was written
//! with.

use std::io::{self, Read, Write};

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::canonical::Code;

/// Order in which the bits of a multi-bit value enter the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOrder {
    MsbFirst,
    LsbFirst,
}

/// Reverses the lowest `width` bits of `value`.
pub fn reverse_bits(value: u64, width: u32) -> u64 {
    if width == 0 {
        0
    } else {
        value.reverse_bits() >> (64 - width)
    }
}

fn check_width(width: u32) -> io::Result<()> {
    if width > 64 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid bit count: {width}"),
        ));
    }
    Ok(())
}

/// Packs values of arbitrary bit width into a byte sink.
pub struct BitSink<W: Write> {
    inner: BitWriter<W, BigEndian>,
    bits_written: u64,
}

impl<W: Write> BitSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            inner: BitWriter::endian(writer, BigEndian),
            bits_written: 0,
        }
    }

    /// Write the lowest `width` bits of `value` (0-64 bits).
    ///
    /// # Errors
    /// `InvalidInput` if `width > 64` or `value` does not fit in `width` bits,
    /// otherwise whatever the underlying writer reports.
    pub fn write(&mut self, value: u64, width: u32, order: BitOrder) -> io::Result<()> {
        check_width(width)?;
        if width == 0 {
            return Ok(());
        }
        if width < 64 && value >> width != 0 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("value {value} does not fit in {width} bits"),
            ));
        }

        let value = match order {
            BitOrder::MsbFirst => value,
            BitOrder::LsbFirst => reverse_bits(value, width),
        };
        self.inner.write_var(width, value)?;
        self.bits_written += u64::from(width);
        Ok(())
    }

    pub fn write_bit(&mut self, bit: bool) -> io::Result<()> {
        self.inner.write_bit(bit)?;
        self.bits_written += 1;
        Ok(())
    }

    /// Write a prefix code word, first bit first.
    pub fn write_code(&mut self, code: &Code) -> io::Result<()> {
        for &bit in code.bits() {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Total number of bits written so far, excluding padding.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Pad the final partial byte with zeros, flush, and return the sink.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.byte_align()?;
        let mut writer = self.inner.into_writer();
        writer.flush()?;
        Ok(writer)
    }
}

/// Pulls values of arbitrary bit width from a byte source.
///
/// Once the source runs dry the reader is *stopped*: the failing read and
/// every later read return zero, and [`BitSource::is_stopped`] stays true.
/// Callers check the flag after any read that may hit the end of input.
pub struct BitSource<R: Read> {
    inner: BitReader<R, BigEndian>,
    stopped: bool,
}

impl<R: Read> BitSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: BitReader::endian(reader, BigEndian),
            stopped: false,
        }
    }

    /// Read `width` bits (0-64), interpreting them in `order`.
    pub fn read(&mut self, width: u32, order: BitOrder) -> io::Result<u64> {
        check_width(width)?;
        if width == 0 || self.stopped {
            return Ok(0);
        }

        let value = match self.inner.read_var::<u64>(width) {
            Ok(value) => value,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.stopped = true;
                return Ok(0);
            }
            Err(e) => return Err(e),
        };

        Ok(match order {
            BitOrder::MsbFirst => value,
            BitOrder::LsbFirst => reverse_bits(value, width),
        })
    }

    /// Read a single bit; `false` once stopped.
    pub fn read_bit(&mut self) -> io::Result<bool> {
        if self.stopped {
            return Ok(false);
        }
        match self.inner.read_bit() {
            Ok(bit) => Ok(bit),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                self.stopped = true;
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink() -> BitSink<Vec<u8>> {
        BitSink::new(Vec::new())
    }

    #[test]
    fn test_reverse_bits() {
        assert_eq!(reverse_bits(0b110, 3), 0b011);
        assert_eq!(reverse_bits(0b1, 1), 0b1);
        assert_eq!(reverse_bits(0b100000000, 9), 0b000000001);
        assert_eq!(reverse_bits(0xFF, 0), 0);
        assert_eq!(reverse_bits(1, 64), 1 << 63);
    }

    #[test]
    fn test_msb_first_packing() {
        let mut w = sink();
        w.write(0b101, 3, BitOrder::MsbFirst).unwrap();
        w.write(0b11, 2, BitOrder::MsbFirst).unwrap();
        assert_eq!(w.bits_written(), 5);
        // 10111 padded with zeros
        assert_eq!(w.finish().unwrap(), vec![0b1011_1000]);
    }

    #[test]
    fn test_lsb_first_packing() {
        let mut w = sink();
        w.write(0b001, 3, BitOrder::LsbFirst).unwrap();
        assert_eq!(w.finish().unwrap(), vec![0b1000_0000]);
    }

    #[test]
    fn test_nine_bit_fields_cross_bytes() {
        let mut w = sink();
        w.write(258, 9, BitOrder::MsbFirst).unwrap();
        w.write(1, 9, BitOrder::MsbFirst).unwrap();
        let bytes = w.finish().unwrap();
        assert_eq!(bytes, vec![0b1000_0001, 0b0000_0000, 0b0100_0000]);

        let mut r = BitSource::new(bytes.as_slice());
        assert_eq!(r.read(9, BitOrder::MsbFirst).unwrap(), 258);
        assert_eq!(r.read(9, BitOrder::MsbFirst).unwrap(), 1);
        assert!(!r.is_stopped());
    }

    #[test]
    fn test_order_must_match_on_read() {
        let mut w = sink();
        w.write(0b1_0000_0110, 9, BitOrder::LsbFirst).unwrap();
        let bytes = w.finish().unwrap();

        let mut r = BitSource::new(bytes.as_slice());
        assert_eq!(r.read(9, BitOrder::LsbFirst).unwrap(), 0b1_0000_0110);

        let mut r = BitSource::new(bytes.as_slice());
        assert_eq!(r.read(9, BitOrder::MsbFirst).unwrap(), 0b0_1100_0001);
    }

    #[test]
    fn test_single_bits_and_codes() {
        let mut w = sink();
        w.write_bit(true).unwrap();
        w.write_code(&Code::from_bits(vec![false, true, true])).unwrap();
        w.write(1, 1, BitOrder::LsbFirst).unwrap();
        let bytes = w.finish().unwrap();
        assert_eq!(bytes, vec![0b1011_1000]);

        let mut r = BitSource::new(bytes.as_slice());
        let bits: Vec<bool> = (0..5).map(|_| r.read_bit().unwrap()).collect();
        assert_eq!(bits, vec![true, false, true, true, true]);
    }

    #[test]
    fn test_value_too_wide() {
        let mut w = sink();
        assert!(w.write(512, 9, BitOrder::MsbFirst).is_err());
        assert!(w.write(0, 65, BitOrder::MsbFirst).is_err());
    }

    #[test]
    fn test_zero_width() {
        let mut w = sink();
        w.write(0, 0, BitOrder::MsbFirst).unwrap();
        assert!(w.finish().unwrap().is_empty());

        let mut r = BitSource::new(&[0u8; 0][..]);
        assert_eq!(r.read(0, BitOrder::MsbFirst).unwrap(), 0);
        assert!(!r.is_stopped());
    }

    #[test]
    fn test_stopped_is_sticky() {
        let data = [0xFFu8];
        let mut r = BitSource::new(&data[..]);
        assert_eq!(r.read(8, BitOrder::MsbFirst).unwrap(), 0xFF);
        assert!(!r.is_stopped());

        assert_eq!(r.read(9, BitOrder::MsbFirst).unwrap(), 0);
        assert!(r.is_stopped());
        assert!(!r.read_bit().unwrap());
        assert_eq!(r.read(1, BitOrder::MsbFirst).unwrap(), 0);
        assert!(r.is_stopped());
    }

    #[test]
    fn test_partial_read_stops() {
        let data = [0b1010_1010u8];
        let mut r = BitSource::new(&data[..]);
        assert_eq!(r.read(4, BitOrder::MsbFirst).unwrap(), 0b1010);
        // only 4 bits remain
        assert_eq!(r.read(9, BitOrder::MsbFirst).unwrap(), 0);
        assert!(r.is_stopped());
    }
}
