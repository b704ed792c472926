use byteorder::{ByteOrder, LE};
use fehler::{throw, throws};
use thiserror::Error;

/// Expected more bytes, but found none.
/// Either your input was truncated or you're trying to decompress garbage.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("input ended before the frame did")]
pub struct OutOfInput;

/// A little-endian cursor over a borrowed byte slice.
///
/// Every read checks the remaining length first and advances the cursor,
/// so running off the end surfaces as `OutOfInput` instead of a panic.
/// The reader performs no interpretation beyond endianness; what the bytes
/// mean is entirely the caller's business.
pub struct SliceReader<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> SliceReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader { input, position: 0 }
    }

    /// Borrow the next `n` bytes and advance past them.
    #[throws(OutOfInput)]
    pub fn take(&mut self, n: usize) -> &'a [u8] {
        if self.remaining() < n {
            throw!(OutOfInput);
        }
        let input = self.input;
        let start = self.position;
        self.position += n;
        &input[start..start + n]
    }

    #[throws(OutOfInput)]
    pub fn read_u8(&mut self) -> u8 {
        self.take(1)?[0]
    }

    #[throws(OutOfInput)]
    pub fn read_u16(&mut self) -> u16 {
        LE::read_u16(self.take(2)?)
    }

    #[throws(OutOfInput)]
    pub fn read_u32(&mut self) -> u32 {
        LE::read_u32(self.take(4)?)
    }

    #[throws(OutOfInput)]
    pub fn read_u64(&mut self) -> u64 {
        LE::read_u64(self.take(8)?)
    }

    #[throws(OutOfInput)]
    pub fn skip(&mut self, n: usize) {
        self.take(n)?;
    }

    pub fn offset(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.position
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_little_endian() {
        let mut reader = SliceReader::new(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(reader.read_u8().unwrap(), 1);
        assert_eq!(reader.read_u16().unwrap(), 0x0302);
        assert_eq!(reader.read_u32().unwrap(), 0x0706_0504);
        assert_eq!(reader.offset(), 7);
        assert_eq!(reader.remaining(), 2);
        assert_eq!(reader.read_u64(), Err(OutOfInput));
    }

    #[test]
    fn take_and_skip_advance_the_cursor() {
        let mut reader = SliceReader::new(b"abcdef");
        assert_eq!(reader.take(2).unwrap(), b"ab");
        reader.skip(3).unwrap();
        assert_eq!(reader.offset(), 5);
        assert!(!reader.is_empty());
        assert_eq!(reader.take(2), Err(OutOfInput));
        assert_eq!(reader.take(1).unwrap(), b"f");
        assert!(reader.is_empty());
    }
}
