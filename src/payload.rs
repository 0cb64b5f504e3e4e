//! Packed bit sequence produced by the encoder.
//!
//! Bits are stored MSB-first; the final byte is zero-padded and `bit_len`
//! records where the real bits stop.

use std::io::Cursor;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::error::{HuffmanError, Result};
use crate::huffman::Code;

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct EncodedPayload {
    bytes: Vec<u8>,
    bit_len: u64,
}

impl EncodedPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps already-packed bytes, checking they hold exactly `bit_len` bits.
    pub fn from_parts(bytes: Vec<u8>, bit_len: u64) -> Result<Self> {
        let expected = packed_len(bit_len);
        let actual = bytes.len() as u64;
        if actual < expected {
            return Err(HuffmanError::MalformedPayload(format!(
                "declared {} bits need {} bytes, only {} available",
                bit_len, expected, actual
            )));
        }
        if actual > expected {
            return Err(HuffmanError::MalformedPayload(format!(
                "declared {} bits need {} bytes, got {}",
                bit_len, expected, actual
            )));
        }
        Ok(Self { bytes, bit_len })
    }

    pub fn len_bits(&self) -> u64 {
        self.bit_len
    }

    pub fn is_empty(&self) -> bool {
        self.bit_len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Iterates the `bit_len` meaningful bits; padding is never yielded.
    pub fn bits(&self) -> PayloadBits<'_> {
        PayloadBits {
            reader: BitReader::endian(Cursor::new(self.bytes.as_slice()), BigEndian),
            remaining: self.bit_len,
        }
    }
}

/// Number of bytes needed to hold `bit_len` bits.
pub fn packed_len(bit_len: u64) -> u64 {
    bit_len.div_ceil(8)
}

pub struct PayloadBits<'a> {
    reader: BitReader<Cursor<&'a [u8]>, BigEndian>,
    remaining: u64,
}

impl Iterator for PayloadBits<'_> {
    type Item = Result<bool>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.reader.read_bit().map_err(|e| {
            HuffmanError::MalformedPayload(format!("ran out of packed bits: {}", e))
        }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (n, Some(n))
    }
}

/// Accumulates codes into a packed payload.
pub struct PayloadWriter {
    writer: BitWriter<Vec<u8>, BigEndian>,
    bit_len: u64,
}

impl PayloadWriter {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            writer: BitWriter::endian(Vec::with_capacity(bytes), BigEndian),
            bit_len: 0,
        }
    }

    pub fn write_code(&mut self, code: &Code) -> Result<()> {
        for &bit in code.bits() {
            self.writer.write_bit(bit)?;
        }
        self.bit_len += code.len() as u64;
        Ok(())
    }

    /// Zero-pads the last byte and returns the finished payload.
    pub fn finish(mut self) -> Result<EncodedPayload> {
        self.writer.byte_align()?;
        Ok(EncodedPayload {
            bytes: self.writer.into_writer(),
            bit_len: self.bit_len,
        })
    }
}

impl Default for PayloadWriter {
    fn default() -> Self {
        Self::new()
    }
}
