//! On-disk layout for a compressed stream.
//!
//! ```text
//! entry_count : u32 BE
//! entries     : entry_count x (symbol: u8, frequency: u64 BE)
//! bit_len     : u64 BE
//! payload     : ceil(bit_len / 8) bytes, last byte zero-padded
//! ```
//!
//! Only the frequency table is stored; the decoder rebuilds the tree from it.

use std::io::{Cursor, Read};

use log::{debug, trace, warn};

use crate::error::{HuffmanError, Result};
use crate::huffman::FreqTable;
use crate::payload::{EncodedPayload, packed_len};

const ENTRY_SIZE: usize = 1 + 8;
const MAX_ENTRIES: u32 = 256;

/// Serializes a frequency table and its payload into one byte buffer.
pub fn write_container(frequencies: &FreqTable, payload: &EncodedPayload) -> Vec<u8> {
    debug!("Generating frequency header with weights...");

    let mut sorted_freq: Vec<(u8, u64)> = frequencies.iter().map(|(&b, &f)| (b, f)).collect();
    // Heaviest first, ties by symbol, so identical inputs give identical files.
    sorted_freq.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

    let mut bytes =
        Vec::with_capacity(4 + sorted_freq.len() * ENTRY_SIZE + 8 + payload.as_bytes().len());
    bytes.extend_from_slice(&(sorted_freq.len() as u32).to_be_bytes());
    for (symbol, freq) in sorted_freq {
        bytes.push(symbol);
        bytes.extend_from_slice(&freq.to_be_bytes());
    }
    debug!("Header generated. Total header size: {} bytes", bytes.len());

    bytes.extend_from_slice(&payload.len_bits().to_be_bytes());
    bytes.extend_from_slice(payload.as_bytes());
    bytes
}

/// Parses a buffer produced by [`write_container`].
pub fn read_container(content: &[u8]) -> Result<(FreqTable, EncodedPayload)> {
    debug!("Total container size: {} bytes", content.len());
    let mut cursor = Cursor::new(content);

    let count = read_u32(&mut cursor, "entry count")?;
    if count > MAX_ENTRIES {
        return Err(corrupt(format!(
            "entry count {} exceeds the {} possible byte symbols",
            count, MAX_ENTRIES
        )));
    }
    debug!("Frequency entries to process: {}", count);

    let mut freq = FreqTable::with_capacity(count as usize);
    let mut total: u64 = 0;
    for i in 0..count {
        let symbol = read_u8(&mut cursor, "entry symbol")?;
        let weight = read_u64(&mut cursor, "entry frequency")?;
        trace!(
            "Decoded frequency entry {}: byte {:#04x} with weight {}",
            i,
            symbol,
            weight
        );
        if weight == 0 {
            return Err(corrupt(format!("symbol {:#04x} has zero frequency", symbol)));
        }
        if freq.insert(symbol, weight).is_some() {
            return Err(corrupt(format!("symbol {:#04x} listed twice", symbol)));
        }
        total = total
            .checked_add(weight)
            .ok_or_else(|| corrupt("frequency total overflows".to_string()))?;
    }

    let bit_len = read_u64(&mut cursor, "payload bit length")?;
    let start = cursor.position() as usize;
    let available = (content.len() - start) as u64;
    let needed = packed_len(bit_len);
    debug!(
        "Payload declares {} bits ({} bytes), {} bytes available",
        bit_len, needed, available
    );

    if available < needed {
        warn!("Payload truncated: need {} bytes, have {}", needed, available);
        return Err(HuffmanError::MalformedPayload(format!(
            "declared {} bits need {} bytes, only {} available",
            bit_len, needed, available
        )));
    }
    if available > needed {
        return Err(corrupt(format!(
            "{} unexpected trailing bytes after payload",
            available - needed
        )));
    }

    let payload = EncodedPayload::from_parts(content[start..].to_vec(), bit_len)?;
    debug!(
        "Reconstructed frequency map with {} unique symbols covering {} bytes.",
        freq.len(),
        total
    );
    Ok((freq, payload))
}

fn corrupt(msg: String) -> HuffmanError {
    HuffmanError::CorruptContainer(msg)
}

fn read_array<const N: usize>(cursor: &mut Cursor<&[u8]>, what: &str) -> Result<[u8; N]> {
    let mut buf = [0u8; N];
    cursor.read_exact(&mut buf).map_err(|_| {
        corrupt(format!(
            "truncated {} at offset {}",
            what,
            cursor.position()
        ))
    })?;
    Ok(buf)
}

fn read_u8(cursor: &mut Cursor<&[u8]>, what: &str) -> Result<u8> {
    Ok(read_array::<1>(cursor, what)?[0])
}

fn read_u32(cursor: &mut Cursor<&[u8]>, what: &str) -> Result<u32> {
    read_array(cursor, what).map(u32::from_be_bytes)
}

fn read_u64(cursor: &mut Cursor<&[u8]>, what: &str) -> Result<u64> {
    read_array(cursor, what).map(u64::from_be_bytes)
}
