//! Encoding and decoding against a code table or tree, plus the
//! `compress` / `decompress` entry points.

use std::time::Instant;

use log::{debug, error, info, trace};

use crate::error::{HuffmanError, Result};
use crate::huffman::{
    CodeTable, FreqTable, Node, build_code_table, build_huffman_tree, count_frequencies,
};
use crate::payload::{EncodedPayload, PayloadWriter};

/// Concatenates the code of every byte in `data`.
///
/// Fails with [`HuffmanError::UnknownSymbol`] on the first byte that has no
/// code, without returning a partial payload.
pub fn encode(data: &[u8], code_table: &CodeTable) -> Result<EncodedPayload> {
    debug!("Starting data encoding of {} bytes...", data.len());
    let mut writer = PayloadWriter::with_capacity(data.len() / 2);

    for &byte in data {
        match code_table.get(&byte) {
            Some(code) => writer.write_code(code)?,
            None => {
                error!("Symbol {:#04x} found in data but not in code table", byte);
                return Err(HuffmanError::UnknownSymbol(byte));
            }
        }
    }

    let payload = writer.finish()?;
    debug!(
        "Encoded {} bytes into {} bits ({} packed bytes)",
        data.len(),
        payload.len_bits(),
        payload.as_bytes().len()
    );
    Ok(payload)
}

/// Walks `root` bit by bit to recover the original bytes.
///
/// The payload must end exactly on a code boundary. A root that is a bare
/// leaf uses the one-bit code `0` for its symbol, so every bit must be `0`.
pub fn decode(payload: &EncodedPayload, root: &Node) -> Result<Vec<u8>> {
    debug!("Starting bitstream decoding of {} bits...", payload.len_bits());
    let start_time = Instant::now();

    let result = match root {
        Node::Leaf { byte, .. } => decode_single_symbol(payload, *byte)?,
        Node::Internal { .. } => decode_walk(payload, root)?,
    };

    debug!(
        "Bitstream decoding finished in {:.2?}, {} bytes recovered.",
        start_time.elapsed(),
        result.len()
    );
    Ok(result)
}

fn decode_single_symbol(payload: &EncodedPayload, byte: u8) -> Result<Vec<u8>> {
    let mut result = Vec::with_capacity(payload.len_bits() as usize);
    for (index, bit) in payload.bits().enumerate() {
        if bit? {
            return Err(HuffmanError::MalformedPayload(format!(
                "bit {} is 1 but the only code is '0'",
                index
            )));
        }
        result.push(byte);
    }
    Ok(result)
}

fn decode_walk(payload: &EncodedPayload, root: &Node) -> Result<Vec<u8>> {
    let mut result = Vec::new();
    let mut node = root;

    for bit in payload.bits() {
        if let Node::Internal { left, right, .. } = node {
            node = if bit? { right } else { left };
        }
        if let Node::Leaf { byte, .. } = node {
            result.push(*byte);
            node = root;
        }
    }

    if !std::ptr::eq(node, root) {
        return Err(HuffmanError::MalformedPayload(format!(
            "payload of {} bits ends inside a code after {} symbols",
            payload.len_bits(),
            result.len()
        )));
    }
    trace!("Walk ended on the root after {} symbols", result.len());
    Ok(result)
}

/// Counts, builds the tree and encodes `input`.
///
/// Empty input yields an empty table and an empty payload.
pub fn compress(input: &[u8]) -> Result<(FreqTable, EncodedPayload)> {
    info!("Compressing {} bytes", input.len());
    let freq = count_frequencies(input);
    if freq.is_empty() {
        debug!("Empty input, nothing to encode");
        return Ok((freq, EncodedPayload::new()));
    }

    let tree = build_huffman_tree(&freq)?;
    let table = build_code_table(&tree);
    let payload = encode(input, &table)?;
    Ok((freq, payload))
}

/// Rebuilds the tree from `freq` and decodes `payload`.
///
/// The recovered length must equal the table's frequency total.
pub fn decompress(freq: &FreqTable, payload: &EncodedPayload) -> Result<Vec<u8>> {
    info!(
        "Decompressing {} bits against {} symbols",
        payload.len_bits(),
        freq.len()
    );
    if freq.is_empty() {
        if !payload.is_empty() {
            return Err(HuffmanError::MalformedPayload(format!(
                "{} bits present but the frequency table is empty",
                payload.len_bits()
            )));
        }
        return Ok(Vec::new());
    }

    let tree = build_huffman_tree(freq)?;
    let decoded = decode(payload, &tree)?;

    let expected = tree.freq();
    if decoded.len() as u64 != expected {
        return Err(HuffmanError::MalformedPayload(format!(
            "decoded {} symbols, frequency table accounts for {}",
            decoded.len(),
            expected
        )));
    }
    Ok(decoded)
}
