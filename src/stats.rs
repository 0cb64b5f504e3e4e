use std::fmt;

use log::debug;

use crate::huffman::FreqTable;
use crate::payload::EncodedPayload;

/// Shannon entropy of the table in bits per symbol; `0.0` when empty.
pub fn entropy_from_freq(freq: &FreqTable) -> f64 {
    let total: u64 = freq.values().sum();
    if total == 0 {
        return 0.0;
    }
    let total_f = total as f64;

    let entropy: f64 = freq
        .values()
        .map(|&count| {
            let p = count as f64 / total_f;
            -p * p.log2()
        })
        .sum();

    debug!(
        "Calculated entropy: {:.4} bits/symbol (Total samples: {})",
        entropy, total
    );
    entropy
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompressionReport {
    pub input_bytes: u64,
    pub container_bytes: u64,
    pub payload_bits: u64,
    pub entropy: f64,
    /// Payload bits per input symbol.
    pub average_code_len: f64,
    /// Space saved by the container relative to the raw input, in percent.
    pub ratio: f64,
}

impl CompressionReport {
    pub fn new(freq: &FreqTable, payload: &EncodedPayload, container_bytes: u64) -> Self {
        let input_bytes: u64 = freq.values().sum();
        let payload_bits = payload.len_bits();
        let (average_code_len, ratio) = if input_bytes > 0 {
            (
                payload_bits as f64 / input_bytes as f64,
                100.0 * (1.0 - container_bytes as f64 / input_bytes as f64),
            )
        } else {
            (0.0, 0.0)
        };

        Self {
            input_bytes,
            container_bytes,
            payload_bits,
            entropy: entropy_from_freq(freq),
            average_code_len,
            ratio,
        }
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Original:    {} bytes", self.input_bytes)?;
        writeln!(f, "Container:   {} bytes", self.container_bytes)?;
        writeln!(f, "Payload:     {} bits", self.payload_bits)?;
        writeln!(f, "Entropy:     {:.4} bits/symbol", self.entropy)?;
        writeln!(f, "Code length: {:.4} bits/symbol", self.average_code_len)?;
        write!(f, "Ratio:       {:.2}%", self.ratio)
    }
}
