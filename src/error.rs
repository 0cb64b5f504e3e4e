//! Error types for compression, decompression and container handling.

use thiserror::Error;

/// Errors surfaced by the Huffman core.
#[derive(Debug, Error)]
pub enum HuffmanError {
    /// A tree was requested for an empty frequency table.
    #[error("cannot build a Huffman tree from an empty frequency table")]
    EmptyInput,

    /// The input holds a symbol the code table does not cover.
    #[error("symbol {0:#04x} is not present in the code table")]
    UnknownSymbol(u8),

    /// The bit stream does not decompose into whole codes.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// The serialized container failed structural validation.
    #[error("corrupt container: {0}")]
    CorruptContainer(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for Huffman operations.
pub type Result<T> = std::result::Result<T, HuffmanError>;
