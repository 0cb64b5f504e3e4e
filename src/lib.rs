//! Huffman coding over bytes with a self-describing container format.
//!
//! ```
//! use huffman_container::{compress, decompress, read_container, write_container};
//!
//! let (freq, payload) = compress(b"abracadabra")?;
//! let bytes = write_container(&freq, &payload);
//!
//! let (freq, payload) = read_container(&bytes)?;
//! assert_eq!(decompress(&freq, &payload)?, b"abracadabra");
//! # Ok::<(), huffman_container::HuffmanError>(())
//! ```

pub mod codec;
pub mod container;
pub mod error;
pub mod huffman;
pub mod paths;
pub mod payload;
pub mod stats;

pub use codec::{compress, decode, decompress, encode};
pub use container::{read_container, write_container};
pub use error::{HuffmanError, Result};
pub use huffman::{
    Code, CodeTable, FreqTable, HuffmanTree, Node, build_code_table, build_huffman_tree,
    count_frequencies,
};
pub use payload::EncodedPayload;
pub use stats::{CompressionReport, entropy_from_freq};
