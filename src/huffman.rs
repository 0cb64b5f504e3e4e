use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::fmt;

use log::{debug, trace};

use crate::error::{HuffmanError, Result};

pub type FreqTable = HashMap<u8, u64>;
pub type CodeTable = HashMap<u8, Code>;

/// Path from the root to a leaf: `false` is a left edge, `true` a right edge.
#[derive(Debug, Clone, Default, Eq, PartialEq, Hash)]
pub struct Code(Vec<bool>);

impl Code {
    pub fn new() -> Self {
        Code(Vec::new())
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

    pub fn is_prefix_of(&self, other: &Code) -> bool {
        other.0.starts_with(&self.0)
    }

    fn with_bit(&self, bit: bool) -> Code {
        let mut bits = Vec::with_capacity(self.0.len() + 1);
        bits.extend_from_slice(&self.0);
        bits.push(bit);
        Code(bits)
    }
}

#[cfg(test)]
impl From<&str> for Code {
    /// Builds a code from a `'0'`/`'1'` string; any other character reads as `1`.
    fn from(s: &str) -> Self {
        Code(s.chars().map(|c| c != '0').collect())
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

#[derive(Debug, Eq, PartialEq)]
pub enum Node {
    Leaf {
        byte: u8,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } => *freq,
            Node::Internal { freq, .. } => *freq,
        }
    }

    pub fn symbol(&self) -> Option<u8> {
        match self {
            Node::Leaf { byte, .. } => Some(*byte),
            Node::Internal { .. } => None,
        }
    }

    /// Sum of `freq * depth` over all leaves. A bare leaf root sits at depth 0.
    pub fn weighted_path_length(&self) -> u64 {
        fn walk(node: &Node, depth: u64) -> u64 {
            match node {
                Node::Leaf { freq, .. } => freq * depth,
                Node::Internal { left, right, .. } => {
                    walk(left, depth + 1) + walk(right, depth + 1)
                }
            }
        }
        walk(self, 0)
    }
}

pub type HuffmanTree = Node;

/// Heap entry keyed by `(freq, seq)`; `seq` is the insertion order, so among
/// equal frequencies the node inserted first is extracted first.
#[derive(Eq, PartialEq)]
struct HeapNode {
    freq: u64,
    seq: usize,
    node: Box<Node>,
}

impl Ord for HeapNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so BinaryHeap (a max-heap) pops the smallest key.
        other
            .freq
            .cmp(&self.freq)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for HeapNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

pub fn count_frequencies(data: &[u8]) -> FreqTable {
    let mut freq = FreqTable::new();
    for &b in data {
        *freq.entry(b).or_insert(0) += 1;
    }
    trace!(
        "Counted {} unique symbols over {} bytes",
        freq.len(),
        data.len()
    );
    freq
}

/// Builds the Huffman tree for `frequencies`.
///
/// Leaves are seeded in `(frequency, symbol)` ascending order, so the same
/// table always yields the same tree regardless of map iteration order.
/// The first node popped in each merge becomes the left child.
pub fn build_huffman_tree(frequencies: &FreqTable) -> Result<Box<HuffmanTree>> {
    debug!(
        "Building Huffman Tree from {} unique symbols",
        frequencies.len()
    );
    if frequencies.is_empty() {
        return Err(HuffmanError::EmptyInput);
    }

    let mut freq_vec: Vec<(u8, u64)> = frequencies.iter().map(|(&b, &f)| (b, f)).collect();
    freq_vec.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));

    let mut heap = BinaryHeap::with_capacity(freq_vec.len());
    let mut seq = 0usize;
    for (byte, freq) in freq_vec {
        heap.push(HeapNode {
            freq,
            seq,
            node: Box::new(Node::Leaf { byte, freq }),
        });
        seq += 1;
    }
    trace!("Initial heap size: {}", heap.len());

    while heap.len() > 1 {
        let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
            break;
        };
        let freq = left.freq.checked_add(right.freq).ok_or_else(|| {
            HuffmanError::CorruptContainer(format!(
                "merging weights {} and {} overflows u64",
                left.freq, right.freq
            ))
        })?;
        heap.push(HeapNode {
            freq,
            seq,
            node: Box::new(Node::Internal {
                freq,
                left: left.node,
                right: right.node,
            }),
        });
        seq += 1;
    }
    debug!("Tree construction complete.");

    heap.pop()
        .map(|n| n.node)
        .ok_or(HuffmanError::EmptyInput)
}

/// Returns a fresh code table for the tree rooted at `root`.
///
/// A root that is itself a leaf gets the one-bit code `0`.
pub fn build_code_table(root: &Node) -> CodeTable {
    let mut table = CodeTable::new();
    match root {
        Node::Leaf { byte, .. } => {
            trace!("Single-symbol tree, byte {:#04x} gets code '0'", byte);
            table.insert(*byte, Code::new().with_bit(false));
        }
        Node::Internal { .. } => assign_codes(root, Code::new(), &mut table),
    }
    debug!("Code table built with {} entries", table.len());
    table
}

fn assign_codes(node: &Node, prefix: Code, table: &mut CodeTable) {
    match node {
        Node::Leaf { byte, .. } => {
            trace!(
                "Assigning code to byte {:#04x} ('{}') : '{}'",
                byte,
                (*byte as char).escape_default(),
                prefix
            );
            table.insert(*byte, prefix);
        }
        Node::Internal { left, right, .. } => {
            assign_codes(left, prefix.with_bit(false), table);
            assign_codes(right, prefix.with_bit(true), table);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(u8, u64)]) -> FreqTable {
        pairs.iter().copied().collect()
    }

    /// Optimal cost by trying every merge order; each merge adds its weight.
    fn brute_force_optimal(weights: Vec<u64>) -> u64 {
        if weights.len() <= 1 {
            return 0;
        }
        let mut best = u64::MAX;
        for i in 0..weights.len() {
            for j in (i + 1)..weights.len() {
                let merged = weights[i] + weights[j];
                let mut rest: Vec<u64> = weights
                    .iter()
                    .enumerate()
                    .filter(|&(k, _)| k != i && k != j)
                    .map(|(_, &w)| w)
                    .collect();
                rest.push(merged);
                best = best.min(merged + brute_force_optimal(rest));
            }
        }
        best
    }

    #[test]
    fn counts_every_byte() {
        let freq = count_frequencies(b"abracadabra");
        assert_eq!(freq.len(), 5);
        assert_eq!(freq[&b'a'], 5);
        assert_eq!(freq[&b'b'], 2);
        assert_eq!(freq[&b'r'], 2);
        assert_eq!(freq[&b'c'], 1);
        assert_eq!(freq[&b'd'], 1);
        assert_eq!(freq.values().sum::<u64>(), 11);
    }

    #[test]
    fn empty_input_counts_nothing() {
        assert!(count_frequencies(b"").is_empty());
    }

    #[test]
    fn empty_table_has_no_tree() {
        let err = build_huffman_tree(&FreqTable::new()).unwrap_err();
        assert!(matches!(err, HuffmanError::EmptyInput));
    }

    #[test]
    fn single_symbol_is_a_bare_leaf() {
        let tree = build_huffman_tree(&table(&[(b'x', 4)])).unwrap();
        assert_eq!(*tree, Node::Leaf { byte: b'x', freq: 4 });

        let codes = build_code_table(&tree);
        assert_eq!(codes.len(), 1);
        assert_eq!(codes[&b'x'].to_string(), "0");
    }

    #[test]
    fn overflowing_weights_are_rejected() {
        let err = build_huffman_tree(&table(&[(b'a', u64::MAX), (b'b', 1)])).unwrap_err();
        assert!(matches!(err, HuffmanError::CorruptContainer(_)));
    }

    #[test]
    fn root_weight_is_total_frequency() {
        let freq = count_frequencies(b"mississippi river");
        let tree = build_huffman_tree(&freq).unwrap();
        assert_eq!(tree.freq(), 17);
        assert_eq!(tree.symbol(), None);
    }

    #[test]
    fn equal_frequencies_merge_in_insertion_order() {
        // Seeded as a, b, c, d; a+b is inserted before c+d.
        let tree = build_huffman_tree(&table(&[(b'd', 1), (b'c', 1), (b'b', 1), (b'a', 1)]))
            .unwrap();
        let codes = build_code_table(&tree);
        assert_eq!(codes[&b'a'].to_string(), "00");
        assert_eq!(codes[&b'b'].to_string(), "01");
        assert_eq!(codes[&b'c'].to_string(), "10");
        assert_eq!(codes[&b'd'].to_string(), "11");
    }

    #[test]
    fn rebuild_from_same_table_is_identical() {
        let freq = count_frequencies(b"the quick brown fox jumps over the lazy dog");
        let first = build_huffman_tree(&freq).unwrap();
        let copy: FreqTable = freq.iter().map(|(&b, &f)| (b, f)).collect();
        let second = build_huffman_tree(&copy).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn codes_are_prefix_free() {
        let freq = count_frequencies(b"she sells sea shells by the sea shore");
        let tree = build_huffman_tree(&freq).unwrap();
        let codes = build_code_table(&tree);
        assert_eq!(codes.len(), freq.len());

        for (a, code_a) in &codes {
            for (b, code_b) in &codes {
                if a != b {
                    assert!(
                        !code_a.is_prefix_of(code_b),
                        "{} is a prefix of {}",
                        code_a,
                        code_b
                    );
                }
            }
        }
    }

    #[test]
    fn code_lengths_match_leaf_depths() {
        let freq = count_frequencies(b"abracadabra");
        let tree = build_huffman_tree(&freq).unwrap();
        let codes = build_code_table(&tree);
        let from_codes: u64 = codes
            .iter()
            .map(|(b, code)| freq[b] * code.len() as u64)
            .sum();
        assert_eq!(from_codes, tree.weighted_path_length());
        assert_eq!(tree.weighted_path_length(), 23);
    }

    #[test]
    fn weighted_path_length_is_optimal() {
        let cases: Vec<Vec<u64>> = vec![
            vec![1, 1],
            vec![5, 2, 2, 1, 1],
            vec![1, 1, 1, 1, 1, 1],
            vec![1, 2, 4, 8, 16],
            vec![10, 9, 3, 3, 2, 1],
            vec![7, 7, 7, 1],
            vec![100, 1, 1, 1, 50],
        ];
        for weights in cases {
            let freq: FreqTable = weights
                .iter()
                .enumerate()
                .map(|(i, &w)| (i as u8, w))
                .collect();
            let tree = build_huffman_tree(&freq).unwrap();
            assert_eq!(
                tree.weighted_path_length(),
                brute_force_optimal(weights.clone()),
                "weights {:?}",
                weights
            );
        }
    }

    #[test]
    fn code_table_starts_fresh_each_call() {
        let first = build_huffman_tree(&count_frequencies(b"aab")).unwrap();
        let second = build_huffman_tree(&count_frequencies(b"xyz")).unwrap();
        let _ = build_code_table(&first);
        let codes = build_code_table(&second);
        assert_eq!(codes.len(), 3);
        assert!(!codes.contains_key(&b'a'));
    }
}
