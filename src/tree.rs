//! Huffman tree construction
//!
//! Builds a prefix-free code tree from a [`FrequencyTable`] with the classic
//! greedy merge over a min-heap. Ties are broken by insertion order: leaves
//! go in first in ascending symbol order, then every merged node receives the
//! next sequence number. The same input therefore always yields the same tree.

use crate::frequency::FrequencyTable;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use tracing::debug;

/// A node of the code tree. Children are owned outright by their parent.
///
/// Internal children are optional because a tree rebuilt from a code table
/// may have one-sided branches (the single-symbol tree has only a left leaf).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: u8,
        weight: u64,
    },
    Internal {
        weight: u64,
        left: Option<Box<HuffNode>>,
        right: Option<Box<HuffNode>>,
    },
}

impl HuffNode {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    /// Child on the `false` (0, left) or `true` (1, right) edge.
    pub fn child(&self, bit: bool) -> Option<&HuffNode> {
        match self {
            HuffNode::Leaf { .. } => None,
            HuffNode::Internal { left, right, .. } => {
                if bit {
                    right.as_deref()
                } else {
                    left.as_deref()
                }
            }
        }
    }

    fn merge(left: HuffNode, right: HuffNode) -> HuffNode {
        HuffNode::Internal {
            weight: left.weight() + right.weight(),
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    fn collect_codes(&self, prefix: &mut Vec<bool>, codes: &mut Vec<(u8, Vec<bool>)>) {
        match self {
            HuffNode::Leaf { symbol, .. } => codes.push((*symbol, prefix.clone())),
            HuffNode::Internal { left, right, .. } => {
                for (bit, child) in [(false, left), (true, right)] {
                    if let Some(child) = child {
                        prefix.push(bit);
                        child.collect_codes(prefix, codes);
                        prefix.pop();
                    }
                }
            }
        }
    }
}

struct HeapEntry {
    weight: u64,
    seq: usize,
    node: HuffNode,
}

impl Eq for HeapEntry {}
impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.weight == other.weight && self.seq == other.seq
    }
}
impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // min-heap on (weight, seq)
        other
            .weight
            .cmp(&self.weight)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffNode,
    leaf_count: usize,
}

impl HuffmanTree {
    /// Build the optimal code tree for `freq`. Returns `None` for an empty
    /// table, since there is nothing to code.
    ///
    /// With a single distinct symbol the root gets that leaf as its only
    /// (left) child, so the symbol is coded as the one bit `0`.
    pub fn build(freq: &FrequencyTable) -> Option<Self> {
        let mut heap = BinaryHeap::with_capacity(freq.len());
        for (seq, (symbol, weight)) in freq.iter().enumerate() {
            heap.push(HeapEntry {
                weight,
                seq,
                node: HuffNode::Leaf { symbol, weight },
            });
        }
        let leaf_count = heap.len();

        if leaf_count == 1 {
            let only = heap.pop()?.node;
            return Some(Self {
                root: HuffNode::Internal {
                    weight: only.weight(),
                    left: Some(Box::new(only)),
                    right: None,
                },
                leaf_count,
            });
        }

        let mut seq = leaf_count;
        while heap.len() > 1 {
            let (Some(left), Some(right)) = (heap.pop(), heap.pop()) else {
                break;
            };
            let node = HuffNode::merge(left.node, right.node);
            heap.push(HeapEntry {
                weight: node.weight(),
                seq,
                node,
            });
            seq += 1;
        }

        let root = heap.pop()?.node;
        debug!(leaves = leaf_count, weight = root.weight(), "built huffman tree");
        Some(Self { root, leaf_count })
    }

    pub(crate) fn from_parts(root: HuffNode, leaf_count: usize) -> Self {
        Self { root, leaf_count }
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    /// Number of leaves, i.e. distinct symbols.
    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// Root-to-leaf bit path for every leaf, in left-to-right leaf order.
    /// `false` is a left edge, `true` a right edge.
    pub fn codes(&self) -> Vec<(u8, Vec<bool>)> {
        let mut codes = Vec::with_capacity(self.leaf_count);
        self.root.collect_codes(&mut Vec::new(), &mut codes);
        codes
    }
}
