//! Flat code table: extraction from a tree and reconstruction into one
//!
//! A code is stored as `(length, bits)` where `bits` holds the code read
//! most-significant-bit first: the edge leaving the root is bit `length - 1`.

use crate::error::{CompressError, Result};
use crate::tree::{HuffNode, HuffmanTree};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub const MAX_CODE_LENGTH: usize = 16;

/// One symbol's code. Field order matches the on-disk entry record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeEntry {
    pub symbol: u8,
    pub length: u8,
    pub bits: u16,
}

impl CodeEntry {
    /// Bit `i` of the code, counting from the root. `i` must be below
    /// `length`, and `length` at most [`MAX_CODE_LENGTH`].
    pub(crate) fn bit(&self, i: u8) -> bool {
        debug_assert!(i < self.length && self.length as usize <= MAX_CODE_LENGTH);
        (self.bits >> (self.length - 1 - i)) & 1 == 1
    }

    /// The code as a `0`/`1` string, root edge first. Lengths beyond
    /// [`MAX_CODE_LENGTH`] are cut off there.
    pub fn code_string(&self) -> String {
        let len = self.length.min(MAX_CODE_LENGTH as u8);
        (0..len)
            .map(|i| if (self.bits >> (len - 1 - i)) & 1 == 1 { '1' } else { '0' })
            .collect()
    }
}

/// All leaf codes of a tree, ordered by ascending symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    entries: Vec<CodeEntry>,
}

impl CodeTable {
    /// Extract the table from a built tree. Fails with `CodeLengthOverflow`
    /// if any leaf sits deeper than [`MAX_CODE_LENGTH`].
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self> {
        let mut entries = Vec::with_capacity(tree.leaf_count());
        for (symbol, path) in tree.codes() {
            if path.len() > MAX_CODE_LENGTH {
                return Err(CompressError::CodeLengthOverflow {
                    symbol,
                    length: path.len(),
                });
            }
            let bits = path.iter().fold(0u16, |acc, &b| (acc << 1) | b as u16);
            entries.push(CodeEntry {
                symbol,
                length: path.len() as u8,
                bits,
            });
        }
        entries.sort_by_key(|e| e.symbol);
        Ok(Self { entries })
    }

    /// Wrap entries read from a container, checking that each one is usable.
    pub fn from_entries(entries: Vec<CodeEntry>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(entries.len());
        for e in &entries {
            if e.length == 0 || e.length as usize > MAX_CODE_LENGTH {
                return Err(CompressError::InvalidCodeTable(format!(
                    "symbol {:#04x} has code length {}",
                    e.symbol, e.length
                )));
            }
            if (e.length as usize) < MAX_CODE_LENGTH && e.bits >> e.length != 0 {
                return Err(CompressError::InvalidCodeTable(format!(
                    "symbol {:#04x} code bits {:#06x} exceed length {}",
                    e.symbol, e.bits, e.length
                )));
            }
            if !seen.insert(e.symbol) {
                return Err(CompressError::InvalidCodeTable(format!(
                    "duplicate symbol {:#04x}",
                    e.symbol
                )));
            }
        }
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[CodeEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct symbol-indexed lookup for the packer.
    pub fn lookup(&self) -> [Option<CodeEntry>; 256] {
        let mut table = [None; 256];
        for e in &self.entries {
            table[e.symbol as usize] = Some(*e);
        }
        table
    }

    /// Rebuild a tree with the same leaf-to-code mapping by walking each
    /// code from the root and creating internal nodes as needed.
    pub fn to_tree(&self) -> Result<HuffmanTree> {
        let mut root = HuffNode::Internal {
            weight: 0,
            left: None,
            right: None,
        };
        for e in &self.entries {
            insert_leaf(&mut root, e)?;
        }
        Ok(HuffmanTree::from_parts(root, self.entries.len()))
    }
}

fn insert_leaf(root: &mut HuffNode, entry: &CodeEntry) -> Result<()> {
    let conflict = || {
        CompressError::InvalidCodeTable(format!(
            "code {} for symbol {:#04x} collides with another code",
            entry.code_string(),
            entry.symbol
        ))
    };

    let mut node = root;
    for i in 0..entry.length {
        let HuffNode::Internal { left, right, .. } = node else {
            return Err(conflict());
        };
        let slot = if entry.bit(i) { right } else { left };
        let last = i + 1 == entry.length;
        if last {
            if slot.is_some() {
                return Err(conflict());
            }
            *slot = Some(Box::new(HuffNode::Leaf {
                symbol: entry.symbol,
                weight: 0,
            }));
            return Ok(());
        }
        node = &mut **slot.get_or_insert_with(|| {
            Box::new(HuffNode::Internal {
                weight: 0,
                left: None,
                right: None,
            })
        });
    }
    Err(conflict())
}
