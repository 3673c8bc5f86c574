//! huf-compress: static Huffman compression into a compact `.HUF` container.
//!
//! The pipeline for encoding is:
//! - count byte frequencies
//! - build the Huffman tree and extract its code table
//! - pack every input byte's code into a bitstream
//! - write header, table and payload
//!
//! Decoding reads the table back, rebuilds an equivalent tree from it and
//! walks that tree over the payload bits.

pub mod bits;
pub mod code_table;
pub mod config;
pub mod container;
pub mod error;
pub mod file_io;
pub mod frequency;
pub mod tree;

use crate::code_table::CodeTable;
use crate::config::CodecConfig;
use crate::error::{CompressError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;
use std::path::Path;
use tracing::{debug, info};

pub use crate::container::ContainerInfo;

/// Compress `input` into a complete container.
///
/// Empty input produces a header-only container with no entries.
pub fn encode(input: &[u8]) -> Result<Vec<u8>> {
    let freq = FrequencyTable::from_bytes(input);
    let Some(tree) = HuffmanTree::build(&freq) else {
        debug!("empty input, writing header-only container");
        return container::write(&CodeTable::default(), 0, &[]);
    };
    let table = CodeTable::from_tree(&tree)?;
    let packed = bits::pack(input, &table.lookup())?;
    debug!(
        symbols = table.len(),
        payload = packed.bytes.len(),
        "encoded input"
    );
    container::write(&table, packed.trailing_bits, &packed.bytes)
}

/// Reconstruct the original bytes from a container produced by [`encode`].
pub fn decode(data: &[u8]) -> Result<Vec<u8>> {
    let container = container::read(data)?;
    let tree = container.table.to_tree()?;
    bits::unpack(container.payload, container.header.trailing_bits, &tree)
}

/// Statistics for one file operation. Sizes and ratio are always stated
/// as uncompressed vs. container, whichever direction the operation ran.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CompressionStats {
    pub original_size: usize,
    pub compressed_size: usize,
    /// `compressed_size / original_size`, 1.0 for empty input.
    pub ratio: f64,
    /// Shannon entropy of the original bytes, in bits per byte.
    pub entropy_bits: f64,
}

impl CompressionStats {
    fn new(original: &[u8], compressed: &[u8]) -> Self {
        let ratio = if original.is_empty() {
            1.0
        } else {
            compressed.len() as f64 / original.len() as f64
        };
        Self {
            original_size: original.len(),
            compressed_size: compressed.len(),
            ratio,
            entropy_bits: FrequencyTable::from_bytes(original).entropy_bits(),
        }
    }
}

/// File-level encoder/decoder. Each call reads its input fully, builds the
/// whole output in memory and only then writes it.
pub struct Compressor {
    config: CodecConfig,
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(CodecConfig::default())
    }
}

impl Compressor {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode in memory, honoring the size limit and optional verification.
    pub fn encode_bytes(&self, input: &[u8]) -> Result<Vec<u8>> {
        self.config.check_size(input.len())?;
        let encoded = encode(input)?;
        if self.config.verify_after_encode && decode(&encoded)? != input {
            return Err(CompressError::InvalidCodeTable(
                "encoded container does not decode to its input".into(),
            ));
        }
        Ok(encoded)
    }

    pub fn decode_bytes(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.config.check_size(data.len())?;
        decode(data)
    }

    pub fn encode_file(&self, input: &Path, output: &Path) -> Result<CompressionStats> {
        let data = file_io::read_input(input)?;
        let encoded = self.encode_bytes(&data)?;
        file_io::write_output(output, &encoded, self.config.atomic_write)?;
        let stats = CompressionStats::new(&data, &encoded);
        info!(
            input = %input.display(),
            output = %output.display(),
            ratio = stats.ratio,
            "encoded file"
        );
        Ok(stats)
    }

    pub fn decode_file(&self, input: &Path, output: &Path) -> Result<CompressionStats> {
        let data = file_io::read_input(input)?;
        let decoded = self.decode_bytes(&data)?;
        file_io::write_output(output, &decoded, self.config.atomic_write)?;
        let stats = CompressionStats::new(&decoded, &data);
        info!(
            input = %input.display(),
            output = %output.display(),
            bytes = decoded.len(),
            "decoded file"
        );
        Ok(stats)
    }

    pub fn inspect_file(&self, input: &Path) -> Result<ContainerInfo> {
        let data = file_io::read_input(input)?;
        self.config.check_size(data.len())?;
        container::inspect(&data)
    }
}
