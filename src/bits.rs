//! Bit packing and tree-walk unpacking of the payload
//!
//! Codes are written most-significant-bit first into each byte. The last byte
//! is zero padded; `trailing_bits` records how many of its leading bits are
//! real (1..=8), and is 0 only when there is no payload at all.

use crate::code_table::CodeEntry;
use crate::error::{CompressError, Result};
use crate::tree::{HuffNode, HuffmanTree};
use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedPayload {
    pub bytes: Vec<u8>,
    pub trailing_bits: u8,
    pub bit_len: u64,
}

/// Meaningful bit count of the final byte for a stream of `bit_len` bits.
pub fn trailing_bits_for(bit_len: u64) -> u8 {
    if bit_len == 0 {
        0
    } else {
        ((bit_len - 1) % 8 + 1) as u8
    }
}

/// Number of code bits carried by a payload of `payload_len` bytes whose
/// last byte holds `trailing_bits` meaningful bits.
pub fn payload_bit_len(payload_len: usize, trailing_bits: u16) -> Result<u64> {
    match (payload_len, trailing_bits) {
        (0, 0) => Ok(0),
        (0, t) => Err(CompressError::MalformedHeader(format!(
            "trailing bit count {t} with an empty payload"
        ))),
        (_, 0) => Err(CompressError::MalformedHeader(
            "trailing bit count 0 with a non-empty payload".into(),
        )),
        (_, t) if t > 8 => Err(CompressError::MalformedHeader(format!(
            "trailing bit count {t} exceeds 8"
        ))),
        (n, t) => Ok((n as u64 - 1) * 8 + t as u64),
    }
}

/// Concatenate the code of every input byte and pack the bits.
pub fn pack(data: &[u8], codes: &[Option<CodeEntry>; 256]) -> Result<PackedPayload> {
    let mut writer = BitWriter::endian(Vec::with_capacity(data.len() / 2 + 1), BigEndian);
    let mut bit_len = 0u64;
    for &b in data {
        let entry = codes[b as usize].ok_or_else(|| {
            CompressError::InvalidCodeTable(format!("no code for symbol {b:#04x}"))
        })?;
        writer.write(entry.length as u32, entry.bits)?;
        bit_len += entry.length as u64;
    }
    writer.byte_align()?;
    let bytes = writer.into_writer();

    let trailing_bits = trailing_bits_for(bit_len);
    debug!(bit_len, bytes = bytes.len(), trailing_bits, "packed payload");
    Ok(PackedPayload {
        bytes,
        trailing_bits,
        bit_len,
    })
}

/// Decode `payload` by walking `tree` one bit at a time. Padding bits after
/// the last meaningful bit are never fed to the walk.
pub fn unpack(payload: &[u8], trailing_bits: u16, tree: &HuffmanTree) -> Result<Vec<u8>> {
    let total_bits = payload_bit_len(payload.len(), trailing_bits)?;
    let mut reader = BitReader::endian(payload, BigEndian);
    let mut output = Vec::with_capacity(payload.len() * 2);

    let root = tree.root();
    let mut node = root;
    for pos in 0..total_bits {
        let bit = reader.read_bit()?;
        node = node.child(bit).ok_or_else(|| {
            CompressError::TruncatedContainer(format!("bit {pos} leads off the code tree"))
        })?;
        if let HuffNode::Leaf { symbol, .. } = node {
            output.push(*symbol);
            node = root;
        }
    }

    if !std::ptr::eq(node, root) {
        return Err(CompressError::TruncatedContainer(
            "payload ends in the middle of a code".into(),
        ));
    }
    debug!(bits = total_bits, symbols = output.len(), "unpacked payload");
    Ok(output)
}
