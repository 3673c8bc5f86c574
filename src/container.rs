//! `.HUF` container layout
//!
//! ```text
//! magic          4 bytes   ".HUF"
//! entry_count    u16 LE
//! trailing_bits  u16 LE    meaningful bits in the last payload byte
//! entries        entry_count x { symbol u8, length u8, bits u16 LE }
//! payload        everything up to the end of the buffer
//! ```
//!
//! The payload length is never stored, it is whatever follows the table.

use crate::bits::payload_bit_len;
use crate::code_table::{CodeEntry, CodeTable};
use crate::error::{CompressError, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const MAGIC: [u8; 4] = *b".HUF";
pub const HEADER_SIZE: usize = 8;
pub const ENTRY_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub magic: [u8; 4],
    pub entry_count: u16,
    pub trailing_bits: u16,
}

/// A parsed container borrowing its payload from the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container<'a> {
    pub header: Header,
    pub table: CodeTable,
    pub payload: &'a [u8],
}

/// Summary of a container for display, without decoding the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContainerInfo {
    pub entry_count: u16,
    pub trailing_bits: u16,
    pub payload_len: usize,
    pub payload_bits: u64,
    pub entries: Vec<CodeEntry>,
}

fn bincode_err(e: bincode::Error) -> CompressError {
    match *e {
        bincode::ErrorKind::Io(io) => CompressError::Io(io),
        other => CompressError::TruncatedContainer(other.to_string()),
    }
}

/// Serialize header, table and payload into one buffer.
pub fn write(table: &CodeTable, trailing_bits: u8, payload: &[u8]) -> Result<Vec<u8>> {
    let entry_count = u16::try_from(table.len())
        .map_err(|_| CompressError::TooManySymbols(table.len()))?;
    let header = Header {
        magic: MAGIC,
        entry_count,
        trailing_bits: trailing_bits as u16,
    };

    let mut out = Vec::with_capacity(HEADER_SIZE + table.len() * ENTRY_SIZE + payload.len());
    bincode::serialize_into(&mut out, &header).map_err(bincode_err)?;
    for entry in table.entries() {
        bincode::serialize_into(&mut out, entry).map_err(bincode_err)?;
    }
    out.extend_from_slice(payload);
    Ok(out)
}

/// Parse a full container buffer. The magic is checked before anything else.
pub fn read(data: &[u8]) -> Result<Container<'_>> {
    if data.len() < MAGIC.len() || data[..MAGIC.len()] != MAGIC {
        let mut found = [0u8; 4];
        let n = data.len().min(4);
        found[..n].copy_from_slice(&data[..n]);
        warn!(magic = ?found, "rejecting container with bad magic");
        return Err(CompressError::InvalidMagic(found));
    }
    if data.len() < HEADER_SIZE {
        return Err(CompressError::TruncatedContainer(format!(
            "header needs {HEADER_SIZE} bytes, got {}",
            data.len()
        )));
    }
    let header: Header = bincode::deserialize(&data[..HEADER_SIZE]).map_err(bincode_err)?;

    if header.entry_count as usize > 256 {
        return Err(CompressError::MalformedHeader(format!(
            "{} entries for a 256-symbol alphabet",
            header.entry_count
        )));
    }

    let table_end = HEADER_SIZE + header.entry_count as usize * ENTRY_SIZE;
    if data.len() < table_end {
        return Err(CompressError::TruncatedContainer(format!(
            "code table needs {} entries, only {} bytes follow the header",
            header.entry_count,
            data.len() - HEADER_SIZE
        )));
    }

    let entries = data[HEADER_SIZE..table_end]
        .chunks_exact(ENTRY_SIZE)
        .map(|chunk| bincode::deserialize::<CodeEntry>(chunk).map_err(bincode_err))
        .collect::<Result<Vec<_>>>()?;
    let table = CodeTable::from_entries(entries)?;

    Ok(Container {
        header,
        table,
        payload: &data[table_end..],
    })
}

/// Validate header and table and describe the container.
pub fn inspect(data: &[u8]) -> Result<ContainerInfo> {
    let container = read(data)?;
    let payload_bits = payload_bit_len(container.payload.len(), container.header.trailing_bits)?;
    Ok(ContainerInfo {
        entry_count: container.header.entry_count,
        trailing_bits: container.header.trailing_bits,
        payload_len: container.payload.len(),
        payload_bits,
        entries: container.table.entries().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> CodeTable {
        CodeTable::from_entries(vec![
            CodeEntry { symbol: b'a', length: 1, bits: 0 },
            CodeEntry { symbol: b'b', length: 2, bits: 0b11 },
            CodeEntry { symbol: b'c', length: 2, bits: 0b10 },
        ])
        .unwrap()
    }

    #[test]
    fn test_exact_layout() {
        let bytes = write(&sample_table(), 1, &[0x2b, 0x00]).unwrap();
        assert_eq!(
            bytes,
            vec![
                b'.', b'H', b'U', b'F', // magic
                3, 0, // entry_count
                1, 0, // trailing_bits
                b'a', 1, 0, 0, //
                b'b', 2, 3, 0, //
                b'c', 2, 2, 0, //
                0x2b, 0x00,
            ]
        );
        assert_eq!(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]), 0x4655482e);
    }

    #[test]
    fn test_read_back() {
        let bytes = write(&sample_table(), 1, &[0x2b, 0x00]).unwrap();
        let c = read(&bytes).unwrap();
        assert_eq!(c.header.entry_count, 3);
        assert_eq!(c.header.trailing_bits, 1);
        assert_eq!(c.table, sample_table());
        assert_eq!(c.payload, &[0x2b, 0x00]);
    }

    #[test]
    fn test_empty_container() {
        let bytes = write(&CodeTable::default(), 0, &[]).unwrap();
        assert_eq!(bytes.len(), HEADER_SIZE);
        let info = inspect(&bytes).unwrap();
        assert_eq!(info.entry_count, 0);
        assert_eq!(info.payload_len, 0);
        assert_eq!(info.payload_bits, 0);
    }

    #[test]
    fn test_bad_magic() {
        let mut bytes = write(&sample_table(), 1, &[0x2b, 0x00]).unwrap();
        bytes[0] = b'X';
        assert!(matches!(read(&bytes), Err(CompressError::InvalidMagic(m)) if &m == b"XHUF"));
        assert!(matches!(read(b""), Err(CompressError::InvalidMagic(_))));
        assert!(matches!(read(b".HU"), Err(CompressError::InvalidMagic(_))));
    }

    #[test]
    fn test_truncated() {
        let bytes = write(&sample_table(), 1, &[0x2b, 0x00]).unwrap();
        assert!(matches!(read(&bytes[..6]), Err(CompressError::TruncatedContainer(_))));
        assert!(matches!(read(&bytes[..14]), Err(CompressError::TruncatedContainer(_))));
    }

    #[test]
    fn test_entry_count_too_large() {
        let mut bytes = MAGIC.to_vec();
        bytes.extend_from_slice(&300u16.to_le_bytes());
        bytes.extend_from_slice(&0u16.to_le_bytes());
        assert!(matches!(read(&bytes), Err(CompressError::MalformedHeader(_))));
    }

    #[test]
    fn test_info_serializes() {
        let bytes = write(&sample_table(), 1, &[0x2b, 0x00]).unwrap();
        let info = inspect(&bytes).unwrap();
        assert_eq!(info.payload_bits, 9);
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["entry_count"], 3);
        assert_eq!(json["entries"][1]["symbol"], b'b');
    }
}
