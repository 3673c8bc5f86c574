//! Integration tests for huf-compress

use huf_compress::config::CodecConfig;
use huf_compress::error::CompressError;
use huf_compress::frequency::FrequencyTable;
use huf_compress::tree::HuffmanTree;
use huf_compress::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn test_roundtrip_random_inputs() {
    let mut rng = StdRng::seed_from_u64(0x4655_482e);
    for _ in 0..200 {
        let len = rng.gen_range(0..2000);
        let alphabet = rng.gen_range(1..=256u32);
        let data: Vec<u8> = (0..len)
            .map(|_| rng.gen_range(0..alphabet) as u8)
            .collect();
        let encoded = encode(&data).unwrap();
        assert_eq!(decode(&encoded).unwrap(), data);
    }
}

#[test]
fn test_random_trees_are_prefix_free() {
    let mut rng = StdRng::seed_from_u64(0x4655_482e);
    for _ in 0..200 {
        let len = rng.gen_range(1..2000);
        let alphabet = rng.gen_range(1..=256u32);
        let data: Vec<u8> = (0..len)
            .map(|_| rng.gen_range(0..alphabet) as u8)
            .collect();
        let tree = HuffmanTree::build(&FrequencyTable::from_bytes(&data)).unwrap();
        let codes = tree.codes();
        assert_eq!(codes.len(), tree.leaf_count());
        for (i, (sym_a, a)) in codes.iter().enumerate() {
            assert!(!a.is_empty(), "symbol {sym_a} has an empty code");
            for (sym_b, b) in &codes[i + 1..] {
                assert!(
                    !b.starts_with(a) && !a.starts_with(b),
                    "codes for {sym_a} and {sym_b} overlap"
                );
            }
        }
    }
}

#[test]
fn test_roundtrip_edge_inputs() {
    let cases: Vec<Vec<u8>> = vec![
        vec![],
        vec![0],
        vec![0xff; 7],
        vec![0xff; 8],
        vec![0xff; 9],
        b"ab".to_vec(),
        (0..=255).collect(),
        (0..=255).cycle().take(5000).collect(),
    ];
    for data in cases {
        let encoded = encode(&data).unwrap();
        assert_eq!(decode(&encoded).unwrap(), data, "failed for {} bytes", data.len());
    }
}

#[test]
fn test_skewed_distribution() {
    // Geometric-ish weights up to 2^15 stay within the 16-bit code limit.
    let mut data = Vec::new();
    for sym in 0..16u8 {
        data.extend(std::iter::repeat(sym).take(1 << sym));
    }
    let encoded = encode(&data).unwrap();
    assert_eq!(decode(&encoded).unwrap(), data);
}

#[test]
fn test_code_length_overflow() {
    // Fibonacci counts over 25 symbols force codes deeper than 16 bits.
    let (mut a, mut b) = (1usize, 1usize);
    let mut data = Vec::new();
    for sym in 0..25u8 {
        data.extend(std::iter::repeat(sym).take(a));
        (a, b) = (b, a + b);
    }
    let err = encode(&data).unwrap_err();
    assert!(matches!(err, CompressError::CodeLengthOverflow { .. }));
}

#[test]
fn test_deterministic_containers() {
    let data = b"the quick brown fox jumps over the lazy dog".repeat(20);
    assert_eq!(encode(&data).unwrap(), encode(&data).unwrap());
}

#[test]
fn test_altered_magic() {
    let mut encoded = encode(b"some data to corrupt").unwrap();
    encoded[3] ^= 0xff;
    assert!(matches!(decode(&encoded), Err(CompressError::InvalidMagic(_))));
}

#[test]
fn test_truncated_table() {
    let encoded = encode(b"some data to truncate").unwrap();
    assert!(matches!(
        decode(&encoded[..10]),
        Err(CompressError::TruncatedContainer(_))
    ));
}

#[test]
fn test_trailing_bit_tamper_detected() {
    // "aaabbc" packs to 9 bits. Claiming the whole last byte is meaningful
    // feeds its seven zero padding bits to the walk, each decoding as `a`.
    let mut encoded = encode(b"aaabbc").unwrap();
    assert_eq!(encoded[6], 1);
    encoded[6] = 8;
    assert_eq!(decode(&encoded).unwrap(), b"aaabbcaaaaaaa");
}

#[test]
fn test_file_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("input.txt");
    let packed = dir.path().join("out/packed.huf");
    let restored = dir.path().join("out/restored.txt");
    let data = b"hello world hello world hello".repeat(30);
    std::fs::write(&input, &data).unwrap();

    let compressor = Compressor::default();
    let stats = compressor.encode_file(&input, &packed).unwrap();
    assert_eq!(stats.original_size, data.len());
    assert!(stats.ratio < 1.0);
    assert!(stats.entropy_bits > 0.0);

    let info = compressor.inspect_file(&packed).unwrap();
    assert_eq!(info.entry_count, 8);

    compressor.decode_file(&packed, &restored).unwrap();
    assert_eq!(std::fs::read(&restored).unwrap(), data);
}

#[test]
fn test_failed_decode_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("bogus.huf");
    let output = dir.path().join("restored.bin");
    std::fs::write(&bogus, b"not a container").unwrap();

    let err = Compressor::default().decode_file(&bogus, &output).unwrap_err();
    assert!(matches!(err, CompressError::InvalidMagic(_)));
    assert!(!output.exists());
}

#[test]
fn test_missing_input_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Compressor::default()
        .encode_file(&dir.path().join("missing"), &dir.path().join("out"))
        .unwrap_err();
    assert!(matches!(err, CompressError::InputNotFound(_)));
}

#[test]
fn test_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"max_input_size": 10, "verify_after_encode": true}"#).unwrap();
    let config = CodecConfig::from_json_file(&path).unwrap();
    assert!(config.atomic_write);

    let compressor = Compressor::new(config);
    assert!(compressor.encode_bytes(b"0123456789").is_ok());
    assert!(matches!(
        compressor.encode_bytes(b"0123456789a"),
        Err(CompressError::InputTooLarge { size: 11, limit: 10 })
    ));
}
