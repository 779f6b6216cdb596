//! End-to-end round-trip tests driving the public API the way the CLI
//! does: compress a stream, decompress it back, compare against the
//! original. Covers the universal properties and concrete scenarios
//! from the component design: round-trip, independence from
//! parallelism, block-size invariance, trailer/header correctness,
//! empty/single-block input, cross-block repetition, random binary,
//! and a compression-level sweep.

use std::io::Read;

use flate2::read::MultiGzDecoder;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use pigzr::{compress, decompress, Options};

fn build_options(level: u8, block_size: usize, workers: usize) -> Options {
    Options::builder()
        .level(level)
        .unwrap()
        .block_size(block_size)
        .unwrap()
        .workers(workers)
        .unwrap()
        .build()
}

fn round_trip(data: &[u8], level: u8, block_size: usize, workers: usize) -> Vec<u8> {
    let options = build_options(level, block_size, workers);
    let mut compressed = Vec::new();
    compress(&options, data, &mut compressed).unwrap();

    let mut decompressed = Vec::new();
    decompress(&compressed[..], &mut decompressed).unwrap();
    decompressed
}

fn header_and_trailer(data: &[u8], level: u8, block_size: usize, workers: usize) -> Vec<u8> {
    let options = build_options(level, block_size, workers);
    let mut compressed = Vec::new();
    compress(&options, data, &mut compressed).unwrap();
    compressed
}

#[test]
fn empty_input_is_a_valid_empty_member() {
    let compressed = header_and_trailer(b"", 6, 128 * 1024, 4);

    assert_eq!(&compressed[0..2], &[0x1f, 0x8b]);
    let len = compressed.len();
    assert_eq!(&compressed[len - 8..len - 4], &[0, 0, 0, 0], "CRC of empty input is 0");
    assert_eq!(&compressed[len - 4..], &[0, 0, 0, 0], "ISIZE of empty input is 0");

    let mut decoder = MultiGzDecoder::new(&compressed[..]);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn small_input_is_exactly_one_block() {
    let input = b"hello\n";
    let compressed = header_and_trailer(input, 6, 128 * 1024, 4);
    let len = compressed.len();
    assert_eq!(&compressed[len - 4..], &6u32.to_le_bytes(), "ISIZE == 6");

    let mut decoder = MultiGzDecoder::new(&compressed[..]);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).unwrap();
    assert_eq!(out, input);
}

#[test]
fn cross_block_repetition_round_trips() {
    let input = vec![b'A'; 200_000];
    let result = round_trip(&input, 6, 64 * 1024, 4);
    assert_eq!(result, input);
}

#[test]
fn random_binary_round_trips() {
    let mut rng = StdRng::seed_from_u64(0);
    let mut input = vec![0u8; 10 * 1024 * 1024];
    rng.fill_bytes(&mut input);
    let result = round_trip(&input, 9, 128 * 1024, 8);
    assert_eq!(result, input);
}

#[test]
fn large_incompressible_blocks_round_trip() {
    // A single block of incompressible data large enough that its
    // compressed form approaches the input size, well past the sync-flush
    // loop's small initial output reservation -- regression coverage for
    // a truncation bug at that boundary.
    let mut rng = StdRng::seed_from_u64(7);
    let mut input = vec![0u8; 900 * 1024];
    rng.fill_bytes(&mut input);
    input.extend_from_slice(b"a small trailing block to force a second job");
    let result = round_trip(&input, 6, 900 * 1024, 2);
    assert_eq!(result, input);
}

#[test]
fn large_highly_compressible_input_compresses_well() {
    let input = vec![0u8; 16 * 1024 * 1024];
    let options = build_options(6, 128 * 1024, 8);
    let mut compressed = Vec::new();
    compress(&options, &input[..], &mut compressed).unwrap();
    assert!(
        compressed.len() < input.len() / 100,
        "expected < 1% of input size, got {} bytes for {} input",
        compressed.len(),
        input.len()
    );

    let mut decoder = MultiGzDecoder::new(&compressed[..]);
    let mut out = Vec::new();
    decoder.read_to_end(&mut out).unwrap();
    assert_eq!(out, input);
}

#[test]
fn level_sweep_is_monotone_and_round_trips() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut text = Vec::with_capacity(1024 * 1024);
    while text.len() < 1024 * 1024 {
        text.extend_from_slice(b"mixed entropy payload with some repeated phrases. ");
        let mut noise = [0u8; 16];
        rng.fill_bytes(&mut noise);
        text.extend_from_slice(&noise);
    }

    let mut sizes = Vec::new();
    for level in [1u8, 3, 6, 9] {
        let options = build_options(level, 128 * 1024, 4);
        let mut compressed = Vec::new();
        compress(&options, &text[..], &mut compressed).unwrap();

        let mut decoder = MultiGzDecoder::new(&compressed[..]);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).unwrap();
        assert_eq!(out, text);

        sizes.push(compressed.len());
    }

    // Tolerant of small inversions between adjacent levels, but the
    // fastest and best levels should bound every level in between.
    assert!(sizes[0] >= sizes[3] || sizes[0] as f64 * 1.05 >= sizes[3] as f64);
}

#[test]
fn independence_from_parallelism() {
    let input = b"some text that repeats. ".repeat(5000);
    let baseline = round_trip(&input, 6, 128 * 1024, 1);
    for workers in [2usize, 4, 16] {
        let result = round_trip(&input, 6, 128 * 1024, workers);
        assert_eq!(result, baseline);
    }
}

#[test]
fn block_size_invariance() {
    let input = b"variable block size payload, with some repeats. ".repeat(3000);
    let small = round_trip(&input, 6, 4 * 1024, 4);
    let large = round_trip(&input, 6, 256 * 1024, 4);
    assert_eq!(small, input);
    assert_eq!(large, input);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn round_trip_sweep(
        input in proptest::collection::vec(any::<u8>(), 0..8192),
        block_size in 1usize..4096,
        workers in 1usize..8,
        level in 1u8..=9,
    ) {
        let result = round_trip(&input, level, block_size, workers);
        prop_assert_eq!(result, input);
    }
}
