//! Fuzz target for the CRC-32 public API.
//!
//! Tests that:
//! - No panics on arbitrary input
//! - Incremental updates produce same result as one-shot
//! - Resume and combine agree with one-shot
//! - Raw-register chaining through `compute_crc32` agrees with the hasher

#![no_main]

use arbitrary::Arbitrary;
use crcfold::{Checksum, ChecksumCombine, Crc32, compute_crc32};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  data: Vec<u8>,
  split_point: usize,
  seed: u32,
}

fuzz_target!(|input: Input| {
  let data = &input.data;
  let split = input.split_point % (data.len() + 1);
  let (a, b) = data.split_at(split);

  let oneshot = Crc32::checksum(data);
  assert_eq!(oneshot, crc32fast::hash(data), "crc32fast mismatch");

  let mut hasher = Crc32::new();
  hasher.update(a);
  hasher.update(b);
  assert_eq!(oneshot, hasher.finalize(), "incremental mismatch");

  let crc_a = Crc32::checksum(a);
  let mut resumed = Crc32::resume(crc_a);
  resumed.update(b);
  assert_eq!(oneshot, resumed.finalize(), "resume mismatch");

  let combined = Crc32::combine(crc_a, Crc32::checksum(b), b.len());
  assert_eq!(oneshot, combined, "combine mismatch");

  let chained = compute_crc32(b, compute_crc32(a, input.seed));
  assert_eq!(chained, compute_crc32(data, input.seed), "raw chaining mismatch");
  assert_eq!(compute_crc32(&[], input.seed), input.seed, "empty input changed the seed");
});
