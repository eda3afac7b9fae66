//! Property tests: every kernel against the bitwise oracle and against
//! independent crates (`crc32fast`, `crc-fast`).

#![cfg(all(test, not(miri)))]

extern crate std;

use crc_fast::CrcAlgorithm;
use proptest::prelude::*;
use std::vec::Vec;
use traits::{Checksum, ChecksumCombine};

use crate::{Crc32, compute_crc32, kernel_test::{first_mismatch, run_all_kernels}, reference::crc32_bitwise};

fn bytes(max: usize) -> impl Strategy<Value = Vec<u8>> {
  proptest::collection::vec(any::<u8>(), 0..=max)
}

proptest! {
  #![proptest_config(ProptestConfig::with_cases(256))]

  #[test]
  fn every_kernel_matches_reference(data in bytes(2048), seed in any::<u32>(), offset in 0usize..16) {
    let offset = offset.min(data.len());
    let results = run_all_kernels(seed, &data[offset..]);
    prop_assert_eq!(first_mismatch(&results), None, "{:?}", results);
  }

  #[test]
  fn chaining_equals_one_call(data in bytes(1024), seed in any::<u32>(), split in any::<usize>()) {
    let split = split.strict_rem(data.len().strict_add(1));
    let (a, b) = data.split_at(split);
    prop_assert_eq!(compute_crc32(b, compute_crc32(a, seed)), compute_crc32(&data, seed));
  }

  #[test]
  fn streaming_chunks_equal_oneshot(data in bytes(4096), chunk in 1usize..=257) {
    let mut hasher = Crc32::new();
    for part in data.chunks(chunk) {
      hasher.update(part);
    }
    prop_assert_eq!(hasher.finalize(), crc32_bitwise(!0, &data) ^ !0);
  }

  #[test]
  fn combine_matches_reference(data in bytes(4096), split in any::<usize>()) {
    let split = split.strict_rem(data.len().strict_add(1));
    let (a, b) = data.split_at(split);
    let combined = Crc32::combine(Crc32::checksum(a), Crc32::checksum(b), b.len());
    prop_assert_eq!(combined, crc32_bitwise(!0, &data) ^ !0);
  }

  // ─────────────────────────────────────────────────────────────────────────────
  // Cross-validation against independent implementations
  // ─────────────────────────────────────────────────────────────────────────────

  #[test]
  fn matches_crc32fast(data in bytes(4096)) {
    prop_assert_eq!(Crc32::checksum(&data), crc32fast::hash(&data));
  }

  #[test]
  fn resume_matches_crc32fast(data in bytes(4096), split in any::<usize>()) {
    let split = split.strict_rem(data.len().strict_add(1));
    let (a, b) = data.split_at(split);

    let mut ours = Crc32::resume(Crc32::checksum(a));
    ours.update(b);

    let mut theirs = crc32fast::Hasher::new_with_initial(crc32fast::hash(a));
    theirs.update(b);

    prop_assert_eq!(ours.finalize(), theirs.finalize());
  }

  #[test]
  fn matches_crc_fast(data in bytes(4096)) {
    let reference = crc_fast::checksum(CrcAlgorithm::Crc32IsoHdlc, &data) as u32;
    prop_assert_eq!(Crc32::checksum(&data), reference);
  }

  #[test]
  fn streaming_matches_crc_fast(data in bytes(4096), chunk in 1usize..=257) {
    let mut ours = Crc32::new();
    let mut reference = crc_fast::Digest::new(CrcAlgorithm::Crc32IsoHdlc);
    for part in data.chunks(chunk) {
      ours.update(part);
      reference.update(part);
    }
    prop_assert_eq!(ours.finalize(), reference.finalize() as u32);
  }

  #[test]
  fn combine_matches_crc_fast(data in bytes(4096), split in any::<usize>()) {
    let split = split.strict_rem(data.len().strict_add(1));
    let (a, b) = data.split_at(split);

    let combined = Crc32::combine(Crc32::checksum(a), Crc32::checksum(b), b.len());

    let ref_a = crc_fast::checksum(CrcAlgorithm::Crc32IsoHdlc, a);
    let ref_b = crc_fast::checksum(CrcAlgorithm::Crc32IsoHdlc, b);
    let ref_combined = crc_fast::checksum_combine(CrcAlgorithm::Crc32IsoHdlc, ref_a, ref_b, b.len() as u64) as u32;

    prop_assert_eq!(combined, ref_combined);
  }
}
