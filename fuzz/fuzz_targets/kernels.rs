//! Differential fuzzing across every kernel this CPU can run.
//!
//! The bitwise reference is the oracle; the leading `offset` bytes shift
//! the start address so the alignment prefix is exercised.

#![no_main]

use arbitrary::Arbitrary;
use crcfold::kernel_test::{first_mismatch, run_all_kernels};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
  seed: u32,
  offset: u8,
  data: Vec<u8>,
}

fuzz_target!(|input: Input| {
  let offset = usize::from(input.offset % 16).min(input.data.len());
  let data = &input.data[offset..];

  let results = run_all_kernels(input.seed, data);
  if let Some((reference, bad)) = first_mismatch(&results) {
    panic!(
      "{} disagrees with {}: {:#010x} != {:#010x}, len={}",
      bad.name,
      reference.name,
      bad.crc,
      reference.crc,
      data.len()
    );
  }
});
