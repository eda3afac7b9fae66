//! Bitwise CRC-32/IEEE: the source of truth.
//!
//! One bit per step, no tables, `const fn`. Every other path in this crate
//! (slice-by-8, software lanes, SIMD lanes) is tested against it. Slow on
//! purpose (~8 operations per bit); never dispatched.

// Bounded `while` index over `data`; clippy cannot see it in const context.
#![allow(clippy::indexing_slicing)]

use crate::constants::POLY_REFLECTED;

/// Advance the raw CRC register over `data`, LSB-first.
///
/// No init or xorout is applied: `crc32_bitwise(!0, data) ^ !0` is the
/// standard CRC-32/IEEE value.
#[must_use]
pub const fn crc32_bitwise(mut crc: u32, data: &[u8]) -> u32 {
  let mut i: usize = 0;
  while i < data.len() {
    crc ^= data[i] as u32;
    let mut bit: u32 = 0;
    while bit < 8 {
      crc = if crc & 1 != 0 { (crc >> 1) ^ POLY_REFLECTED } else { crc >> 1 };
      bit = bit.strict_add(1);
    }
    i = i.strict_add(1);
  }
  crc
}

// Fails the build if the reference drifts from the catalogue check value.
const _: () = assert!(crc32_bitwise(!0, b"123456789") ^ !0 == 0xCBF4_3926);

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_input_returns_register() {
    assert_eq!(crc32_bitwise(0x1234_5678, &[]), 0x1234_5678);
  }

  #[test]
  fn single_bytes() {
    // zlib crc32(b"a") and crc32(b"\0")
    assert_eq!(crc32_bitwise(!0, b"a") ^ !0, 0xE8B7_BE43);
    assert_eq!(crc32_bitwise(!0, &[0]) ^ !0, 0xD202_EF8D);
  }

  #[test]
  fn register_chains() {
    let data = b"The quick brown fox jumps over the lazy dog";
    let (a, b) = data.split_at(17);
    assert_eq!(crc32_bitwise(crc32_bitwise(!0, a), b), crc32_bitwise(!0, data));
    assert_eq!(crc32_bitwise(!0, data) ^ !0, 0x414F_A339);
  }
}
