//! CRC-32 combination over GF(2).
//!
//! Appending `n` zero bytes to a message multiplies its CRC remainder by
//! `x^(8n) mod G`, a linear map on the 32-bit register. [`combine_crc32`]
//! applies that map to `crc(A)` and XORs in `crc(B)`:
//!
//! ```text
//! crc(A || B) = shift_{8 * len(B)}(crc(A)) XOR crc(B)
//! ```
//!
//! The maps for `x^(8 * 2^i)` are precomputed for every bit of `usize`, so a
//! combine costs one 32x32 matrix-vector product per set bit of `len(B)`.

// Loop indices are bounded by the fixed matrix and table sizes.
#![allow(clippy::indexing_slicing)]

use crate::constants::POLY_REFLECTED;

/// A 32x32 GF(2) matrix stored by column: `cols[i]` is the image of bit `i`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Gf2Matrix32 {
  cols: [u32; 32],
}

impl Gf2Matrix32 {
  const IDENTITY: Self = {
    let mut cols = [0u32; 32];
    let mut i: usize = 0;
    while i < 32 {
      cols[i] = 1 << i;
      i = i.strict_add(1);
    }
    Self { cols }
  };

  /// One zero bit through the reflected register: `(crc >> 1) ^ (POLY if crc & 1)`.
  const SHIFT1: Self = {
    let mut cols = [0u32; 32];
    cols[0] = POLY_REFLECTED;
    let mut j: usize = 1;
    while j < 32 {
      cols[j] = 1 << (j - 1);
      j = j.strict_add(1);
    }
    Self { cols }
  };

  #[inline]
  #[must_use]
  pub(crate) const fn apply(&self, vec: u32) -> u32 {
    let mut out = 0u32;
    let mut i: usize = 0;
    while i < 32 {
      if vec & (1 << i) != 0 {
        out ^= self.cols[i];
      }
      i = i.strict_add(1);
    }
    out
  }

  #[must_use]
  const fn square(&self) -> Self {
    let mut cols = [0u32; 32];
    let mut i: usize = 0;
    while i < 32 {
      cols[i] = self.apply(self.cols[i]);
      i = i.strict_add(1);
    }
    Self { cols }
  }
}

const POW_COUNT: usize = usize::BITS as usize;

/// `ZERO_BYTES[i]` appends `2^i` zero bytes.
static ZERO_BYTES: [Gf2Matrix32; POW_COUNT] = {
  let shift8 = Gf2Matrix32::SHIFT1.square().square().square();
  let mut table = [Gf2Matrix32::IDENTITY; POW_COUNT];
  table[0] = shift8;
  let mut i: usize = 1;
  while i < POW_COUNT {
    table[i] = table[i - 1].square();
    i = i.strict_add(1);
  }
  table
};

/// Advance a CRC register past `len` zero bytes.
#[inline]
#[must_use]
pub fn shift_zeros(mut crc: u32, mut len: usize) -> u32 {
  let mut i: usize = 0;
  while len != 0 {
    if len & 1 != 0 {
      crc = ZERO_BYTES[i].apply(crc);
    }
    len >>= 1;
    i = i.strict_add(1);
  }
  crc
}

/// Combine two CRC-32 values.
///
/// Given `crc_a = crc(A)` and `crc_b = crc(B)`, returns `crc(A || B)`. Works
/// for finalized checksums (init and xorout cancel) and for raw registers
/// where `crc_b` was computed from a zero seed.
#[inline]
#[must_use]
pub fn combine_crc32(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
  shift_zeros(crc_a, len_b) ^ crc_b
}
