//! Portable CRC-32/IEEE: slice-by-8 table lookup.
//!
//! The fallback every host can run. Eight 256-entry tables (8 KiB) are built
//! at compile time; each iteration folds eight input bytes with eight
//! independent lookups.
//!
//! | Kernel | Bytes/iter | Tables |
//! |--------|------------|--------|
//! | bytewise | 1 | 1x256xu32 |
//! | slice-by-8 | 8 | 8x256xu32 |

// Table indices are masked to 0..=255 and table counts are fixed.
#![allow(clippy::indexing_slicing)]

use crate::constants::POLY_REFLECTED;

// ─────────────────────────────────────────────────────────────────────────────
// Tables
// ─────────────────────────────────────────────────────────────────────────────

const fn table_entry(index: u8) -> u32 {
  let mut crc = index as u32;
  let mut bit: u32 = 0;
  while bit < 8 {
    crc = if crc & 1 != 0 { (crc >> 1) ^ POLY_REFLECTED } else { crc >> 1 };
    bit = bit.strict_add(1);
  }
  crc
}

/// `tables[k][b]` is the register contribution of byte `b` followed by `k` zero bytes.
const fn generate_tables() -> [[u32; 256]; 8] {
  let mut tables = [[0u32; 256]; 8];

  let mut i: usize = 0;
  while i < 256 {
    tables[0][i] = table_entry(i as u8);
    i = i.strict_add(1);
  }

  let mut k: usize = 1;
  while k < 8 {
    i = 0;
    while i < 256 {
      let prev = tables[k - 1][i];
      tables[k][i] = tables[0][(prev & 0xFF) as usize] ^ (prev >> 8);
      i = i.strict_add(1);
    }
    k = k.strict_add(1);
  }

  tables
}

static TABLES: [[u32; 256]; 8] = generate_tables();

// ─────────────────────────────────────────────────────────────────────────────
// Kernels
// ─────────────────────────────────────────────────────────────────────────────

/// Byte-at-a-time update of the raw CRC register.
#[inline]
#[must_use]
pub fn crc32_bytewise(mut crc: u32, data: &[u8]) -> u32 {
  let table = &TABLES[0];
  for &b in data {
    crc = table[((crc ^ b as u32) & 0xFF) as usize] ^ (crc >> 8);
  }
  crc
}

/// Slice-by-8 update of the raw CRC register.
///
/// No init or xorout is applied; see [`compute_crc32`](crate::compute_crc32)
/// for the register convention.
#[inline]
#[must_use]
pub fn crc32_slice8(mut crc: u32, data: &[u8]) -> u32 {
  let (chunks, remainder) = data.as_chunks::<8>();

  for chunk in chunks {
    let lo = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]) ^ crc;
    let hi = u32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]);

    crc = TABLES[7][(lo & 0xFF) as usize]
      ^ TABLES[6][((lo >> 8) & 0xFF) as usize]
      ^ TABLES[5][((lo >> 16) & 0xFF) as usize]
      ^ TABLES[4][(lo >> 24) as usize]
      ^ TABLES[3][(hi & 0xFF) as usize]
      ^ TABLES[2][((hi >> 8) & 0xFF) as usize]
      ^ TABLES[1][((hi >> 16) & 0xFF) as usize]
      ^ TABLES[0][(hi >> 24) as usize];
  }

  crc32_bytewise(crc, remainder)
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::vec::Vec;

  use super::*;
  use crate::reference::crc32_bitwise;

  #[test]
  fn table_known_entries() {
    assert_eq!(TABLES[0][0], 0);
    assert_eq!(TABLES[0][1], 0x7707_3096);
    assert_eq!(TABLES[0][255], 0x2D02_EF8D);
  }

  #[test]
  fn check_value() {
    assert_eq!(crc32_slice8(!0, b"123456789") ^ !0, 0xCBF4_3926);
    assert_eq!(crc32_bytewise(!0, b"123456789") ^ !0, 0xCBF4_3926);
  }

  #[test]
  fn slice8_matches_reference_across_lengths() {
    let data: Vec<u8> = (0..300u32).map(|i| (i.wrapping_mul(131) ^ (i >> 3)) as u8).collect();
    for len in 0..data.len() {
      let buf = &data[..len];
      assert_eq!(crc32_slice8(0x5A5A_5A5A, buf), crc32_bitwise(0x5A5A_5A5A, buf), "len={len}");
    }
  }

  #[test]
  fn slice8_incremental() {
    let data = b"incremental slice-by-8 over an uneven split";
    for split in 0..=data.len() {
      let (a, b) = data.split_at(split);
      assert_eq!(crc32_slice8(crc32_slice8(!0, a), b), crc32_slice8(!0, data), "split={split}");
    }
  }
}
