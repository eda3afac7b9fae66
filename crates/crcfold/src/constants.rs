//! CRC-32/IEEE polynomial and every folding constant derived from it.
//!
//! All constants are computed by `const fn` from the generator polynomial
//! `G(x) = x^32 + 0x04C11DB7`, so they can be re-derived rather than trusted.
//! The tests pin them to their published literal values.
//!
//! # Notation
//!
//! - `K_n = reverse33(x^n mod G)`: a fold constant in the reflected domain.
//! - Folding a 128-bit remainder forward by `d` bits multiplies its two halves by the pair
//!   `(K_{d+32}, K_{d-32})`.
//! - Barrett reduction uses the 33-bit reciprocal polynomial `P'` and `mu = P'^-1 mod x^33`.

// Bounded const-fn loops; clippy cannot see through `while` in const context.
#![allow(clippy::indexing_slicing)]

/// Reflected CRC-32/IEEE polynomial (LSB-first).
pub const POLY_REFLECTED: u32 = 0xEDB8_8320;

/// Normal CRC-32/IEEE polynomial (MSB-first, `x^32` implied).
pub const POLY_NORMAL: u32 = POLY_REFLECTED.reverse_bits();

// ─────────────────────────────────────────────────────────────────────────────
// GF(2) polynomial arithmetic
// ─────────────────────────────────────────────────────────────────────────────

/// Carry-less 64x64 multiply, returning the 128-bit product.
#[must_use]
pub(crate) const fn clmul64(a: u64, b: u64) -> u128 {
  let mut product: u128 = 0;
  let mut i: u32 = 0;
  while i < 64 {
    if (a >> i) & 1 != 0 {
      product ^= (b as u128) << i;
    }
    i = i.strict_add(1);
  }
  product
}

/// `value mod G`, normal bit order.
#[must_use]
const fn reduce128(mut value: u128) -> u32 {
  let g: u128 = (1u128 << 32) | (POLY_NORMAL as u128);
  let mut bit: u32 = 127;
  while bit >= 32 {
    if (value >> bit) & 1 != 0 {
      value ^= g << bit.strict_sub(32);
    }
    bit = bit.strict_sub(1);
  }
  value as u32
}

/// `x^n mod G`, normal bit order, by square-and-multiply.
#[must_use]
pub(crate) const fn xpow_mod(mut n: u32) -> u32 {
  let mut result: u32 = 1;
  let mut base: u32 = 2;
  while n > 0 {
    if n & 1 != 0 {
      result = reduce128(clmul64(result as u64, base as u64));
    }
    base = reduce128(clmul64(base as u64, base as u64));
    n >>= 1;
  }
  result
}

/// Reverse the low 33 bits of `v`.
#[must_use]
const fn reverse33(v: u64) -> u64 {
  (v & ((1u64 << 33) - 1)).reverse_bits() >> 31
}

/// `K_n = reverse33(x^n mod G)`.
#[must_use]
pub(crate) const fn fold_k(n: u32) -> u64 {
  reverse33(xpow_mod(n) as u64)
}

/// 33-bit reciprocal polynomial `P' = (reflected << 1) | 1`.
#[must_use]
const fn reciprocal_poly() -> u64 {
  ((POLY_REFLECTED as u64) << 1) | 1
}

/// Inverse power series of `poly` modulo `x^33`.
#[must_use]
const fn compute_mu33(poly: u64) -> u64 {
  let mut inv: u64 = 1;
  let mut k: u32 = 1;
  while k < 33 {
    let mut s: u64 = 0;
    let mut i: u32 = 1;
    while i <= k {
      s ^= ((poly >> i) & 1) & ((inv >> (k - i)) & 1);
      i = i.strict_add(1);
    }
    inv |= s << k;
    k = k.strict_add(1);
  }
  inv
}

// ─────────────────────────────────────────────────────────────────────────────
// Register constants
// ─────────────────────────────────────────────────────────────────────────────

/// Two 64-bit halves loaded into one 128-bit register as `[lo, hi]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPair {
  pub hi: u64,
  pub lo: u64,
}

impl KeyPair {
  /// Pair that folds a 16-byte remainder forward by `bytes`.
  #[must_use]
  pub const fn fold(bytes: u32) -> Self {
    let d = bytes.strict_mul(8);
    Self {
      hi: fold_k(d.strict_add(32)),
      lo: fold_k(d.strict_sub(32)),
    }
  }
}

/// Main loop: advance one lane by 64 bytes (`K_544`, `K_480`).
pub const FOLD_64B: KeyPair = KeyPair::fold(64);

/// Lane merge in the final collapse: advance by 16 bytes (`K_160`, `K_96`).
pub const FOLD_16B: KeyPair = KeyPair::fold(16);

/// 128 to 64 bit reduction: `lo = K_96` (drop 64 bits), `hi = K_64` (drop 32 more).
pub const FINAL: KeyPair = KeyPair {
  hi: fold_k(64),
  lo: fold_k(96),
};

/// Barrett reduction, reflected domain: `hi = P'`, `lo = mu`.
pub const BARRETT: KeyPair = KeyPair {
  hi: reciprocal_poly(),
  lo: compute_mu33(reciprocal_poly()),
};

/// `x^-512 mod G = x^(2^32 - 1 - 512) mod G`, normal bit order.
///
/// The multiplicative order of `x` modulo G divides `2^32 - 1`, so this
/// is the inverse of the 64-byte advance the four lanes apply to a seed.
pub const SEED_SHIFT: u64 = xpow_mod(u32::MAX - 512) as u64;

/// Barrett reduction, normal domain: `hi = G - x^32`, `lo = floor(x^64 / G)`.
pub const SEED_BARRETT: KeyPair = KeyPair {
  hi: POLY_NORMAL as u64,
  lo: reverse33(BARRETT.lo),
};

/// `[0, !0, !0, !0]` at 32-bit granularity: clears the low word.
pub const LANE_MASK: KeyPair = KeyPair {
  hi: u64::MAX,
  lo: 0xFFFF_FFFF_0000_0000,
};

// ─────────────────────────────────────────────────────────────────────────────
// Partial-fold shuffle table
// ─────────────────────────────────────────────────────────────────────────────

/// Byte selectors for a merge of `n` (1..=15) bytes.
///
/// Selector bytes follow `pshufb`/`tbl` semantics: a byte with bit 7 set
/// produces zero, otherwise the low four bits index the source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shuffle {
  /// Moves the low `n` bytes of the source to the top, zeroes the rest.
  pub take: [u8; 16],
  /// Shifts the source down by `n` bytes, zeroes the top `n`. Complement of `take`.
  pub drop: [u8; 16],
}

const fn shuffle_for(n: usize) -> Shuffle {
  let mut take = [0u8; 16];
  let mut drop = [0u8; 16];
  let mut i: usize = 0;
  while i < 16 {
    let src = i.strict_add(n);
    let keep_high = if src < 16 { 0x80 } else { 0 };
    take[i] = (src & 15) as u8 | keep_high;
    drop[i] = take[i] ^ 0x80;
    i = i.strict_add(1);
  }
  Shuffle { take, drop }
}

const fn partial_shuffle_table() -> [Shuffle; 15] {
  let mut table = [shuffle_for(1); 15];
  let mut n: usize = 2;
  while n <= 15 {
    table[n - 1] = shuffle_for(n);
    n = n.strict_add(1);
  }
  table
}

/// Shuffle selectors indexed by `n - 1`.
pub const PARTIAL_SHUFFLE: [Shuffle; 15] = partial_shuffle_table();

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn polynomial_forms_agree() {
    assert_eq!(POLY_NORMAL, 0x04C1_1DB7);
    assert_eq!(BARRETT.hi, 0x1_DB71_0641);
  }

  #[test]
  fn fold_constants_match_published_values() {
    assert_eq!(FOLD_64B, KeyPair { hi: 0x1_5444_2BD4, lo: 0x1_C6E4_1596 });
    assert_eq!(FOLD_16B, KeyPair { hi: 0x1_7519_97D0, lo: 0xCCAA_009E });
    assert_eq!(FINAL, KeyPair { hi: 0x1_63CD_6124, lo: 0xCCAA_009E });
    assert_eq!(BARRETT.lo, 0x1_F701_1641);
  }

  #[test]
  fn seed_constants_match_published_values() {
    assert_eq!(SEED_SHIFT, 0x487B_9C8A);
    assert_eq!(SEED_BARRETT, KeyPair { hi: 0x04C1_1DB7, lo: 0x1_04D1_01DF });
  }

  #[test]
  fn seed_shift_inverts_the_block_advance() {
    let product = reduce128(clmul64(SEED_SHIFT, xpow_mod(512) as u64));
    assert_eq!(product, 1);
  }

  #[test]
  fn x_has_order_dividing_two_pow_32_minus_one() {
    assert_eq!(xpow_mod(u32::MAX), 1);
  }

  #[test]
  fn mu_is_33_bit() {
    assert!(BARRETT.lo < (1u64 << 33));
    assert!(BARRETT.lo >> 32 == 1);
  }

  #[test]
  fn shuffle_table_shape() {
    let one = PARTIAL_SHUFFLE[0];
    assert_eq!(one.take[15], 0x00);
    assert!(one.take[..15].iter().all(|b| b & 0x80 != 0));
    assert_eq!(one.drop[0], 0x01);
    assert_eq!(one.drop[15], 0x80);

    let fifteen = PARTIAL_SHUFFLE[14];
    assert_eq!(fifteen.take[0], 0x8F);
    assert_eq!(&fifteen.take[1..], &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14]);
    assert_eq!(fifteen.drop[0], 0x0F);
  }

  #[test]
  fn shuffle_rows_evaluate_in_const_and_at_runtime() {
    const SEVEN: Shuffle = shuffle_for(7);
    assert_eq!(PARTIAL_SHUFFLE[6], SEVEN);
    assert_eq!(&SEVEN.take[9..], &[0, 1, 2, 3, 4, 5, 6]);
    for n in 1..=15usize {
      assert_eq!(PARTIAL_SHUFFLE[n - 1], shuffle_for(n), "row {n}");
    }
  }

  #[test]
  fn shuffle_take_and_drop_partition_each_row() {
    for (i, row) in PARTIAL_SHUFFLE.iter().enumerate() {
      let n = i + 1;
      let taken = row.take.iter().filter(|b| *b & 0x80 == 0).count();
      let dropped = row.drop.iter().filter(|b| *b & 0x80 == 0).count();
      assert_eq!(taken, n, "take row {n}");
      assert_eq!(dropped, 16 - n, "drop row {n}");
    }
  }
}
