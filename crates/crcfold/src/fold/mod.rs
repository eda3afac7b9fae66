//! Four-lane carry-less multiply folding engine for CRC-32/IEEE.
//!
//! One algorithm, generic over [`Lane`]: a 128-bit register with carry-less
//! multiply, byte shuffle and bitwise ops. Each backend (software `u128`,
//! SSE/PCLMULQDQ, AVX-512VL, NEON/PMULL, PMULL+EOR3) implements `Lane` and
//! instantiates [`update`] inside a `#[target_feature]` entry point.
//!
//! # Data flow
//!
//! ```text
//! seed ──> lane0                       (x^-512 projection + Barrett)
//! [skew] ──> partial fold              (address alignment, 1..15 bytes)
//! 64B blocks ──> lane_i = fold64(lane_i) ^ y_i
//! 16B vectors ──> rotate lanes, fold64(lane0) ^ v into lane3
//! [tail] ──> partial fold              (0..15 bytes)
//! lanes ──> fold16 x3 ──> 128->64->32 ──> Barrett ──> word 2
//! ```
//!
//! All lane contents are in the reflected (LSB-first) convention, so input
//! bytes load without reversal.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

pub(crate) mod soft;

#[cfg(target_arch = "x86_64")]
pub(crate) mod x86_64;

#[cfg(target_arch = "aarch64")]
pub(crate) mod aarch64;

use crate::constants::{
  BARRETT, FINAL, FOLD_16B, FOLD_64B, KeyPair, LANE_MASK, PARTIAL_SHUFFLE, SEED_BARRETT, SEED_SHIFT,
};

// ─────────────────────────────────────────────────────────────────────────────
// Lane abstraction
// ─────────────────────────────────────────────────────────────────────────────

/// A 128-bit register as the folding engine sees it.
///
/// Carry-less multiplies are named by the halves they select, first digit
/// for `self`, second for `k` (`0` = low 64 bits, `1` = high 64 bits):
/// `clmul_01` multiplies `self.hi` by `k.lo`.
///
/// # Safety
///
/// Methods may execute ISA extensions. Callers must only invoke them from
/// code compiled with, and running on, the features the implementor needs.
pub(crate) trait Lane: Copy {
  unsafe fn zero() -> Self;
  /// Load 16 bytes, byte 0 in the least significant position.
  unsafe fn load(bytes: &[u8; 16]) -> Self;
  unsafe fn from_pair(pair: KeyPair) -> Self;
  /// Zero-extend `v` into the low 32 bits.
  unsafe fn from_u32(v: u32) -> Self;

  unsafe fn xor(self, other: Self) -> Self;
  unsafe fn and(self, other: Self) -> Self;
  unsafe fn or(self, other: Self) -> Self;

  /// `self ^ b ^ c`. Backends with a fused three-way XOR override this.
  #[inline(always)]
  unsafe fn xor3(self, b: Self, c: Self) -> Self {
    self.xor(b).xor(c)
  }

  unsafe fn clmul_00(self, k: Self) -> Self;
  unsafe fn clmul_01(self, k: Self) -> Self;
  unsafe fn clmul_10(self, k: Self) -> Self;
  unsafe fn clmul_11(self, k: Self) -> Self;

  /// Byte permutation with `pshufb`/`tbl` semantics: selector bytes with
  /// bit 7 set yield zero.
  unsafe fn shuffle(self, selector: Self) -> Self;
  /// Shift right by 8 bytes, zero filling.
  unsafe fn shr8(self) -> Self;
  /// Shift left by 4 bytes, zero filling.
  unsafe fn shl4(self) -> Self;

  /// Bits 0..32.
  unsafe fn low_u32(self) -> u32;
  /// Bits 64..96.
  unsafe fn word2(self) -> u32;
}

/// Advance `x` by the distance `k` encodes and XOR in `data`.
#[inline(always)]
unsafe fn fold16<L: Lane>(x: L, k: L, data: L) -> L {
  x.clmul_01(k).xor3(x.clmul_10(k), data)
}

/// Fold constants materialized as lanes, once per call.
#[derive(Clone, Copy)]
struct Keys<L> {
  fold_64b: L,
  fold_16b: L,
  finish: L,
  barrett: L,
  seed_shift: L,
  seed_barrett: L,
  lane_mask: L,
}

impl<L: Lane> Keys<L> {
  #[inline(always)]
  unsafe fn load() -> Self {
    Self {
      fold_64b: L::from_pair(FOLD_64B),
      fold_16b: L::from_pair(FOLD_16B),
      finish: L::from_pair(FINAL),
      barrett: L::from_pair(BARRETT),
      seed_shift: L::from_pair(KeyPair { hi: 0, lo: SEED_SHIFT }),
      seed_barrett: L::from_pair(SEED_BARRETT),
      lane_mask: L::from_pair(LANE_MASK),
    }
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fold state
// ─────────────────────────────────────────────────────────────────────────────

/// Four lanes that jointly hold the remainder of every byte consumed so far.
struct FoldState<L> {
  lanes: [L; 4],
}

impl<L: Lane> FoldState<L> {
  /// Project a raw CRC register into lane space.
  ///
  /// The seed is multiplied by `x^-512` so the 64-byte advance every later
  /// byte applies to `lane0` brings it back to its true weight.
  #[inline(always)]
  unsafe fn seed(crc: u32, keys: &Keys<L>) -> Self {
    let v = L::from_u32(crc.reverse_bits());
    let t0 = v.clmul_00(keys.seed_shift);
    let t1 = t0.and(keys.lane_mask).clmul_00(keys.seed_barrett).clmul_11(keys.seed_barrett);
    let reduced = t0.xor(t1).low_u32();

    Self {
      lanes: [L::from_u32(reduced.reverse_bits()), L::zero(), L::zero(), L::zero()],
    }
  }

  /// Fold one 64-byte block, one vector per lane.
  #[inline(always)]
  unsafe fn fold_block(&mut self, block: &[[u8; 16]; 4], keys: &Keys<L>) {
    let [l0, l1, l2, l3] = self.lanes;
    let [y0, y1, y2, y3] = block;
    self.lanes = [
      fold16(l0, keys.fold_64b, L::load(y0)),
      fold16(l1, keys.fold_64b, L::load(y1)),
      fold16(l2, keys.fold_64b, L::load(y2)),
      fold16(l3, keys.fold_64b, L::load(y3)),
    ];
  }

  /// Fold a single 16-byte vector and rotate the lanes.
  #[inline(always)]
  unsafe fn push(&mut self, vector: &[u8; 16], keys: &Keys<L>) {
    let [l0, l1, l2, l3] = self.lanes;
    self.lanes = [l1, l2, l3, fold16(l0, keys.fold_64b, L::load(vector))];
  }

  /// Merge 1..=15 bytes. Empty input is a no-op.
  ///
  /// Every lane gives up its oldest `n` bytes to the lane before it;
  /// `lane3` takes the new bytes and the `n` bytes leaving `lane0` are
  /// folded forward by 64 bytes into it.
  #[inline(always)]
  unsafe fn partial(&mut self, bytes: &[u8], keys: &Keys<L>) {
    let Some(shuffle) = bytes.len().checked_sub(1).and_then(|i| PARTIAL_SHUFFLE.get(i)) else {
      return;
    };

    let mut padded = [0u8; 16];
    if let Some(dst) = padded.get_mut(..bytes.len()) {
      dst.copy_from_slice(bytes);
    }

    let take = L::load(&shuffle.take);
    let drop = L::load(&shuffle.drop);
    let [l0, l1, l2, l3] = self.lanes;

    let carry = l0.shuffle(take);
    let incoming = l3.shuffle(drop).or(L::load(&padded).shuffle(take));
    self.lanes = [
      l0.shuffle(drop).or(l1.shuffle(take)),
      l1.shuffle(drop).or(l2.shuffle(take)),
      l2.shuffle(drop).or(l3.shuffle(take)),
      fold16(carry, keys.fold_64b, incoming),
    ];
  }

  /// Reduce the four lanes to the 32-bit register.
  #[inline(always)]
  unsafe fn collapse(self, keys: &Keys<L>) -> u32 {
    let [l0, l1, l2, l3] = self.lanes;

    let mut x = fold16(l0, keys.fold_16b, l1);
    x = fold16(x, keys.fold_16b, l2);
    x = fold16(x, keys.fold_16b, l3);

    // 128 -> 96 -> 64 bits.
    x = x.clmul_00(keys.finish).xor(x.shr8());
    x = x.shl4().clmul_10(keys.finish).xor(x.and(keys.lane_mask));

    // Barrett: quotient estimate by mu, back-multiply by P'.
    x = x.clmul_00(keys.barrett).clmul_10(keys.barrett).xor(x);
    x.word2()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Driver
// ─────────────────────────────────────────────────────────────────────────────

/// Update a raw CRC-32 register with `data`.
///
/// Empty input returns `crc` unchanged. Results do not depend on the
/// address of `data`.
///
/// # Safety
///
/// Must be inlined into a function where every feature `L` needs is enabled
/// and present on the running CPU.
#[inline(always)]
pub(crate) unsafe fn update<L: Lane>(crc: u32, data: &[u8]) -> u32 {
  if data.is_empty() {
    return crc;
  }

  let keys = Keys::<L>::load();
  let mut state = FoldState::seed(crc, &keys);

  let mut rest = data;
  if rest.len() >= 16 {
    let skew = rest.as_ptr().addr().wrapping_neg() & 15;
    let (head, aligned) = rest.split_at(skew);
    state.partial(head, &keys);
    rest = aligned;
  }

  let (vectors, tail) = rest.as_chunks::<16>();
  let (blocks, leftover) = vectors.as_chunks::<4>();

  for block in blocks {
    state.fold_block(block, &keys);
  }
  for vector in leftover {
    state.push(vector, &keys);
  }
  state.partial(tail, &keys);

  state.collapse(&keys)
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::vec::Vec;

  use super::{soft::Soft, *};
  use crate::reference::crc32_bitwise;

  fn soft(crc: u32, data: &[u8]) -> u32 {
    // SAFETY: `Soft` is plain integer arithmetic.
    unsafe { update::<Soft>(crc, data) }
  }

  fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i as u32).wrapping_mul(0x9E37_79B9).rotate_left(7) as u8).collect()
  }

  #[test]
  fn empty_returns_seed() {
    for seed in [0, 1, 0xFFFF_FFFF, 0xDEAD_BEEF] {
      assert_eq!(soft(seed, &[]), seed);
    }
  }

  #[test]
  fn check_value() {
    assert_eq!(soft(!0, b"123456789") ^ !0, 0xCBF4_3926);
  }

  #[test]
  fn every_length_through_two_blocks() {
    let data = pattern(200);
    for len in 0..=data.len() {
      let buf = &data[..len];
      assert_eq!(soft(0x1234_5678, buf), crc32_bitwise(0x1234_5678, buf), "len={len}");
    }
  }

  #[test]
  fn every_start_offset() {
    let data = pattern(160);
    for offset in 0..16 {
      for len in [15usize, 16, 17, 63, 64, 65, 128, 143] {
        let buf = &data[offset..offset + len];
        assert_eq!(soft(!0, buf), crc32_bitwise(!0, buf), "offset={offset} len={len}");
      }
    }
  }

  #[test]
  fn zero_seed_over_zero_bytes_stays_zero() {
    assert_eq!(soft(0, &[0u8; 100]), 0);
  }

  #[test]
  fn partial_of_nothing_leaves_lanes() {
    // SAFETY: `Soft` is plain integer arithmetic.
    unsafe {
      let keys = Keys::<Soft>::load();
      let mut state = FoldState::seed(0xABCD_EF01, &keys);
      let before = state.lanes;
      state.partial(&[], &keys);
      assert_eq!(state.lanes, before);
    }
  }
}
