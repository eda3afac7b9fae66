//! Software lane: a `u128` with a bit-serial carry-less multiply.
//!
//! Runs everywhere. Slower than the slice-by-8 table, but it executes the
//! exact fold sequence of the SIMD backends, so it pins the algorithm on
//! hosts (and under Miri) where no carry-less multiply exists.

#![allow(unsafe_code)]

use super::Lane;
use crate::constants::{KeyPair, clmul64};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Soft(u128);

impl Soft {
  #[inline(always)]
  const fn lo(self) -> u64 {
    self.0 as u64
  }

  #[inline(always)]
  const fn hi(self) -> u64 {
    (self.0 >> 64) as u64
  }
}

impl Lane for Soft {
  #[inline(always)]
  unsafe fn zero() -> Self {
    Self(0)
  }

  #[inline(always)]
  unsafe fn load(bytes: &[u8; 16]) -> Self {
    Self(u128::from_le_bytes(*bytes))
  }

  #[inline(always)]
  unsafe fn from_pair(pair: KeyPair) -> Self {
    Self(((pair.hi as u128) << 64) | pair.lo as u128)
  }

  #[inline(always)]
  unsafe fn from_u32(v: u32) -> Self {
    Self(v as u128)
  }

  #[inline(always)]
  unsafe fn xor(self, other: Self) -> Self {
    Self(self.0 ^ other.0)
  }

  #[inline(always)]
  unsafe fn and(self, other: Self) -> Self {
    Self(self.0 & other.0)
  }

  #[inline(always)]
  unsafe fn or(self, other: Self) -> Self {
    Self(self.0 | other.0)
  }

  #[inline(always)]
  unsafe fn clmul_00(self, k: Self) -> Self {
    Self(clmul64(self.lo(), k.lo()))
  }

  #[inline(always)]
  unsafe fn clmul_01(self, k: Self) -> Self {
    Self(clmul64(self.hi(), k.lo()))
  }

  #[inline(always)]
  unsafe fn clmul_10(self, k: Self) -> Self {
    Self(clmul64(self.lo(), k.hi()))
  }

  #[inline(always)]
  unsafe fn clmul_11(self, k: Self) -> Self {
    Self(clmul64(self.hi(), k.hi()))
  }

  #[inline(always)]
  unsafe fn shuffle(self, selector: Self) -> Self {
    let src = self.0.to_le_bytes();
    let sel = selector.0.to_le_bytes();
    let mut out = [0u8; 16];
    for (dst, &s) in out.iter_mut().zip(sel.iter()) {
      if s & 0x80 == 0 {
        *dst = src.get(usize::from(s & 15)).copied().unwrap_or(0);
      }
    }
    Self(u128::from_le_bytes(out))
  }

  #[inline(always)]
  unsafe fn shr8(self) -> Self {
    Self(self.0 >> 64)
  }

  #[inline(always)]
  unsafe fn shl4(self) -> Self {
    Self(self.0 << 32)
  }

  #[inline(always)]
  unsafe fn low_u32(self) -> u32 {
    self.0 as u32
  }

  #[inline(always)]
  unsafe fn word2(self) -> u32 {
    (self.0 >> 64) as u32
  }
}

/// CRC-32 through the folding engine with software lanes.
#[inline]
pub(crate) fn crc32_soft(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: every `Soft` operation is plain integer arithmetic.
  unsafe { super::update::<Soft>(crc, data) }
}
