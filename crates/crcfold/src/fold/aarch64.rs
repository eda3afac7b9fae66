//! aarch64 lanes: NEON with PMULL, and PMULL with SHA3 `EOR3`.
//!
//! # Safety
//!
//! Uses `unsafe` for NEON intrinsics. The safe wrappers are only reachable
//! through kernel selection, which checks
//! [`PMULL_READY`](platform::caps::aarch64::PMULL_READY) or
//! [`PMULL_EOR3_READY`](platform::caps::aarch64::PMULL_EOR3_READY) first.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::aarch64::*;

use super::Lane;
use crate::constants::KeyPair;

/// 128-bit lane on NEON + PMULL.
#[derive(Clone, Copy)]
pub(crate) struct Pmull(uint8x16_t);

/// [`Pmull`] with `EOR3` for the fold's three-way XOR.
#[derive(Clone, Copy)]
pub(crate) struct PmullEor3(uint8x16_t);

/// 64x64 polynomial multiply of lane `A` of `a` by lane `B` of `b`.
#[inline(always)]
unsafe fn pmull<const A: i32, const B: i32>(a: uint8x16_t, b: uint8x16_t) -> uint8x16_t {
  let x = vgetq_lane_u64::<A>(vreinterpretq_u64_u8(a));
  let y = vgetq_lane_u64::<B>(vreinterpretq_u64_u8(b));
  vreinterpretq_u8_p128(vmull_p64(x, y))
}

/// Every `Lane` method except `xor3`, shared by both aarch64 lanes.
macro_rules! neon_lane_ops {
  () => {
    #[inline(always)]
    unsafe fn zero() -> Self {
      Self(vdupq_n_u8(0))
    }

    #[inline(always)]
    unsafe fn load(bytes: &[u8; 16]) -> Self {
      Self(vld1q_u8(bytes.as_ptr()))
    }

    #[inline(always)]
    unsafe fn from_pair(pair: KeyPair) -> Self {
      Self(vreinterpretq_u8_u64(vcombine_u64(vcreate_u64(pair.lo), vcreate_u64(pair.hi))))
    }

    #[inline(always)]
    unsafe fn from_u32(v: u32) -> Self {
      Self(vreinterpretq_u8_u32(vsetq_lane_u32::<0>(v, vdupq_n_u32(0))))
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
      Self(veorq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
      Self(vandq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
      Self(vorrq_u8(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn clmul_00(self, k: Self) -> Self {
      Self(pmull::<0, 0>(self.0, k.0))
    }

    #[inline(always)]
    unsafe fn clmul_01(self, k: Self) -> Self {
      Self(pmull::<1, 0>(self.0, k.0))
    }

    #[inline(always)]
    unsafe fn clmul_10(self, k: Self) -> Self {
      Self(pmull::<0, 1>(self.0, k.0))
    }

    #[inline(always)]
    unsafe fn clmul_11(self, k: Self) -> Self {
      Self(pmull::<1, 1>(self.0, k.0))
    }

    // `tbl` yields zero for indices >= 16, which covers bit 7.
    #[inline(always)]
    unsafe fn shuffle(self, selector: Self) -> Self {
      Self(vqtbl1q_u8(self.0, selector.0))
    }

    #[inline(always)]
    unsafe fn shr8(self) -> Self {
      Self(vextq_u8::<8>(self.0, vdupq_n_u8(0)))
    }

    #[inline(always)]
    unsafe fn shl4(self) -> Self {
      Self(vextq_u8::<12>(vdupq_n_u8(0), self.0))
    }

    #[inline(always)]
    unsafe fn low_u32(self) -> u32 {
      vgetq_lane_u32::<0>(vreinterpretq_u32_u8(self.0))
    }

    #[inline(always)]
    unsafe fn word2(self) -> u32 {
      vgetq_lane_u32::<2>(vreinterpretq_u32_u8(self.0))
    }
  };
}

impl Lane for Pmull {
  neon_lane_ops!();
}

impl Lane for PmullEor3 {
  neon_lane_ops!();

  #[inline(always)]
  unsafe fn xor3(self, b: Self, c: Self) -> Self {
    Self(veor3q_u8(self.0, b.0, c.0))
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry points
// ─────────────────────────────────────────────────────────────────────────────

#[target_feature(enable = "neon,aes")]
unsafe fn crc32_pmull_impl(crc: u32, data: &[u8]) -> u32 {
  super::update::<Pmull>(crc, data)
}

#[target_feature(enable = "neon,aes,sha3")]
unsafe fn crc32_pmull_eor3_impl(crc: u32, data: &[u8]) -> u32 {
  super::update::<PmullEor3>(crc, data)
}

/// CRC-32 folding with NEON + PMULL.
#[inline]
pub(crate) fn crc32_pmull(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only installed when caps carry PMULL_READY.
  unsafe { crc32_pmull_impl(crc, data) }
}

/// CRC-32 folding with PMULL and SHA3 `EOR3`.
#[inline]
pub(crate) fn crc32_pmull_eor3(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only installed when caps carry PMULL_EOR3_READY.
  unsafe { crc32_pmull_eor3_impl(crc, data) }
}
