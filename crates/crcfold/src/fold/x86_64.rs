//! x86_64 lanes: SSE with PCLMULQDQ, and AVX-512VL ternary-logic XOR3.
//!
//! # Safety
//!
//! Uses `unsafe` for x86 SIMD intrinsics. The safe wrappers at the bottom
//! are only reachable through kernel selection, which checks
//! [`PCLMUL_READY`](platform::caps::x86::PCLMUL_READY) or
//! [`AVX512_CLMUL_READY`](platform::caps::x86::AVX512_CLMUL_READY) first.

#![allow(unsafe_code)]
#![allow(unsafe_op_in_unsafe_fn)]

use core::arch::x86_64::*;

use super::Lane;
use crate::constants::KeyPair;

/// 128-bit lane on SSE2 + SSSE3 + SSE4.1 + PCLMULQDQ.
#[derive(Clone, Copy)]
pub(crate) struct Sse(__m128i);

/// [`Sse`] with `vpternlogd` for the fold's three-way XOR.
#[derive(Clone, Copy)]
pub(crate) struct Avx512(__m128i);

/// Every `Lane` method except `xor3`, shared by both x86 lanes.
macro_rules! sse_lane_ops {
  () => {
    #[inline(always)]
    unsafe fn zero() -> Self {
      Self(_mm_setzero_si128())
    }

    #[inline(always)]
    unsafe fn load(bytes: &[u8; 16]) -> Self {
      Self(_mm_loadu_si128(bytes.as_ptr().cast()))
    }

    #[inline(always)]
    unsafe fn from_pair(pair: KeyPair) -> Self {
      Self(_mm_set_epi64x(pair.hi as i64, pair.lo as i64))
    }

    #[inline(always)]
    unsafe fn from_u32(v: u32) -> Self {
      Self(_mm_cvtsi32_si128(v as i32))
    }

    #[inline(always)]
    unsafe fn xor(self, other: Self) -> Self {
      Self(_mm_xor_si128(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn and(self, other: Self) -> Self {
      Self(_mm_and_si128(self.0, other.0))
    }

    #[inline(always)]
    unsafe fn or(self, other: Self) -> Self {
      Self(_mm_or_si128(self.0, other.0))
    }

    // imm8 bit 0 picks the half of `a`, bit 4 the half of `b`.
    #[inline(always)]
    unsafe fn clmul_00(self, k: Self) -> Self {
      Self(_mm_clmulepi64_si128::<0x00>(self.0, k.0))
    }

    #[inline(always)]
    unsafe fn clmul_01(self, k: Self) -> Self {
      Self(_mm_clmulepi64_si128::<0x01>(self.0, k.0))
    }

    #[inline(always)]
    unsafe fn clmul_10(self, k: Self) -> Self {
      Self(_mm_clmulepi64_si128::<0x10>(self.0, k.0))
    }

    #[inline(always)]
    unsafe fn clmul_11(self, k: Self) -> Self {
      Self(_mm_clmulepi64_si128::<0x11>(self.0, k.0))
    }

    #[inline(always)]
    unsafe fn shuffle(self, selector: Self) -> Self {
      Self(_mm_shuffle_epi8(self.0, selector.0))
    }

    #[inline(always)]
    unsafe fn shr8(self) -> Self {
      Self(_mm_srli_si128::<8>(self.0))
    }

    #[inline(always)]
    unsafe fn shl4(self) -> Self {
      Self(_mm_slli_si128::<4>(self.0))
    }

    #[inline(always)]
    unsafe fn low_u32(self) -> u32 {
      _mm_cvtsi128_si32(self.0) as u32
    }

    #[inline(always)]
    unsafe fn word2(self) -> u32 {
      _mm_extract_epi32::<2>(self.0) as u32
    }
  };
}

impl Lane for Sse {
  sse_lane_ops!();
}

impl Lane for Avx512 {
  sse_lane_ops!();

  #[inline(always)]
  unsafe fn xor3(self, b: Self, c: Self) -> Self {
    // 0x96: a ^ b ^ c.
    Self(_mm_ternarylogic_epi32::<0x96>(self.0, b.0, c.0))
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// Entry points
// ─────────────────────────────────────────────────────────────────────────────

#[target_feature(enable = "sse2,ssse3,sse4.1,pclmulqdq")]
unsafe fn crc32_pclmul_impl(crc: u32, data: &[u8]) -> u32 {
  super::update::<Sse>(crc, data)
}

#[target_feature(enable = "sse2,ssse3,sse4.1,pclmulqdq,avx512f,avx512vl")]
unsafe fn crc32_avx512_impl(crc: u32, data: &[u8]) -> u32 {
  super::update::<Avx512>(crc, data)
}

/// CRC-32 folding with SSE + PCLMULQDQ.
#[inline]
pub(crate) fn crc32_pclmul(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only installed when caps carry PCLMUL_READY.
  unsafe { crc32_pclmul_impl(crc, data) }
}

/// CRC-32 folding with PCLMULQDQ and AVX-512VL XOR3.
#[inline]
pub(crate) fn crc32_avx512(crc: u32, data: &[u8]) -> u32 {
  // SAFETY: only installed when caps carry AVX512_CLMUL_READY.
  unsafe { crc32_avx512_impl(crc, data) }
}
