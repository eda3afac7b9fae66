//! Runtime CPU detection.
//!
//! - Compile-time features via `cfg!(target_feature = "...")`
//! - Runtime features via `is_x86_feature_detected!` / `is_aarch64_feature_detected!` (std only)
//! - Caching via `OnceLock` (std); without std only compile-time features are known, so nothing needs
//!   caching
//! - User-supplied override for bare metal and testing
//! - Miri always sees no capabilities

use core::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::caps::Caps;

// ─────────────────────────────────────────────────────────────────────────────
// Override Support
// ─────────────────────────────────────────────────────────────────────────────

static OVERRIDE_SET: AtomicBool = AtomicBool::new(false);

static OVERRIDE_BITS: [AtomicU64; 4] = [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)];

pub fn set_caps_override(value: Option<Caps>) {
  match value {
    Some(caps) => {
      for (slot, word) in OVERRIDE_BITS.iter().zip(caps.0) {
        slot.store(word, Ordering::Relaxed);
      }
      OVERRIDE_SET.store(true, Ordering::Release);
    }
    None => OVERRIDE_SET.store(false, Ordering::Release),
  }
}

#[inline]
pub fn has_override() -> bool {
  OVERRIDE_SET.load(Ordering::Acquire)
}

fn get_override() -> Option<Caps> {
  if !OVERRIDE_SET.load(Ordering::Acquire) {
    return None;
  }
  let mut words = [0u64; 4];
  for (word, slot) in words.iter_mut().zip(&OVERRIDE_BITS) {
    *word = slot.load(Ordering::Relaxed);
  }
  Some(Caps(words))
}

// ─────────────────────────────────────────────────────────────────────────────
// Main API
// ─────────────────────────────────────────────────────────────────────────────

#[inline]
#[must_use]
pub fn caps() -> Caps {
  // Miri cannot interpret SIMD intrinsics.
  if cfg!(miri) {
    return Caps::NONE;
  }

  if let Some(caps) = get_override() {
    return caps;
  }

  #[cfg(feature = "std")]
  {
    use std::sync::OnceLock;
    static CACHED: OnceLock<Caps> = OnceLock::new();
    *CACHED.get_or_init(detect_uncached)
  }

  #[cfg(not(feature = "std"))]
  {
    detect_uncached()
  }
}

#[inline]
#[must_use]
pub fn detect_uncached() -> Caps {
  #[allow(unused_mut)] // only mutated under std on x86_64/aarch64
  let mut caps = compile_time();

  #[cfg(all(feature = "std", target_arch = "x86_64"))]
  {
    caps |= runtime_x86_64();
  }

  #[cfg(all(feature = "std", target_arch = "aarch64"))]
  {
    caps |= runtime_aarch64();
  }

  caps
}

// ─────────────────────────────────────────────────────────────────────────────
// Compile-time detection
// ─────────────────────────────────────────────────────────────────────────────

#[allow(unused_imports)]
use crate::caps::{aarch64, x86};

const fn compile_time() -> Caps {
  #[allow(unused_mut)]
  let mut caps = Caps::NONE;

  #[cfg(target_feature = "sse2")]
  {
    caps = caps.union(x86::SSE2);
  }
  #[cfg(target_feature = "ssse3")]
  {
    caps = caps.union(x86::SSSE3);
  }
  #[cfg(target_feature = "sse4.1")]
  {
    caps = caps.union(x86::SSE41);
  }
  #[cfg(target_feature = "pclmulqdq")]
  {
    caps = caps.union(x86::PCLMULQDQ);
  }
  #[cfg(target_feature = "avx512f")]
  {
    caps = caps.union(x86::AVX512F);
  }
  #[cfg(target_feature = "avx512vl")]
  {
    caps = caps.union(x86::AVX512VL);
  }

  // NEON is mandatory on AArch64.
  #[cfg(target_arch = "aarch64")]
  {
    caps = caps.union(aarch64::NEON);
  }
  #[cfg(all(target_arch = "aarch64", target_feature = "aes"))]
  {
    caps = caps.union(aarch64::AES).union(aarch64::PMULL);
  }
  #[cfg(all(target_arch = "aarch64", target_feature = "sha3"))]
  {
    caps = caps.union(aarch64::SHA3);
  }

  caps
}

// ─────────────────────────────────────────────────────────────────────────────
// Runtime detection
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(all(feature = "std", target_arch = "x86_64"))]
fn runtime_x86_64() -> Caps {
  let mut caps = x86::SSE2; // x86_64 baseline

  if std::arch::is_x86_feature_detected!("ssse3") {
    caps |= x86::SSSE3;
  }
  if std::arch::is_x86_feature_detected!("sse4.1") {
    caps |= x86::SSE41;
  }
  if std::arch::is_x86_feature_detected!("pclmulqdq") {
    caps |= x86::PCLMULQDQ;
  }
  if std::arch::is_x86_feature_detected!("avx512f") {
    caps |= x86::AVX512F;
  }
  if std::arch::is_x86_feature_detected!("avx512vl") {
    caps |= x86::AVX512VL;
  }

  caps
}

#[cfg(all(feature = "std", target_arch = "aarch64"))]
fn runtime_aarch64() -> Caps {
  let mut caps = aarch64::NEON;

  // `aes` on Linux/macOS implies PMULL (FEAT_PMULL is reported under the same hwcap).
  if std::arch::is_aarch64_feature_detected!("aes") {
    caps |= aarch64::AES | aarch64::PMULL;
  }
  if std::arch::is_aarch64_feature_detected!("sha3") {
    caps |= aarch64::SHA3;
  }

  caps
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn detection_is_stable() {
    assert_eq!(detect_uncached(), detect_uncached());
  }

  #[test]
  fn compile_time_is_subset_of_detected() {
    assert!(detect_uncached().has(compile_time()));
  }

  #[test]
  #[cfg(target_arch = "x86_64")]
  fn x86_64_has_sse2() {
    assert!(detect_uncached().has(x86::SSE2));
  }

  #[test]
  #[cfg(target_arch = "aarch64")]
  fn aarch64_has_neon() {
    assert!(detect_uncached().has(aarch64::NEON));
  }

  #[test]
  #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
  fn other_arch_has_nothing() {
    assert!(detect_uncached().is_empty());
  }
}
