//! CPU capability representation.
//!
//! [`Caps`] answers one question: "which instructions may this process
//! legally execute?" It is a 256-bit bitset; each bit names one ISA
//! extension. Bits are architecture-specific but the API is uniform.
//!
//! # Bit Layout
//!
//! - Bits 0-63: x86/x86_64 features
//! - Bits 64-127: aarch64 features
//! - Bits 128-255: reserved
//!
//! # Usage
//!
//! ```
//! use platform::caps::{Caps, x86};
//!
//! let caps = x86::SSE2 | x86::SSSE3 | x86::PCLMULQDQ;
//! assert!(caps.has(x86::PCLMUL_READY));
//! assert!(!caps.has(x86::AVX512_CLMUL_READY));
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Core Capability Type
// ─────────────────────────────────────────────────────────────────────────────

/// CPU capabilities: a 256-bit feature bitset.
///
/// `Caps` is `Copy`, `Send`, and `Sync`; it can be freely shared across threads.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Caps(pub(crate) [u64; 4]);

impl Caps {
  /// Empty capability set (no features).
  pub const NONE: Self = Self([0; 4]);

  /// Create a capability set from raw words.
  ///
  /// Only available in test builds or with the `testing` feature.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn from_raw(words: [u64; 4]) -> Self {
    Self(words)
  }

  /// Access the raw underlying words.
  #[cfg(any(test, feature = "testing"))]
  #[inline]
  #[must_use]
  pub const fn as_raw(&self) -> &[u64; 4] {
    &self.0
  }

  /// Check if all features in `required` are present.
  #[inline(always)]
  #[must_use]
  pub const fn has(self, required: Self) -> bool {
    (self.0[0] & required.0[0]) == required.0[0]
      && (self.0[1] & required.0[1]) == required.0[1]
      && (self.0[2] & required.0[2]) == required.0[2]
      && (self.0[3] & required.0[3]) == required.0[3]
  }

  /// Union of two capability sets.
  #[inline]
  #[must_use]
  pub const fn union(self, other: Self) -> Self {
    Self([
      self.0[0] | other.0[0],
      self.0[1] | other.0[1],
      self.0[2] | other.0[2],
      self.0[3] | other.0[3],
    ])
  }

  /// Intersection of two capability sets.
  #[inline]
  #[must_use]
  pub const fn intersection(self, other: Self) -> Self {
    Self([
      self.0[0] & other.0[0],
      self.0[1] & other.0[1],
      self.0[2] & other.0[2],
      self.0[3] & other.0[3],
    ])
  }

  #[inline]
  #[must_use]
  pub const fn is_empty(self) -> bool {
    self.0[0] == 0 && self.0[1] == 0 && self.0[2] == 0 && self.0[3] == 0
  }

  /// Number of features present.
  #[inline]
  #[must_use]
  pub const fn count(self) -> u32 {
    self.0[0].count_ones() + self.0[1].count_ones() + self.0[2].count_ones() + self.0[3].count_ones()
  }

  /// Capability set with a single bit set.
  #[inline]
  #[must_use]
  pub const fn bit(bit: u8) -> Self {
    let shift = bit % 64;
    let mut bits = [0u64; 4];
    // `match` keeps this free of indexing in const context.
    match bit / 64 {
      0 => bits[0] = 1u64 << shift,
      1 => bits[1] = 1u64 << shift,
      2 => bits[2] = 1u64 << shift,
      _ => bits[3] = 1u64 << shift,
    }
    Self(bits)
  }

  /// Names of the known features present in this set, in bit order.
  pub fn names(self) -> impl Iterator<Item = &'static str> {
    NAMED.iter().filter(move |(_, caps)| self.has(*caps)).map(|(name, _)| *name)
  }
}

impl core::ops::BitOr for Caps {
  type Output = Self;

  #[inline]
  fn bitor(self, rhs: Self) -> Self::Output {
    self.union(rhs)
  }
}

impl core::ops::BitAnd for Caps {
  type Output = Self;

  #[inline]
  fn bitand(self, rhs: Self) -> Self::Output {
    self.intersection(rhs)
  }
}

impl core::ops::BitOrAssign for Caps {
  #[inline]
  fn bitor_assign(&mut self, rhs: Self) {
    *self = self.union(rhs);
  }
}

impl core::fmt::Debug for Caps {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_set().entries(self.names()).finish()
  }
}

// ─────────────────────────────────────────────────────────────────────────────
// x86/x86_64 Features (bits 0-63)
// ─────────────────────────────────────────────────────────────────────────────

/// x86/x86_64 CPU features used by the CRC folding kernels.
pub mod x86 {
  use super::Caps;

  // ─── SSE Family ───
  pub const SSE2: Caps = Caps::bit(0);
  pub const SSSE3: Caps = Caps::bit(2);
  pub const SSE41: Caps = Caps::bit(3);

  // ─── Crypto Extensions ───
  pub const PCLMULQDQ: Caps = Caps::bit(11);

  // ─── AVX-512 Foundation ───
  pub const AVX512F: Caps = Caps::bit(14);
  pub const AVX512VL: Caps = Caps::bit(15);

  // ─── Combined Capability Masks ───

  /// 128-bit folding: PCLMULQDQ + SSSE3 (`pshufb`) + SSE4.1 (`pextrd`).
  pub const PCLMUL_READY: Caps = Caps([PCLMULQDQ.0[0] | SSSE3.0[0] | SSE41.0[0] | SSE2.0[0], 0, 0, 0]);

  /// 128-bit folding with `vpternlogd` three-way XOR (AVX-512F + AVX-512VL).
  pub const AVX512_CLMUL_READY: Caps = Caps([PCLMUL_READY.0[0] | AVX512F.0[0] | AVX512VL.0[0], 0, 0, 0]);
}

// ─────────────────────────────────────────────────────────────────────────────
// aarch64 Features (bits 64-127)
// ─────────────────────────────────────────────────────────────────────────────

/// aarch64 CPU features used by the CRC folding kernels.
pub mod aarch64 {
  use super::Caps;

  pub const NEON: Caps = Caps::bit(64); // Baseline on AArch64

  // ─── Crypto Extensions ───
  pub const AES: Caps = Caps::bit(65);
  pub const PMULL: Caps = Caps::bit(66); // Reported together with AES
  pub const SHA3: Caps = Caps::bit(68); // Includes EOR3

  // ─── Combined Capability Masks ───

  /// 64x64 polynomial multiply (`pmull`, `pmull2`) with NEON table lookups.
  pub const PMULL_READY: Caps = Caps([0, NEON.0[1] | AES.0[1] | PMULL.0[1], 0, 0]);

  /// PMULL plus the SHA3 `eor3` three-way XOR.
  pub const PMULL_EOR3_READY: Caps = Caps([0, PMULL_READY.0[1] | SHA3.0[1], 0, 0]);
}

/// Every named single-feature bit, in bit order.
const NAMED: [(&str, Caps); 10] = [
  ("sse2", x86::SSE2),
  ("ssse3", x86::SSSE3),
  ("sse4.1", x86::SSE41),
  ("pclmulqdq", x86::PCLMULQDQ),
  ("avx512f", x86::AVX512F),
  ("avx512vl", x86::AVX512VL),
  ("neon", aarch64::NEON),
  ("aes", aarch64::AES),
  ("pmull", aarch64::PMULL),
  ("sha3", aarch64::SHA3),
];

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{format, vec::Vec};

  use super::*;

  #[test]
  fn bit_lands_in_expected_word() {
    assert_eq!(Caps::bit(0).as_raw(), &[1, 0, 0, 0]);
    assert_eq!(Caps::bit(65).as_raw(), &[0, 2, 0, 0]);
    assert_eq!(Caps::bit(255).as_raw(), &[0, 0, 0, 1 << 63]);
  }

  #[test]
  fn raw_words_rebuild_named_masks() {
    let pclmul = Caps::from_raw([x86::PCLMUL_READY.as_raw()[0], 0, 0, 0]);
    assert_eq!(pclmul, x86::PCLMUL_READY);
    assert_eq!(pclmul.count(), 4);

    let eor3 = Caps::from_raw(*aarch64::PMULL_EOR3_READY.as_raw());
    assert!(eor3.has(aarch64::SHA3));
    assert_eq!(Caps::from_raw([0; 4]), Caps::NONE);
  }

  #[test]
  fn has_requires_every_bit() {
    let caps = x86::SSE2 | x86::SSSE3 | x86::PCLMULQDQ;
    assert!(caps.has(x86::PCLMULQDQ));
    assert!(!caps.has(x86::PCLMUL_READY), "missing sse4.1");
    assert!((caps | x86::SSE41).has(x86::PCLMUL_READY));
    assert!(caps.has(Caps::NONE));
  }

  #[test]
  fn wider_masks_imply_narrower() {
    assert!(x86::AVX512_CLMUL_READY.has(x86::PCLMUL_READY));
    assert!(aarch64::PMULL_EOR3_READY.has(aarch64::PMULL_READY));
    assert!(!aarch64::PMULL_READY.has(aarch64::SHA3));
  }

  #[test]
  fn set_algebra() {
    let a = x86::SSE2 | x86::SSSE3;
    let b = x86::SSSE3 | x86::SSE41;
    assert_eq!(a & b, x86::SSSE3);
    assert_eq!((a | b).count(), 3);
    assert!(Caps::NONE.is_empty());
    assert!(!a.is_empty());

    let mut c = Caps::NONE;
    c |= aarch64::NEON;
    assert_eq!(c, aarch64::NEON);
  }

  #[test]
  fn names_follow_bit_order() {
    let caps = aarch64::PMULL_READY | x86::SSE2;
    let names: Vec<_> = caps.names().collect();
    assert_eq!(names, ["sse2", "neon", "aes", "pmull"]);
    assert_eq!(format!("{caps:?}"), r#"{"sse2", "neon", "aes", "pmull"}"#);
  }
}
