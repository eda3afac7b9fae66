//! Kernel registry and the [`Crc32Kernel`] strategy object.
//!
//! # Kernel tiers
//!
//! - Reference: bitwise, the test oracle
//! - Portable: slice-by-8 table lookup
//! - Soft fold: the folding engine on `u128` lanes
//! - Folding: PCLMULQDQ (x86_64), PMULL (aarch64)
//! - Fused folding: AVX-512VL `vpternlogd` (x86_64), PMULL+EOR3 (aarch64)
//!
//! Every kernel updates the raw CRC register and agrees with the reference
//! on every input. Which one runs is a throughput decision only.

use backend::dispatch::{Candidate, Crc32Fn, Selected, select};
use platform::Caps;

use crate::config::Force;

/// Kernel names, shared by selection, diagnostics and force overrides.
pub mod names {
  pub const REFERENCE: &str = "reference/bitwise";
  pub const PORTABLE: &str = "portable/slice8";
  pub const SOFT: &str = "soft/fold";
  pub const PCLMUL: &str = "x86_64/pclmul";
  pub const AVX512: &str = "x86_64/avx512";
  pub const PMULL: &str = "aarch64/pmull";
  pub const PMULL_EOR3: &str = "aarch64/pmull-eor3";
}

// ─────────────────────────────────────────────────────────────────────────────
// Candidate tables
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(target_arch = "x86_64")]
static ACCELERATED: &[Candidate<Crc32Fn>] = {
  use platform::caps::x86;

  use crate::fold::x86_64 as arch;

  backend::candidates![
    names::AVX512 => x86::AVX512_CLMUL_READY => arch::crc32_avx512,
    names::PCLMUL => x86::PCLMUL_READY => arch::crc32_pclmul,
  ]
};

#[cfg(target_arch = "aarch64")]
static ACCELERATED: &[Candidate<Crc32Fn>] = {
  use platform::caps::aarch64;

  use crate::fold::aarch64 as arch;

  backend::candidates![
    names::PMULL_EOR3 => aarch64::PMULL_EOR3_READY => arch::crc32_pmull_eor3,
    names::PMULL => aarch64::PMULL_READY => arch::crc32_pmull,
  ]
};

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
static ACCELERATED: &[Candidate<Crc32Fn>] = &[];

/// Hardware kernels for this architecture, best first.
#[inline]
pub(crate) fn accelerated() -> &'static [Candidate<Crc32Fn>] {
  ACCELERATED
}

fn portable_kernel(crc: u32, data: &[u8]) -> u32 {
  crate::portable::crc32_slice8(crc, data)
}

fn soft_kernel(crc: u32, data: &[u8]) -> u32 {
  crate::fold::soft::crc32_soft(crc, data)
}

// ─────────────────────────────────────────────────────────────────────────────
// Strategy object
// ─────────────────────────────────────────────────────────────────────────────

/// A selected CRC-32 kernel.
///
/// `Copy`, owned by the caller and passed by reference; there is no global
/// mutable kernel pointer. Construct it from capabilities once and reuse it:
///
/// ```
/// use crcfold::Crc32Kernel;
///
/// let kernel = Crc32Kernel::detect();
/// let crc = kernel.compute(!0, b"123456789") ^ !0;
/// assert_eq!(crc, 0xCBF4_3926);
/// ```
#[derive(Clone, Copy)]
pub struct Crc32Kernel {
  selected: Selected<Crc32Fn>,
}

impl Crc32Kernel {
  /// The slice-by-8 table kernel. Runs on every target.
  #[inline]
  #[must_use]
  pub const fn portable() -> Self {
    Self {
      selected: Selected::new(names::PORTABLE, portable_kernel),
    }
  }

  /// The folding engine on software lanes. Runs on every target.
  #[inline]
  #[must_use]
  pub const fn soft() -> Self {
    Self {
      selected: Selected::new(names::SOFT, soft_kernel),
    }
  }

  /// Best kernel `caps` can run, or [`portable`](Self::portable).
  #[must_use]
  pub fn for_caps(caps: Caps) -> Self {
    select(caps, accelerated()).map_or_else(Self::portable, |selected| Self { selected })
  }

  /// Best kernel for the running CPU.
  #[must_use]
  pub fn detect() -> Self {
    Self::for_caps(platform::caps())
  }

  /// Kernel a force mode names, if `caps` can run it; otherwise the automatic choice.
  #[must_use]
  pub fn for_force(force: Force, caps: Caps) -> Self {
    match force {
      Force::Auto => Self::for_caps(caps),
      Force::Portable => Self::portable(),
      Force::Soft => Self::soft(),
      Force::Pclmul | Force::Avx512 | Force::Pmull | Force::PmullEor3 => accelerated()
        .iter()
        .find(|candidate| candidate.name == force.kernel_name() && caps.has(candidate.requires))
        .map_or_else(
          || Self::for_caps(caps),
          |candidate| Self {
            selected: Selected::new(candidate.name, candidate.func),
          },
        ),
    }
  }

  /// Kernel name, e.g. `"x86_64/pclmul"`.
  #[inline]
  #[must_use]
  pub const fn name(&self) -> &'static str {
    self.selected.name
  }

  /// Update the raw CRC register `crc` with `data`.
  #[inline]
  #[must_use]
  pub fn compute(&self, crc: u32, data: &[u8]) -> u32 {
    (self.selected.func)(crc, data)
  }

  /// `true` for hardware carry-less multiply kernels.
  #[inline]
  #[must_use]
  pub fn is_accelerated(&self) -> bool {
    accelerated().iter().any(|candidate| candidate.name == self.name())
  }

  #[cfg(any(test, feature = "alloc"))]
  #[inline]
  pub(crate) const fn from_selected(selected: Selected<Crc32Fn>) -> Self {
    Self { selected }
  }

  #[inline]
  pub(crate) const fn selected(self) -> Selected<Crc32Fn> {
    self.selected
  }
}

impl Default for Crc32Kernel {
  fn default() -> Self {
    Self::portable()
  }
}

impl core::fmt::Debug for Crc32Kernel {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_tuple("Crc32Kernel").field(&self.name()).finish()
  }
}

/// Install the best accelerated kernel for `caps` into `slot`.
///
/// Returns `true` when a kernel was installed. Without carry-less multiply
/// support `slot` keeps whatever it held and `false` is returned.
///
/// ```
/// use crcfold::{Crc32Kernel, register_accelerated};
/// use platform::Caps;
///
/// let mut kernel = Crc32Kernel::portable();
/// assert!(!register_accelerated(&mut kernel, Caps::NONE));
/// assert_eq!(kernel.name(), "portable/slice8");
/// ```
pub fn register_accelerated(slot: &mut Crc32Kernel, caps: Caps) -> bool {
  let Some(selected) = select(caps, accelerated()) else {
    #[cfg(feature = "tracing")]
    tracing::debug!(kept = slot.name(), "no carry-less multiply support; kernel unchanged");
    return false;
  };

  #[cfg(feature = "tracing")]
  tracing::debug!(previous = slot.name(), installed = selected.name, "registered accelerated CRC-32 kernel");

  *slot = Crc32Kernel { selected };
  true
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::reference::crc32_bitwise;

  const INPUT: &[u8] = b"strategy objects are passed by reference";

  #[test]
  fn portable_and_soft_agree_with_reference() {
    let expected = crc32_bitwise(!0, INPUT);
    assert_eq!(Crc32Kernel::portable().compute(!0, INPUT), expected);
    assert_eq!(Crc32Kernel::soft().compute(!0, INPUT), expected);
  }

  #[test]
  fn no_caps_selects_portable() {
    let kernel = Crc32Kernel::for_caps(Caps::NONE);
    assert_eq!(kernel.name(), names::PORTABLE);
    assert!(!kernel.is_accelerated());
  }

  #[test]
  fn register_without_caps_keeps_slot() {
    let mut slot = Crc32Kernel::soft();
    assert!(!register_accelerated(&mut slot, Caps::NONE));
    assert_eq!(slot.name(), names::SOFT);
  }

  #[test]
  fn register_with_detected_caps() {
    let caps = platform::caps();
    let mut slot = Crc32Kernel::portable();
    let installed = register_accelerated(&mut slot, caps);
    assert_eq!(installed, select(caps, accelerated()).is_some());
    assert_eq!(installed, slot.is_accelerated());
    assert_eq!(slot.compute(!0, INPUT), crc32_bitwise(!0, INPUT));
  }

  #[test]
  fn detect_matches_for_caps() {
    assert_eq!(Crc32Kernel::detect().name(), Crc32Kernel::for_caps(platform::caps()).name());
  }

  #[test]
  fn force_without_caps_falls_back() {
    for force in [Force::Pclmul, Force::Avx512, Force::Pmull, Force::PmullEor3] {
      assert_eq!(Crc32Kernel::for_force(force, Caps::NONE).name(), names::PORTABLE);
    }
    assert_eq!(Crc32Kernel::for_force(Force::Soft, Caps::NONE).name(), names::SOFT);
  }

  #[test]
  #[cfg(target_arch = "x86_64")]
  fn x86_ranking() {
    use platform::caps::x86;
    assert_eq!(Crc32Kernel::for_caps(x86::PCLMUL_READY).name(), names::PCLMUL);
    assert_eq!(Crc32Kernel::for_caps(x86::AVX512_CLMUL_READY).name(), names::AVX512);
    assert_eq!(
      Crc32Kernel::for_force(Force::Pclmul, x86::AVX512_CLMUL_READY).name(),
      names::PCLMUL
    );
  }

  #[test]
  #[cfg(target_arch = "aarch64")]
  fn aarch64_ranking() {
    use platform::caps::aarch64;
    assert_eq!(Crc32Kernel::for_caps(aarch64::PMULL_READY).name(), names::PMULL);
    assert_eq!(Crc32Kernel::for_caps(aarch64::PMULL_EOR3_READY).name(), names::PMULL_EOR3);
  }

  #[test]
  fn debug_shows_name() {
    extern crate alloc;
    assert_eq!(alloc::format!("{:?}", Crc32Kernel::portable()), "Crc32Kernel(\"portable/slice8\")");
  }
}
