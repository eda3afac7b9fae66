//! CRC-32 runtime configuration (overrides + thresholds).
//!
//! Two knobs, read once from the environment (`std` only):
//! - `CRCFOLD_FORCE`: pin a kernel (`auto`, `portable`, `soft`, `pclmul`,
//!   `avx512`, `pmull`, `pmull-eor3`)
//! - `CRCFOLD_THRESHOLD`: buffers shorter than this skip SIMD setup in the
//!   streaming hasher
//!
//! Forced modes are always clamped to detected CPU capabilities.

use core::{fmt, str::FromStr};

use platform::Caps;

use crate::kernel::names;

/// Default small-buffer threshold in bytes.
///
/// Below one 64-byte block the fold engine spends more on seeding and the
/// final collapse than the table kernel spends on the bytes.
pub const DEFAULT_SMALL_THRESHOLD: usize = 64;

/// Forced kernel selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Force {
  /// Use the best kernel the CPU supports.
  #[default]
  Auto,
  /// Slice-by-8 table kernel.
  Portable,
  /// Folding engine on software lanes.
  Soft,
  /// x86_64 SSE + PCLMULQDQ.
  Pclmul,
  /// x86_64 PCLMULQDQ + AVX-512VL.
  Avx512,
  /// aarch64 NEON + PMULL.
  Pmull,
  /// aarch64 PMULL + SHA3 `EOR3`.
  PmullEor3,
}

impl Force {
  /// Every mode, in declaration order.
  pub const ALL: [Self; 7] = [
    Self::Auto,
    Self::Portable,
    Self::Soft,
    Self::Pclmul,
    Self::Avx512,
    Self::Pmull,
    Self::PmullEor3,
  ];

  #[must_use]
  pub const fn as_str(self) -> &'static str {
    match self {
      Self::Auto => "auto",
      Self::Portable => "portable",
      Self::Soft => "soft",
      Self::Pclmul => "pclmul",
      Self::Avx512 => "avx512",
      Self::Pmull => "pmull",
      Self::PmullEor3 => "pmull-eor3",
    }
  }

  /// Name of the kernel this mode pins. Empty for [`Force::Auto`].
  #[must_use]
  pub const fn kernel_name(self) -> &'static str {
    match self {
      Self::Auto => "",
      Self::Portable => names::PORTABLE,
      Self::Soft => names::SOFT,
      Self::Pclmul => names::PCLMUL,
      Self::Avx512 => names::AVX512,
      Self::Pmull => names::PMULL,
      Self::PmullEor3 => names::PMULL_EOR3,
    }
  }

  /// Capabilities the pinned kernel needs.
  #[must_use]
  pub const fn requires(self) -> Caps {
    match self {
      Self::Auto | Self::Portable | Self::Soft => Caps::NONE,
      Self::Pclmul => platform::caps::x86::PCLMUL_READY,
      Self::Avx512 => platform::caps::x86::AVX512_CLMUL_READY,
      Self::Pmull => platform::caps::aarch64::PMULL_READY,
      Self::PmullEor3 => platform::caps::aarch64::PMULL_EOR3_READY,
    }
  }
}

impl fmt::Display for Force {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// An unrecognised force-mode string.
///
/// ```
/// use crcfold::config::Force;
///
/// let err = "vpclmul".parse::<Force>().unwrap_err();
/// assert_eq!(
///   err.to_string(),
///   "unknown CRC-32 force mode (expected auto, portable, soft, pclmul, avx512, pmull or pmull-eor3)"
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ParseForceError(());

impl fmt::Display for ParseForceError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("unknown CRC-32 force mode (expected ")?;
    for (i, force) in Force::ALL.iter().enumerate() {
      match i {
        0 => {}
        i if i + 1 == Force::ALL.len() => f.write_str(" or ")?,
        _ => f.write_str(", ")?,
      }
      f.write_str(force.as_str())?;
    }
    f.write_str(")")
  }
}

impl core::error::Error for ParseForceError {}

impl FromStr for Force {
  type Err = ParseForceError;

  /// Case-insensitive; surrounding whitespace is ignored. `table` is accepted
  /// for `portable` and `eor3` for `pmull-eor3`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("table") {
      return Ok(Self::Portable);
    }
    if s.eq_ignore_ascii_case("eor3") {
      return Ok(Self::PmullEor3);
    }
    Self::ALL
      .into_iter()
      .find(|force| s.eq_ignore_ascii_case(force.as_str()))
      .ok_or(ParseForceError(()))
  }
}

/// Full CRC-32 runtime configuration (after applying overrides).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc32Config {
  /// Requested force mode (environment).
  pub requested_force: Force,
  /// Force mode clamped to detected CPU capabilities.
  pub effective_force: Force,
  /// Streaming updates shorter than this take the portable kernel.
  pub small_threshold: usize,
}

#[derive(Clone, Copy, Debug, Default)]
struct Overrides {
  force: Force,
  small_threshold: Option<usize>,
}

#[cfg(feature = "std")]
fn read_env_overrides() -> Overrides {
  fn var(name: &str) -> Option<std::string::String> {
    let value = std::env::var(name).ok()?;
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.into())
  }

  let force = match var("CRCFOLD_FORCE").map(|v| v.parse::<Force>()) {
    Some(Ok(force)) => force,
    Some(Err(_err)) => {
      #[cfg(feature = "tracing")]
      tracing::warn!(error = %_err, "ignoring CRCFOLD_FORCE");
      Force::Auto
    }
    None => Force::Auto,
  };

  Overrides {
    force,
    small_threshold: var("CRCFOLD_THRESHOLD").and_then(|v| v.parse::<usize>().ok()),
  }
}

#[cfg(feature = "std")]
fn overrides() -> Overrides {
  use std::sync::OnceLock;
  static OVERRIDES: OnceLock<Overrides> = OnceLock::new();
  *OVERRIDES.get_or_init(read_env_overrides)
}

#[cfg(not(feature = "std"))]
fn overrides() -> Overrides {
  Overrides::default()
}

/// Requested mode if `caps` can run it, else [`Force::Auto`].
#[inline]
#[must_use]
pub fn clamp_force_to_caps(requested: Force, caps: Caps) -> Force {
  if caps.has(requested.requires()) { requested } else { Force::Auto }
}

/// Streaming updates shorter than this take the portable kernel.
#[inline]
#[must_use]
pub fn small_threshold() -> usize {
  overrides().small_threshold.unwrap_or(DEFAULT_SMALL_THRESHOLD)
}

/// Get the effective CRC-32 configuration for the current platform.
#[must_use]
pub fn get() -> Crc32Config {
  let requested_force = overrides().force;
  let effective_force = clamp_force_to_caps(requested_force, platform::caps());

  Crc32Config {
    requested_force,
    effective_force,
    small_threshold: small_threshold(),
  }
}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::string::ToString;

  use super::*;

  #[test]
  fn parse_round_trips_every_mode() {
    for force in Force::ALL {
      assert_eq!(force.as_str().parse::<Force>(), Ok(force));
      assert_eq!(force.to_string(), force.as_str());
    }
  }

  #[test]
  fn parse_is_lenient_about_case_and_space() {
    assert_eq!(" PCLMUL ".parse::<Force>(), Ok(Force::Pclmul));
    assert_eq!("Pmull-EOR3".parse::<Force>(), Ok(Force::PmullEor3));
    assert_eq!("table".parse::<Force>(), Ok(Force::Portable));
    assert_eq!("eor3".parse::<Force>(), Ok(Force::PmullEor3));
  }

  #[test]
  fn parse_rejects_unknown() {
    assert_eq!("".parse::<Force>(), Err(ParseForceError(())));
    assert_eq!("sse42".parse::<Force>(), Err(ParseForceError(())));
  }

  #[test]
  fn error_lists_every_mode() {
    let msg = ParseForceError(()).to_string();
    for force in Force::ALL {
      assert!(msg.contains(force.as_str()), "{msg}");
    }
    assert!(msg.ends_with("pmull or pmull-eor3)"));
  }

  #[test]
  fn clamp_without_caps() {
    assert_eq!(clamp_force_to_caps(Force::Portable, Caps::NONE), Force::Portable);
    assert_eq!(clamp_force_to_caps(Force::Soft, Caps::NONE), Force::Soft);
    assert_eq!(clamp_force_to_caps(Force::Pclmul, Caps::NONE), Force::Auto);
    assert_eq!(clamp_force_to_caps(Force::PmullEor3, Caps::NONE), Force::Auto);
  }

  #[test]
  fn clamp_with_caps() {
    use platform::caps::{aarch64, x86};
    assert_eq!(clamp_force_to_caps(Force::Pclmul, x86::AVX512_CLMUL_READY), Force::Pclmul);
    assert_eq!(clamp_force_to_caps(Force::Avx512, x86::PCLMUL_READY), Force::Auto);
    assert_eq!(clamp_force_to_caps(Force::PmullEor3, aarch64::PMULL_READY), Force::Auto);
    assert_eq!(clamp_force_to_caps(Force::Pmull, aarch64::PMULL_EOR3_READY), Force::Pmull);
  }

  #[test]
  fn effective_force_is_runnable() {
    let config = get();
    assert!(platform::caps().has(config.effective_force.requires()));
  }
}
