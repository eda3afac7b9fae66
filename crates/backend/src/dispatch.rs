//! Kernel dispatch: selection and caching.
//!
//! - [`Candidate`]: a kernel with capability requirements
//! - [`Selected`]: the result of kernel selection
//! - [`select`]: choose the best kernel from an ordered candidate list
//! - [`Crc32Dispatcher`]: lazily selected, process-wide kernel cache
//!
//! Algorithm crates register kernels as an ordered list of candidates, best
//! first, and finish the list with a portable entry that requires nothing:
//!
//! ```
//! use backend::{candidates, dispatch::{Crc32Fn, select}};
//! use platform::Caps;
//!
//! fn portable(crc: u32, _data: &[u8]) -> u32 {
//!   crc
//! }
//!
//! let selected = select::<Crc32Fn>(
//!   Caps::NONE,
//!   candidates![
//!     "x86_64/pclmul" => platform::caps::x86::PCLMUL_READY => portable,
//!     "portable/slice8" => Caps::NONE => portable,
//!   ],
//! );
//! assert_eq!(selected.map(|s| s.name), Some("portable/slice8"));
//! ```

use platform::Caps;

/// Signature for CRC-32 kernels: `fn(crc: u32, data: &[u8]) -> u32`.
///
/// `crc` is the raw CRC register; kernels apply no pre or post inversion.
pub type Crc32Fn = fn(u32, &[u8]) -> u32;

// ─────────────────────────────────────────────────────────────────────────────
// Core Types
// ─────────────────────────────────────────────────────────────────────────────

/// A candidate kernel with capability requirements.
///
/// Candidates are ordered from best to worst. The dispatcher selects the
/// first candidate whose requirements are satisfied by the detected capabilities.
#[derive(Clone, Copy, Debug)]
pub struct Candidate<F> {
  /// Human-readable name for diagnostics (e.g., "x86_64/pclmul").
  pub name: &'static str,
  /// Required CPU capabilities. Must be a subset of detected caps.
  pub requires: Caps,
  /// The kernel function pointer.
  pub func: F,
}

impl<F> Candidate<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, requires: Caps, func: F) -> Self {
    Self { name, requires, func }
  }
}

/// The result of kernel selection: the kernel's name and function pointer.
#[derive(Clone, Copy, Debug)]
pub struct Selected<F> {
  /// Human-readable name of the selected kernel.
  pub name: &'static str,
  /// The selected kernel function.
  pub func: F,
}

impl<F> Selected<F> {
  #[inline]
  #[must_use]
  pub const fn new(name: &'static str, func: F) -> Self {
    Self { name, func }
  }
}

/// Select the best kernel from a candidate list.
///
/// Returns the first candidate whose `requires` is satisfied by `caps`, or
/// `None` when nothing matches. Lists that end in a `Caps::NONE` entry
/// always produce `Some`.
#[inline]
#[must_use]
pub fn select<F: Copy>(caps: Caps, candidates: &[Candidate<F>]) -> Option<Selected<F>> {
  candidates
    .iter()
    .find(|candidate| caps.has(candidate.requires))
    .map(|candidate| Selected::new(candidate.name, candidate.func))
}

/// Build a `&[Candidate<_>]` from `name => requires => func` rows.
#[macro_export]
macro_rules! candidates {
  ($($name:expr => $requires:expr => $func:expr),+ $(,)?) => {
    &[$($crate::dispatch::Candidate::new($name, $requires, $func)),+]
  };
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────────────────────────────────────

/// Dispatcher for CRC-32 kernels.
///
/// Caches the selected kernel on first access. Under `std` it uses a
/// `OnceLock`, so the selector runs at most once and the cached value is
/// never written again. Without `std` there is no runtime detection, the
/// selector is a pure function of compile-time features, and it simply runs
/// on each access.
///
/// ```ignore
/// static DISPATCH: Crc32Dispatcher = Crc32Dispatcher::new(select_crc32);
///
/// fn compute(crc: u32, data: &[u8]) -> u32 {
///   DISPATCH.call(crc, data)
/// }
/// ```
pub struct Crc32Dispatcher {
  #[cfg(feature = "std")]
  inner: std::sync::OnceLock<Selected<Crc32Fn>>,

  /// The selector function that chooses the best kernel.
  selector: fn() -> Selected<Crc32Fn>,
}

impl Crc32Dispatcher {
  /// Create a new dispatcher with the given selector function.
  #[must_use]
  pub const fn new(selector: fn() -> Selected<Crc32Fn>) -> Self {
    Self {
      #[cfg(feature = "std")]
      inner: std::sync::OnceLock::new(),
      selector,
    }
  }

  /// Get the selected kernel, initializing on first call.
  #[inline]
  #[must_use]
  pub fn get(&self) -> Selected<Crc32Fn> {
    #[cfg(feature = "std")]
    {
      *self.inner.get_or_init(self.selector)
    }

    #[cfg(not(feature = "std"))]
    {
      (self.selector)()
    }
  }

  #[inline]
  #[must_use]
  pub fn backend_name(&self) -> &'static str {
    self.get().name
  }

  /// Call the selected kernel.
  #[inline]
  #[must_use]
  pub fn call(&self, crc: u32, data: &[u8]) -> u32 {
    (self.get().func)(crc, data)
  }
}

impl core::fmt::Debug for Crc32Dispatcher {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.debug_struct("Crc32Dispatcher").field("selected", &self.backend_name()).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn portable_crc32(_crc: u32, _data: &[u8]) -> u32 {
    0xDEADBEEF
  }

  fn fast_crc32(_crc: u32, _data: &[u8]) -> u32 {
    0xCAFEBABE
  }

  const BIT0: Caps = Caps::bit(0);
  const BIT1: Caps = Caps::bit(1);

  #[test]
  fn test_candidate_creation() {
    let c: Candidate<Crc32Fn> = Candidate::new("test", Caps::NONE, portable_crc32);
    assert_eq!(c.name, "test");
    assert_eq!(c.requires, Caps::NONE);
  }

  #[test]
  fn test_select_portable_fallback() {
    let candidates: &[Candidate<Crc32Fn>] = candidates![
      "fast" => BIT0 => fast_crc32,
      "portable" => Caps::NONE => portable_crc32,
    ];

    let selected = select(Caps::NONE, candidates).unwrap();
    assert_eq!(selected.name, "portable");
    assert_eq!((selected.func)(0, &[]), 0xDEADBEEF);
  }

  #[test]
  fn test_select_best_match() {
    let candidates: &[Candidate<Crc32Fn>] = candidates![
      "fast" => BIT0 => fast_crc32,
      "portable" => Caps::NONE => portable_crc32,
    ];

    let selected = select(BIT0, candidates).unwrap();
    assert_eq!(selected.name, "fast");
    assert_eq!((selected.func)(0, &[]), 0xCAFEBABE);
  }

  #[test]
  fn test_select_skips_unavailable() {
    let candidates: &[Candidate<Crc32Fn>] = candidates![
      "needs_bit1" => BIT1 => fast_crc32,
      "needs_bit0" => BIT0 => fast_crc32,
      "portable" => Caps::NONE => portable_crc32,
    ];

    let selected = select(BIT0, candidates).unwrap();
    assert_eq!(selected.name, "needs_bit0");
  }

  #[test]
  fn test_select_without_fallback_is_none() {
    let candidates: &[Candidate<Crc32Fn>] = candidates!["fast" => BIT0 => fast_crc32];
    assert!(select(BIT1, candidates).is_none());
    assert!(select(Caps::NONE, &[] as &[Candidate<Crc32Fn>]).is_none());
  }

  fn test_selector() -> Selected<Crc32Fn> {
    Selected::new("test", portable_crc32)
  }

  #[test]
  fn test_crc32_dispatcher() {
    static DISPATCH: Crc32Dispatcher = Crc32Dispatcher::new(test_selector);

    let selected = DISPATCH.get();
    assert_eq!(selected.name, "test");

    // Second call should return cached result
    let selected2 = DISPATCH.get();
    assert_eq!(selected2.name, "test");

    assert_eq!(DISPATCH.call(0, &[]), 0xDEADBEEF);
  }

  #[test]
  fn test_dispatcher_backend_name() {
    static DISPATCH: Crc32Dispatcher = Crc32Dispatcher::new(test_selector);
    assert_eq!(DISPATCH.backend_name(), "test");
  }
}
