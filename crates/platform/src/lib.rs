//! CPU capability detection for crcfold.
//!
//! This crate is the single source of truth for "which instructions may run
//! here". Algorithm crates query [`caps()`] instead of doing ad-hoc detection.
//!
//! ```
//! let caps = platform::caps();
//!
//! #[cfg(target_arch = "x86_64")]
//! if caps.has(platform::caps::x86::PCLMUL_READY) {
//!   // carry-less multiply folding is available
//! }
//! # let _ = caps;
//! ```
//!
//! - Compile-time features are folded in via `cfg!`, so statically enabled targets need no runtime probe.
//! - Runtime detection is cached in a `OnceLock` (std).
//! - Under Miri, always returns no capabilities.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod caps;
mod detect;

pub use caps::Caps;

/// Detected CPU capabilities.
///
/// # Caching
///
/// - With `std`: detected once and cached in a `OnceLock`.
/// - Without `std`: only compile-time features are visible; computed on each call (a constant).
///
/// An override set via [`set_caps_override`] takes precedence.
#[inline]
#[must_use]
pub fn caps() -> Caps {
  detect::caps()
}

/// Detect capabilities without consulting the cache or override.
#[inline]
#[must_use]
pub fn detect_uncached() -> Caps {
  detect::detect_uncached()
}

/// Set or clear a capabilities override.
///
/// When set, [`caps()`] returns the override instead of detecting. Useful for
/// bare metal targets where the CPU is known at deployment, and for forcing
/// fallback paths in tests. Call early, before kernels are selected: caches
/// built on top of [`caps()`] do not observe later changes.
#[inline]
pub fn set_caps_override(value: Option<Caps>) {
  detect::set_caps_override(value);
}

/// Check if an override is currently set.
#[inline]
#[must_use]
pub fn has_override() -> bool {
  detect::has_override()
}
