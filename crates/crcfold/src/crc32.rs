//! CRC-32/IEEE public API.
//!
//! - [`compute_crc32`]: one-shot update of a raw CRC register through the
//!   process-wide dispatcher
//! - [`Crc32`]: streaming hasher with the standard `0xFFFF_FFFF` init and xorout
//! - [`crc32_reference`], [`crc32_portable`]: the fallbacks, callable directly
//!
//! # Register convention
//!
//! Kernels work on the raw register: no complement on entry or exit. The
//! zlib/PNG/Ethernet value of `data` is `compute_crc32(data, !0) ^ !0`, and
//! chaining is direct:
//!
//! ```
//! use crcfold::compute_crc32;
//!
//! let whole = compute_crc32(b"123456789", !0);
//! let chained = compute_crc32(b"6789", compute_crc32(b"12345", !0));
//! assert_eq!(whole, chained);
//! assert_eq!(whole ^ !0, 0xCBF4_3926);
//! assert_eq!(compute_crc32(&[], 0x1234_5678), 0x1234_5678);
//! ```

use backend::dispatch::{Crc32Dispatcher, Crc32Fn, Selected};
use traits::{Checksum, ChecksumCombine};

use crate::{
  combine::combine_crc32,
  config::{self, Crc32Config},
  kernel::Crc32Kernel,
};

// ─────────────────────────────────────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────────────────────────────────────

fn select_crc32() -> Selected<Crc32Fn> {
  let config = config::get();
  let kernel = Crc32Kernel::for_force(config.effective_force, platform::caps());

  #[cfg(feature = "tracing")]
  tracing::debug!(
    kernel = kernel.name(),
    requested = config.requested_force.as_str(),
    effective = config.effective_force.as_str(),
    "selected CRC-32 kernel"
  );

  kernel.selected()
}

static CRC32_DISPATCHER: Crc32Dispatcher = Crc32Dispatcher::new(select_crc32);

/// Update the raw CRC-32 register `seed` with `data`.
///
/// Pure and deterministic. Empty input returns `seed` unchanged. The kernel
/// is chosen once per process from the detected CPU features and the
/// `CRCFOLD_FORCE` override; the choice never affects the result.
#[inline]
#[must_use]
pub fn compute_crc32(data: &[u8], seed: u32) -> u32 {
  CRC32_DISPATCHER.call(seed, data)
}

/// Bitwise reference update of the raw register. Slow; an oracle.
#[inline]
#[must_use]
pub fn crc32_reference(crc: u32, data: &[u8]) -> u32 {
  crate::reference::crc32_bitwise(crc, data)
}

/// Slice-by-8 update of the raw register. Runs on every target.
#[inline]
#[must_use]
pub fn crc32_portable(crc: u32, data: &[u8]) -> u32 {
  crate::portable::crc32_slice8(crc, data)
}

// ─────────────────────────────────────────────────────────────────────────────
// Streaming hasher
// ─────────────────────────────────────────────────────────────────────────────

/// CRC-32 checksum (IEEE 802.3 / ISO-HDLC).
///
/// Used in Ethernet FCS, ZIP, gzip and PNG.
///
/// # Properties
///
/// - **Polynomial**: 0x04C11DB7 (normal), 0xEDB88320 (reflected)
/// - **Initial value**: 0xFFFFFFFF
/// - **Final XOR**: 0xFFFFFFFF
/// - **Reflect input/output**: Yes
///
/// # Example
///
/// ```
/// use crcfold::{Checksum, ChecksumCombine, Crc32};
///
/// let crc = Crc32::checksum(b"123456789");
/// assert_eq!(crc, 0xCBF4_3926);
///
/// let mut hasher = Crc32::new();
/// hasher.update(b"1234");
/// hasher.update(b"56789");
/// assert_eq!(hasher.finalize(), crc);
///
/// let (a, b) = b"123456789".split_at(4);
/// assert_eq!(Crc32::combine(Crc32::checksum(a), Crc32::checksum(b), b.len()), crc);
///
/// assert!(Crc32::verify(b"123456789", 0xCBF4_3926).is_ok());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Crc32 {
  /// Raw register.
  state: u32,
}

impl Crc32 {
  /// Continue from a finalized checksum, e.g. one stored next to a
  /// partially written file.
  #[inline]
  #[must_use]
  pub const fn resume(crc: u32) -> Self {
    Self { state: crc ^ !0 }
  }

  /// Name of the kernel the process-wide dispatcher selected.
  #[must_use]
  pub fn backend_name() -> &'static str {
    CRC32_DISPATCHER.backend_name()
  }

  /// Effective configuration (overrides + thresholds).
  #[must_use]
  pub fn config() -> Crc32Config {
    config::get()
  }

  /// Update through an explicit kernel instead of the process-wide one.
  #[inline]
  pub fn update_with(&mut self, kernel: &Crc32Kernel, data: &[u8]) {
    self.state = kernel.compute(self.state, data);
  }
}

impl Default for Crc32 {
  #[inline]
  fn default() -> Self {
    <Self as Checksum>::new()
  }
}

impl Checksum for Crc32 {
  const OUTPUT_SIZE: usize = 4;
  type Output = u32;

  #[inline]
  fn new() -> Self {
    Self { state: !0 }
  }

  #[inline]
  fn with_initial(initial: u32) -> Self {
    Self { state: initial ^ !0 }
  }

  #[inline]
  fn update(&mut self, data: &[u8]) {
    self.state = if data.len() < config::small_threshold() {
      crc32_portable(self.state, data)
    } else {
      CRC32_DISPATCHER.call(self.state, data)
    };
  }

  #[inline]
  fn finalize(&self) -> u32 {
    self.state ^ !0
  }

  #[inline]
  fn reset(&mut self) {
    self.state = !0;
  }
}

impl ChecksumCombine for Crc32 {
  #[inline]
  fn combine(crc_a: u32, crc_b: u32, len_b: usize) -> u32 {
    combine_crc32(crc_a, crc_b, len_b)
  }
}
