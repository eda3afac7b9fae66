//! Error types for checksum verification.

use core::fmt;

/// A checksum did not match the expected value.
///
/// Returned by [`Checksum::verify`](crate::Checksum::verify). Carries both
/// values so callers can report which side of a transfer is corrupt.
///
/// # Examples
///
/// ```
/// use traits::ChecksumMismatch;
///
/// fn check(computed: u32, expected: u32) -> Result<(), ChecksumMismatch<u32>> {
///   if computed == expected {
///     Ok(())
///   } else {
///     Err(ChecksumMismatch::new(expected, computed))
///   }
/// }
///
/// let err = check(0xCBF4_3926, 0).unwrap_err();
/// assert_eq!(err.to_string(), "checksum mismatch: expected 0x00000000, computed 0xcbf43926");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChecksumMismatch<T> {
  expected: T,
  computed: T,
}

impl<T: Copy> ChecksumMismatch<T> {
  #[inline]
  #[must_use]
  pub const fn new(expected: T, computed: T) -> Self {
    Self { expected, computed }
  }

  /// The value the caller expected.
  #[inline]
  #[must_use]
  pub const fn expected(&self) -> T {
    self.expected
  }

  /// The value computed over the data.
  #[inline]
  #[must_use]
  pub const fn computed(&self) -> T {
    self.computed
  }
}

impl<T: fmt::LowerHex> fmt::Display for ChecksumMismatch<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let width = 2 + 2 * core::mem::size_of::<T>();
    write!(
      f,
      "checksum mismatch: expected {:#0width$x}, computed {:#0width$x}",
      self.expected, self.computed
    )
  }
}

impl<T: fmt::LowerHex + fmt::Debug> core::error::Error for ChecksumMismatch<T> {}

#[cfg(test)]
mod tests {
  extern crate alloc;

  use alloc::{format, string::ToString};

  use super::*;

  #[test]
  fn display_pads_to_width() {
    assert_eq!(
      ChecksumMismatch::new(0x1u32, 0xCBF4_3926).to_string(),
      "checksum mismatch: expected 0x00000001, computed 0xcbf43926"
    );
    assert_eq!(
      ChecksumMismatch::new(0xABu8, 0x0).to_string(),
      "checksum mismatch: expected 0xab, computed 0x00"
    );
  }

  #[test]
  fn accessors() {
    let err = ChecksumMismatch::new(1u32, 2u32);
    assert_eq!(err.expected(), 1);
    assert_eq!(err.computed(), 2);
  }

  #[test]
  fn debug_impl() {
    let dbg = format!("{:?}", ChecksumMismatch::new(1u32, 2u32));
    assert_eq!(dbg, "ChecksumMismatch { expected: 1, computed: 2 }");
  }

  #[test]
  fn trait_bounds() {
    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}
    fn assert_error<T: core::error::Error>() {}

    assert_send::<ChecksumMismatch<u32>>();
    assert_sync::<ChecksumMismatch<u32>>();
    assert_error::<ChecksumMismatch<u32>>();
  }

  #[test]
  fn error_trait_has_no_source() {
    use core::error::Error;

    let err = ChecksumMismatch::new(0u32, 1u32);
    assert!(err.source().is_none());
  }
}
