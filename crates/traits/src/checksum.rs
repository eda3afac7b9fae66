//! Non-cryptographic checksum traits.
//!
//! - **Streaming**: incremental updates for large data
//! - **Parallelism**: combine operation for chunks checksummed independently
//! - **Verification**: compare against an expected value with a typed error

use core::fmt::{Debug, LowerHex};

use crate::error::ChecksumMismatch;

/// Non-cryptographic checksum algorithm.
///
/// # Usage
///
/// ```rust,ignore
/// use crcfold::{Checksum, Crc32};
///
/// // One-shot (fastest for data already in memory)
/// let crc = Crc32::checksum(b"hello world");
///
/// // Streaming (for incremental or large data)
/// let mut hasher = Crc32::new();
/// hasher.update(b"hello ");
/// hasher.update(b"world");
/// assert_eq!(hasher.finalize(), crc);
/// ```
///
/// # Implementor Requirements
///
/// - `new()` must return the same state as `Default::default()`
/// - `finalize()` must be idempotent (calling multiple times returns same value)
/// - `reset()` must restore the hasher to its initial state
pub trait Checksum: Clone + Default {
  /// Output size in bytes (4 for CRC-32).
  const OUTPUT_SIZE: usize;

  /// The checksum output type.
  type Output: Copy + Eq + Debug + Default + LowerHex;

  /// Create a new hasher with the default initial value.
  #[must_use]
  fn new() -> Self;

  /// Create a new hasher with a custom initial value.
  #[must_use]
  fn with_initial(initial: Self::Output) -> Self;

  /// Update the hasher with additional data.
  fn update(&mut self, data: &[u8]);

  /// Update the hasher with multiple non-contiguous buffers.
  ///
  /// Identical to calling [`update`](Self::update) on each buffer in order.
  #[inline]
  fn update_vectored(&mut self, bufs: &[&[u8]]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// Update the hasher with `std::io::IoSlice` buffers.
  #[cfg(feature = "std")]
  #[inline]
  fn update_io_slices(&mut self, bufs: &[std::io::IoSlice<'_>]) {
    for buf in bufs {
      self.update(buf);
    }
  }

  /// Finalize and return the checksum.
  ///
  /// Does not consume the hasher; further updates continue from the same state.
  #[must_use]
  fn finalize(&self) -> Self::Output;

  /// Reset the hasher to its initial state.
  fn reset(&mut self);

  /// Compute the checksum of data in one shot.
  #[inline]
  #[must_use]
  fn checksum(data: &[u8]) -> Self::Output {
    let mut h = Self::new();
    h.update(data);
    h.finalize()
  }

  /// Compute the checksum of multiple buffers in one shot.
  #[inline]
  #[must_use]
  fn checksum_vectored(bufs: &[&[u8]]) -> Self::Output {
    let mut h = Self::new();
    h.update_vectored(bufs);
    h.finalize()
  }

  /// Check `data` against an expected checksum.
  ///
  /// # Errors
  ///
  /// Returns [`ChecksumMismatch`] carrying both values when they differ.
  #[inline]
  fn verify(data: &[u8], expected: Self::Output) -> Result<(), ChecksumMismatch<Self::Output>> {
    let computed = Self::checksum(data);
    if computed == expected {
      Ok(())
    } else {
      Err(ChecksumMismatch::new(expected, computed))
    }
  }
}

/// Checksums that support parallel computation via combination.
///
/// The combine operation computes `crc(A || B)` from `crc(A)`, `crc(B)`, and `len(B)`
/// in O(log n) time:
///
/// ```text
/// crc(A || B) = crc(A) * x^(8*len(B)) mod G(x) XOR crc(B)
/// ```
///
/// (with the init/xorout terms cancelling out for standard CRCs).
pub trait ChecksumCombine: Checksum {
  /// Given `crc_a = crc(A)` and `crc_b = crc(B)`, computes `crc(A || B)`.
  #[must_use]
  fn combine(crc_a: Self::Output, crc_b: Self::Output, len_b: usize) -> Self::Output;
}

#[cfg(test)]
mod tests {
  use super::*;

  /// Additive byte sum, enough to exercise the provided methods.
  #[derive(Clone, Default)]
  struct Sum(u8);

  impl Checksum for Sum {
    const OUTPUT_SIZE: usize = 1;
    type Output = u8;

    fn new() -> Self {
      Self(0)
    }

    fn with_initial(initial: u8) -> Self {
      Self(initial)
    }

    fn update(&mut self, data: &[u8]) {
      for &b in data {
        self.0 = self.0.wrapping_add(b);
      }
    }

    fn finalize(&self) -> u8 {
      self.0
    }

    fn reset(&mut self) {
      self.0 = 0;
    }
  }

  #[test]
  fn vectored_matches_contiguous() {
    assert_eq!(Sum::checksum_vectored(&[b"ab", b"", b"c"]), Sum::checksum(b"abc"));
  }

  #[test]
  #[cfg(feature = "std")]
  fn io_slices_match_contiguous() {
    let bufs = [std::io::IoSlice::new(b"ab"), std::io::IoSlice::new(b"c")];
    let mut h = Sum::new();
    h.update_io_slices(&bufs);
    assert_eq!(h.finalize(), Sum::checksum(b"abc"));
  }

  #[test]
  fn verify_reports_both_values() {
    assert_eq!(Sum::verify(&[1, 2], 3), Ok(()));
    let err = Sum::verify(&[1, 2], 4).unwrap_err();
    assert_eq!((err.expected(), err.computed()), (4, 3));
  }
}
