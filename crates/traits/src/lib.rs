//! Checksum traits for crcfold.
//!
//! `no_std` compatible, zero dependencies.
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`Checksum`] | Streaming and one-shot checksums |
//! | [`ChecksumCombine`] | `crc(A ++ B)` from `crc(A)`, `crc(B)` and `len(B)` |
//!
//! # Error Types
//!
//! - [`ChecksumMismatch`]: a computed checksum disagreed with the expected value
//!
//! # Fallibility Discipline
//!
//! This crate denies `unwrap`, `expect`, and indexing in non-test code.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

mod checksum;
pub mod error;

pub use checksum::{Checksum, ChecksumCombine};
pub use error::ChecksumMismatch;
