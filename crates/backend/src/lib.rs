//! Kernel dispatch primitives for crcfold.
//!
//! - **Selection**: an ordered list of [`Candidate`](dispatch::Candidate)s is
//!   matched against detected [`platform::Caps`]; the first fit wins.
//! - **Caching**: [`Crc32Dispatcher`](dispatch::Crc32Dispatcher) runs the
//!   selector once and serves the cached kernel afterwards.
//!
//! Algorithm crates decide *which* kernels exist; this crate only decides how
//! one is picked and remembered.
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(feature = "std")]
extern crate std;

pub mod dispatch;

pub use dispatch::{Candidate, Crc32Dispatcher, Crc32Fn, Selected, select};
// Re-export platform types for convenience.
pub use platform;
