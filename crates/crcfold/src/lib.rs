//! CRC-32/IEEE with carry-less multiply folding.
//!
//! Four 128-bit lanes advance 64 bytes per iteration with PCLMULQDQ (x86_64)
//! or PMULL (aarch64), then collapse to 32 bits with a Barrett reduction.
//! Every other host runs a slice-by-8 table kernel. All kernels produce the
//! same value for every input.
//!
//! # Kernels
//!
//! | Kernel | Requires | Notes |
//! |--------|----------|-------|
//! | `x86_64/avx512` | PCLMULQDQ, SSSE3, SSE4.1, AVX-512F/VL | `vpternlogd` fused XOR |
//! | `x86_64/pclmul` | PCLMULQDQ, SSSE3, SSE4.1 | |
//! | `aarch64/pmull-eor3` | NEON, AES, SHA3 | `eor3` fused XOR |
//! | `aarch64/pmull` | NEON, AES | |
//! | `soft/fold` | none | folding engine on `u128` lanes |
//! | `portable/slice8` | none | default fallback |
//!
//! # Example
//!
//! ```rust
//! use crcfold::{Checksum, Crc32, Crc32Kernel, compute_crc32, register_accelerated};
//!
//! // Raw register: no init, no xorout.
//! assert_eq!(compute_crc32(b"123456789", !0) ^ !0, 0xCBF4_3926);
//!
//! // Standard init/xorout.
//! assert_eq!(Crc32::checksum(b"123456789"), 0xCBF4_3926);
//!
//! // Explicit strategy, upgraded when the CPU allows it.
//! let mut kernel = Crc32Kernel::portable();
//! register_accelerated(&mut kernel, platform::caps());
//! assert_eq!(kernel.compute(!0, b"123456789") ^ !0, 0xCBF4_3926);
//! ```
//!
//! # Features
//!
//! - `std` (default): runtime CPU detection, cached selection, environment overrides
//! - `alloc`: [`kernel_test`], running every available kernel side by side
//! - `tracing`: `debug!` events for kernel selection and registration
//!
//! # no_std Support
//!
//! Without `std` only compile-time target features are visible:
//!
//! ```toml
//! [dependencies]
//! crcfold = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::indexing_slicing))]
#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod combine;
pub mod config;
pub mod constants;
mod crc32;
mod fold;
pub mod kernel;
mod portable;
mod proptests;
mod reference;

pub use combine::{combine_crc32, shift_zeros};
pub use config::{Crc32Config, Force, ParseForceError};
pub use crc32::{Crc32, compute_crc32, crc32_portable, crc32_reference};
pub use kernel::{Crc32Kernel, register_accelerated};
pub use traits::{Checksum, ChecksumCombine, ChecksumMismatch};
