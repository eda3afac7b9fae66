//! The portable tier stays reachable when no SIMD capability is reported.
//!
//! Runs as its own test binary: the capability override must be in place
//! before anything consults the process-wide dispatcher, so everything lives
//! in a single test.

use crcfold::{Checksum, ChecksumCombine, Crc32, Crc32Kernel, compute_crc32, kernel::names, register_accelerated};
use platform::Caps;

const CHECK_STRING: &[u8] = b"123456789";
const CRC32_IEEE_CHECK: u32 = 0xCBF4_3926;

#[test]
fn no_capabilities_selects_portable_and_stays_correct() {
  platform::set_caps_override(Some(Caps::NONE));
  assert!(platform::has_override());
  assert_eq!(platform::caps(), Caps::NONE);

  let detected = Crc32Kernel::detect();
  assert_eq!(detected.name(), names::PORTABLE);
  assert!(!detected.is_accelerated());

  let mut slot = detected;
  assert!(!register_accelerated(&mut slot, platform::caps()));
  assert_eq!(slot.name(), names::PORTABLE);

  // `CRCFOLD_FORCE=soft` is the only override that leaves portable without caps.
  let config = Crc32::config();
  assert!(config.effective_force.requires().is_empty());
  let backend = Crc32::backend_name();
  assert!(backend == names::PORTABLE || backend == names::SOFT, "{backend}");

  let result = Crc32::checksum(CHECK_STRING);
  assert_eq!(
    result, CRC32_IEEE_CHECK,
    "CRC-32/IEEE mismatch: got {result:#010X}, expected {CRC32_IEEE_CHECK:#010X}"
  );
  assert_eq!(compute_crc32(CHECK_STRING, !0) ^ !0, CRC32_IEEE_CHECK);

  let (a, b) = CHECK_STRING.split_at(5);
  assert_eq!(Crc32::combine(Crc32::checksum(a), Crc32::checksum(b), b.len()), CRC32_IEEE_CHECK);

  platform::set_caps_override(None);
  assert!(!platform::has_override());
}
