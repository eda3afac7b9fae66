//! Basic usage: raw register, streaming hasher, combine and kernel selection.
//!
//! Run with: `cargo run --example basic -p crcfold`

use crcfold::{Checksum, ChecksumCombine, Crc32, Crc32Kernel, compute_crc32, register_accelerated};

fn main() {
  let data = b"123456789";

  // Raw register: the caller owns init and xorout.
  let raw = compute_crc32(data, !0);
  println!("raw register:    0x{raw:08X}");
  println!("CRC-32 (IEEE):   0x{:08X}", raw ^ !0);
  assert_eq!(raw ^ !0, 0xCBF4_3926);

  // Streaming.
  let mut hasher = Crc32::new();
  for chunk in data.chunks(2) {
    hasher.update(chunk);
  }
  assert_eq!(hasher.finalize(), 0xCBF4_3926);

  // Resume from a stored checksum.
  let (head, tail) = data.split_at(4);
  let mut resumed = Crc32::resume(Crc32::checksum(head));
  resumed.update(tail);
  assert_eq!(resumed.finalize(), 0xCBF4_3926);

  // Combine independently computed halves.
  let combined = Crc32::combine(Crc32::checksum(head), Crc32::checksum(tail), tail.len());
  assert_eq!(combined, 0xCBF4_3926);

  // Explicit strategy object.
  let mut kernel = Crc32Kernel::portable();
  let caps = platform::caps();
  let upgraded = register_accelerated(&mut kernel, caps);
  println!("caps:            {caps:?}");
  println!("kernel:          {} (accelerated: {upgraded})", kernel.name());
  println!("dispatcher:      {}", Crc32::backend_name());
  println!("config:          {:?}", Crc32::config());
  assert_eq!(kernel.compute(!0, data) ^ !0, 0xCBF4_3926);

  // Verification with a typed error.
  match Crc32::verify(data, 0xDEAD_BEEF) {
    Ok(()) => unreachable!(),
    Err(err) => println!("verify:          {err}"),
  }
}
