//! CRC-32/IEEE benchmarks.
//!
//! Run: `cargo bench -p crcfold -- crc32`
//! Native: `RUSTFLAGS='-C target-cpu=native' cargo bench -p crcfold -- crc32`
//!
//! This benchmarks:
//! - Main dispatch path (auto-selects best backend)
//! - Every kernel this CPU can run, at aligned and misaligned starts
//! - `crc32fast` as an external baseline
//! - Bitwise table-less reference

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use crcfold::{Checksum, Crc32, crc32_reference, kernel_test::available_kernels};

/// Standard benchmark sizes.
const SIZES: [usize; 7] = [64, 256, 1024, 4096, 16384, 65536, 1048576];

/// Smaller sizes for the bitwise reference.
const BITWISE_SIZES: [usize; 4] = [16, 64, 256, 1024];

fn bench_dispatch(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc32/dispatch");
  eprintln!("crc32 backend: {}", Crc32::backend_name());

  for size in SIZES {
    let data = vec![0u8; size];
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
      b.iter(|| core::hint::black_box(Crc32::checksum(data)));
    });
  }

  group.finish();
}

fn bench_kernels(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc32/kernels");

  for kernel in available_kernels() {
    for size in SIZES {
      // One spare byte so the misaligned run starts at offset 1.
      let data = vec![0x5Au8; size + 1];
      group.throughput(Throughput::Bytes(size as u64));

      for (label, offset) in [("aligned", 0usize), ("offset1", 1)] {
        let id = BenchmarkId::new(format!("{}/{label}", kernel.name()), size);
        let buf = &data[offset..offset + size];
        group.bench_with_input(id, buf, |b, buf| {
          b.iter(|| core::hint::black_box(kernel.compute(!0, buf)));
        });
      }
    }
  }

  group.finish();
}

fn bench_crc32fast(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc32/crc32fast");

  for size in SIZES {
    let data = vec![0u8; size];
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
      b.iter(|| core::hint::black_box(crc32fast::hash(data)));
    });
  }

  group.finish();
}

fn bench_bitwise(c: &mut Criterion) {
  let mut group = c.benchmark_group("crc32/bitwise");

  for size in BITWISE_SIZES {
    let data = vec![0xABu8; size];
    group.throughput(Throughput::Bytes(size as u64));

    group.bench_with_input(BenchmarkId::from_parameter(size), &data, |b, data| {
      b.iter(|| core::hint::black_box(crc32_reference(0xFFFF_FFFF, data) ^ 0xFFFF_FFFF));
    });
  }

  group.finish();
}

criterion_group!(benches, bench_dispatch, bench_kernels, bench_crc32fast, bench_bitwise);
criterion_main!(benches);
