//! Benchmarks for grayscale decoding.
//!
//! The image is a synthetic in-memory stream (same builders the
//! integration tests use) rather than a fixture file, so this benchmark
//! has no data dependency to keep around.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jpeg_atlas::Decoder;

#[path = "../tests/support/mod.rs"]
mod support;

/// A 64x64 grayscale image, 64 MCUs, one DC-only block each. Not a
/// realistic photograph, but it exercises marker dispatch, Huffman
/// decoding, the IDCT and up-sampling over a few dozen MCU rows, which is
/// what this benchmark actually times.
fn synthetic_grayscale_jpeg() -> Vec<u8>
{
    let mut jpeg = support::soi();
    jpeg.extend(support::dqt_uniform(0, 8));
    jpeg.extend(support::sof0(64, 64, &[(1, 1, 1, 0)]));
    jpeg.extend(support::dc8_tables());
    jpeg.extend(support::sos(&[(1, 0, 0)]));
    for _ in 0..64
    {
        jpeg.extend(support::dc_only_block(128));
    }
    jpeg.extend(support::eoi());
    jpeg
}

fn decode_jpeg(buf: &[u8]) -> Vec<u8>
{
    Decoder::new().decode(buf.to_vec()).unwrap().raster
}

fn criterion_benchmark(c: &mut Criterion)
{
    let data = synthetic_grayscale_jpeg();

    c.bench_function("baseline JPEG decoding, grayscale", |b| {
        b.iter(|| black_box(decode_jpeg(&data)))
    });
}

criterion_group!(name=benches;
      config={
      let c = Criterion::default();
        c.measurement_time(Duration::from_secs(5))
      };
    targets=criterion_benchmark);

criterion_main!(benches);
