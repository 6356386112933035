//! Benchmarks for the state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use harmonic_synth::dsp::filter::{FilterType, SVFilter};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");

    for &size in BLOCK_SIZES {
        // Sawtooth-like ramp as input
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();
        let mut buffer = input.clone();

        for (name, filter_type) in [
            ("lowpass", FilterType::LowPass),
            ("bandpass", FilterType::BandPass),
            ("highpass", FilterType::HighPass),
        ] {
            let mut filter = SVFilter::new(filter_type);
            filter.prepare(SAMPLE_RATE);
            filter.set_params(filter_type, 1_000.0, 0.7);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    buffer.copy_from_slice(&input);
                    filter.render(black_box(&mut buffer));
                })
            });
        }

        // Per-sample retuning, as with sample-rate filter modulation
        let mut filter = SVFilter::lowpass(200.0);
        filter.prepare(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("lowpass_swept", size), &size, |b, _| {
            b.iter(|| {
                for (i, (out, &x)) in buffer.iter_mut().zip(&input).enumerate() {
                    filter.set_cutoff(200.0 + 20.0 * i as f32);
                    *out = filter.process_sample(x);
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
