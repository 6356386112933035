//! Benchmarks for single oscillators and the 19-oscillator bank.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use harmonic_synth::{
    dsp::oscillator::{Oscillator, Waveform},
    params::OscillatorParams,
    synth::bank::OscillatorBank,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn oscillator(waveform: Waveform) -> Oscillator {
    let mut osc = Oscillator::new(waveform);
    osc.prepare(SAMPLE_RATE);
    osc.set_frequency(440.0);
    osc
}

pub fn bench_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/oscillator");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Sine - sin() per sample
        let mut osc = oscillator(Waveform::Sine);
        group.bench_with_input(BenchmarkId::new("sine", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer)))
        });

        let mut osc = oscillator(Waveform::Saw);
        group.bench_with_input(BenchmarkId::new("saw", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer)))
        });

        // FM adds a second sin() per sample
        let mut osc = oscillator(Waveform::Sine);
        osc.set_fm(5.0, 20.0);
        group.bench_with_input(BenchmarkId::new("sine_fm", size), &size, |b, _| {
            b.iter(|| osc.render(black_box(&mut buffer)))
        });

        // Fundamental plus 18 harmonics, what one voice channel costs
        let mut bank = OscillatorBank::new();
        bank.prepare(SAMPLE_RATE);
        bank.set_params(&OscillatorParams::default());
        bank.set_note(45);
        group.bench_with_input(BenchmarkId::new("bank", size), &size, |b, _| {
            b.iter(|| {
                for sample in buffer.iter_mut() {
                    *sample = bank.next_sample();
                }
                black_box(&buffer);
            })
        });
    }

    group.finish();
}
