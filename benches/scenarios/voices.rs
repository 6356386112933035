//! Benchmarks for complete voices.
//!
//! A voice is 2 channels x 19 oscillators plus filter and envelopes, so the
//! pool at full polyphony is the realistic worst case.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use harmonic_synth::{
    params::ModulationRate,
    synth::message::{SynthMessage, TimedMessage},
    AudioBuffer, EngineConfig, HarmonicVoice, Synthesizer, VoiceParams, VoicePool,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

const CHORD: [u8; 5] = [48, 55, 60, 64, 67];

fn voice(size: usize, rate: ModulationRate) -> HarmonicVoice {
    let mut voice = HarmonicVoice::new();
    voice.prepare_to_play(SAMPLE_RATE, size, 2);
    voice.set_modulation_rate(rate);

    let mut params = VoiceParams::default();
    params.filter.cutoff = 400.0;
    params.filter.env_depth = 4_000.0;
    params.filter.resonance = 1.5;
    params.amp_adsr.attack = 0.1;
    voice.apply_params(&params);
    voice
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");

    for &size in BLOCK_SIZES {
        let mut output = AudioBuffer::new(2, size);

        // === SINGLE VOICE, BLOCK-RATE FILTER ===
        let mut block_voice = voice(size, ModulationRate::Block);
        block_voice.start_note(57, 1.0, 0);
        group.bench_with_input(BenchmarkId::new("voice", size), &size, |b, _| {
            b.iter(|| {
                output.clear();
                block_voice.render_next_block(black_box(&mut output), 0, size);
            })
        });

        // === SINGLE VOICE, PER-SAMPLE FILTER ===
        let mut sample_voice = voice(size, ModulationRate::Sample);
        sample_voice.start_note(57, 1.0, 0);
        group.bench_with_input(BenchmarkId::new("voice_sample_mod", size), &size, |b, _| {
            b.iter(|| {
                output.clear();
                sample_voice.render_next_block(black_box(&mut output), 0, size);
            })
        });

        // === FULL POOL ===
        // Five sustained notes, every voice busy
        let mut pool = VoicePool::default();
        pool.prepare_to_play(SAMPLE_RATE, size, 2);
        for note in CHORD {
            pool.note_on(note, 1.0);
        }
        group.bench_with_input(BenchmarkId::new("pool_full", size), &size, |b, _| {
            b.iter(|| pool.render_block(black_box(&mut output), size))
        });

        // === ENGINE WITH SPLIT BLOCKS ===
        // Note events land mid-block, forcing sub-block rendering
        let config = EngineConfig::default()
            .with_sample_rate(SAMPLE_RATE)
            .with_max_block_size(size);
        let mut synth = Synthesizer::without_queue(config);
        let events = [
            TimedMessage::new(
                size / 4,
                SynthMessage::NoteOn {
                    note: 60,
                    velocity: 1.0,
                },
            ),
            TimedMessage::new(
                size / 2,
                SynthMessage::NoteOff {
                    note: 60,
                    velocity: 0.0,
                },
            ),
        ];
        group.bench_with_input(BenchmarkId::new("engine_events", size), &size, |b, _| {
            b.iter(|| synth.process_block_with_events(black_box(&mut output), size, &events))
        });
    }

    group.finish();
}
