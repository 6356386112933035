/// Demonstrates the voice engine without real-time audio.
/// Shows voice allocation, stealing, release tails and parameter snapshots.

use rtrb::RingBuffer;
use harmonic_synth::{
    dsp::oscillator::Waveform,
    synth::{message::SynthMessage, voice::VoiceState},
    AudioBuffer, EngineConfig, ParamStore, Synthesizer,
};

const BLOCK_SIZE: usize = 256;

fn describe<R: harmonic_synth::synth::message::MessageReceiver>(synth: &Synthesizer<R>) {
    for (i, voice) in synth.pool().voices().iter().enumerate() {
        let state = match voice.state() {
            VoiceState::Free => "free",
            VoiceState::Active => "active",
            VoiceState::Releasing => "releasing",
        };
        match voice.note() {
            Some(note) => println!(
                "    voice {}: note {:3} {:<9} env {:.3} age {}",
                i,
                note,
                state,
                voice.envelope_level(),
                voice.age()
            ),
            None => println!("    voice {}: {}", i, state),
        }
    }
}

fn main() {
    println!("=== Polyphony Demo (Offline) ===\n");

    let config = EngineConfig::default()
        .with_sample_rate(48_000.0)
        .with_max_block_size(BLOCK_SIZE);

    let (mut tx, rx) = RingBuffer::<SynthMessage>::new(64);
    let mut synth = Synthesizer::new(config, rx);
    let mut buffer = AudioBuffer::new(config.num_channels, BLOCK_SIZE);

    println!(
        "Engine: {} voices, {} Hz, {} channels\n",
        config.num_voices, config.sample_rate, config.num_channels
    );

    // Shape the sound through the keyed store, like a host would
    let mut store = ParamStore::new();
    let _ = store.set("OSC1", Waveform::Saw.index() as f32);
    let _ = store.set("FILTERCUTOFF", 800.0);
    let _ = store.set("FILTERADSRDEPTH", 3_000.0);
    let _ = store.set("RELEASE", 0.2);
    let _ = tx.push(SynthMessage::Params(store.snapshot()));

    // Play a C major chord (C4, E4, G4)
    println!("Playing C major chord: 60 64 67");
    for note in [60, 64, 67] {
        let _ = tx.push(SynthMessage::NoteOn { note, velocity: 0.8 });
    }

    synth.process_block(&mut buffer, BLOCK_SIZE);
    println!("  Active voices: {}", synth.active_voice_count());
    println!("  Peak amplitude: {:.3}", buffer.peak());

    // Fill the remaining voices
    println!("\nAdding 71 and 74 (pool is now full)");
    for note in [71, 74] {
        let _ = tx.push(SynthMessage::NoteOn { note, velocity: 0.8 });
    }
    synth.process_block(&mut buffer, BLOCK_SIZE);
    describe(&synth);

    // Release one note, then ask for a sixth
    println!("\nReleasing 64, then playing 77 - the releasing voice is stolen");
    let _ = tx.push(SynthMessage::NoteOff {
        note: 64,
        velocity: 0.0,
    });
    synth.process_block(&mut buffer, BLOCK_SIZE);
    let _ = tx.push(SynthMessage::NoteOn {
        note: 77,
        velocity: 0.8,
    });
    synth.process_block(&mut buffer, BLOCK_SIZE);
    describe(&synth);

    // Nothing is releasing now, so the oldest note goes
    println!("\nPlaying 79 with every voice held - the oldest voice is stolen");
    let _ = tx.push(SynthMessage::NoteOn {
        note: 79,
        velocity: 0.8,
    });
    synth.process_block(&mut buffer, BLOCK_SIZE);
    describe(&synth);

    // Release everything and let the tails ring out
    println!("\nAll notes off, rendering release tails");
    let _ = tx.push(SynthMessage::AllNotesOff {
        allow_tail_off: true,
    });

    let mut blocks = 0;
    loop {
        synth.process_block(&mut buffer, BLOCK_SIZE);
        blocks += 1;
        if synth.active_voice_count() == 0 || blocks > 1_000 {
            break;
        }
    }
    let seconds = (blocks * BLOCK_SIZE) as f32 / config.sample_rate;
    println!("  Silent after {} blocks ({:.3} s)", blocks, seconds);

    synth.process_block(&mut buffer, BLOCK_SIZE);
    println!("  Output silent: {}", buffer.is_silent());

    println!("\n=== Demo Complete ===");
}
