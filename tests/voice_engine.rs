use harmonic_synth::{
    dsp::{harmonic::HarmonicKind, oscillator::Waveform},
    io::{converter::midi_to_synth, midi::MidiEvent},
    synth::{
        message::{SynthMessage, TimedMessage},
        voice::VoiceState,
    },
    AudioBuffer, EngineConfig, HarmonicVoice, ParamStore, Synthesizer, VoiceParams, VoicePool,
};

const SAMPLE_RATE: f32 = 44_100.0;
const BLOCK: usize = 512;

fn pool() -> VoicePool {
    let mut pool = VoicePool::new(5);
    pool.prepare_to_play(SAMPLE_RATE, BLOCK, 2);
    pool
}

fn note_slot(pool: &VoicePool, note: u8) -> Option<usize> {
    pool.voices().iter().position(|v| v.note() == Some(note))
}

#[test]
fn middle_c_tunes_whole_stack() {
    let mut voice = HarmonicVoice::new();
    voice.prepare_to_play(SAMPLE_RATE, BLOCK, 2);
    voice.start_note(60, 1.0, 0);

    for ch in 0..2 {
        let bank = voice.oscillators(ch).unwrap();
        assert!((bank.fundamental().frequency() - 261.63).abs() < 0.01);
        let sub = bank.harmonic(HarmonicKind::Sub, 2).unwrap();
        assert!((sub.frequency() - 130.81).abs() < 0.01);
        let overtone = bank.harmonic(HarmonicKind::Overtone, 2).unwrap();
        assert!((overtone.frequency() - 523.25).abs() < 0.01);
    }
}

#[test]
fn sixth_note_steals_releasing_voice_first() {
    let mut pool = pool();
    let mut output = AudioBuffer::new(2, BLOCK);

    for note in [60, 62, 64, 65, 67] {
        pool.note_on(note, 1.0);
        pool.render_block(&mut output, BLOCK);
    }
    pool.note_off(64);
    pool.render_block(&mut output, BLOCK);

    let releasing = note_slot(&pool, 64).unwrap();
    assert_eq!(pool.voices()[releasing].state(), VoiceState::Releasing);

    pool.note_on(72, 1.0);
    assert_eq!(note_slot(&pool, 72), Some(releasing));
    for note in [60, 62, 65, 67] {
        assert!(note_slot(&pool, note).is_some());
    }
}

#[test]
fn sixth_note_steals_oldest_when_all_held() {
    let mut pool = pool();
    let mut output = AudioBuffer::new(2, BLOCK);

    for note in [60, 62, 64, 65, 67] {
        pool.note_on(note, 1.0);
        pool.render_block(&mut output, BLOCK);
    }
    let oldest = note_slot(&pool, 60).unwrap();

    pool.note_on(72, 1.0);
    pool.render_block(&mut output, BLOCK);

    assert_eq!(note_slot(&pool, 72), Some(oldest));
    assert_eq!(note_slot(&pool, 60), None);
    assert_eq!(pool.active_voice_count(), 5);
}

#[test]
fn quietest_releasing_voice_is_stolen() {
    let mut pool = pool();
    let mut output = AudioBuffer::new(2, BLOCK);

    for note in [60, 62, 64, 65, 67] {
        pool.note_on(note, 1.0);
    }
    pool.render_block(&mut output, BLOCK);

    // 62 releases longer, so it is quieter than 65 by the time 72 arrives
    pool.note_off(62);
    for _ in 0..4 {
        pool.render_block(&mut output, BLOCK);
    }
    pool.note_off(65);
    pool.render_block(&mut output, BLOCK);

    let quiet = note_slot(&pool, 62).unwrap();
    let loud = note_slot(&pool, 65).unwrap();
    assert!(pool.voices()[quiet].envelope_level() < pool.voices()[loud].envelope_level());

    pool.note_on(72, 1.0);
    assert_eq!(note_slot(&pool, 72), Some(quiet));
    assert_eq!(note_slot(&pool, 65), Some(loud));
}

#[test]
fn note_off_for_unassigned_note_is_ignored() {
    let mut pool = pool();
    pool.note_on(60, 1.0);

    let before: Vec<_> = pool.voices().iter().map(|v| (v.state(), v.note())).collect();
    pool.note_off(99);
    let after: Vec<_> = pool.voices().iter().map(|v| (v.state(), v.note())).collect();

    assert_eq!(before, after);
}

fn blocks_until_idle(pool: &mut VoicePool, output: &mut AudioBuffer) -> usize {
    let mut blocks = 0;
    while pool.active_voice_count() > 0 && blocks < 1000 {
        pool.render_block(output, BLOCK);
        blocks += 1;
    }
    blocks
}

#[test]
fn duplicate_note_off_does_not_stretch_release() {
    let mut single = pool();
    let mut doubled = pool();
    let mut output = AudioBuffer::new(2, BLOCK);

    for voices in [&mut single, &mut doubled] {
        voices.note_on(60, 1.0);
        for _ in 0..10 {
            voices.render_block(&mut output, BLOCK);
        }
        voices.note_off(60);
        for _ in 0..10 {
            voices.render_block(&mut output, BLOCK);
        }
    }

    let slot = note_slot(&doubled, 60).unwrap();
    let level = doubled.voices()[slot].envelope_level();
    doubled.note_off(60);
    assert_eq!(doubled.voices()[slot].envelope_level(), level);
    assert_eq!(doubled.voices()[slot].state(), VoiceState::Releasing);

    let expected = blocks_until_idle(&mut single, &mut output);
    assert!(expected > 0);
    assert_eq!(blocks_until_idle(&mut doubled, &mut output), expected);
}

#[test]
fn out_of_range_voice_params_are_clamped() {
    let mut voice = HarmonicVoice::new();
    voice.prepare_to_play(SAMPLE_RATE, BLOCK, 2);

    let mut params = VoiceParams::default();
    params.oscillator.gain_db = 60.0;
    params.oscillator.sub_gains_db = [-120.0; 9];
    params.oscillator.fm_frequency = 1.0e6;
    params.oscillator.fm_depth = -5.0;
    voice.apply_params(&params);

    let bank = voice.oscillators(0).unwrap();
    // +0.2 dB ceiling
    assert!(bank.fundamental().gain() < 1.024);
    assert!(bank.fundamental().gain() > 1.022);
    // -40 dB floor
    let sub = bank.harmonic(HarmonicKind::Sub, 4).unwrap();
    assert!((sub.gain() - 0.01).abs() < 1e-6);
    assert_eq!(bank.fundamental().fm(), (1_000.0, 0.0));

    voice.start_note(60, 1.0, 0);
    let mut output = AudioBuffer::new(2, BLOCK);
    for _ in 0..20 {
        output.clear();
        voice.render_next_block(&mut output, 0, BLOCK);
        assert!(output.peak() < 2.0);
    }
}

#[test]
fn silent_pool_stays_silent() {
    let mut pool = pool();
    let mut output = AudioBuffer::new(2, BLOCK);

    for _ in 0..1000 {
        pool.render_block(&mut output, BLOCK);
        assert!(output.is_silent());
    }
    assert_eq!(output.num_samples(), BLOCK);
    assert_eq!(pool.active_voice_count(), 0);
}

#[test]
fn released_note_decays_to_silence() {
    let mut pool = pool();
    let mut output = AudioBuffer::new(2, BLOCK);

    pool.note_on(57, 0.8);
    for _ in 0..20 {
        pool.render_block(&mut output, BLOCK);
    }
    assert!(output.peak() > 0.0);
    assert!(output.peak() < 1.0);

    pool.note_off(57);
    // default release is 0.4 s
    for _ in 0..40 {
        pool.render_block(&mut output, BLOCK);
    }
    assert_eq!(pool.active_voice_count(), 0);

    pool.render_block(&mut output, BLOCK);
    assert!(output.is_silent());
}

#[test]
fn retrigger_during_release_is_continuous() {
    let mut pool = pool();
    let mut output = AudioBuffer::new(2, BLOCK);

    pool.note_on(60, 1.0);
    for _ in 0..10 {
        pool.render_block(&mut output, BLOCK);
    }
    pool.note_off(60);
    pool.render_block(&mut output, BLOCK);

    let slot = note_slot(&pool, 60).unwrap();
    let level = pool.voices()[slot].envelope_level();
    pool.note_on(60, 1.0);

    // Attack restarts from the level it was released at
    assert_eq!(note_slot(&pool, 60), Some(slot));
    assert_eq!(pool.voices()[slot].envelope_level(), level);
    assert_eq!(pool.voices()[slot].state(), VoiceState::Active);
}

#[cfg(feature = "rtrb")]
#[test]
fn queued_messages_are_applied_before_rendering() {
    let (mut tx, rx) = rtrb::RingBuffer::<SynthMessage>::new(64);
    let mut synth = Synthesizer::new(EngineConfig::default(), rx);
    let mut output = AudioBuffer::new(2, BLOCK);

    let mut params = VoiceParams::default();
    params.oscillator.waveform = Waveform::Saw;
    tx.push(SynthMessage::Params(params)).unwrap();
    tx.push(SynthMessage::NoteOn {
        note: 64,
        velocity: 1.0,
    })
    .unwrap();

    synth.process_block(&mut output, BLOCK);

    assert_eq!(synth.active_voice_count(), 1);
    assert_eq!(synth.params().oscillator.waveform, Waveform::Saw);
    assert!(!output.is_silent());

    let voice = synth
        .pool()
        .voices()
        .iter()
        .find(|v| v.note() == Some(64))
        .unwrap();
    assert_eq!(voice.oscillators(0).unwrap().fundamental().waveform(), Waveform::Saw);
}

#[cfg(feature = "rtrb")]
#[test]
fn midi_input_reaches_the_engine() {
    let (mut tx, rx) = rtrb::RingBuffer::<SynthMessage>::new(64);
    let mut synth = Synthesizer::new(EngineConfig::default(), rx);
    let mut output = AudioBuffer::new(2, BLOCK);

    let events = [
        MidiEvent::NoteOn {
            channel: 0,
            key: 60,
            velocity: 100,
        },
        MidiEvent::NoteOn {
            channel: 0,
            key: 67,
            velocity: 100,
        },
        // velocity 0 is a note-off
        MidiEvent::NoteOn {
            channel: 0,
            key: 60,
            velocity: 0,
        },
    ];
    for event in events {
        if let Some(message) = midi_to_synth(event, 0) {
            tx.push(message).unwrap();
        }
    }

    synth.process_block(&mut output, BLOCK);
    let states: Vec<_> = synth
        .pool()
        .voices()
        .iter()
        .filter_map(|v| v.note().map(|n| (n, v.state())))
        .collect();

    // 60 was released before it made a sound, so its tail is already over
    assert_eq!(states, vec![(67, VoiceState::Active)]);
    assert_eq!(synth.active_voice_count(), 1);
}

#[test]
fn timed_note_off_splits_the_block() {
    let mut synth = Synthesizer::without_queue(EngineConfig::default());
    let mut output = AudioBuffer::new(2, BLOCK);

    synth.note_on(60, 1.0);
    synth.process_block_with_events(
        &mut output,
        BLOCK,
        &[TimedMessage::new(
            128,
            SynthMessage::AllNotesOff {
                allow_tail_off: false,
            },
        )],
    );

    assert!(output.channel(0)[1..128].iter().any(|s| *s != 0.0));
    assert!(output.channel(0)[128..].iter().all(|s| *s == 0.0));
}

#[test]
fn param_store_snapshot_drives_voices() {
    let mut store = ParamStore::new();
    store.set("OSC1", 1.0).unwrap();
    store.set("FILTERCUTOFF", 500.0).unwrap();
    store.set("FILTERADSRDEPTH", 0.0).unwrap();

    let mut synth = Synthesizer::without_queue(EngineConfig::default());
    synth.set_params(store.snapshot());
    synth.note_on(48, 1.0);

    let mut output = AudioBuffer::new(2, BLOCK);
    synth.process_block(&mut output, BLOCK);

    let voice = &synth.pool().voices()[0];
    assert_eq!(voice.oscillators(1).unwrap().fundamental().waveform(), Waveform::Saw);
    assert!((voice.filter_cutoff() - 500.0).abs() < 1e-3);
}
