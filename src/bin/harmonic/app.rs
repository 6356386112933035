//! Audio device setup and the realtime callback.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::{error, info};
use rtrb::RingBuffer;

use harmonic_synth::{
    synth::message::SynthMessage, AudioBuffer, EngineConfig, Synthesizer, MAX_BLOCK_SIZE,
};

use crate::ui::{EngineStatus, UiApp, VIS_BUFFER_SIZE};

const CONTROL_QUEUE_LEN: usize = 256;
const AUDIO_RING_BLOCKS: usize = 16; // Capacity in UI windows for audio→UI ring
const STATUS_QUEUE_LEN: usize = 32;

pub fn run() -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = (config.channels() as usize).max(1);

    let engine_config = EngineConfig::default()
        .with_sample_rate(sample_rate)
        .with_max_block_size(MAX_BLOCK_SIZE)
        .with_channels(channels);

    info!(
        "output device {:?}: {} Hz, {} channels",
        device.name().unwrap_or_default(),
        sample_rate,
        channels
    );

    // --- Cross-thread rings ---
    let (control_tx, control_rx) = RingBuffer::<SynthMessage>::new(CONTROL_QUEUE_LEN);
    let (mut audio_tx, audio_rx) = RingBuffer::<f32>::new(VIS_BUFFER_SIZE * AUDIO_RING_BLOCKS);
    let (mut status_tx, status_rx) = RingBuffer::<EngineStatus>::new(STATUS_QUEUE_LEN);

    // Engine and buffers are allocated here and moved into the callback
    let mut synth = Synthesizer::new(engine_config, control_rx);
    let mut block = AudioBuffer::new(engine_config.num_channels, engine_config.max_block_size);

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let total_frames = data.len() / channels;
                let mut frames_written = 0;
                let mut peak = 0.0f32;

                while frames_written < total_frames {
                    let frames = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                    synth.process_block(&mut block, frames);

                    let out_off = frames_written * channels;
                    block.write_interleaved(&mut data[out_off..], channels, frames);

                    // First channel feeds the scope; drop on overflow
                    for &s in &block.channel(0)[..frames] {
                        peak = peak.max(s.abs());
                        if audio_tx.push(s).is_err() {
                            break;
                        }
                    }

                    frames_written += frames;
                }

                let _ = status_tx.push(EngineStatus::capture(synth.pool(), peak));
            },
            move |err| error!("stream error: {err}"),
            None,
        )
        .wrap_err("failed to build output stream")?;

    stream.play().wrap_err("failed to start output stream")?;

    let mut terminal = ratatui::init();
    let mut app = UiApp::new(control_tx, audio_rx, status_rx, sample_rate);
    let result = app.run(&mut terminal);
    ratatui::restore();

    drop(stream);
    result
}
