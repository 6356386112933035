use crate::{io::AudioBuffer, MIN_TIME};

/*
ADSR Envelope Implementation
============================

A linear ADSR envelope generator. Each voice owns two: one shapes amplitude
sample by sample, the other is read once per block to sweep the filter.

Vocabulary
----------

  level       The envelope's current output value (0.0 to 1.0).

  stage       Idle, Attack, Decay, Sustain or Release.

  gate        note_on raises it (Attack), note_off drops it (Release).

  rate        How much `level` changes per sample in the current stage.


The Shape: Linear Ramps
-----------------------

  Level
    1.0 ┐     ╱╲
        │    ╱  ╲___________
    S   │   ╱               ╲
        │  ╱                 ╲
    0.0 └─╱───────────────────╲──→ Time
        Attack Decay  Sustain  Release

    attack rate  = 1 / (attack_time * sample_rate)
    decay rate   = (1 - sustain) / (decay_time * sample_rate)
    release rate = level_at_note_off / (release_time * sample_rate)


Retriggering
------------

note_on does NOT reset the level to zero. Attack ramps up from wherever the
envelope currently is, so retriggering a releasing voice (or a stolen one)
continues smoothly instead of clicking:

    1.0 ┐   ╱╲___       ╱╲___
        │  ╱     ╲     ╱
        │ ╱       ╲   ╱   <- attack resumes from the release level
    0.0 └╱─────────╲_╱────→


Parameter Updates
-----------------

`update` may arrive every block while a note sounds. New times take effect on
the next sample. A new sustain level while in Sustain is approached at the
decay (or attack) rate rather than jumped to, so moving the sustain knob does
not step the output.
*/

/// The current stage of the envelope state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopeState {
    Idle,
    Attack,
    Decay,
    Sustain,
    Release,
}

#[derive(Debug, Clone)]
pub struct Envelope {
    attack_time: f32,
    decay_time: f32,
    sustain_level: f32,
    release_time: f32,

    sample_rate: f32,
    stage: EnvelopeState,
    level: f32,

    // Fixed at note_off so release lands on zero in `release_time`
    release_rate: f32,
}

impl Envelope {
    pub fn new() -> Self {
        Self::adsr(0.1, 0.1, 1.0, 0.4)
    }

    pub fn adsr(attack: f32, decay: f32, sustain: f32, release: f32) -> Self {
        let mut env = Self {
            attack_time: MIN_TIME,
            decay_time: MIN_TIME,
            sustain_level: 1.0,
            release_time: MIN_TIME,
            sample_rate: 44_100.0,
            stage: EnvelopeState::Idle,
            level: 0.0,
            release_rate: 0.0,
        };
        env.update(attack, decay, sustain, release);
        env
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        }
    }

    /// Set new ADSR parameters. Times are in seconds, sustain is a ratio.
    pub fn update(&mut self, attack: f32, decay: f32, sustain: f32, release: f32) {
        self.attack_time = sanitize_time(attack);
        self.decay_time = sanitize_time(decay);
        self.sustain_level = if sustain.is_finite() {
            sustain.clamp(0.0, 1.0)
        } else {
            1.0
        };
        self.release_time = sanitize_time(release);

        if self.stage == EnvelopeState::Release {
            self.release_rate = self.level / (self.release_time * self.sample_rate);
        }
    }

    /// Gate high: attack from the current level.
    pub fn note_on(&mut self) {
        self.stage = EnvelopeState::Attack;
    }

    /// Gate low: release from the current level.
    pub fn note_off(&mut self) {
        if self.stage == EnvelopeState::Idle {
            return;
        }

        self.release_rate = self.level / (self.release_time * self.sample_rate);
        self.stage = EnvelopeState::Release;
    }

    /// Advance the envelope by one sample and return the new level.
    pub fn next_sample(&mut self) -> f32 {
        match self.stage {
            EnvelopeState::Idle => {
                self.level = 0.0;
            }

            EnvelopeState::Attack => {
                self.level += self.attack_rate();

                if self.level >= 1.0 {
                    self.level = 1.0;
                    self.stage = EnvelopeState::Decay;
                }
            }

            EnvelopeState::Decay => {
                let target = self.sustain_level;
                if self.level > target {
                    self.level = (self.level - self.decay_rate()).max(target);
                }

                if self.level <= target {
                    self.stage = EnvelopeState::Sustain;
                }
            }

            EnvelopeState::Sustain => {
                let target = self.sustain_level;
                if self.level > target {
                    self.level = (self.level - self.decay_rate()).max(target);
                } else if self.level < target {
                    self.level = (self.level + self.attack_rate()).min(target);
                }
            }

            EnvelopeState::Release => {
                self.level -= self.release_rate;

                if self.level <= 0.0 || self.release_rate <= 0.0 {
                    self.level = 0.0;
                    self.stage = EnvelopeState::Idle;
                }
            }
        }

        self.level = self.level.clamp(0.0, 1.0);
        self.level
    }

    /// Step `num_samples` samples and return the final level.
    pub fn advance(&mut self, num_samples: usize) -> f32 {
        for _ in 0..num_samples {
            self.next_sample();
        }
        self.level
    }

    /// Render a block of envelope values into the buffer.
    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.next_sample();
        }
    }

    /// Multiply every channel of `buffer` by `num_samples` consecutive
    /// envelope values starting at `start`.
    pub fn apply_to_buffer(&mut self, buffer: &mut AudioBuffer, start: usize, num_samples: usize) {
        let end = start.saturating_add(num_samples).min(buffer.num_samples());

        for index in start..end {
            let value = self.next_sample();
            for ch in 0..buffer.num_channels() {
                buffer.channel_mut(ch)[index] *= value;
            }
        }
    }

    /// Returns true if the envelope is producing output (not idle).
    pub fn is_active(&self) -> bool {
        self.stage != EnvelopeState::Idle
    }

    pub fn reset(&mut self) {
        self.stage = EnvelopeState::Idle;
        self.level = 0.0;
        self.release_rate = 0.0;
    }

    pub fn level(&self) -> f32 {
        self.level
    }

    pub fn state(&self) -> EnvelopeState {
        self.stage
    }

    pub fn sustain_level(&self) -> f32 {
        self.sustain_level
    }

    #[inline]
    fn attack_rate(&self) -> f32 {
        1.0 / (self.attack_time * self.sample_rate)
    }

    #[inline]
    fn decay_rate(&self) -> f32 {
        (1.0 - self.sustain_level).max(MIN_TIME) / (self.decay_time * self.sample_rate)
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize_time(seconds: f32) -> f32 {
    if seconds.is_finite() {
        seconds.max(MIN_TIME)
    } else {
        MIN_TIME
    }
}
