use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/*
State-Variable Filter (SVF)
===========================

Trapezoidal-integrated ("topology-preserving") state-variable filter. One
structure produces low, band and high-pass outputs at once; the filter type
only picks which tap is returned.

    g = tan(π · cutoff / sample_rate)    integrator gain
    k = 1 / Q                            damping (resonance = Q)

| type      | passes          | rejects         |
| --------- | --------------- | --------------- |
| low-pass  | below cutoff    | above cutoff    |
| band-pass | around cutoff   | either side     |
| high-pass | above cutoff    | below cutoff    |

Coefficients are recomputed in `set_params`, which the voice calls once per
block with the envelope-modulated cutoff. The integrator memories (`ic1eq`,
`ic2eq`) carry over between blocks and across type switches, so switching
from low-pass to high-pass changes the tap without dropping the signal.

Cutoff is clamped to [20, 20000] Hz before anything else happens. The value
fed to `tan` is additionally kept below 0.49 · sample_rate, since near
Nyquist `g` explodes.
*/

pub const MIN_CUTOFF_HZ: f32 = 20.0;
pub const MAX_CUTOFF_HZ: f32 = 20_000.0;
pub const MIN_RESONANCE: f32 = 0.1;
pub const MAX_RESONANCE: f32 = 10.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    #[default]
    LowPass,
    BandPass,
    HighPass,
}

impl FilterType {
    /// Map a host selector (0 low-pass, 1 band-pass, 2 high-pass).
    pub fn from_index(index: i32) -> Self {
        match index {
            i32::MIN..=0 => FilterType::LowPass,
            1 => FilterType::BandPass,
            _ => FilterType::HighPass,
        }
    }

    pub fn index(self) -> i32 {
        match self {
            FilterType::LowPass => 0,
            FilterType::BandPass => 1,
            FilterType::HighPass => 2,
        }
    }
}

/// Clamp a cutoff request into the audible range. NaN falls to the top.
#[inline]
pub fn clamp_cutoff(cutoff_hz: f32) -> f32 {
    if cutoff_hz.is_nan() {
        MAX_CUTOFF_HZ
    } else {
        cutoff_hz.clamp(MIN_CUTOFF_HZ, MAX_CUTOFF_HZ)
    }
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

#[derive(Debug, Clone)]
pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    sample_rate: f32,
    cutoff_hz: f32,
    resonance: f32,
    filter_type: FilterType,

    g: f32,
    k: f32,
    h: f32,
}

impl SVFilter {
    pub fn new(filter_type: FilterType) -> Self {
        let mut filter = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            sample_rate: 44_100.0,
            cutoff_hz: 1_000.0,
            resonance: std::f32::consts::FRAC_1_SQRT_2,
            filter_type,
            g: 0.0,
            k: 0.0,
            h: 0.0,
        };
        filter.update_coefficients();
        filter
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        let mut filter = Self::new(FilterType::LowPass);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        let mut filter = Self::new(FilterType::HighPass);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        let mut filter = Self::new(FilterType::BandPass);
        filter.set_cutoff(cutoff_hz);
        filter
    }

    pub fn prepare(&mut self, sample_rate: f32) {
        if sample_rate.is_finite() && sample_rate > 0.0 {
            self.sample_rate = sample_rate;
        }
        self.reset();
        self.update_coefficients();
    }

    /// Set type, cutoff and resonance and recompute coefficients once.
    pub fn set_params(&mut self, filter_type: FilterType, cutoff_hz: f32, resonance: f32) {
        self.filter_type = filter_type;
        self.cutoff_hz = clamp_cutoff(cutoff_hz);
        self.resonance = clamp_resonance(resonance);
        self.update_coefficients();
    }

    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = clamp_cutoff(cutoff_hz);
        self.update_coefficients();
    }

    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = clamp_resonance(resonance);
        self.update_coefficients();
    }

    pub fn set_type(&mut self, filter_type: FilterType) {
        self.filter_type = filter_type;
    }

    fn update_coefficients(&mut self) {
        let cutoff = self.cutoff_hz.min(self.sample_rate * 0.49);
        self.g = (PI * cutoff / self.sample_rate).tan();
        self.k = 1.0 / self.resonance;
        self.h = 1.0 / (1.0 + self.g * (self.g + self.k));
    }

    #[inline]
    pub fn next_outputs(&mut self, sample: f32) -> FilterOutputs {
        let v3 = sample - self.ic2eq;
        let v1 = self.h * (self.ic1eq + self.g * v3);
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - self.k * v1 - v2,
        }
    }

    /// Filter one sample with the current response.
    #[inline]
    pub fn process_sample(&mut self, sample: f32) -> f32 {
        let outputs = self.next_outputs(sample);

        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::BandPass => outputs.bandpass,
            FilterType::HighPass => outputs.highpass,
        }
    }

    pub fn render(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn cutoff(&self) -> f32 {
        self.cutoff_hz
    }

    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }
}

impl Default for SVFilter {
    fn default() -> Self {
        Self::new(FilterType::LowPass)
    }
}

#[inline]
fn clamp_resonance(resonance: f32) -> f32 {
    if resonance.is_nan() {
        MIN_RESONANCE
    } else {
        resonance.clamp(MIN_RESONANCE, MAX_RESONANCE)
    }
}
