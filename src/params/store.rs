use log::{debug, trace};

use crate::{
    dsp::{
        filter::FilterType,
        harmonic::HARMONICS_PER_KIND,
        oscillator::{Waveform, MAX_FM_DEPTH, MAX_FM_FREQUENCY},
    },
    params::{
        AdsrParams, FilterParams, OscillatorParams, ParamError, VoiceParams, MAX_GAIN_DB,
        MIN_GAIN_DB,
    },
};

/// One host-visible parameter: its key, range and default value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDef {
    pub id: &'static str,
    pub name: &'static str,
    pub min: f32,
    pub max: f32,
    pub default: f32,
}

const fn def(id: &'static str, name: &'static str, min: f32, max: f32, default: f32) -> ParamDef {
    ParamDef {
        id,
        name,
        min,
        max,
        default,
    }
}

/// Every parameter the voice engine reads, in host order.
pub const PARAMS: &[ParamDef] = &[
    def("OSC1", "Oscillator 1", 0.0, 2.0, 0.0),
    def("OSC1GAIN", "Oscillator 1 Gain", MIN_GAIN_DB, MAX_GAIN_DB, 0.1),
    def("OSC1PITCH", "Oscillator 1 Pitch", -48.0, 48.0, 0.0),
    def("OSC1FMFREQ", "Oscillator 1 FM Frequency", 0.0, MAX_FM_FREQUENCY, 0.0),
    def("OSC1FMDEPTH", "Oscillator 1 FM Depth", 0.0, MAX_FM_DEPTH, 0.0),
    def("SUB1GAIN", "Subharmonic 1 Gain", MIN_GAIN_DB, MAX_GAIN_DB, 0.1),
    def("SUB2GAIN", "Subharmonic 2 Gain", MIN_GAIN_DB, MAX_GAIN_DB, 0.1),
    def("SUB3GAIN", "Subharmonic 3 Gain", MIN_GAIN_DB, MAX_GAIN_DB, 0.1),
    def("SUB4GAIN", "Subharmonic 4 Gain", MIN_GAIN_DB, MAX_GAIN_DB, 0.1),
    def("SUB5GAIN", "Subharmonic 5 Gain", MIN_GAIN_DB, MAX_GAIN_DB, 0.1),
    def("SUB6GAIN", "Subharmonic 6 Gain", MIN_GAIN_DB, MAX_GAIN_DB, 0.1),
    def("SUB7GAIN", "Subharmonic 7 Gain", MIN_GAIN_DB, MAX_GAIN_DB, 0.1),
    def("SUB8GAIN", "Subharmonic 8 Gain", MIN_GAIN_DB, MAX_GAIN_DB, 0.1),
    def("SUB9GAIN", "Subharmonic 9 Gain", MIN_GAIN_DB, MAX_GAIN_DB, 0.1),
    def("OV1GAIN", "Overtone 1 Gain", MIN_GAIN_DB, MAX_GAIN_DB, -20.0),
    def("OV2GAIN", "Overtone 2 Gain", MIN_GAIN_DB, MAX_GAIN_DB, -20.0),
    def("OV3GAIN", "Overtone 3 Gain", MIN_GAIN_DB, MAX_GAIN_DB, -20.0),
    def("OV4GAIN", "Overtone 4 Gain", MIN_GAIN_DB, MAX_GAIN_DB, -20.0),
    def("OV5GAIN", "Overtone 5 Gain", MIN_GAIN_DB, MAX_GAIN_DB, -20.0),
    def("OV6GAIN", "Overtone 6 Gain", MIN_GAIN_DB, MAX_GAIN_DB, -20.0),
    def("OV7GAIN", "Overtone 7 Gain", MIN_GAIN_DB, MAX_GAIN_DB, -20.0),
    def("OV8GAIN", "Overtone 8 Gain", MIN_GAIN_DB, MAX_GAIN_DB, -20.0),
    def("OV9GAIN", "Overtone 9 Gain", MIN_GAIN_DB, MAX_GAIN_DB, -20.0),
    def("FILTERTYPE", "Filter Type", 0.0, 2.0, 0.0),
    def("FILTERCUTOFF", "Filter Cutoff", 20.0, 20_000.0, 20_000.0),
    def("FILTERRESONANCE", "Filter Resonance", 0.1, 2.0, 0.1),
    def("FILTERADSRDEPTH", "Filter ADSR Depth", 0.0, 10_000.0, 10_000.0),
    def("ATTACK", "Attack", 0.1, 3.0, 0.1),
    def("DECAY", "Decay", 0.1, 3.0, 0.1),
    def("SUSTAIN", "Sustain", 0.1, 1.0, 1.0),
    def("RELEASE", "Release", 0.1, 3.0, 0.4),
    def("FILTERATTACK", "Filter Attack", 0.0, 1.0, 0.01),
    def("FILTERDECAY", "Filter Decay", 0.0, 1.0, 0.1),
    def("FILTERSUSTAIN", "Filter Sustain", 0.0, 1.0, 1.0),
    def("FILTERRELEASE", "Filter Release", 0.0, 3.0, 0.1),
];

const SUB_GAIN_IDS: [&str; HARMONICS_PER_KIND] = [
    "SUB1GAIN", "SUB2GAIN", "SUB3GAIN", "SUB4GAIN", "SUB5GAIN", "SUB6GAIN", "SUB7GAIN",
    "SUB8GAIN", "SUB9GAIN",
];

const OVERTONE_GAIN_IDS: [&str; HARMONICS_PER_KIND] = [
    "OV1GAIN", "OV2GAIN", "OV3GAIN", "OV4GAIN", "OV5GAIN", "OV6GAIN", "OV7GAIN", "OV8GAIN",
    "OV9GAIN",
];

/// String-keyed parameter values, owned by the control thread.
///
/// Values are clamped into their declared range on write. `snapshot` turns
/// the current values into a [`VoiceParams`] for the engine.
#[derive(Debug, Clone)]
pub struct ParamStore {
    values: Vec<f32>,
}

impl ParamStore {
    pub fn new() -> Self {
        Self {
            values: PARAMS.iter().map(|p| p.default).collect(),
        }
    }

    fn index_of(id: &str) -> Result<usize, ParamError> {
        PARAMS
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| ParamError::UnknownParameter(id.to_string()))
    }

    pub fn def(id: &str) -> Result<&'static ParamDef, ParamError> {
        Self::index_of(id).map(|index| &PARAMS[index])
    }

    pub fn get(&self, id: &str) -> Result<f32, ParamError> {
        Self::index_of(id).map(|index| self.values[index])
    }

    /// Store `value` clamped into the parameter's range. Returns the value
    /// actually stored.
    pub fn set(&mut self, id: &str, value: f32) -> Result<f32, ParamError> {
        let index = Self::index_of(id)?;
        let def = &PARAMS[index];

        if !value.is_finite() {
            return Err(ParamError::NonFinite { id: def.id, value });
        }

        let clamped = value.clamp(def.min, def.max);
        if clamped != value {
            debug!("{} clamped from {} to {}", def.id, value, clamped);
        }
        trace!("{} = {}", def.id, clamped);

        self.values[index] = clamped;
        Ok(clamped)
    }

    /// Nudge a parameter by `delta`, clamped into range.
    pub fn adjust(&mut self, id: &str, delta: f32) -> Result<f32, ParamError> {
        let current = self.get(id)?;
        self.set(id, current + delta)
    }

    pub fn reset_to_defaults(&mut self) {
        for (value, def) in self.values.iter_mut().zip(PARAMS) {
            *value = def.default;
        }
    }

    // Only called with ids from PARAMS
    fn value(&self, id: &str) -> f32 {
        match Self::index_of(id) {
            Ok(index) => self.values[index],
            Err(_) => 0.0,
        }
    }

    fn adsr(&self, attack: &str, decay: &str, sustain: &str, release: &str) -> AdsrParams {
        AdsrParams::new(
            self.value(attack),
            self.value(decay),
            self.value(sustain),
            self.value(release),
        )
    }

    /// Build the immutable parameter set the voices read once per block.
    pub fn snapshot(&self) -> VoiceParams {
        let mut sub_gains_db = [0.0; HARMONICS_PER_KIND];
        for (gain, id) in sub_gains_db.iter_mut().zip(SUB_GAIN_IDS) {
            *gain = self.value(id);
        }

        let mut overtone_gains_db = [0.0; HARMONICS_PER_KIND];
        for (gain, id) in overtone_gains_db.iter_mut().zip(OVERTONE_GAIN_IDS) {
            *gain = self.value(id);
        }

        VoiceParams {
            oscillator: OscillatorParams {
                waveform: Waveform::from_index(self.value("OSC1").round() as i32),
                gain_db: self.value("OSC1GAIN"),
                pitch: self.value("OSC1PITCH").round() as i32,
                fm_frequency: self.value("OSC1FMFREQ"),
                fm_depth: self.value("OSC1FMDEPTH"),
                sub_gains_db,
                overtone_gains_db,
            },
            amp_adsr: self.adsr("ATTACK", "DECAY", "SUSTAIN", "RELEASE"),
            filter: FilterParams {
                filter_type: FilterType::from_index(self.value("FILTERTYPE").round() as i32),
                cutoff: self.value("FILTERCUTOFF"),
                resonance: self.value("FILTERRESONANCE"),
                env_depth: self.value("FILTERADSRDEPTH"),
            },
            filter_adsr: self.adsr("FILTERATTACK", "FILTERDECAY", "FILTERSUSTAIN", "FILTERRELEASE"),
        }
    }
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::new()
    }
}
