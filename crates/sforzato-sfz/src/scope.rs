//! Parameter scopes: the global zone and each region.
//!
//! A scope is an ordered collection of typed parameters with at most one
//! parameter per opcode. The same type serves both roles — the group
//! holds one global scope and any number of region scopes — and also
//! carries the region-local operations the normalization passes and the
//! decode engine delegate to: volume/tuning adjustment, offset
//! adaptation, filter sanitization, sample validation, and the generator
//! field writes.

use std::path::Path;

use sforzato_sf2::units;
use sforzato_sf2::{FieldTarget, FieldValue, GeneratorField, SoundFontStore};

use crate::opcode::Opcode;
use crate::value::{Parameter, Value};

/// An ordered opcode → parameter mapping.
///
/// Lookup is by opcode; insertion order is preserved and determines the
/// order generator fields are written in. Undefined means absent — a
/// lookup on an undefined opcode returns `None`, never a default.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParameterScope {
    params: Vec<Parameter>,
}

impl ParameterScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the opcode is defined in this scope.
    pub fn is_defined(&self, opcode: Opcode) -> bool {
        self.params.iter().any(|p| p.opcode() == opcode)
    }

    /// The parameter stored for an opcode, if defined.
    pub fn get(&self, opcode: Opcode) -> Option<&Parameter> {
        self.params.iter().find(|p| p.opcode() == opcode)
    }

    /// The real value of an opcode, if defined.
    pub fn real(&self, opcode: Opcode) -> Option<f64> {
        self.get(opcode).and_then(|p| p.value().as_real())
    }

    /// The integer value of an opcode, if defined.
    pub fn integer(&self, opcode: Opcode) -> Option<i32> {
        self.get(opcode).and_then(|p| p.value().as_integer())
    }

    /// The text value of an opcode, if defined.
    pub fn text(&self, opcode: Opcode) -> Option<&str> {
        self.get(opcode).and_then(|p| p.value().as_text())
    }

    /// Insert a parameter, replacing any existing one for the same
    /// opcode (the replacement keeps the original position).
    pub fn insert(&mut self, param: Parameter) {
        match self
            .params
            .iter_mut()
            .find(|p| p.opcode() == param.opcode())
        {
            Some(slot) => *slot = param,
            None => self.params.push(param),
        }
    }

    /// Store a value for an opcode.
    ///
    /// The value kind must match the opcode's declared kind; the typed
    /// setters below are the usual entry points.
    pub fn set(&mut self, opcode: Opcode, value: Value) {
        debug_assert_eq!(value.kind(), opcode.value_kind());
        match self.params.iter_mut().find(|p| p.opcode() == opcode) {
            Some(slot) => *slot = Parameter::raw(opcode, value),
            None => self.params.push(Parameter::raw(opcode, value)),
        }
    }

    pub fn set_real(&mut self, opcode: Opcode, value: f64) {
        self.set(opcode, Value::Real(value));
    }

    pub fn set_integer(&mut self, opcode: Opcode, value: i32) {
        self.set(opcode, Value::Integer(value));
    }

    pub fn set_text(&mut self, opcode: Opcode, value: &str) {
        self.set(opcode, Value::Text(value.to_string()));
    }

    /// Remove an opcode. Removing an undefined opcode is a no-op.
    pub fn remove(&mut self, opcode: Opcode) {
        self.params.retain(|p| p.opcode() != opcode);
    }

    /// Copy every parameter defined in `other` but undefined here.
    pub fn merge_if_undefined(&mut self, other: &ParameterScope) {
        for param in &other.params {
            if !self.is_defined(param.opcode()) {
                self.params.push(param.clone());
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

// Region-local operations delegated by the group and the decode engine.
impl ParameterScope {
    /// Add an offset (decibels) to the volume opcode.
    ///
    /// An undefined volume counts as 0 dB, so a nonzero offset always
    /// leaves the opcode defined. A zero offset changes nothing.
    pub fn adjust_volume(&mut self, offset_db: f64) {
        if offset_db == 0.0 {
            return;
        }
        let current = self.real(Opcode::Volume).unwrap_or(0.0);
        self.set_real(Opcode::Volume, current + offset_db);
    }

    /// Reconcile the fine-tuning opcode with the correction embedded in
    /// the sample file itself.
    ///
    /// The effective tuning is this scope's value, or `default_tune`
    /// when undefined. The sample file's own correction will already be
    /// applied by the target's sample object, so it is subtracted here
    /// to avoid a double shift. A resulting zero removes the opcode.
    pub fn adjust_correction<S: SoundFontStore>(
        &mut self,
        store: &mut S,
        source_path: &Path,
        default_tune: i32,
    ) {
        let tune = self.integer(Opcode::TuningFine).unwrap_or(default_tune);
        let correction = match self.text(Opcode::Sample) {
            Some(sample) => store.sample_file_correction(sample, source_path),
            None => 0,
        };
        let adjusted = tune - correction;
        if adjusted != 0 {
            self.set_integer(Opcode::TuningFine, adjusted);
        } else {
            self.remove(Opcode::TuningFine);
        }
    }

    /// Rewrite absolute sample positions as offsets relative to the
    /// stored sample geometry.
    ///
    /// The end position becomes relative to the stored length and the
    /// loop points to the stored loop points. The start offset is
    /// already start-relative and stays untouched. Must run before any
    /// generator fields are written for this scope.
    pub fn adapt_offsets(&mut self, loop_start: u32, loop_end: u32, length: u32) {
        if let Some(end) = self.integer(Opcode::End) {
            self.set_integer(Opcode::End, end - length as i32);
        }
        if let Some(start) = self.integer(Opcode::LoopStart) {
            self.set_integer(Opcode::LoopStart, start - loop_start as i32);
        }
        if let Some(end) = self.integer(Opcode::LoopEnd) {
            self.set_integer(Opcode::LoopEnd, end - loop_end as i32);
        }
    }

    /// Clear filter opcodes the target format cannot express.
    ///
    /// The target supports low-pass filtering only: a defined
    /// non-low-pass type drops the whole filter (type, cutoff,
    /// resonance); a low-pass type without a cutoff drops the type and
    /// resonance, leaving the default filter untouched.
    pub fn check_filter(&mut self) {
        let non_lowpass = self.text(Opcode::FilterType).map(|ft| {
            !matches!(
                ft.to_ascii_lowercase().as_str(),
                "lpf_1p" | "lpf_2p" | "lpf_4p"
            )
        });
        match non_lowpass {
            Some(true) => {
                self.remove(Opcode::FilterType);
                self.remove(Opcode::FilterCutoff);
                self.remove(Opcode::FilterResonance);
            }
            Some(false) if !self.is_defined(Opcode::FilterCutoff) => {
                self.remove(Opcode::FilterType);
                self.remove(Opcode::FilterResonance);
            }
            _ => {}
        }
    }

    /// Fold filter key tracking into the cutoff.
    ///
    /// The target has no per-key filter tracking, so a defined nonzero
    /// tracking re-centers the cutoff to key 60 and the tracking opcodes
    /// are dropped. In a region (`nested` true) the tracking center
    /// falls back from the filter key center to the region's root key;
    /// the global scope (`nested` false) only knows the filter key
    /// center and otherwise uses key 60.
    pub fn check_key_tracked_filter(&mut self, nested: bool) {
        let Some(track) = self.integer(Opcode::FilterKeyTracking) else {
            return;
        };
        self.remove(Opcode::FilterKeyTracking);
        let center = if nested {
            self.integer(Opcode::FilterKeyCenter)
                .or_else(|| self.integer(Opcode::RootKey))
                .unwrap_or(60)
        } else {
            self.integer(Opcode::FilterKeyCenter).unwrap_or(60)
        };
        self.remove(Opcode::FilterKeyCenter);
        if track == 0 {
            return;
        }
        if let Some(cutoff) = self.real(Opcode::FilterCutoff) {
            let recentered =
                cutoff * 2f64.powf(f64::from(track) * f64::from(60 - center) / 1200.0);
            self.set_real(Opcode::FilterCutoff, recentered);
        }
    }

    /// Whether this scope's sample reference resolves against the
    /// source path. Undefined sample means invalid.
    pub fn sample_valid<S: SoundFontStore>(&self, store: &mut S, source_path: &Path) -> bool {
        match self.text(Opcode::Sample) {
            Some(sample) => store.validate_sample(sample, source_path),
            None => false,
        }
    }
}

// Generator field writing.
impl ParameterScope {
    /// Write every remaining defined opcode to its generator field on
    /// `target`.
    ///
    /// The sample link, pan/width/position and channel routing are owned
    /// by the decode engine and are not written here; filter tracking
    /// opcodes are expected to have been folded away by the
    /// sanitization passes.
    pub fn decode<S: SoundFontStore>(&self, store: &mut S, target: FieldTarget) {
        self.write_key_ranges(store, target);
        for param in &self.params {
            self.write_field(store, target, param);
        }
    }

    fn write_key_ranges<S: SoundFontStore>(&self, store: &mut S, target: FieldTarget) {
        let key_min = self.integer(Opcode::KeyMin);
        let key_max = self.integer(Opcode::KeyMax);
        if key_min.is_some() || key_max.is_some() {
            let lo = key_min.unwrap_or(0).clamp(0, 127) as u8;
            let hi = key_max.unwrap_or(127).clamp(0, 127) as u8;
            store.set_field(target, GeneratorField::KeyRange, FieldValue::Range(lo, hi));
        }

        let vel_min = self.integer(Opcode::VelMin);
        let vel_max = self.integer(Opcode::VelMax);
        if vel_min.is_some() || vel_max.is_some() {
            let lo = vel_min.unwrap_or(0).clamp(0, 127) as u8;
            let hi = vel_max.unwrap_or(127).clamp(0, 127) as u8;
            store.set_field(target, GeneratorField::VelRange, FieldValue::Range(lo, hi));
        }
    }

    fn write_field<S: SoundFontStore>(&self, store: &mut S, target: FieldTarget, param: &Parameter) {
        use GeneratorField as F;

        let signed = |field: F, value: i16| {
            (field, FieldValue::Signed(value))
        };

        let write = match (param.opcode(), param.value()) {
            (Opcode::Volume, Value::Real(v)) => {
                Some(signed(F::InitialAttenuation, units::db_to_attenuation(-v)))
            }
            (Opcode::TuningCoarse, Value::Integer(v)) => {
                Some(signed(F::CoarseTune, (*v).clamp(-120, 120) as i16))
            }
            (Opcode::TuningFine, Value::Integer(v)) => {
                Some(signed(F::FineTune, (*v).clamp(-99, 99) as i16))
            }
            (Opcode::RootKey, Value::Integer(v)) => {
                Some(signed(F::OverridingRootKey, (*v).clamp(0, 127) as i16))
            }
            (Opcode::KeyTracking, Value::Integer(v)) => {
                Some(signed(F::ScaleTuning, (*v).clamp(0, 1200) as i16))
            }

            (Opcode::Offset, Value::Integer(v)) => {
                self.write_offset(store, target, *v, F::StartOffset, F::StartCoarseOffset);
                None
            }
            (Opcode::End, Value::Integer(v)) => {
                self.write_offset(store, target, *v, F::EndOffset, F::EndCoarseOffset);
                None
            }
            (Opcode::LoopStart, Value::Integer(v)) => {
                self.write_offset(store, target, *v, F::StartLoopOffset, F::StartLoopCoarseOffset);
                None
            }
            (Opcode::LoopEnd, Value::Integer(v)) => {
                self.write_offset(store, target, *v, F::EndLoopOffset, F::EndLoopCoarseOffset);
                None
            }
            (Opcode::LoopMode, Value::Text(mode)) => {
                let modes: u16 = match mode.to_ascii_lowercase().as_str() {
                    "loop_continuous" | "loop" => 1,
                    "loop_sustain" => 3,
                    _ => 0,
                };
                Some((F::SampleModes, FieldValue::Unsigned(modes)))
            }

            (Opcode::FilterCutoff, Value::Real(v)) => Some(signed(
                F::InitialFilterCutoff,
                units::hertz_to_cents(*v).clamp(1500, 13500),
            )),
            (Opcode::FilterResonance, Value::Real(v)) => Some(signed(
                F::InitialFilterQ,
                (10.0 * v).round().clamp(0.0, 960.0) as i16,
            )),

            (Opcode::AmpEnvDelay, Value::Real(v)) => {
                Some(signed(F::DelayVolEnv, units::seconds_to_timecents(*v)))
            }
            (Opcode::AmpEnvAttack, Value::Real(v)) => {
                Some(signed(F::AttackVolEnv, units::seconds_to_timecents(*v)))
            }
            (Opcode::AmpEnvHold, Value::Real(v)) => {
                Some(signed(F::HoldVolEnv, units::seconds_to_timecents(*v)))
            }
            (Opcode::AmpEnvDecay, Value::Real(v)) => {
                Some(signed(F::DecayVolEnv, units::seconds_to_timecents(*v)))
            }
            (Opcode::AmpEnvSustain, Value::Real(v)) => Some(signed(
                F::SustainVolEnv,
                units::sustain_percent_to_attenuation(*v),
            )),
            (Opcode::AmpEnvRelease, Value::Real(v)) => {
                Some(signed(F::ReleaseVolEnv, units::seconds_to_timecents(*v)))
            }

            (Opcode::ToneEnvToPitch, Value::Integer(v)) => {
                Some(signed(F::ModEnvToPitch, (*v).clamp(-12000, 12000) as i16))
            }
            (Opcode::ToneEnvDelay, Value::Real(v)) => {
                Some(signed(F::DelayModEnv, units::seconds_to_timecents(*v)))
            }
            (Opcode::ToneEnvAttack, Value::Real(v)) => {
                Some(signed(F::AttackModEnv, units::seconds_to_timecents(*v)))
            }
            (Opcode::ToneEnvHold, Value::Real(v)) => {
                Some(signed(F::HoldModEnv, units::seconds_to_timecents(*v)))
            }
            (Opcode::ToneEnvDecay, Value::Real(v)) => {
                Some(signed(F::DecayModEnv, units::seconds_to_timecents(*v)))
            }
            (Opcode::ToneEnvSustain, Value::Real(v)) => Some(signed(
                F::SustainModEnv,
                units::sustain_percent_to_depth(*v),
            )),
            (Opcode::ToneEnvRelease, Value::Real(v)) => {
                Some(signed(F::ReleaseModEnv, units::seconds_to_timecents(*v)))
            }

            (Opcode::FilterEnvToCutoff, Value::Integer(v)) => Some(signed(
                F::ModEnvToFilterCutoff,
                (*v).clamp(-12000, 12000) as i16,
            )),
            (Opcode::FilterEnvDelay, Value::Real(v)) => {
                Some(signed(F::DelayModEnv, units::seconds_to_timecents(*v)))
            }
            (Opcode::FilterEnvAttack, Value::Real(v)) => {
                Some(signed(F::AttackModEnv, units::seconds_to_timecents(*v)))
            }
            (Opcode::FilterEnvHold, Value::Real(v)) => {
                Some(signed(F::HoldModEnv, units::seconds_to_timecents(*v)))
            }
            (Opcode::FilterEnvDecay, Value::Real(v)) => {
                Some(signed(F::DecayModEnv, units::seconds_to_timecents(*v)))
            }
            (Opcode::FilterEnvSustain, Value::Real(v)) => Some(signed(
                F::SustainModEnv,
                units::sustain_percent_to_depth(*v),
            )),
            (Opcode::FilterEnvRelease, Value::Real(v)) => {
                Some(signed(F::ReleaseModEnv, units::seconds_to_timecents(*v)))
            }

            (Opcode::VolumeLfoDepth, Value::Integer(v)) => Some(signed(
                F::ModLfoToVolume,
                (10 * v).clamp(-960, 960) as i16,
            )),
            (Opcode::VolumeLfoDelay, Value::Real(v)) => {
                Some(signed(F::DelayModLfo, units::seconds_to_timecents(*v)))
            }
            (Opcode::VolumeLfoFreq, Value::Real(v)) => {
                Some(signed(F::FreqModLfo, units::hertz_to_cents(*v)))
            }

            (Opcode::FilterLfoDepth, Value::Integer(v)) => Some(signed(
                F::ModLfoToFilterCutoff,
                (*v).clamp(-12000, 12000) as i16,
            )),
            (Opcode::FilterLfoDelay, Value::Real(v)) => {
                Some(signed(F::DelayModLfo, units::seconds_to_timecents(*v)))
            }
            (Opcode::FilterLfoFreq, Value::Real(v)) => {
                Some(signed(F::FreqModLfo, units::hertz_to_cents(*v)))
            }

            (Opcode::VibratoLfoDepth, Value::Integer(v)) => {
                Some(signed(F::VibLfoToPitch, (*v).clamp(-12000, 12000) as i16))
            }
            (Opcode::VibratoLfoDelay, Value::Real(v)) => {
                Some(signed(F::DelayVibLfo, units::seconds_to_timecents(*v)))
            }
            (Opcode::VibratoLfoFreq, Value::Real(v)) => {
                Some(signed(F::FreqVibLfo, units::hertz_to_cents(*v)))
            }

            (Opcode::KeyToVolEnvHold, Value::Real(v)) => Some(signed(
                F::KeyToVolEnvHold,
                v.round().clamp(-1200.0, 1200.0) as i16,
            )),
            (Opcode::KeyToVolEnvDecay, Value::Real(v)) => Some(signed(
                F::KeyToVolEnvDecay,
                v.round().clamp(-1200.0, 1200.0) as i16,
            )),
            (Opcode::KeyToModEnvHold, Value::Real(v)) => Some(signed(
                F::KeyToModEnvHold,
                v.round().clamp(-1200.0, 1200.0) as i16,
            )),
            (Opcode::KeyToModEnvDecay, Value::Real(v)) => Some(signed(
                F::KeyToModEnvDecay,
                v.round().clamp(-1200.0, 1200.0) as i16,
            )),

            // Engine-owned or sanitized away; key/vel ranges are written
            // as pairs above.
            (Opcode::Sample, _)
            | (Opcode::KeyMin, _)
            | (Opcode::KeyMax, _)
            | (Opcode::VelMin, _)
            | (Opcode::VelMax, _)
            | (Opcode::ChannelMin, _)
            | (Opcode::ChannelMax, _)
            | (Opcode::Pan, _)
            | (Opcode::Width, _)
            | (Opcode::Position, _)
            | (Opcode::FilterType, _)
            | (Opcode::FilterKeyTracking, _)
            | (Opcode::FilterKeyCenter, _) => None,

            // A parameter whose stored kind disagrees with its opcode
            // cannot be built through the public constructors.
            _ => None,
        };

        if let Some((field, value)) = write {
            store.set_field(target, field, value);
        }
    }

    fn write_offset<S: SoundFontStore>(
        &self,
        store: &mut S,
        target: FieldTarget,
        value: i32,
        fine: GeneratorField,
        coarse: GeneratorField,
    ) {
        let coarse_part = value / 32768;
        let fine_part = value % 32768;
        store.set_field(target, fine, FieldValue::Signed(fine_part as i16));
        if coarse_part != 0 {
            store.set_field(target, coarse, FieldValue::Signed(coarse_part as i16));
        }
    }
}
