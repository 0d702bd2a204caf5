//! Generator fields and their values.
//!
//! A generator field is a fixed-point playback parameter on a division
//! (or on the instrument's global zone). The enumeration below covers the
//! fields the translation engine writes; a store may of course support
//! more.

/// A generator field on a division or on the instrument's global zone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GeneratorField {
    // Mapping
    /// MIDI key range the division responds to.
    KeyRange,
    /// MIDI velocity range the division responds to.
    VelRange,

    // Output
    /// Attenuation in stored dB units (positive = quieter).
    InitialAttenuation,
    /// Stereo pan, -500 (full left) to +500 (full right).
    Pan,

    // Tuning
    /// Coarse tuning in semitones.
    CoarseTune,
    /// Fine tuning in cents.
    FineTune,
    /// Pitch tracking, cents of pitch change per key step.
    ScaleTuning,
    /// Root key override for the linked sample.
    OverridingRootKey,

    // Sample playback offsets, fine (samples) and coarse (32768-sample
    // chunks) parts
    StartOffset,
    StartCoarseOffset,
    EndOffset,
    EndCoarseOffset,
    StartLoopOffset,
    StartLoopCoarseOffset,
    EndLoopOffset,
    EndLoopCoarseOffset,
    /// Loop behavior selector (0 = none, 1 = continuous, 3 = sustain).
    SampleModes,

    // Filter
    /// Low-pass cutoff in absolute cents.
    InitialFilterCutoff,
    /// Filter resonance in centibels.
    InitialFilterQ,

    // Volume envelope, times in timecents
    DelayVolEnv,
    AttackVolEnv,
    HoldVolEnv,
    DecayVolEnv,
    /// Sustain level as attenuation in centibels.
    SustainVolEnv,
    ReleaseVolEnv,

    // Modulation envelope (shared by pitch and filter destinations)
    DelayModEnv,
    AttackModEnv,
    HoldModEnv,
    DecayModEnv,
    /// Sustain level in tenths of a percent of full depth.
    SustainModEnv,
    ReleaseModEnv,
    /// Modulation envelope depth on pitch, in cents.
    ModEnvToPitch,
    /// Modulation envelope depth on filter cutoff, in cents.
    ModEnvToFilterCutoff,

    // Modulation LFO
    DelayModLfo,
    /// LFO frequency in absolute cents.
    FreqModLfo,
    /// LFO depth on volume, in centibels.
    ModLfoToVolume,
    /// LFO depth on filter cutoff, in cents.
    ModLfoToFilterCutoff,

    // Vibrato LFO
    DelayVibLfo,
    FreqVibLfo,
    /// LFO depth on pitch, in cents.
    VibLfoToPitch,

    // Key-number tracking of envelope segments, timecents per key step
    KeyToVolEnvHold,
    KeyToVolEnvDecay,
    KeyToModEnvHold,
    KeyToModEnvDecay,
}

/// Value written into a generator field.
///
/// The target format stores every generator as a 16-bit word; which
/// interpretation applies depends on the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldValue {
    /// Signed quantity (pan, tuning, attenuation deltas, offsets).
    Signed(i16),
    /// Unsigned quantity (sample modes, some counters).
    Unsigned(u16),
    /// Low/high byte pair (key range, velocity range).
    Range(u8, u8),
}

impl FieldValue {
    /// The signed payload, if this is a [`FieldValue::Signed`].
    pub fn as_signed(self) -> Option<i16> {
        match self {
            FieldValue::Signed(v) => Some(v),
            _ => None,
        }
    }

    /// The unsigned payload, if this is a [`FieldValue::Unsigned`].
    pub fn as_unsigned(self) -> Option<u16> {
        match self {
            FieldValue::Unsigned(v) => Some(v),
            _ => None,
        }
    }

    /// The range payload, if this is a [`FieldValue::Range`].
    pub fn as_range(self) -> Option<(u8, u8)> {
        match self {
            FieldValue::Range(lo, hi) => Some((lo, hi)),
            _ => None,
        }
    }
}
