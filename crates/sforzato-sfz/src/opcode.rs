//! The opcode set understood by the translation engine.
//!
//! Opcodes are the named, typed parameters of the source format. Each one
//! has a fixed value kind; a scope stores at most one parameter per
//! opcode. The co-occurrence groups used by the grouped-opcode migration
//! pass and the key-number/base pairs used by the paired migration pass
//! are encoded as data tables here so the passes stay generic.

use std::fmt;

use crate::error::Error;
use crate::value::Value;

/// Kind of value an opcode carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Real,
    Integer,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Real => "real",
            ValueKind::Integer => "integer",
            ValueKind::Text => "text",
        };
        f.write_str(name)
    }
}

/// A named instrument parameter of the source format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    // Sample link
    Sample,

    // Key and velocity mapping
    KeyMin,
    KeyMax,
    VelMin,
    VelMax,

    // Channel routing
    ChannelMin,
    ChannelMax,

    // Output
    Volume,
    Pan,
    Width,
    Position,

    // Tuning
    TuningCoarse,
    TuningFine,
    RootKey,
    KeyTracking,

    // Sample playback
    Offset,
    End,
    LoopStart,
    LoopEnd,
    LoopMode,

    // Filter
    FilterType,
    FilterCutoff,
    FilterResonance,
    FilterKeyTracking,
    FilterKeyCenter,

    // Volume envelope
    AmpEnvDelay,
    AmpEnvAttack,
    AmpEnvHold,
    AmpEnvDecay,
    AmpEnvSustain,
    AmpEnvRelease,

    // Tone (pitch) envelope
    ToneEnvToPitch,
    ToneEnvDelay,
    ToneEnvAttack,
    ToneEnvHold,
    ToneEnvDecay,
    ToneEnvSustain,
    ToneEnvRelease,

    // Filter envelope
    FilterEnvToCutoff,
    FilterEnvDelay,
    FilterEnvAttack,
    FilterEnvHold,
    FilterEnvDecay,
    FilterEnvSustain,
    FilterEnvRelease,

    // Volume LFO
    VolumeLfoDepth,
    VolumeLfoDelay,
    VolumeLfoFreq,

    // Filter LFO
    FilterLfoDepth,
    FilterLfoDelay,
    FilterLfoFreq,

    // Vibrato LFO
    VibratoLfoDepth,
    VibratoLfoDelay,
    VibratoLfoFreq,

    // Key-number tracking of envelope segments
    KeyToVolEnvHold,
    KeyToVolEnvDecay,
    KeyToModEnvHold,
    KeyToModEnvDecay,
}

impl Opcode {
    /// Every opcode, in declaration order.
    pub const ALL: [Opcode; 58] = [
        Opcode::Sample,
        Opcode::KeyMin,
        Opcode::KeyMax,
        Opcode::VelMin,
        Opcode::VelMax,
        Opcode::ChannelMin,
        Opcode::ChannelMax,
        Opcode::Volume,
        Opcode::Pan,
        Opcode::Width,
        Opcode::Position,
        Opcode::TuningCoarse,
        Opcode::TuningFine,
        Opcode::RootKey,
        Opcode::KeyTracking,
        Opcode::Offset,
        Opcode::End,
        Opcode::LoopStart,
        Opcode::LoopEnd,
        Opcode::LoopMode,
        Opcode::FilterType,
        Opcode::FilterCutoff,
        Opcode::FilterResonance,
        Opcode::FilterKeyTracking,
        Opcode::FilterKeyCenter,
        Opcode::AmpEnvDelay,
        Opcode::AmpEnvAttack,
        Opcode::AmpEnvHold,
        Opcode::AmpEnvDecay,
        Opcode::AmpEnvSustain,
        Opcode::AmpEnvRelease,
        Opcode::ToneEnvToPitch,
        Opcode::ToneEnvDelay,
        Opcode::ToneEnvAttack,
        Opcode::ToneEnvHold,
        Opcode::ToneEnvDecay,
        Opcode::ToneEnvSustain,
        Opcode::ToneEnvRelease,
        Opcode::FilterEnvToCutoff,
        Opcode::FilterEnvDelay,
        Opcode::FilterEnvAttack,
        Opcode::FilterEnvHold,
        Opcode::FilterEnvDecay,
        Opcode::FilterEnvSustain,
        Opcode::FilterEnvRelease,
        Opcode::VolumeLfoDepth,
        Opcode::VolumeLfoDelay,
        Opcode::VolumeLfoFreq,
        Opcode::FilterLfoDepth,
        Opcode::FilterLfoDelay,
        Opcode::FilterLfoFreq,
        Opcode::VibratoLfoDepth,
        Opcode::VibratoLfoDelay,
        Opcode::VibratoLfoFreq,
        Opcode::KeyToVolEnvHold,
        Opcode::KeyToVolEnvDecay,
        Opcode::KeyToModEnvHold,
        Opcode::KeyToModEnvDecay,
    ];

    /// The value kind this opcode carries.
    pub fn value_kind(self) -> ValueKind {
        match self {
            Opcode::Sample | Opcode::LoopMode | Opcode::FilterType => ValueKind::Text,

            Opcode::KeyMin
            | Opcode::KeyMax
            | Opcode::VelMin
            | Opcode::VelMax
            | Opcode::ChannelMin
            | Opcode::ChannelMax
            | Opcode::TuningCoarse
            | Opcode::TuningFine
            | Opcode::RootKey
            | Opcode::KeyTracking
            | Opcode::Offset
            | Opcode::End
            | Opcode::LoopStart
            | Opcode::LoopEnd
            | Opcode::FilterKeyTracking
            | Opcode::FilterKeyCenter
            | Opcode::ToneEnvToPitch
            | Opcode::FilterEnvToCutoff
            | Opcode::VolumeLfoDepth
            | Opcode::FilterLfoDepth
            | Opcode::VibratoLfoDepth => ValueKind::Integer,

            Opcode::Volume
            | Opcode::Pan
            | Opcode::Width
            | Opcode::Position
            | Opcode::FilterCutoff
            | Opcode::FilterResonance
            | Opcode::AmpEnvDelay
            | Opcode::AmpEnvAttack
            | Opcode::AmpEnvHold
            | Opcode::AmpEnvDecay
            | Opcode::AmpEnvSustain
            | Opcode::AmpEnvRelease
            | Opcode::ToneEnvDelay
            | Opcode::ToneEnvAttack
            | Opcode::ToneEnvHold
            | Opcode::ToneEnvDecay
            | Opcode::ToneEnvSustain
            | Opcode::ToneEnvRelease
            | Opcode::FilterEnvDelay
            | Opcode::FilterEnvAttack
            | Opcode::FilterEnvHold
            | Opcode::FilterEnvDecay
            | Opcode::FilterEnvSustain
            | Opcode::FilterEnvRelease
            | Opcode::VolumeLfoDelay
            | Opcode::VolumeLfoFreq
            | Opcode::FilterLfoDelay
            | Opcode::FilterLfoFreq
            | Opcode::VibratoLfoDelay
            | Opcode::VibratoLfoFreq
            | Opcode::KeyToVolEnvHold
            | Opcode::KeyToVolEnvDecay
            | Opcode::KeyToModEnvHold
            | Opcode::KeyToModEnvDecay => ValueKind::Real,
        }
    }

    /// The source-format spelling of this opcode.
    pub fn name(self) -> &'static str {
        match self {
            Opcode::Sample => "sample",
            Opcode::KeyMin => "lokey",
            Opcode::KeyMax => "hikey",
            Opcode::VelMin => "lovel",
            Opcode::VelMax => "hivel",
            Opcode::ChannelMin => "lochan",
            Opcode::ChannelMax => "hichan",
            Opcode::Volume => "volume",
            Opcode::Pan => "pan",
            Opcode::Width => "width",
            Opcode::Position => "position",
            Opcode::TuningCoarse => "transpose",
            Opcode::TuningFine => "tune",
            Opcode::RootKey => "pitch_keycenter",
            Opcode::KeyTracking => "pitch_keytrack",
            Opcode::Offset => "offset",
            Opcode::End => "end",
            Opcode::LoopStart => "loop_start",
            Opcode::LoopEnd => "loop_end",
            Opcode::LoopMode => "loop_mode",
            Opcode::FilterType => "fil_type",
            Opcode::FilterCutoff => "cutoff",
            Opcode::FilterResonance => "resonance",
            Opcode::FilterKeyTracking => "fil_keytrack",
            Opcode::FilterKeyCenter => "fil_keycenter",
            Opcode::AmpEnvDelay => "ampeg_delay",
            Opcode::AmpEnvAttack => "ampeg_attack",
            Opcode::AmpEnvHold => "ampeg_hold",
            Opcode::AmpEnvDecay => "ampeg_decay",
            Opcode::AmpEnvSustain => "ampeg_sustain",
            Opcode::AmpEnvRelease => "ampeg_release",
            Opcode::ToneEnvToPitch => "pitcheg_depth",
            Opcode::ToneEnvDelay => "pitcheg_delay",
            Opcode::ToneEnvAttack => "pitcheg_attack",
            Opcode::ToneEnvHold => "pitcheg_hold",
            Opcode::ToneEnvDecay => "pitcheg_decay",
            Opcode::ToneEnvSustain => "pitcheg_sustain",
            Opcode::ToneEnvRelease => "pitcheg_release",
            Opcode::FilterEnvToCutoff => "fileg_depth",
            Opcode::FilterEnvDelay => "fileg_delay",
            Opcode::FilterEnvAttack => "fileg_attack",
            Opcode::FilterEnvHold => "fileg_hold",
            Opcode::FilterEnvDecay => "fileg_decay",
            Opcode::FilterEnvSustain => "fileg_sustain",
            Opcode::FilterEnvRelease => "fileg_release",
            Opcode::VolumeLfoDepth => "amplfo_depth",
            Opcode::VolumeLfoDelay => "amplfo_delay",
            Opcode::VolumeLfoFreq => "amplfo_freq",
            Opcode::FilterLfoDepth => "fillfo_depth",
            Opcode::FilterLfoDelay => "fillfo_delay",
            Opcode::FilterLfoFreq => "fillfo_freq",
            Opcode::VibratoLfoDepth => "pitchlfo_depth",
            Opcode::VibratoLfoDelay => "pitchlfo_delay",
            Opcode::VibratoLfoFreq => "pitchlfo_freq",
            Opcode::KeyToVolEnvHold => "ampeg_hold_keynum",
            Opcode::KeyToVolEnvDecay => "ampeg_decay_keynum",
            Opcode::KeyToModEnvHold => "pitcheg_hold_keynum",
            Opcode::KeyToModEnvDecay => "pitcheg_decay_keynum",
        }
    }

    /// Look an opcode up by its source-format spelling.
    pub fn from_name(name: &str) -> Option<Opcode> {
        Opcode::ALL.iter().copied().find(|op| op.name() == name)
    }

    /// Parse raw opcode text into a typed value of this opcode's kind.
    pub fn parse_value(self, raw: &str) -> Result<Value, Error> {
        let invalid = || Error::InvalidValue {
            opcode: self,
            value: raw.to_string(),
            expected: self.value_kind(),
        };
        match self.value_kind() {
            ValueKind::Real => raw.trim().parse::<f64>().map(Value::Real).map_err(|_| invalid()),
            ValueKind::Integer => raw
                .trim()
                .parse::<i32>()
                .map(Value::Integer)
                .map_err(|_| invalid()),
            ValueKind::Text => Ok(Value::Text(raw.to_string())),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four co-occurrence groups of the grouped-opcode migration pass.
///
/// The first member of each group is its head (the modulation-depth
/// leader, integer-kinded); the rest carry real values. A global default
/// from one of these groups only migrates into a region when another
/// member of the same group is already defined there.
pub const MOD_GROUPS: [&[Opcode]; 4] = [
    &[
        Opcode::ToneEnvToPitch,
        Opcode::ToneEnvDelay,
        Opcode::ToneEnvAttack,
        Opcode::ToneEnvHold,
        Opcode::ToneEnvDecay,
        Opcode::ToneEnvSustain,
        Opcode::ToneEnvRelease,
    ],
    &[
        Opcode::FilterEnvToCutoff,
        Opcode::FilterEnvDelay,
        Opcode::FilterEnvAttack,
        Opcode::FilterEnvHold,
        Opcode::FilterEnvDecay,
        Opcode::FilterEnvSustain,
        Opcode::FilterEnvRelease,
    ],
    &[
        Opcode::VolumeLfoDepth,
        Opcode::VolumeLfoDelay,
        Opcode::VolumeLfoFreq,
    ],
    &[
        Opcode::FilterLfoDepth,
        Opcode::FilterLfoDelay,
        Opcode::FilterLfoFreq,
    ],
];

/// Key-number opcodes and the base opcodes they migrate together with.
pub const KEYNUM_PAIRS: [(Opcode, Opcode); 4] = [
    (Opcode::KeyToVolEnvHold, Opcode::AmpEnvHold),
    (Opcode::KeyToVolEnvDecay, Opcode::AmpEnvDecay),
    (Opcode::KeyToModEnvHold, Opcode::ToneEnvHold),
    (Opcode::KeyToModEnvDecay, Opcode::ToneEnvDecay),
];

/// Default value for a base opcode distributed by the key-number pass
/// when the global scope does not define it (seconds).
pub const KEYNUM_BASE_DEFAULT: f64 = 0.001;

/// Opcodes the decode engine reads per region only; the pipeline strips
/// them from the global scope after distribution.
pub const REGION_ONLY_OPCODES: [Opcode; 9] = [
    Opcode::Sample,
    Opcode::Offset,
    Opcode::End,
    Opcode::LoopStart,
    Opcode::LoopEnd,
    Opcode::LoopMode,
    Opcode::Pan,
    Opcode::Width,
    Opcode::Position,
];
