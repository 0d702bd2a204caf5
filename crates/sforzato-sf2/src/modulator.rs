//! Modulator units and the format's built-in default set.
//!
//! A modulator maps a real-time control source through a shaping curve to
//! modify a generator field by an amount. The target format activates two
//! modulators on every instrument by default; there is no delete
//! operation for them, so a translation that does not want them must
//! counter-write an explicit zero-amount modulator over the same
//! source/destination pair. [`DefaultModulator`] enumerates that built-in
//! set so the override is a first-class operation rather than a magic
//! insert.

use crate::generator::GeneratorField;

/// Real-time control source of a modulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceController {
    /// No controller: the source contributes the constant 1.
    NoController,
    /// MIDI note-on velocity.
    NoteOnVelocity,
    /// MIDI note-on key number.
    NoteOnKey,
    /// MIDI channel pressure.
    ChannelPressure,
    /// MIDI pitch wheel.
    PitchWheel,
}

/// Shaping curve applied to a modulator source.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveType {
    Linear,
    Concave,
    Convex,
    Switch,
}

/// A fully specified modulator source: controller, curve, and mapping
/// direction/polarity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModSource {
    pub controller: SourceController,
    pub curve: CurveType,
    /// Maximum controller value maps to 0 instead of 1.
    pub descending: bool,
    /// Source range is -1..1 instead of 0..1.
    pub bipolar: bool,
}

impl ModSource {
    /// Source that contributes the constant 1 through a linear curve.
    ///
    /// Used as the neutral secondary (amount) source of an override
    /// modulator.
    pub fn no_controller() -> Self {
        Self {
            controller: SourceController::NoController,
            curve: CurveType::Linear,
            descending: false,
            bipolar: false,
        }
    }
}

/// Output transform of a modulator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transform {
    Linear,
    AbsoluteValue,
}

/// The modulators every instrument of the target format carries by
/// default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DefaultModulator {
    /// Note-on velocity to initial attenuation, concave, descending.
    VelocityToAttenuation,
    /// Note-on velocity to filter cutoff, linear, descending.
    VelocityToFilterCutoff,
}

impl DefaultModulator {
    /// The complete built-in set, in the order overrides are installed.
    pub const ALL: [DefaultModulator; 2] = [
        DefaultModulator::VelocityToAttenuation,
        DefaultModulator::VelocityToFilterCutoff,
    ];

    /// The source the built-in modulator listens to.
    pub fn source(self) -> ModSource {
        match self {
            DefaultModulator::VelocityToAttenuation => ModSource {
                controller: SourceController::NoteOnVelocity,
                curve: CurveType::Concave,
                descending: true,
                bipolar: false,
            },
            DefaultModulator::VelocityToFilterCutoff => ModSource {
                controller: SourceController::NoteOnVelocity,
                curve: CurveType::Linear,
                descending: true,
                bipolar: false,
            },
        }
    }

    /// The generator field the built-in modulator writes to.
    pub fn destination(self) -> GeneratorField {
        match self {
            DefaultModulator::VelocityToAttenuation => GeneratorField::InitialAttenuation,
            DefaultModulator::VelocityToFilterCutoff => GeneratorField::InitialFilterCutoff,
        }
    }
}
