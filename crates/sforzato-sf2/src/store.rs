//! The store trait the translation engine writes through.
//!
//! The engine never owns the object graph: instruments and samples are
//! created and persisted by a collaborating store. The trait below is the
//! complete contract the engine needs — sample resolution/validation,
//! division and modulator creation, and field writes. A store handle is
//! borrowed `&mut` for the duration of one decode, which also expresses
//! the exclusivity requirement: concurrent decodes against one store are
//! ruled out by the borrow checker instead of a lock.

use std::path::Path;

use crate::generator::{FieldValue, GeneratorField};
use crate::ids::{DivisionId, InstrumentId, ModulatorId, SampleId};
use crate::modulator::{ModSource, Transform};

/// Stored playback geometry of a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleInfo {
    /// Loop start position, in sample frames from the start.
    pub loop_start: u32,
    /// Loop end position, in sample frames from the start.
    pub loop_end: u32,
    /// Total length in sample frames.
    pub length: u32,
}

/// Where a generator field write lands: the instrument's global zone or
/// one division.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldTarget {
    Instrument(InstrumentId),
    Division(DivisionId),
}

/// Contract between the translation engine and the object-graph owner.
///
/// Identifier arguments must come from earlier calls on the same store;
/// passing foreign identifiers is a contract violation and a store may
/// panic on it.
pub trait SoundFontStore {
    /// Materialize the sample identities behind a sample file reference.
    ///
    /// Returns zero identities when the file cannot be used, one for a
    /// mono file, or two (left, right) for a stereo file. A store may
    /// create sample entries as a side effect; repeat calls for the same
    /// reference return the same identities.
    fn resolve_samples(
        &mut self,
        sample: &str,
        instrument: InstrumentId,
        source_path: &Path,
    ) -> Vec<SampleId>;

    /// Whether a sample file reference can be resolved at all.
    fn validate_sample(&mut self, sample: &str, source_path: &Path) -> bool;

    /// Fine-tune correction (cents) carried by the sample file itself, or
    /// 0 when the file has none.
    fn sample_file_correction(&mut self, sample: &str, source_path: &Path) -> i32;

    /// Stored loop points and length of a resolved sample.
    fn sample_info(&self, sample: SampleId) -> SampleInfo;

    /// Create an empty division under an instrument.
    fn create_division(&mut self, instrument: InstrumentId) -> DivisionId;

    /// Link a division to a sample.
    fn link_sample(&mut self, division: DivisionId, sample: SampleId);

    /// Write a generator field on the instrument's global zone.
    fn set_global_field(&mut self, instrument: InstrumentId, field: GeneratorField, value: FieldValue);

    /// Write a generator field on a division.
    fn set_division_field(&mut self, division: DivisionId, field: GeneratorField, value: FieldValue);

    /// Write a generator field on either target.
    fn set_field(&mut self, target: FieldTarget, field: GeneratorField, value: FieldValue) {
        match target {
            FieldTarget::Instrument(instrument) => self.set_global_field(instrument, field, value),
            FieldTarget::Division(division) => self.set_division_field(division, field, value),
        }
    }

    /// Create a modulator unit under an instrument.
    fn create_modulator(&mut self, instrument: InstrumentId) -> ModulatorId;

    /// Set the primary source of a modulator.
    fn set_modulator_source(&mut self, modulator: ModulatorId, source: ModSource);

    /// Set the destination generator field of a modulator.
    fn set_modulator_destination(&mut self, modulator: ModulatorId, destination: GeneratorField);

    /// Set the amount a modulator contributes at full source deflection.
    fn set_modulator_amount(&mut self, modulator: ModulatorId, amount: i16);

    /// Set the secondary source scaling the amount.
    fn set_modulator_amount_source(&mut self, modulator: ModulatorId, source: ModSource);

    /// Set the output transform of a modulator.
    fn set_modulator_transform(&mut self, modulator: ModulatorId, transform: Transform);
}
