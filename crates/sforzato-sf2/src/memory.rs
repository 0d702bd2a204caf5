//! In-memory reference implementation of [`SoundFontStore`].
//!
//! Sample decoding is out of scope for this crate, so the memory store
//! works from registered sample metadata instead of files: an embedder
//! (or a test) registers each sample file reference once with its channel
//! count and loop geometry, and resolution materializes mono samples or
//! left/right stereo pairs from that registry. Everything the engine
//! writes — divisions, generator fields, modulators — is kept in plain
//! vectors that can be inspected afterwards.

use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::generator::{FieldValue, GeneratorField};
use crate::ids::{DivisionId, InstrumentId, ModulatorId, SampleId};
use crate::modulator::{ModSource, Transform};
use crate::store::{SampleInfo, SoundFontStore};

/// Errors raised when registering sample metadata.
#[derive(Error, Debug)]
pub enum MemoryStoreError {
    /// The sample reference was empty.
    #[error("sample reference must not be empty")]
    EmptyName,

    /// The channel count was not 1 or 2.
    #[error("sample '{0}' must have 1 or 2 channels, got {1}")]
    UnsupportedChannels(String, u16),

    /// The sample had no frames.
    #[error("sample '{0}' has zero length")]
    ZeroLength(String),

    /// Loop points lie outside the sample or are inverted.
    #[error("sample '{0}' has invalid loop points {1}..{2} (length {3})")]
    InvalidLoop(String, u32, u32, u32),
}

/// Metadata registered for one sample file reference.
#[derive(Clone, Copy, Debug)]
pub struct RegisteredSample {
    /// 1 for mono, 2 for stereo.
    pub channels: u16,
    pub loop_start: u32,
    pub loop_end: u32,
    pub length: u32,
    /// Fine-tune correction (cents) embedded in the file, 0 for none.
    pub correction: i32,
}

#[derive(Clone, Debug)]
struct StoredSample {
    name: String,
    info: SampleInfo,
}

/// A division as recorded by the memory store.
#[derive(Clone, Debug)]
pub struct Division {
    pub instrument: InstrumentId,
    pub sample: Option<SampleId>,
    /// Field writes in the order they happened; a later write for the
    /// same field wins.
    pub fields: Vec<(GeneratorField, FieldValue)>,
}

impl Division {
    /// Last value written for a field, if any.
    pub fn field(&self, field: GeneratorField) -> Option<FieldValue> {
        self.fields
            .iter()
            .rev()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| *v)
    }
}

/// A modulator unit as recorded by the memory store.
#[derive(Clone, Debug)]
pub struct Modulator {
    pub instrument: InstrumentId,
    pub source: Option<ModSource>,
    pub destination: Option<GeneratorField>,
    pub amount: Option<i16>,
    pub amount_source: Option<ModSource>,
    pub transform: Option<Transform>,
}

#[derive(Clone, Debug, Default)]
struct Instrument {
    global_fields: Vec<(GeneratorField, FieldValue)>,
}

/// In-memory object graph implementing [`SoundFontStore`].
#[derive(Default)]
pub struct MemoryStore {
    registry: HashMap<String, RegisteredSample>,
    samples: Vec<StoredSample>,
    resolved: HashMap<String, Vec<SampleId>>,
    instruments: Vec<Instrument>,
    divisions: Vec<Division>,
    modulators: Vec<Modulator>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata for a sample file reference.
    pub fn register_sample(
        &mut self,
        name: &str,
        sample: RegisteredSample,
    ) -> Result<(), MemoryStoreError> {
        if name.is_empty() {
            return Err(MemoryStoreError::EmptyName);
        }
        if sample.channels == 0 || sample.channels > 2 {
            return Err(MemoryStoreError::UnsupportedChannels(
                name.to_string(),
                sample.channels,
            ));
        }
        if sample.length == 0 {
            return Err(MemoryStoreError::ZeroLength(name.to_string()));
        }
        if sample.loop_start > sample.loop_end || sample.loop_end > sample.length {
            return Err(MemoryStoreError::InvalidLoop(
                name.to_string(),
                sample.loop_start,
                sample.loop_end,
                sample.length,
            ));
        }
        self.registry.insert(name.to_string(), sample);
        Ok(())
    }

    /// Create an empty instrument container.
    pub fn create_instrument(&mut self) -> InstrumentId {
        self.instruments.push(Instrument::default());
        InstrumentId(self.instruments.len() as u32 - 1)
    }

    /// All divisions created so far, in creation order.
    pub fn divisions(&self) -> &[Division] {
        &self.divisions
    }

    /// Divisions of one instrument, in creation order.
    pub fn instrument_divisions(&self, instrument: InstrumentId) -> Vec<&Division> {
        self.divisions
            .iter()
            .filter(|d| d.instrument == instrument)
            .collect()
    }

    /// All modulators created so far, in creation order.
    pub fn modulators(&self) -> &[Modulator] {
        &self.modulators
    }

    /// Last value written for a global-zone field of an instrument.
    pub fn global_field(
        &self,
        instrument: InstrumentId,
        field: GeneratorField,
    ) -> Option<FieldValue> {
        self.instruments[instrument.0 as usize]
            .global_fields
            .iter()
            .rev()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| *v)
    }

    /// Name a stored sample was materialized under.
    pub fn sample_name(&self, sample: SampleId) -> &str {
        &self.samples[sample.0 as usize].name
    }

    fn push_sample(&mut self, name: String, info: SampleInfo) -> SampleId {
        self.samples.push(StoredSample { name, info });
        SampleId(self.samples.len() as u32 - 1)
    }
}

impl SoundFontStore for MemoryStore {
    fn resolve_samples(
        &mut self,
        sample: &str,
        _instrument: InstrumentId,
        source_path: &Path,
    ) -> Vec<SampleId> {
        if let Some(ids) = self.resolved.get(sample) {
            return ids.clone();
        }
        let Some(meta) = self.registry.get(sample).copied() else {
            log::warn!(
                "sample '{}' not found under {}",
                sample,
                source_path.display()
            );
            return Vec::new();
        };
        let info = SampleInfo {
            loop_start: meta.loop_start,
            loop_end: meta.loop_end,
            length: meta.length,
        };
        let ids = if meta.channels == 2 {
            vec![
                self.push_sample(format!("{sample} L"), info),
                self.push_sample(format!("{sample} R"), info),
            ]
        } else {
            vec![self.push_sample(sample.to_string(), info)]
        };
        log::debug!("materialized {} sample(s) for '{}'", ids.len(), sample);
        self.resolved.insert(sample.to_string(), ids.clone());
        ids
    }

    fn validate_sample(&mut self, sample: &str, _source_path: &Path) -> bool {
        self.registry.contains_key(sample)
    }

    fn sample_file_correction(&mut self, sample: &str, _source_path: &Path) -> i32 {
        self.registry.get(sample).map_or(0, |meta| meta.correction)
    }

    fn sample_info(&self, sample: SampleId) -> SampleInfo {
        self.samples[sample.0 as usize].info
    }

    fn create_division(&mut self, instrument: InstrumentId) -> DivisionId {
        self.divisions.push(Division {
            instrument,
            sample: None,
            fields: Vec::new(),
        });
        DivisionId(self.divisions.len() as u32 - 1)
    }

    fn link_sample(&mut self, division: DivisionId, sample: SampleId) {
        self.divisions[division.0 as usize].sample = Some(sample);
    }

    fn set_global_field(
        &mut self,
        instrument: InstrumentId,
        field: GeneratorField,
        value: FieldValue,
    ) {
        self.instruments[instrument.0 as usize]
            .global_fields
            .push((field, value));
    }

    fn set_division_field(&mut self, division: DivisionId, field: GeneratorField, value: FieldValue) {
        self.divisions[division.0 as usize].fields.push((field, value));
    }

    fn create_modulator(&mut self, instrument: InstrumentId) -> ModulatorId {
        self.modulators.push(Modulator {
            instrument,
            source: None,
            destination: None,
            amount: None,
            amount_source: None,
            transform: None,
        });
        ModulatorId(self.modulators.len() as u32 - 1)
    }

    fn set_modulator_source(&mut self, modulator: ModulatorId, source: ModSource) {
        self.modulators[modulator.0 as usize].source = Some(source);
    }

    fn set_modulator_destination(&mut self, modulator: ModulatorId, destination: GeneratorField) {
        self.modulators[modulator.0 as usize].destination = Some(destination);
    }

    fn set_modulator_amount(&mut self, modulator: ModulatorId, amount: i16) {
        self.modulators[modulator.0 as usize].amount = Some(amount);
    }

    fn set_modulator_amount_source(&mut self, modulator: ModulatorId, source: ModSource) {
        self.modulators[modulator.0 as usize].amount_source = Some(source);
    }

    fn set_modulator_transform(&mut self, modulator: ModulatorId, transform: Transform) {
        self.modulators[modulator.0 as usize].transform = Some(transform);
    }
}
