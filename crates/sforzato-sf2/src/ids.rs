//! Typed identifiers for the SoundFont object graph.
//!
//! A store hands these out when elements are created or resolved; the
//! translation engine only ever passes them back. The newtypes keep an
//! instrument index from being confused with a sample index at compile
//! time.

/// Identifier of an instrument container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct InstrumentId(pub u32);

/// Identifier of a sample-link division under an instrument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DivisionId(pub u32);

/// Identifier of a modulator unit under an instrument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ModulatorId(pub u32);

/// Identifier of a sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SampleId(pub u32);
