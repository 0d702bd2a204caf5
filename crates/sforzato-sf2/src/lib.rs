//! SoundFont-side object model for sforzato.
//!
//! This crate models the target side of the SFZ → SoundFont translation:
//!
//! - [`ids`] - Typed identifiers for the object graph (instruments,
//!   divisions, modulators, samples)
//! - [`generator`] - The generator field enumeration and field values
//! - [`modulator`] - Modulator sources, curves, transforms, and the
//!   enumerated set of format default modulators
//! - [`units`] - Fixed-point unit conversions (dB, timecents, pan units)
//! - [`store`] - The [`SoundFontStore`] trait the translation engine
//!   writes through
//! - [`memory`] - An in-memory reference store for tests and embedders
//!   that do not need file persistence
//!
//! The crate is independent of any on-disk SoundFont serialization; a
//! store implementation decides how divisions, fields and modulators are
//! persisted.

pub mod generator;
pub mod ids;
pub mod memory;
pub mod modulator;
pub mod store;
pub mod units;

pub use generator::{FieldValue, GeneratorField};
pub use ids::{DivisionId, InstrumentId, ModulatorId, SampleId};
pub use memory::{MemoryStore, MemoryStoreError, RegisteredSample};
pub use modulator::{CurveType, DefaultModulator, ModSource, SourceController, Transform};
pub use store::{FieldTarget, SampleInfo, SoundFontStore};
