//! SFZ instrument-definition translation engine for sforzato.
//!
//! This crate converts the source format's hierarchical parameter model
//! — regions inheriting by omission from a global scope — into the
//! target's flat, per-division field model:
//!
//! - Type definitions for opcodes, typed values and parameter scopes
//! - The parameter group with its normalization passes
//! - A fixed-order normalization pipeline
//! - The decode engine that emits divisions, generator fields and
//!   default-modulator overrides through a
//!   [`SoundFontStore`](sforzato_sf2::SoundFontStore)
//!
//! # Architecture
//!
//! The crate is independent of tokenizing and of object-graph
//! persistence: raw `opcode=value` pairs come in through
//! [`Parameter::parse`], and everything the engine produces goes out
//! through the store trait of the `sforzato-sf2` crate.
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use sforzato_sf2::{MemoryStore, RegisteredSample};
//! use sforzato_sfz::{
//!     decode, normalize, NormalizeOptions, Opcode, ParameterGroup, ParameterScope,
//! };
//!
//! let mut store = MemoryStore::new();
//! store
//!     .register_sample(
//!         "kick.wav",
//!         RegisteredSample {
//!             channels: 1,
//!             loop_start: 0,
//!             loop_end: 4000,
//!             length: 4410,
//!             correction: 0,
//!         },
//!     )
//!     .unwrap();
//!
//! let mut global = ParameterScope::new();
//! global.set_real(Opcode::Volume, -3.0);
//!
//! let mut region = ParameterScope::new();
//! region.set_text(Opcode::Sample, "kick.wav");
//! region.set_integer(Opcode::KeyMin, 36);
//! region.set_integer(Opcode::KeyMax, 36);
//!
//! let mut group = ParameterGroup::new(global);
//! group.push_region(region);
//!
//! let instrument = store.create_instrument();
//! let group = normalize(group, &mut store, NormalizeOptions::new(Path::new("/sfz")));
//! let summary = decode(group, &mut store, instrument, Path::new("/sfz"));
//! assert_eq!(summary.divisions, 1);
//! ```

pub mod decode;
pub mod error;
pub mod group;
pub mod opcode;
pub mod pipeline;
pub mod scope;
pub mod value;

pub use decode::{decode, DecodeSummary};
pub use error::{Error, Result};
pub use group::ParameterGroup;
pub use opcode::{Opcode, ValueKind, KEYNUM_BASE_DEFAULT, KEYNUM_PAIRS, MOD_GROUPS, REGION_ONLY_OPCODES};
pub use pipeline::{normalize, NormalizeOptions};
pub use scope::ParameterScope;
pub use value::{Parameter, Value};
