use thiserror::Error;

use crate::opcode::{Opcode, ValueKind};

/// Errors that can occur when building typed parameters.
///
/// The translation engine itself has no recoverable-error taxonomy:
/// malformed input degrades by omission and unusable regions are pruned
/// or skipped. What remains is the seam where raw opcode text from the
/// tokenizer becomes a typed value, and the uniqueness/kind contract of a
/// scope.
#[derive(Error, Debug)]
pub enum Error {
    /// A raw value could not be parsed as the opcode's declared kind.
    ///
    /// Example: `volume=loud` — the volume opcode expects a real number.
    #[error("invalid value '{value}' for opcode {opcode} (expected {expected})")]
    InvalidValue {
        /// The opcode the value was given for.
        opcode: Opcode,
        /// The raw text that failed to parse.
        value: String,
        /// The kind the opcode requires.
        expected: ValueKind,
    },

    /// A value of the wrong kind was inserted for an opcode.
    ///
    /// Example: storing a text value under an integer opcode.
    #[error("cannot store a {found} value under opcode {opcode} (expected {expected})")]
    KindMismatch {
        /// The opcode the value was inserted under.
        opcode: Opcode,
        /// The kind of the offered value.
        found: ValueKind,
        /// The kind the opcode requires.
        expected: ValueKind,
    },
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
