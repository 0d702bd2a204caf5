//! Typed parameter values.

use crate::error::{Error, Result};
use crate::opcode::{Opcode, ValueKind};

/// The value of a parameter: a real number, an integer, or text.
///
/// Absence of a parameter in a scope means "undefined here", never zero;
/// there is no null variant.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Real(f64),
    Integer(i32),
    Text(String),
}

impl Value {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Real(_) => ValueKind::Real,
            Value::Integer(_) => ValueKind::Integer,
            Value::Text(_) => ValueKind::Text,
        }
    }

    /// The real payload, if this is a [`Value::Real`].
    pub fn as_real(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            _ => None,
        }
    }

    /// The integer payload, if this is a [`Value::Integer`].
    pub fn as_integer(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// The text payload, if this is a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// One opcode/value pair.
///
/// The constructor enforces that the value kind matches the opcode's
/// declared kind, so a scope can never hold a text volume or a real loop
/// point.
#[derive(Clone, Debug, PartialEq)]
pub struct Parameter {
    opcode: Opcode,
    value: Value,
}

impl Parameter {
    /// Build a parameter, checking the value kind against the opcode.
    pub fn new(opcode: Opcode, value: Value) -> Result<Self> {
        if value.kind() != opcode.value_kind() {
            return Err(Error::KindMismatch {
                opcode,
                found: value.kind(),
                expected: opcode.value_kind(),
            });
        }
        Ok(Self { opcode, value })
    }

    /// Build a parameter from raw opcode text, parsing per the opcode's
    /// kind. This is the seam the external tokenizer feeds.
    pub fn parse(opcode: Opcode, raw: &str) -> Result<Self> {
        Ok(Self {
            opcode,
            value: opcode.parse_value(raw)?,
        })
    }

    /// Build a parameter whose kind has already been checked by the
    /// caller.
    pub(crate) fn raw(opcode: Opcode, value: Value) -> Self {
        debug_assert_eq!(value.kind(), opcode.value_kind());
        Self { opcode, value }
    }

    pub fn opcode(&self) -> Opcode {
        self.opcode
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_mismatch_is_rejected() {
        let err = Parameter::new(Opcode::Volume, Value::Text("loud".into())).unwrap_err();
        assert!(matches!(err, Error::KindMismatch { opcode: Opcode::Volume, .. }));

        assert!(Parameter::new(Opcode::Volume, Value::Real(-3.0)).is_ok());
        assert!(Parameter::new(Opcode::Sample, Value::Text("a.wav".into())).is_ok());
    }

    #[test]
    fn parse_uses_the_opcode_kind() {
        let param = Parameter::parse(Opcode::TuningFine, "-20").unwrap();
        assert_eq!(param.value(), &Value::Integer(-20));
        assert!(Parameter::parse(Opcode::TuningFine, "sharp").is_err());
    }
}
