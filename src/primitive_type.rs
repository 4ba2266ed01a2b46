use serde_json::Value;
use std::{convert::TryFrom, fmt};

/// JSON Schema's notion of "type", distinct from `serde_json::Value`'s variants
/// in one place: `integer` is a number with a zero fractional part, not a
/// separate JSON wire type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl PrimitiveType {
    pub fn of(value: &Value) -> PrimitiveType {
        match value {
            Value::Null => PrimitiveType::Null,
            Value::Bool(_) => PrimitiveType::Boolean,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    PrimitiveType::Integer
                } else if let Some(f) = n.as_f64() {
                    if f.fract() == 0.0 && f.is_finite() {
                        PrimitiveType::Integer
                    } else {
                        PrimitiveType::Number
                    }
                } else {
                    PrimitiveType::Number
                }
            }
            Value::String(_) => PrimitiveType::String,
            Value::Array(_) => PrimitiveType::Array,
            Value::Object(_) => PrimitiveType::Object,
        }
    }

    /// Whether `self` satisfies a `type` keyword that names `expected`.
    /// `integer` also satisfies `number`, matching Draft 4's definition of
    /// "integer" as a subset of "number".
    pub fn matches(self, expected: PrimitiveType) -> bool {
        self == expected || (self == PrimitiveType::Integer && expected == PrimitiveType::Number)
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrimitiveType::Array => write!(f, "array"),
            PrimitiveType::Boolean => write!(f, "boolean"),
            PrimitiveType::Integer => write!(f, "integer"),
            PrimitiveType::Null => write!(f, "null"),
            PrimitiveType::Number => write!(f, "number"),
            PrimitiveType::Object => write!(f, "object"),
            PrimitiveType::String => write!(f, "string"),
        }
    }
}

impl TryFrom<&str> for PrimitiveType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "array" => Ok(PrimitiveType::Array),
            "boolean" => Ok(PrimitiveType::Boolean),
            "integer" => Ok(PrimitiveType::Integer),
            "null" => Ok(PrimitiveType::Null),
            "number" => Ok(PrimitiveType::Number),
            "object" => Ok(PrimitiveType::Object),
            "string" => Ok(PrimitiveType::String),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn integer_valued_float_is_integer() {
        assert_eq!(PrimitiveType::of(&json!(4.0)), PrimitiveType::Integer);
        assert_eq!(PrimitiveType::of(&json!(4.5)), PrimitiveType::Number);
    }

    #[test]
    fn integer_matches_number() {
        assert!(PrimitiveType::Integer.matches(PrimitiveType::Number));
        assert!(!PrimitiveType::Number.matches(PrimitiveType::Integer));
    }
}
