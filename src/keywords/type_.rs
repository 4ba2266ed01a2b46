use std::convert::TryFrom;
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};
use crate::primitive_type::PrimitiveType;

struct TypeValidator {
    types: Vec<PrimitiveType>,
    schema_path: SchemaPath,
}

impl Validate for TypeValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        let actual = PrimitiveType::of(instance);
        self.types.iter().any(|expected| actual.matches(*expected))
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        let names: Vec<String> = self.types.iter().map(ToString::to_string).collect();
        let message = if names.len() == 1 {
            format!("'{}' is not of type '{}'", instance, names[0])
        } else {
            format!("'{}' is not of types '{}'", instance, names.join("', '"))
        };
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::Type,
            Rc::clone(at),
            self.schema_path.clone(),
            names,
            message,
        ))
    }

    fn name(&self) -> &'static str {
        "type"
    }
}

pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let types = match value {
        Value::String(single) => match PrimitiveType::try_from(single.as_str()) {
            Ok(t) => vec![t],
            Err(()) => {
                return Some(Err(CompilationError::SchemaError(format!(
                    "unknown type name '{}'",
                    single
                ))))
            }
        },
        Value::Array(items) => {
            let mut types = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str().map(PrimitiveType::try_from) {
                    Some(Ok(t)) => types.push(t),
                    _ => {
                        return Some(Err(CompilationError::SchemaError(
                            "'type' array must contain only type name strings".to_string(),
                        )))
                    }
                }
            }
            types
        }
        _ => {
            return Some(Err(CompilationError::SchemaError(
                "'type' must be a string or an array of strings".to_string(),
            )))
        }
    };
    Some(Ok(Box::new(TypeValidator {
        types,
        schema_path: ctx.schema_path.push("type"),
    })))
}
