use std::rc::Rc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};

struct MaxPropertiesValidator {
    limit: u64,
    schema_path: SchemaPath,
}

impl Validate for MaxPropertiesValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        match instance.as_object() {
            Some(object) => object.len() as u64 <= self.limit,
            None => true,
        }
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::MaxProperties,
            Rc::clone(at),
            self.schema_path.clone(),
            vec![self.limit.to_string()],
            format!(
                "{} has more than {} properties",
                instance, self.limit
            ),
        ))
    }

    fn name(&self) -> &'static str {
        "maxProperties"
    }
}

pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let limit = match value.as_u64() {
        Some(limit) => limit,
        None => {
            return Some(Err(CompilationError::SchemaError(
                "'maxProperties' must be a non-negative integer".to_string(),
            )))
        }
    };
    Some(Ok(Box::new(MaxPropertiesValidator {
        limit,
        schema_path: ctx.schema_path.push("maxProperties"),
    })))
}
