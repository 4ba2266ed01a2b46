use std::rc::Rc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::helpers::equal;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};

struct ConstValidator {
    value: Value,
    schema_path: SchemaPath,
}

impl Validate for ConstValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        equal(&self.value, instance)
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::Const,
            Rc::clone(at),
            self.schema_path.clone(),
            vec![self.value.to_string()],
            format!("'{}' does not match the constant value '{}'", instance, self.value),
        ))
    }

    fn name(&self) -> &'static str {
        "const"
    }
}

pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    Some(Ok(Box::new(ConstValidator {
        value: value.clone(),
        schema_path: ctx.schema_path.push("const"),
    })))
}
