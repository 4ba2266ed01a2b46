use std::rc::Rc;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};
use crate::schema::{self, CompiledSchema};

struct NotValidator {
    schema: Arc<CompiledSchema>,
    schema_path: SchemaPath,
}

impl Validate for NotValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        !self.schema.is_valid(instance)
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::Not,
            Rc::clone(at),
            self.schema_path.clone(),
            vec![instance.to_string()],
            format!("'{}' should not be valid under the given schema", instance),
        ))
    }

    fn name(&self) -> &'static str {
        "not"
    }

    fn children(&self) -> Vec<Arc<CompiledSchema>> {
        vec![Arc::clone(&self.schema)]
    }
}

pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let branch_ctx = ctx.push("not", value);
    let schema = match schema::compile(value, &branch_ctx) {
        Ok(compiled) => compiled,
        Err(err) => return Some(Err(err)),
    };
    Some(Ok(Box::new(NotValidator {
        schema,
        schema_path: ctx.schema_path.push("not"),
    })))
}
