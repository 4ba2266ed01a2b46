use std::rc::Rc;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};
use crate::schema::{self, CompiledSchema};

struct OneOfValidator {
    schemas: Vec<Arc<CompiledSchema>>,
    schema_path: SchemaPath,
}

impl OneOfValidator {
    fn count_valid(&self, instance: &Value) -> usize {
        self.schemas.iter().filter(|schema| schema.is_valid(instance)).count()
    }

    fn passing_indices(&self, instance: &Value) -> Vec<usize> {
        self.schemas
            .iter()
            .enumerate()
            .filter(|(_, schema)| schema.is_valid(instance))
            .map(|(index, _)| index)
            .collect()
    }
}

impl Validate for OneOfValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        self.count_valid(instance) == 1
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        let passing = self.passing_indices(instance);
        if passing.len() == 1 {
            return MessageSet::new();
        }
        if passing.is_empty() {
            // No branch passed — union every branch's own errors rather than
            // a synthesized summary, so a caller sees exactly why each
            // alternative was rejected.
            let mut set = MessageSet::new();
            for schema in &self.schemas {
                set.extend(schema.validate(instance, at));
            }
            return set;
        }
        let indices: Vec<String> = passing.iter().map(ToString::to_string).collect();
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::OneOf,
            Rc::clone(at),
            self.schema_path.clone(),
            indices.clone(),
            format!(
                "'{}' is valid under more than one of the given schemas (indices {})",
                instance,
                indices.join(", ")
            ),
        ))
    }

    fn name(&self) -> &'static str {
        "oneOf"
    }

    fn children(&self) -> Vec<Arc<CompiledSchema>> {
        self.schemas.clone()
    }
}

pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let items = match value.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => {
            return Some(Err(CompilationError::SchemaError(
                "'oneOf' must be a non-empty array of schemas".to_string(),
            )))
        }
    };
    let branch_ctx = ctx.push("oneOf", value);
    let mut schemas = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item_ctx = branch_ctx.push_index(index);
        match schema::compile(item, &item_ctx) {
            Ok(compiled) => schemas.push(compiled),
            Err(err) => return Some(Err(err)),
        }
    }
    Some(Ok(Box::new(OneOfValidator {
        schemas,
        schema_path: ctx.schema_path.push("oneOf"),
    })))
}
