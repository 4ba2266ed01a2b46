use std::rc::Rc;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::MessageSet;
use crate::path::Path;
use crate::schema::{self, CompiledSchema};

struct AllOfValidator {
    schemas: Vec<Arc<CompiledSchema>>,
}

impl Validate for AllOfValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        self.schemas.iter().all(|schema| schema.is_valid(instance))
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        let mut set = MessageSet::new();
        for schema in &self.schemas {
            set.extend(schema.validate(instance, at));
        }
        set
    }

    fn name(&self) -> &'static str {
        "allOf"
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
                "'allOf' must be a non-empty array of schemas".to_string(),
            )))
        }
    };
    let branch_ctx = ctx.push("allOf", value);
    let mut schemas = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item_ctx = branch_ctx.push_index(index);
        match schema::compile(item, &item_ctx) {
            Ok(compiled) => schemas.push(compiled),
            Err(err) => return Some(Err(err)),
        }
    }
    Some(Ok(Box::new(AllOfValidator { schemas })))
}
