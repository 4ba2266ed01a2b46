use std::rc::Rc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};

struct MaxItemsValidator {
    limit: u64,
    schema_path: SchemaPath,
}

impl Validate for MaxItemsValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        match instance.as_array() {
            Some(array) => array.len() as u64 <= self.limit,
            None => true,
        }
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::MaxItems,
            Rc::clone(at),
            self.schema_path.clone(),
            vec![self.limit.to_string()],
            format!("{} has more than {} items", instance, self.limit),
        ))
    }

    fn name(&self) -> &'static str {
        "maxItems"
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
                "'maxItems' must be a non-negative integer".to_string(),
            )))
        }
    };
    Some(Ok(Box::new(MaxItemsValidator {
        limit,
        schema_path: ctx.schema_path.push("maxItems"),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_long_arrays() {
        let ctx = CompilationContext::root(
            url::Url::parse("http://example.com/").unwrap(),
            crate::context::ValidationContext::new(
                std::sync::Arc::new(crate::metaschema::JsonMetaSchema::draft4()),
                json!({}),
                crate::factory::FactoryHandle::standalone(),
            ),
        );
        let Some(Ok(validator)) = compile(&Map::new(), &json!(1), &ctx) else {
            panic!()
        };
        assert!(validator.is_valid(&json!([1])));
        assert!(!validator.is_valid(&json!([1, 2])));
    }
}
