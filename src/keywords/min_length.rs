use std::rc::Rc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};

struct MinLengthValidator {
    limit: u64,
    schema_path: SchemaPath,
}

impl Validate for MinLengthValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        match instance.as_str() {
            Some(string) => bytecount::num_chars(string.as_bytes()) as u64 >= self.limit,
            None => true,
        }
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::MinLength,
            Rc::clone(at),
            self.schema_path.clone(),
            vec![self.limit.to_string()],
            format!("{} is shorter than {} characters", instance, self.limit),
        ))
    }

    fn name(&self) -> &'static str {
        "minLength"
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
                "'minLength' must be a non-negative integer".to_string(),
            )))
        }
    };
    Some(Ok(Box::new(MinLengthValidator {
        limit,
        schema_path: ctx.schema_path.push("minLength"),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn root_ctx() -> CompilationContext {
        CompilationContext::root(
            url::Url::parse("http://example.com/").unwrap(),
            crate::context::ValidationContext::new(
                std::sync::Arc::new(crate::metaschema::JsonMetaSchema::draft4()),
                json!({}),
                crate::factory::FactoryHandle::standalone(),
            ),
        )
    }

    #[test]
    fn counts_unicode_characters_not_bytes() {
        let ctx = root_ctx();
        let Some(Ok(validator)) = compile(&Map::new(), &json!(3), &ctx) else {
            panic!()
        };
        assert!(validator.is_valid(&json!("日本語")));
        assert!(!validator.is_valid(&json!("日本")));
    }
}
