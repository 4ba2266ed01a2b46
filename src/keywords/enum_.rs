use std::rc::Rc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::helpers::equal;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};

struct EnumValidator {
    options: Vec<Value>,
    schema_path: SchemaPath,
}

impl Validate for EnumValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        self.options.iter().any(|option| equal(option, instance))
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        let options: Vec<String> = self.options.iter().map(ToString::to_string).collect();
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::Enum,
            Rc::clone(at),
            self.schema_path.clone(),
            vec![instance.to_string()],
            format!("'{}' is not one of [{}]", instance, options.join(", ")),
        ))
    }

    fn name(&self) -> &'static str {
        "enum"
    }
}

pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let options = match value.as_array() {
        Some(items) if !items.is_empty() => items.clone(),
        _ => {
            return Some(Err(CompilationError::SchemaError(
                "'enum' must be a non-empty array".to_string(),
            )))
        }
    };
    Some(Ok(Box::new(EnumValidator {
        options,
        schema_path: ctx.schema_path.push("enum"),
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ValidationContext;
    use crate::factory::FactoryHandle;
    use serde_json::json;

    fn ctx() -> CompilationContext {
        let vctx = ValidationContext::new(
            std::sync::Arc::new(crate::metaschema::JsonMetaSchema::draft4()),
            json!({}),
            FactoryHandle::standalone(),
        );
        CompilationContext::root(url::Url::parse("http://example.com/").unwrap(), vctx)
    }

    #[test]
    fn numeric_equality_ignores_textual_form() {
        let c = ctx();
        let Some(Ok(validator)) = compile(&Map::new(), &json!([1, 2.0, "three"]), &c) else {
            panic!()
        };
        assert!(validator.is_valid(&json!(2)));
        assert!(!validator.is_valid(&json!(4)));
    }

    #[test]
    fn rejects_empty_enum() {
        let c = ctx();
        assert!(compile(&Map::new(), &json!([]), &c).unwrap().is_err());
    }
}
