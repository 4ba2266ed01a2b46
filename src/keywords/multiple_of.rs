use std::rc::Rc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};

struct MultipleOfValidator {
    multiple_of: f64,
    schema_path: SchemaPath,
}

impl Validate for MultipleOfValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        let Some(value) = instance.as_f64() else {
            return true;
        };
        // An integer `multipleOf` can use exact modulo; a fractional one
        // (e.g. `0.01`) needs an epsilon-tolerant check since `value /
        // multiple_of` is rarely an exact binary fraction even when the
        // division is mathematically exact.
        if self.multiple_of.fract() == 0.0 && value.fract() == 0.0 {
            value % self.multiple_of == 0.0
        } else {
            let remainder = (value / self.multiple_of) % 1.0;
            remainder < f64::EPSILON && remainder < (1.0 - f64::EPSILON)
        }
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::MultipleOf,
            Rc::clone(at),
            self.schema_path.clone(),
            vec![self.multiple_of.to_string()],
            format!("{} is not a multiple of {}", instance, self.multiple_of),
        ))
    }

    fn name(&self) -> &'static str {
        "multipleOf"
    }
}

pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let multiple_of = match value.as_f64() {
        Some(multiple_of) if multiple_of > 0.0 => multiple_of,
        Some(_) => {
            return Some(Err(CompilationError::SchemaError(
                "'multipleOf' must be a positive number".to_string(),
            )))
        }
        None => {
            return Some(Err(CompilationError::SchemaError(
                "'multipleOf' must be a number".to_string(),
            )))
        }
    };
    Some(Ok(Box::new(MultipleOfValidator {
        multiple_of,
        schema_path: ctx.schema_path.push("multipleOf"),
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
    fn integer_multiples() {
        let ctx = root_ctx();
        let Some(Ok(validator)) = compile(&Map::new(), &json!(2), &ctx) else {
            panic!()
        };
        assert!(validator.is_valid(&json!(10)));
        assert!(!validator.is_valid(&json!(7)));
    }

    #[test]
    fn fractional_multiples_tolerate_float_imprecision() {
        let ctx = root_ctx();
        let Some(Ok(validator)) = compile(&Map::new(), &json!(0.01), &ctx) else {
            panic!()
        };
        assert!(validator.is_valid(&json!(1.09)));
        assert!(!validator.is_valid(&json!(1.091)));
    }
}
