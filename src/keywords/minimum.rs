use std::rc::Rc;

use num_cmp::NumCmp;
use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};

/// Draft 4 keeps `exclusiveMinimum` as a boolean riding alongside `minimum`
/// (the standalone-numeric-limit form arrived in Draft 6), so this one
/// struct covers both `>= limit` and `> limit` rather than needing a
/// separate `exclusiveMinimum` keyword module.
struct MinimumValidator {
    limit: f64,
    exclusive: bool,
    schema_path: SchemaPath,
}

impl MinimumValidator {
    fn passes(&self, instance_number: &serde_json::Number) -> bool {
        // Compared through `NumCmp` rather than converting the instance to
        // `f64` up front, so a `u64`/`i64` instance near the edge of `f64`'s
        // exact-integer range is still compared precisely against `limit`.
        if let Some(value) = instance_number.as_u64() {
            if self.exclusive {
                NumCmp::num_gt(value, self.limit)
            } else {
                NumCmp::num_ge(value, self.limit)
            }
        } else if let Some(value) = instance_number.as_i64() {
            if self.exclusive {
                NumCmp::num_gt(value, self.limit)
            } else {
                NumCmp::num_ge(value, self.limit)
            }
        } else {
            let value = instance_number.as_f64().expect("always representable");
            if self.exclusive {
                value > self.limit
            } else {
                value >= self.limit
            }
        }
    }
}

impl Validate for MinimumValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        match instance {
            Value::Number(number) => self.passes(number),
            _ => true,
        }
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        let comparator = if self.exclusive { "greater than" } else { "at least" };
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::Minimum,
            Rc::clone(at),
            self.schema_path.clone(),
            vec![self.limit.to_string()],
            format!("{} must be {} {}", instance, comparator, self.limit),
        ))
    }

    fn name(&self) -> &'static str {
        "minimum"
    }
}

pub fn compile(
    object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let limit = match value.as_f64() {
        Some(limit) => limit,
        None => {
            return Some(Err(CompilationError::SchemaError(
                "'minimum' must be a number".to_string(),
            )))
        }
    };
    let exclusive = matches!(object.get("exclusiveMinimum"), Some(Value::Bool(true)));
    Some(Ok(Box::new(MinimumValidator {
        limit,
        exclusive,
        schema_path: ctx.schema_path.push("minimum"),
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
    fn inclusive_by_default() {
        let ctx = root_ctx();
        let object: Map<String, Value> = serde_json::from_value(json!({"minimum": 1})).unwrap();
        let Some(Ok(validator)) = compile(&object, &json!(1), &ctx) else {
            panic!()
        };
        assert!(validator.is_valid(&json!(1)));
        assert!(!validator.is_valid(&json!(0)));
    }

    #[test]
    fn exclusive_minimum_rejects_the_boundary() {
        let ctx = root_ctx();
        let object: Map<String, Value> =
            serde_json::from_value(json!({"minimum": 1, "exclusiveMinimum": true})).unwrap();
        let Some(Ok(validator)) = compile(&object, &json!(1), &ctx) else {
            panic!()
        };
        assert!(!validator.is_valid(&json!(1)));
        assert!(validator.is_valid(&json!(2)));
    }

    #[test]
    fn large_integers_compare_precisely() {
        let ctx = root_ctx();
        let limit = 1u64 << 54;
        let object: Map<String, Value> =
            serde_json::from_value(json!({"minimum": limit})).unwrap();
        let Some(Ok(validator)) = compile(&object, &json!(limit), &ctx) else {
            panic!()
        };
        assert!(!validator.is_valid(&json!(limit - 1)));
    }
}
