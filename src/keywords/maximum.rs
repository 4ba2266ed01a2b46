use std::rc::Rc;

use num_cmp::NumCmp;
use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};

struct MaximumValidator {
    limit: f64,
    exclusive: bool,
    schema_path: SchemaPath,
}

impl MaximumValidator {
    fn passes(&self, instance_number: &serde_json::Number) -> bool {
        if let Some(value) = instance_number.as_u64() {
            if self.exclusive {
                NumCmp::num_lt(value, self.limit)
            } else {
                NumCmp::num_le(value, self.limit)
            }
        } else if let Some(value) = instance_number.as_i64() {
            if self.exclusive {
                NumCmp::num_lt(value, self.limit)
            } else {
                NumCmp::num_le(value, self.limit)
            }
        } else {
            let value = instance_number.as_f64().expect("always representable");
            if self.exclusive {
                value < self.limit
            } else {
                value <= self.limit
            }
        }
    }
}

impl Validate for MaximumValidator {
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
        let comparator = if self.exclusive { "less than" } else { "at most" };
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::Maximum,
            Rc::clone(at),
            self.schema_path.clone(),
            vec![self.limit.to_string()],
            format!("{} must be {} {}", instance, comparator, self.limit),
        ))
    }

    fn name(&self) -> &'static str {
        "maximum"
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
                "'maximum' must be a number".to_string(),
            )))
        }
    };
    let exclusive = matches!(object.get("exclusiveMaximum"), Some(Value::Bool(true)));
    Some(Ok(Box::new(MaximumValidator {
        limit,
        exclusive,
        schema_path: ctx.schema_path.push("maximum"),
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
        let object: Map<String, Value> = serde_json::from_value(json!({"maximum": 1})).unwrap();
        let Some(Ok(validator)) = compile(&object, &json!(1), &ctx) else {
            panic!()
        };
        assert!(validator.is_valid(&json!(1)));
        assert!(!validator.is_valid(&json!(2)));
    }

    #[test]
    fn exclusive_maximum_rejects_the_boundary() {
        let ctx = root_ctx();
        let object: Map<String, Value> =
            serde_json::from_value(json!({"maximum": 1, "exclusiveMaximum": true})).unwrap();
        let Some(Ok(validator)) = compile(&object, &json!(1), &ctx) else {
            panic!()
        };
        assert!(!validator.is_valid(&json!(1)));
        assert!(validator.is_valid(&json!(0)));
    }
}
