use std::collections::HashSet;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::helpers::equal;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};

// Adapted from the approach described by Sven Marnach:
// https://stackoverflow.com/questions/60882381
struct HashedValue<'a>(&'a Value);

impl PartialEq for HashedValue<'_> {
    fn eq(&self, other: &Self) -> bool {
        equal(self.0, other.0)
    }
}

impl Eq for HashedValue<'_> {}

impl Hash for HashedValue<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.0 {
            Value::Null => state.write_u32(3_221_225_473),
            Value::Bool(item) => item.hash(state),
            // Hashed by mathematical value, not representation, so `1` and
            // `1.0` land in the same bucket — matching `helpers::equal`'s
            // numeric equality, which uniqueItems defers to for comparison.
            Value::Number(item) => {
                if let Some(number) = item.as_f64() {
                    number.to_bits().hash(state);
                }
            }
            Value::String(item) => item.hash(state),
            Value::Array(items) => {
                for item in items {
                    HashedValue(item).hash(state);
                }
            }
            Value::Object(items) => {
                let mut hash = 0u64;
                for (key, value) in items {
                    let mut item_hasher = std::collections::hash_map::DefaultHasher::new();
                    key.hash(&mut item_hasher);
                    HashedValue(value).hash(&mut item_hasher);
                    hash ^= item_hasher.finish();
                }
                state.write_u64(hash);
            }
        }
    }
}

fn is_unique(items: &[Value]) -> bool {
    let mut seen = HashSet::with_capacity(items.len());
    items.iter().map(HashedValue).all(|item| seen.insert(item))
}

struct UniqueItemsValidator {
    schema_path: SchemaPath,
}

impl Validate for UniqueItemsValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        match instance.as_array() {
            Some(array) => is_unique(array),
            None => true,
        }
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::UniqueItems,
            Rc::clone(at),
            self.schema_path.clone(),
            vec![],
            format!("{} has non-unique elements", instance),
        ))
    }

    fn name(&self) -> &'static str {
        "uniqueItems"
    }
}

/// Only `uniqueItems: true` installs a validator; `false` (or absence) means
/// duplicates are allowed, which the default no-validator-present state
/// already expresses.
pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    match value {
        Value::Bool(true) => Some(Ok(Box::new(UniqueItemsValidator {
            schema_path: ctx.schema_path.push("uniqueItems"),
        }))),
        Value::Bool(false) => None,
        _ => None,
    }
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
    fn rejects_duplicate_elements() {
        let ctx = root_ctx();
        let Some(Ok(validator)) = compile(&Map::new(), &json!(true), &ctx) else {
            panic!()
        };
        assert!(validator.is_valid(&json!([1, 2, 3])));
        assert!(!validator.is_valid(&json!([1, 2, 1])));
    }

    #[test]
    fn numbers_equal_by_value_count_as_duplicates() {
        let ctx = root_ctx();
        let Some(Ok(validator)) = compile(&Map::new(), &json!(true), &ctx) else {
            panic!()
        };
        assert!(!validator.is_valid(&json!([1, 1.0])));
    }

    #[test]
    fn false_is_a_no_op() {
        let ctx = root_ctx();
        assert!(compile(&Map::new(), &json!(false), &ctx).is_none());
    }
}
