use std::rc::Rc;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::keywords::{CompilationResult, Validate};
use crate::message::MessageSet;
use crate::path::Path;
use crate::schema::{self, CompiledSchema};

/// `items` is an array of schemas: each instance element is checked against
/// the schema at the same index, and any element past the end of the array
/// is left alone (that's `additionalItems`'s job).
struct ItemsArrayValidator {
    items: Vec<Arc<CompiledSchema>>,
}

impl Validate for ItemsArrayValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        let Some(array) = instance.as_array() else {
            return true;
        };
        array
            .iter()
            .zip(self.items.iter())
            .all(|(item, schema)| schema.is_valid(item))
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        let Some(array) = instance.as_array() else {
            return MessageSet::new();
        };
        let mut set = MessageSet::new();
        for (index, (item, schema)) in array.iter().zip(self.items.iter()).enumerate() {
            let child_at = at.child_index(index);
            set.extend(schema.validate(item, &child_at));
        }
        set
    }

    fn name(&self) -> &'static str {
        "items"
    }

    fn children(&self) -> Vec<Arc<CompiledSchema>> {
        self.items.clone()
    }
}

/// `items` is a single schema: every instance element is checked against it.
struct ItemsObjectValidator {
    schema: Arc<CompiledSchema>,
}

impl Validate for ItemsObjectValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        let Some(array) = instance.as_array() else {
            return true;
        };
        array.iter().all(|item| self.schema.is_valid(item))
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        let Some(array) = instance.as_array() else {
            return MessageSet::new();
        };
        let mut set = MessageSet::new();
        for (index, item) in array.iter().enumerate() {
            let child_at = at.child_index(index);
            set.extend(self.schema.validate(item, &child_at));
        }
        set
    }

    fn name(&self) -> &'static str {
        "items"
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
    let branch_ctx = ctx.push("items", value);
    match value {
        Value::Array(schemas) => {
            let mut items = Vec::with_capacity(schemas.len());
            for (index, sub_schema) in schemas.iter().enumerate() {
                let item_ctx = branch_ctx.push_index(index);
                match schema::compile(sub_schema, &item_ctx) {
                    Ok(compiled) => items.push(compiled),
                    Err(err) => return Some(Err(err)),
                }
            }
            Some(Ok(Box::new(ItemsArrayValidator { items })))
        }
        Value::Object(_) | Value::Bool(_) => match schema::compile(value, &branch_ctx) {
            Ok(schema) => Some(Ok(Box::new(ItemsObjectValidator { schema }))),
            Err(err) => Some(Err(err)),
        },
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ValidationContext;
    use crate::factory::FactoryHandle;
    use serde_json::json;

    fn root_ctx() -> CompilationContext {
        let vctx = ValidationContext::new(
            Arc::new(crate::metaschema::JsonMetaSchema::draft4()),
            json!({}),
            FactoryHandle::standalone(),
        );
        CompilationContext::root(url::Url::parse("http://example.com/").unwrap(), vctx)
    }

    #[test]
    fn object_form_applies_to_every_element() {
        let ctx = root_ctx();
        let Some(Ok(validator)) = compile(&Map::new(), &json!({"type": "integer"}), &ctx) else {
            panic!()
        };
        assert!(validator.is_valid(&json!([1, 2, 3])));
        assert!(!validator.is_valid(&json!([1, "x", 3])));
    }

    #[test]
    fn array_form_applies_positionally_and_stops_checking_past_the_end() {
        let ctx = root_ctx();
        let Some(Ok(validator)) =
            compile(&Map::new(), &json!([{"type": "integer"}, {"type": "string"}]), &ctx)
        else {
            panic!()
        };
        assert!(validator.is_valid(&json!([1, "a", true, {}])));
        assert!(!validator.is_valid(&json!(["a", "b"])));
    }
}
