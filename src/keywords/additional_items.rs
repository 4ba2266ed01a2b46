use std::rc::Rc;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};
use crate::schema::{self, CompiledSchema};

struct AdditionalItemsSchemaValidator {
    schema: Arc<CompiledSchema>,
    items_count: usize,
}

impl Validate for AdditionalItemsSchemaValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        let Some(array) = instance.as_array() else {
            return true;
        };
        array.iter().skip(self.items_count).all(|item| self.schema.is_valid(item))
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        let Some(array) = instance.as_array() else {
            return MessageSet::new();
        };
        let mut set = MessageSet::new();
        for (index, item) in array.iter().enumerate().skip(self.items_count) {
            let child_at = at.child_index(index);
            set.extend(self.schema.validate(item, &child_at));
        }
        set
    }

    fn name(&self) -> &'static str {
        "additionalItems"
    }

    fn children(&self) -> Vec<Arc<CompiledSchema>> {
        vec![Arc::clone(&self.schema)]
    }
}

struct AdditionalItemsFalseValidator {
    items_count: usize,
    schema_path: SchemaPath,
}

impl Validate for AdditionalItemsFalseValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        match instance.as_array() {
            Some(array) => array.len() <= self.items_count,
            None => true,
        }
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::AdditionalItems,
            Rc::clone(at),
            self.schema_path.clone(),
            vec![self.items_count.to_string()],
            format!(
                "{} has more than {} items and additional items are not allowed",
                instance, self.items_count
            ),
        ))
    }

    fn name(&self) -> &'static str {
        "additionalItems"
    }
}

/// Only meaningful alongside an array-form `items` — a single-schema `items`
/// already covers every element, and an absent `items` means every element
/// is "additional" but unconstrained, so both cases are a no-op here.
pub fn compile(
    object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let items_count = match object.get("items") {
        Some(Value::Array(items)) => items.len(),
        _ => return None,
    };
    let branch_ctx = ctx.push("additionalItems", value);
    match value {
        Value::Bool(true) => None,
        Value::Bool(false) => Some(Ok(Box::new(AdditionalItemsFalseValidator {
            items_count,
            schema_path: branch_ctx.schema_path,
        }))),
        Value::Object(_) => match schema::compile(value, &branch_ctx) {
            Ok(schema) => Some(Ok(Box::new(AdditionalItemsSchemaValidator { schema, items_count }))),
            Err(err) => Some(Err(err)),
        },
        _ => None,
    }
}
