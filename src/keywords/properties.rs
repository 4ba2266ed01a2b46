use std::rc::Rc;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::MessageSet;
use crate::path::Path;
use crate::schema::{self, CompiledSchema};

struct PropertiesValidator {
    properties: Vec<(String, Arc<CompiledSchema>)>,
}

impl Validate for PropertiesValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        let Some(object) = instance.as_object() else {
            return true;
        };
        self.properties.iter().all(|(name, schema)| {
            object.get(name).map_or(true, |value| schema.is_valid(value))
        })
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        let mut set = MessageSet::new();
        let Some(object) = instance.as_object() else {
            return set;
        };
        for (name, schema) in &self.properties {
            if let Some(value) = object.get(name) {
                let child_at = at.child_property(name.clone());
                set.extend(schema.validate(value, &child_at));
            }
        }
        set
    }

    fn name(&self) -> &'static str {
        "properties"
    }

    fn children(&self) -> Vec<Arc<CompiledSchema>> {
        self.properties.iter().map(|(_, schema)| Arc::clone(schema)).collect()
    }
}

pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let object = match value.as_object() {
        Some(object) => object,
        None => {
            return Some(Err(CompilationError::SchemaError(
                "'properties' must be an object".to_string(),
            )))
        }
    };
    let branch_ctx = ctx.push("properties", value);
    let mut properties = Vec::with_capacity(object.len());
    for (name, sub_schema) in object.iter() {
        let prop_ctx = branch_ctx.push(name, sub_schema);
        match schema::compile(sub_schema, &prop_ctx) {
            Ok(compiled) => properties.push((name.clone(), compiled)),
            Err(err) => return Some(Err(err)),
        }
    }
    Some(Ok(Box::new(PropertiesValidator { properties })))
}
