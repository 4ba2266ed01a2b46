use std::rc::Rc;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::pattern::translate_ecma_regex;
use crate::keywords::{CompilationResult, Validate};
use crate::message::MessageSet;
use crate::path::Path;
use crate::schema::{self, CompiledSchema};

struct PatternPropertiesValidator {
    patterns: Vec<(Regex, Arc<CompiledSchema>)>,
}

impl Validate for PatternPropertiesValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        let Some(object) = instance.as_object() else {
            return true;
        };
        object.iter().all(|(key, value)| {
            self.patterns
                .iter()
                .filter(|(re, _)| re.is_match(key))
                .all(|(_, schema)| schema.is_valid(value))
        })
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        let mut set = MessageSet::new();
        let Some(object) = instance.as_object() else {
            return set;
        };
        for (key, value) in object.iter() {
            for (re, schema) in &self.patterns {
                if re.is_match(key) {
                    let child_at = at.child_property(key.clone());
                    set.extend(schema.validate(value, &child_at));
                }
            }
        }
        set
    }

    fn name(&self) -> &'static str {
        "patternProperties"
    }

    fn children(&self) -> Vec<Arc<CompiledSchema>> {
        self.patterns.iter().map(|(_, schema)| Arc::clone(schema)).collect()
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
                "'patternProperties' must be an object".to_string(),
            )))
        }
    };
    let branch_ctx = ctx.push("patternProperties", value);
    let mut patterns = Vec::with_capacity(object.len());
    for (pattern, sub_schema) in object.iter() {
        let regex = match Regex::new(&translate_ecma_regex(pattern)) {
            Ok(regex) => regex,
            Err(err) => return Some(Err(err.into())),
        };
        let prop_ctx = branch_ctx.push(pattern, sub_schema);
        match schema::compile(sub_schema, &prop_ctx) {
            Ok(compiled) => patterns.push((regex, compiled)),
            Err(err) => return Some(Err(err)),
        }
    }
    Some(Ok(Box::new(PatternPropertiesValidator { patterns })))
}
