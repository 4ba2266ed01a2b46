use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::keywords::pattern::translate_ecma_regex;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};
use crate::schema::{self, CompiledSchema};

fn covered_names(object: &Map<String, Value>) -> (HashSet<String>, Vec<Regex>) {
    let named: HashSet<String> = object
        .get("properties")
        .and_then(Value::as_object)
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default();
    let patterns: Vec<Regex> = object
        .get("patternProperties")
        .and_then(Value::as_object)
        .map(|props| {
            props
                .keys()
                .filter_map(|pattern| Regex::new(&translate_ecma_regex(pattern)).ok())
                .collect()
        })
        .unwrap_or_default();
    (named, patterns)
}

fn is_covered(name: &str, named: &HashSet<String>, patterns: &[Regex]) -> bool {
    named.contains(name) || patterns.iter().any(|re| re.is_match(name))
}

struct AdditionalPropertiesFalseValidator {
    named: HashSet<String>,
    patterns: Vec<Regex>,
    schema_path: SchemaPath,
}

impl Validate for AdditionalPropertiesFalseValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        let Some(object) = instance.as_object() else {
            return true;
        };
        object.keys().all(|name| is_covered(name, &self.named, &self.patterns))
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        let mut set = MessageSet::new();
        let Some(object) = instance.as_object() else {
            return set;
        };
        let extra: Vec<&String> = object
            .keys()
            .filter(|name| !is_covered(name, &self.named, &self.patterns))
            .collect();
        if !extra.is_empty() {
            let names: Vec<String> = extra.iter().map(|s| s.to_string()).collect();
            set.push(ValidationMessage::new(
                ValidatorTypeCode::AdditionalProperties,
                Rc::clone(at),
                self.schema_path.clone(),
                names.clone(),
                format!(
                    "Additional properties are not allowed ({} {} unexpected)",
                    names.join(", "),
                    if names.len() == 1 { "was" } else { "were" }
                ),
            ));
        }
        set
    }

    fn name(&self) -> &'static str {
        "additionalProperties"
    }
}

struct AdditionalPropertiesSchemaValidator {
    named: HashSet<String>,
    patterns: Vec<Regex>,
    schema: Arc<CompiledSchema>,
}

impl Validate for AdditionalPropertiesSchemaValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        let Some(object) = instance.as_object() else {
            return true;
        };
        object.iter().all(|(name, value)| {
            is_covered(name, &self.named, &self.patterns) || self.schema.is_valid(value)
        })
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        let mut set = MessageSet::new();
        let Some(object) = instance.as_object() else {
            return set;
        };
        for (name, value) in object.iter() {
            if !is_covered(name, &self.named, &self.patterns) {
                let child_at = at.child_property(name.clone());
                set.extend(self.schema.validate(value, &child_at));
            }
        }
        set
    }

    fn name(&self) -> &'static str {
        "additionalProperties"
    }

    fn children(&self) -> Vec<Arc<CompiledSchema>> {
        vec![Arc::clone(&self.schema)]
    }
}

pub fn compile(
    object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let (named, patterns) = covered_names(object);
    match value {
        Value::Bool(true) => None,
        Value::Bool(false) => Some(Ok(Box::new(AdditionalPropertiesFalseValidator {
            named,
            patterns,
            schema_path: ctx.schema_path.push("additionalProperties"),
        }))),
        _ => {
            let branch_ctx = ctx.push("additionalProperties", value);
            let schema = match schema::compile(value, &branch_ctx) {
                Ok(compiled) => compiled,
                Err(err) => return Some(Err(err)),
            };
            Some(Ok(Box::new(AdditionalPropertiesSchemaValidator {
                named,
                patterns,
                schema,
            })))
        }
    }
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
    fn false_rejects_unlisted_properties() {
        let c = ctx();
        let mut object = Map::new();
        object.insert("properties".to_string(), json!({"name": {"type": "string"}}));
        object.insert("additionalProperties".to_string(), json!(false));
        let Some(Ok(validator)) = compile(&object, &json!(false), &c) else {
            panic!()
        };
        assert!(validator.is_valid(&json!({"name": "a"})));
        assert!(!validator.is_valid(&json!({"name": "a", "extra": 1})));
    }
}
