use std::rc::Rc;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::required::RequiredValidator;
use crate::keywords::{CompilationResult, Validate};
use crate::message::MessageSet;
use crate::path::Path;
use crate::schema::{self, CompiledSchema};

/// `dependencies` has two independent forms per property, chosen by the
/// shape of its value: an array names other properties that must also be
/// present, a schema must additionally validate the whole instance.
enum Dependency {
    Names(RequiredValidator),
    Schema(Arc<CompiledSchema>),
}

pub struct DependenciesValidator {
    dependencies: Vec<(String, Dependency)>,
}

impl Validate for DependenciesValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        let Some(object) = instance.as_object() else {
            return true;
        };
        self.dependencies
            .iter()
            .filter(|(property, _)| object.contains_key(property))
            .all(|(_, dependency)| match dependency {
                Dependency::Names(validator) => validator.is_valid(instance),
                Dependency::Schema(schema) => schema.is_valid(instance),
            })
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        let Some(object) = instance.as_object() else {
            return MessageSet::new();
        };
        let mut set = MessageSet::new();
        for (property, dependency) in &self.dependencies {
            if !object.contains_key(property) {
                continue;
            }
            match dependency {
                Dependency::Names(validator) => set.extend(validator.validate(instance, at)),
                Dependency::Schema(schema) => set.extend(schema.validate(instance, at)),
            }
        }
        set
    }

    fn name(&self) -> &'static str {
        "dependencies"
    }

    fn children(&self) -> Vec<Arc<CompiledSchema>> {
        self.dependencies
            .iter()
            .filter_map(|(_, dependency)| match dependency {
                Dependency::Schema(schema) => Some(Arc::clone(schema)),
                Dependency::Names(_) => None,
            })
            .collect()
    }
}

pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let map = match value.as_object() {
        Some(map) => map,
        None => {
            return Some(Err(CompilationError::SchemaError(
                "'dependencies' must be an object".to_string(),
            )))
        }
    };
    let branch_ctx = ctx.push("dependencies", value);
    let mut dependencies = Vec::with_capacity(map.len());
    for (property, definition) in map {
        let dependency = match definition {
            Value::Array(names) => {
                let names: Result<Vec<String>, CompilationError> = names
                    .iter()
                    .map(|name| {
                        name.as_str().map(str::to_string).ok_or_else(|| {
                            CompilationError::SchemaError(
                                "'dependencies' array entries must be strings".to_string(),
                            )
                        })
                    })
                    .collect();
                let names = match names {
                    Ok(names) => names,
                    Err(err) => return Some(Err(err)),
                };
                Dependency::Names(RequiredValidator::from_names(
                    names,
                    branch_ctx.schema_path.push(property),
                ))
            }
            _ => {
                let child_ctx = branch_ctx.push(property, definition);
                let schema = match schema::compile(definition, &child_ctx) {
                    Ok(schema) => schema,
                    Err(err) => return Some(Err(err)),
                };
                Dependency::Schema(schema)
            }
        };
        dependencies.push((property.clone(), dependency));
    }
    Some(Ok(Box::new(DependenciesValidator { dependencies })))
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
    fn array_form_requires_companion_properties() {
        let ctx = root_ctx();
        let Some(Ok(validator)) =
            compile(&Map::new(), &json!({"credit_card": ["billing_address"]}), &ctx)
        else {
            panic!()
        };
        assert!(validator.is_valid(&json!({})));
        assert!(validator.is_valid(&json!({"credit_card": "1", "billing_address": "x"})));
        assert!(!validator.is_valid(&json!({"credit_card": "1"})));
    }

    #[test]
    fn schema_form_validates_whole_instance() {
        let ctx = root_ctx();
        let definition = json!({
            "credit_card": {"properties": {"billing_address": {"type": "string"}}}
        });
        let Some(Ok(validator)) = compile(&Map::new(), &definition, &ctx) else {
            panic!()
        };
        assert!(validator.is_valid(&json!({"credit_card": "1", "billing_address": "x"})));
        assert!(!validator.is_valid(&json!({"credit_card": "1", "billing_address": 1})));
    }
}
