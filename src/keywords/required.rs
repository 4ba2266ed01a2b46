use std::rc::Rc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};

pub struct RequiredValidator {
    required: Vec<String>,
    schema_path: SchemaPath,
}

impl RequiredValidator {
    pub fn from_names(required: Vec<String>, schema_path: SchemaPath) -> Self {
        RequiredValidator { required, schema_path }
    }
}

impl Validate for RequiredValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        let Some(object) = instance.as_object() else {
            return true;
        };
        self.required.iter().all(|name| object.contains_key(name))
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        let mut set = MessageSet::new();
        let Some(object) = instance.as_object() else {
            return set;
        };
        for name in &self.required {
            if !object.contains_key(name) {
                set.push(ValidationMessage::new(
                    ValidatorTypeCode::Required,
                    Rc::clone(at),
                    self.schema_path.clone(),
                    vec![name.clone()],
                    format!("'{}' is a required property", name),
                ));
            }
        }
        set
    }

    fn name(&self) -> &'static str {
        "required"
    }
}

fn parse_required(value: &Value) -> Result<Vec<String>, CompilationError> {
    let items = value.as_array().ok_or_else(|| {
        CompilationError::SchemaError("'required' must be an array of strings".to_string())
    })?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| CompilationError::SchemaError("'required' must contain only strings".to_string()))
        })
        .collect()
}

pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let required = match parse_required(value) {
        Ok(required) => required,
        Err(err) => return Some(Err(err)),
    };
    Some(Ok(Box::new(RequiredValidator::from_names(
        required,
        ctx.schema_path.push("required"),
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ValidationContext;
    use crate::factory::FactoryHandle;
    use serde_json::json;

    #[test]
    fn reports_every_missing_property() {
        let vctx = ValidationContext::new(
            std::sync::Arc::new(crate::metaschema::JsonMetaSchema::draft4()),
            json!({}),
            FactoryHandle::standalone(),
        );
        let c = CompilationContext::root(url::Url::parse("http://example.com/").unwrap(), vctx);
        let Some(Ok(validator)) = compile(&Map::new(), &json!(["id", "name"]), &c) else {
            panic!()
        };
        let at = Rc::new(Path::root());
        let messages = validator.validate(&json!({}), &at);
        assert_eq!(messages.len(), 2);
    }
}
