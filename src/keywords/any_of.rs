use std::rc::Rc;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::MessageSet;
use crate::path::Path;
use crate::schema::{self, CompiledSchema};

struct AnyOfValidator {
    schemas: Vec<Arc<CompiledSchema>>,
}

impl Validate for AnyOfValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        self.schemas.iter().any(|schema| schema.is_valid(instance))
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        // None of the branches passed — report the union of every branch's
        // own errors rather than a synthesized summary, so a caller sees
        // exactly why each alternative was rejected.
        let mut set = MessageSet::new();
        for schema in &self.schemas {
            set.extend(schema.validate(instance, at));
        }
        set
    }

    fn name(&self) -> &'static str {
        "anyOf"
    }

    fn children(&self) -> Vec<Arc<CompiledSchema>> {
        self.schemas.clone()
    }
}

pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let items = match value.as_array() {
        Some(items) if !items.is_empty() => items,
        _ => {
            return Some(Err(CompilationError::SchemaError(
                "'anyOf' must be a non-empty array of schemas".to_string(),
            )))
        }
    };
    let branch_ctx = ctx.push("anyOf", value);
    let mut schemas = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let item_ctx = branch_ctx.push_index(index);
        match schema::compile(item, &item_ctx) {
            Ok(compiled) => schemas.push(compiled),
            Err(err) => return Some(Err(err)),
        }
    }
    Some(Ok(Box::new(AnyOfValidator { schemas })))
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
    fn no_matching_branch_unions_every_branchs_own_errors() {
        let c = ctx();
        let schemas = json!([{"type": "integer"}, {"type": "string"}]);
        let Some(Ok(validator)) = compile(&Map::new(), &schemas, &c) else {
            panic!()
        };
        let at = Rc::new(Path::root());
        let messages = validator.validate(&json!(1.5), &at);
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.code == "type"));
    }
}
