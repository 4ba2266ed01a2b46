use std::rc::Rc;

use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::metaschema::FormatValidator;
use crate::path::{Path, SchemaPath};

struct FormatKeywordValidator {
    name: String,
    check: FormatValidator,
    schema_path: SchemaPath,
}

impl Validate for FormatKeywordValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        match instance.as_str() {
            Some(string) => (self.check)(string),
            None => true,
        }
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::Format,
            Rc::clone(at),
            self.schema_path.clone(),
            vec![self.name.clone()],
            format!("{} is not a '{}'", instance, self.name),
        ))
    }

    fn name(&self) -> &'static str {
        "format"
    }
}

/// Dispatches to whichever checker the active meta-schema registered for
/// this format name. A name the meta-schema doesn't recognize is left
/// unconstrained, matching how unknown `format` values are treated across
/// JSON Schema dialects (annotation-only, not an error).
pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let name = value.as_str()?;
    let check = ctx.vctx.meta_schema.format(name)?;
    Some(Ok(Box::new(FormatKeywordValidator {
        name: name.to_string(),
        check,
        schema_path: ctx.schema_path.push("format"),
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
    fn dispatches_to_the_registered_checker() {
        let ctx = root_ctx();
        let Some(Ok(validator)) = compile(&Map::new(), &json!("email"), &ctx) else {
            panic!()
        };
        assert!(validator.is_valid(&json!("a@example.com")));
        assert!(!validator.is_valid(&json!("not-an-email")));
    }

    #[test]
    fn unknown_format_name_is_unconstrained() {
        let ctx = root_ctx();
        assert!(compile(&Map::new(), &json!("made-up-format"), &ctx).is_none());
    }
}
