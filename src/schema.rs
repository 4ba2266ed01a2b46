use std::rc::Rc;
use std::sync::{Arc, RwLock, Weak};

use serde_json::Value;

use crate::context::{CompilationContext, ValidationContext};
use crate::error::CompilationError;
use crate::keywords::{Validate, Validators};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};

/// One node of the compiled schema tree. Mirrors the shape of the schema
/// JSON it was built from: a `{}`/`true` schema has no validators and
/// always passes; a `false` schema has no validators and always fails;
/// an object schema carries one validator per keyword the meta-schema
/// recognized, in the order the keywords appeared.
pub struct CompiledSchema {
    pub node: Value,
    pub schema_path: SchemaPath,
    pub base_url: url::Url,
    pub validators: Validators,
    pub always_false: bool,
    pub context: Arc<ValidationContext>,
    parent: RwLock<Option<Weak<CompiledSchema>>>,
}

impl CompiledSchema {
    /// Validate `instance` against the whole compiled tree, from the
    /// instance root. The entry point most callers want; `validate` below is
    /// the recursive form validators use to extend the path into nested
    /// instance locations.
    pub fn validate_instance(&self, instance: &Value) -> MessageSet {
        self.validate(instance, &Rc::new(Path::root()))
    }

    /// Validate `instance` against this node, reporting every failure found
    /// at or below `at`. Short-circuits nothing except what individual
    /// combinator validators (`anyOf`, `oneOf`) already decide to suppress.
    pub fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.always_false {
            let mut set = MessageSet::new();
            set.push(ValidationMessage::new(
                ValidatorTypeCode::Not,
                Rc::clone(at),
                self.schema_path.clone(),
                vec![instance.to_string()],
                format!("False schema does not allow '{}'", instance),
            ));
            return set;
        }
        let mut set = MessageSet::new();
        for (_, validator) in &self.validators {
            set.extend(validator.validate(instance, at));
        }
        set
    }

    /// Cheap pass/fail, short-circuiting on the first failing validator.
    pub fn is_valid(&self, instance: &Value) -> bool {
        if self.always_false {
            return false;
        }
        self.validators.iter().all(|(_, v)| v.is_valid(instance))
    }

    pub fn parent(&self) -> Option<Arc<CompiledSchema>> {
        self.parent.read().expect("parent lock poisoned").as_ref().and_then(Weak::upgrade)
    }

    /// Walk parent pointers up to the document root.
    pub fn find_ancestor(self: &Arc<Self>) -> Arc<CompiledSchema> {
        let mut current = Arc::clone(self);
        while let Some(parent) = current.parent() {
            current = parent;
        }
        current
    }

    fn set_parent(&self, parent: Weak<CompiledSchema>) {
        *self.parent.write().expect("parent lock poisoned") = Some(parent);
    }

    /// Resolve a JSON Pointer fragment (`/definitions/foo`, or `` for the
    /// whole document) against this node's *original* document, compiling a
    /// fresh `CompiledSchema` for the target. Used by `RefValidator` for
    /// same-document references once it has located the document root via
    /// `find_ancestor`.
    pub fn resolve_pointer(
        self: &Arc<Self>,
        pointer: &str,
    ) -> Result<Arc<CompiledSchema>, CompilationError> {
        let target = if pointer.is_empty() {
            self.node.clone()
        } else {
            self.node
                .pointer(pointer)
                .cloned()
                .ok_or_else(|| CompilationError::UnresolvableReference(pointer.to_string()))?
        };
        let ctx = CompilationContext {
            root_url: self.base_url.clone(),
            scope: self.base_url.clone(),
            schema_path: SchemaPath::root().push(pointer.trim_start_matches('/')),
            vctx: Arc::clone(&self.context),
        };
        compile(&target, &ctx)
    }
}

/// Compile a schema node (the root, or any sub-schema reached through a
/// keyword) into a `CompiledSchema`.
pub fn compile(
    schema: &Value,
    ctx: &CompilationContext,
) -> Result<Arc<CompiledSchema>, CompilationError> {
    match schema {
        Value::Bool(true) => Ok(new_leaf(schema.clone(), ctx, Vec::new(), false)),
        Value::Bool(false) => Ok(new_leaf(schema.clone(), ctx, Vec::new(), true)),
        Value::Object(object) => {
            // Draft 4 does not suppress sibling keywords next to `$ref` (that
            // restriction arrived in later drafts) — `$ref` is just another
            // entry in the meta-schema's keyword registry, compiled in its
            // declared position like any other, so `compile_validators` below
            // handles it with no special case.
            let validators = compile_validators(object, ctx)?;
            Ok(new_leaf(schema.clone(), ctx, validators, false))
        }
        other => Err(CompilationError::SchemaError(format!(
            "schema must be an object or boolean, got {}",
            other
        ))),
    }
}

fn new_leaf(
    node: Value,
    ctx: &CompilationContext,
    validators: Validators,
    always_false: bool,
) -> Arc<CompiledSchema> {
    let compiled = Arc::new(CompiledSchema {
        node,
        schema_path: ctx.schema_path.clone(),
        base_url: ctx.scope.clone(),
        context: Arc::clone(&ctx.vctx),
        always_false,
        parent: RwLock::new(None),
        validators,
    });
    let weak = Arc::downgrade(&compiled);
    for (_, validator) in &compiled.validators {
        for child in validator.children() {
            child.set_parent(weak.clone());
        }
    }
    compiled
}

/// Iterate the schema object's keywords in order, invoking each one's
/// registered factory. Unknown keywords (not in the active meta-schema's
/// registry) are silently skipped, not an error — that's what lets a
/// schema carry vendor extensions or annotation-only keywords like
/// `title`/`description`.
pub fn compile_validators(
    object: &serde_json::Map<String, Value>,
    ctx: &CompilationContext,
) -> Result<Validators, CompilationError> {
    let mut validators = Vec::new();
    for (keyword, value) in object.iter() {
        if let Some(factory) = ctx.vctx.meta_schema.keyword(keyword) {
            if let Some(result) = factory(object, value, ctx) {
                validators.push((keyword.clone(), result?));
            }
        }
    }
    Ok(validators)
}
