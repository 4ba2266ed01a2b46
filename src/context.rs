use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::metaschema::JsonMetaSchema;
use crate::path::SchemaPath;
use crate::schema::CompiledSchema;

/// Shared, per-compilation state. One `ValidationContext` is created per
/// `SchemaFactory::get_schema*` call and held by every node in the resulting
/// tree (`Arc`d, never mutated after the root finishes compiling).
pub struct ValidationContext {
    pub meta_schema: Arc<JsonMetaSchema>,
    /// The raw root schema document, kept around so that same-document
    /// `$ref`s can be resolved by walking it with a JSON Pointer rather than
    /// needing a live `Weak` back-reference to the (possibly not yet fully
    /// built) root `CompiledSchema`.
    pub root_schema: Value,
    /// Used by `RefValidator` to compile cross-document references through
    /// the same factory (and therefore the same meta-schema registry) that
    /// produced this schema.
    pub factory: crate::factory::FactoryHandle,
}

impl ValidationContext {
    pub fn new(
        meta_schema: Arc<JsonMetaSchema>,
        root_schema: Value,
        factory: crate::factory::FactoryHandle,
    ) -> Arc<Self> {
        Arc::new(ValidationContext {
            meta_schema,
            root_schema,
            factory,
        })
    }
}

/// Per-node compile-time state, threaded recursively through
/// `compile_validators`/`CompiledSchema::compile`. Dropped once compilation
/// of the whole tree finishes; nothing in here survives into the validators
/// themselves except what they copy out of it (e.g. a resolved `Url`).
#[derive(Clone)]
pub struct CompilationContext {
    pub scope: Url,
    pub schema_path: SchemaPath,
    pub vctx: Arc<ValidationContext>,
    /// The base URL of the document this node was reached from, fixed at
    /// the moment the root of that document started compiling. Unlike
    /// `scope`, this never folds with a nested `id`/`$id` — it is how
    /// `RefValidator` tells a same-document reference (resolved URL equals
    /// `root_url`) from a cross-document one without needing a live
    /// back-reference to a `CompiledSchema` that may still be compiling.
    pub root_url: Url,
}

impl CompilationContext {
    pub fn root(scope: Url, vctx: Arc<ValidationContext>) -> Self {
        CompilationContext {
            root_url: scope.clone(),
            scope,
            schema_path: SchemaPath::root(),
            vctx,
        }
    }

    /// Descend into a sub-schema reached through `keyword`. Updates the
    /// base URL if the sub-schema carries its own `id`/`$id`, matching how
    /// the base URL "folds" as compilation walks into nested schemas that
    /// declare their own scope.
    pub fn push(&self, keyword: &str, schema: &Value) -> Self {
        let schema_path = self.schema_path.push(keyword);
        let scope = match self.vctx.meta_schema.id_of(schema) {
            Some(id) => Url::options()
                .base_url(Some(&self.scope))
                .parse(id)
                .unwrap_or_else(|_| self.scope.clone()),
            None => self.scope.clone(),
        };
        CompilationContext {
            root_url: self.root_url.clone(),
            scope,
            schema_path,
            vctx: Arc::clone(&self.vctx),
        }
    }

    pub fn push_index(&self, index: usize) -> Self {
        CompilationContext {
            root_url: self.root_url.clone(),
            scope: self.scope.clone(),
            schema_path: self.schema_path.push_index(index),
            vctx: Arc::clone(&self.vctx),
        }
    }

    pub fn build_url(&self, reference: &str) -> Result<Url, url::ParseError> {
        Url::options().base_url(Some(&self.scope)).parse(reference)
    }
}
