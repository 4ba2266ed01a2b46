use std::rc::Rc;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::{Map, Value};
use url::Url;

use crate::context::{CompilationContext, ValidationContext};
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};
use crate::schema::{self, CompiledSchema};

/// The parsed, compile-time-resolved shape of a `$ref` value. Everything
/// here is cheap to compute eagerly; only the target schema itself is
/// deferred, since compiling it now could mean recursing into a schema that
/// is still in the middle of being compiled (a cyclic `$ref`).
enum Target {
    /// `#`, or `http://same/doc#/a/b` — same document as the one this `$ref`
    /// was found in. Resolved by walking `root_schema` with a JSON Pointer.
    SameDocument { pointer: String },
    /// Anything else: a document this `$ref` must fetch through the active
    /// `UrlFetcher` before it can be compiled.
    Remote { document_url: Url, pointer: String },
}

/// `$ref`'s validator: a lazy handle to whatever `CompiledSchema` the
/// reference points at. Resolution happens once, on first use, and is
/// cached behind a `parking_lot::RwLock` rather than done at compile time —
/// that's what lets a schema refer to itself (directly or through a chain of
/// other schemas) without the compiler recursing forever.
pub struct RefValidator {
    raw: String,
    target: Target,
    vctx: Arc<ValidationContext>,
    /// The base URL of the document this `$ref` was written in — captured at
    /// compile time from `ctx.root_url`, since by the time resolution runs
    /// (lazily, on first use) the `CompilationContext` that produced this
    /// validator is long gone.
    base_url: Url,
    schema_path: SchemaPath,
    resolved: RwLock<Option<Result<Arc<CompiledSchema>, String>>>,
}

fn pointer_of(fragment: &str) -> String {
    // A bare `#` or an empty fragment both mean "the whole document". The
    // fragment comes straight off a `url::Url` and may itself be
    // percent-encoded (e.g. a property name containing a space or a `#`),
    // so it has to be decoded before it's usable as a JSON Pointer.
    let fragment = fragment.trim_start_matches('#');
    percent_encoding::percent_decode_str(fragment)
        .decode_utf8()
        .map(|cow| cow.into_owned())
        .unwrap_or_else(|_| fragment.to_string())
}

fn schema_path_for(pointer: &str) -> SchemaPath {
    if pointer.is_empty() {
        SchemaPath::root()
    } else {
        SchemaPath::root().push(pointer.trim_start_matches('/'))
    }
}

impl RefValidator {
    fn resolve(&self) -> Result<Arc<CompiledSchema>, CompilationError> {
        match &self.target {
            Target::SameDocument { pointer } => {
                let node = if pointer.is_empty() {
                    self.vctx.root_schema.clone()
                } else {
                    self.vctx
                        .root_schema
                        .pointer(pointer)
                        .cloned()
                        .ok_or_else(|| CompilationError::UnresolvableReference(self.raw.clone()))?
                };
                let ctx = CompilationContext {
                    root_url: self.base_url.clone(),
                    scope: self.base_url.clone(),
                    schema_path: schema_path_for(pointer),
                    vctx: Arc::clone(&self.vctx),
                };
                schema::compile(&node, &ctx)
            }
            Target::Remote { document_url, pointer } => {
                let document = self.vctx.factory.fetch(document_url)?;
                let meta_schema = self.vctx.factory.meta_schema_for(&document)?;
                let new_vctx =
                    ValidationContext::new(meta_schema, document.clone(), self.vctx.factory.clone());
                let node = if pointer.is_empty() {
                    document.clone()
                } else {
                    document
                        .pointer(pointer)
                        .cloned()
                        .ok_or_else(|| CompilationError::UnresolvableReference(self.raw.clone()))?
                };
                let ctx = CompilationContext {
                    schema_path: schema_path_for(pointer),
                    ..CompilationContext::root(document_url.clone(), new_vctx)
                };
                schema::compile(&node, &ctx)
            }
        }
    }

    /// Resolve exactly once; subsequent calls (including ones that raced in
    /// from another thread) reuse the cached outcome, success or failure.
    fn ensure_resolved(&self) -> Result<Arc<CompiledSchema>, CompilationError> {
        if let Some(cached) = self.resolved.read().as_ref() {
            return cached.clone().map_err(CompilationError::UnresolvableReference);
        }
        let mut guard = self.resolved.write();
        if let Some(cached) = guard.as_ref() {
            return cached.clone().map_err(CompilationError::UnresolvableReference);
        }
        let outcome = self.resolve();
        let cached = outcome.as_ref().map(Arc::clone).map_err(|err| err.to_string());
        *guard = Some(cached.clone());
        cached.map_err(CompilationError::UnresolvableReference)
    }
}

impl Validate for RefValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        match self.ensure_resolved() {
            Ok(target) => target.is_valid(instance),
            Err(_) => false,
        }
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        match self.ensure_resolved() {
            Ok(target) => target.validate(instance, at),
            Err(err) => MessageSet::single(ValidationMessage::new(
                ValidatorTypeCode::Ref,
                Rc::clone(at),
                self.schema_path.clone(),
                vec![self.raw.clone()],
                format!("could not resolve reference '{}': {}", self.raw, err),
            )),
        }
    }

    fn name(&self) -> &'static str {
        "$ref"
    }

    fn children(&self) -> Vec<Arc<CompiledSchema>> {
        // Only available once resolution has actually happened; this is used
        // solely to back-patch `parent` pointers, which a not-yet-resolved
        // lazy reference has none of yet (and doesn't need — it computes its
        // own base URL independently, see `resolve` above).
        match self.resolved.read().as_ref() {
            Some(Ok(schema)) => vec![Arc::clone(schema)],
            _ => Vec::new(),
        }
    }
}

/// Partition a `$ref` value per §4.4: same-document fragment references
/// (`#`, `#/a/b`) vs. a URL (possibly relative to the enclosing schema's
/// base) with an optional trailing fragment.
pub fn compile_ref(reference: &str, ctx: &CompilationContext) -> CompilationResult {
    let target = if let Some(fragment) = reference.strip_prefix('#') {
        Target::SameDocument {
            pointer: pointer_of(fragment),
        }
    } else {
        let (url_part, fragment) = match reference.split_once('#') {
            Some((url_part, fragment)) => (url_part, fragment),
            None => (reference, ""),
        };
        let resolved = ctx
            .build_url(url_part)
            .map_err(|err| CompilationError::UnresolvableReference(err.to_string()))?;
        if resolved == ctx.root_url {
            Target::SameDocument {
                pointer: pointer_of(fragment),
            }
        } else {
            Target::Remote {
                document_url: resolved,
                pointer: pointer_of(fragment),
            }
        }
    };
    Ok(Box::new(RefValidator {
        raw: reference.to_string(),
        target,
        vctx: Arc::clone(&ctx.vctx),
        base_url: ctx.root_url.clone(),
        schema_path: ctx.schema_path.push("$ref"),
        resolved: RwLock::new(None),
    }))
}

pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let reference = match value.as_str() {
        Some(reference) => reference,
        None => {
            return Some(Err(CompilationError::SchemaError(
                "'$ref' must be a string".to_string(),
            )))
        }
    };
    Some(compile_ref(reference, ctx))
}
