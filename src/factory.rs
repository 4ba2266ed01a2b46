use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;

use serde_json::Value;
use url::Url;

use crate::context::{CompilationContext, ValidationContext};
use crate::error::CompilationError;
use crate::metaschema::JsonMetaSchema;
use crate::resolver::{DefaultUrlFetcher, UrlFetcher};
use crate::schema::{self, CompiledSchema};

struct FactoryInner {
    meta_schemas: HashMap<String, Arc<JsonMetaSchema>>,
    default_meta_schema_uri: String,
    fetcher: Arc<dyn UrlFetcher>,
}

/// Cheaply cloneable handle to the owning factory, carried inside
/// `ValidationContext` so cross-document `$ref`s can be compiled through
/// the same meta-schema registry and fetcher that produced the referring
/// schema.
#[derive(Clone)]
pub struct FactoryHandle(Arc<FactoryInner>);

impl FactoryHandle {
    /// A minimal handle for compiling a schema in isolation (tests, or a
    /// caller that has no remote `$ref`s to resolve).
    pub fn standalone() -> Self {
        let mut meta_schemas = HashMap::new();
        let draft4 = Arc::new(JsonMetaSchema::draft4());
        meta_schemas.insert(draft4.uri.clone(), draft4);
        FactoryHandle(Arc::new(FactoryInner {
            meta_schemas,
            default_meta_schema_uri: "http://json-schema.org/draft-04/schema#".to_string(),
            fetcher: Arc::new(DefaultUrlFetcher),
        }))
    }

    pub fn fetch(&self, url: &Url) -> Result<Value, CompilationError> {
        self.0.fetcher.fetch(url)
    }

    /// Look up the meta-schema to compile `schema` under. A schema with no
    /// `$schema` keyword falls back to the factory's configured default; one
    /// that names a `$schema` the factory doesn't recognize is a compilation
    /// error rather than a silent fallback, since validating Draft 4 content
    /// against, say, a Draft 6 keyword registry would produce wrong results
    /// without any indication why.
    pub fn meta_schema_for(&self, schema: &Value) -> Result<Arc<JsonMetaSchema>, CompilationError> {
        match schema.as_object().and_then(|obj| obj.get("$schema")).and_then(Value::as_str) {
            Some(uri) => self
                .0
                .meta_schemas
                .get(uri)
                .cloned()
                .ok_or_else(|| CompilationError::UnknownMetaSchema(uri.to_string())),
            None => Ok(self.default_meta_schema()),
        }
    }

    fn default_meta_schema(&self) -> Arc<JsonMetaSchema> {
        self.0
            .meta_schemas
            .get(&self.0.default_meta_schema_uri)
            .cloned()
            .expect("default meta-schema must be registered")
    }
}

/// Builder-configured, immutable after `build()`: loads schema documents
/// and compiles them into `CompiledSchema` trees. Analogous to the
/// `ValidationOptions`/`JSONSchema::compile` split in earlier drafts of this
/// ecosystem, folded into one type per the builder-pattern configuration
/// surface this crate standardizes on.
#[derive(Clone)]
pub struct SchemaFactory {
    handle: FactoryHandle,
}

impl SchemaFactory {
    pub fn builder() -> SchemaFactoryBuilder {
        SchemaFactoryBuilder::default()
    }

    /// A ready-to-use factory: Draft 4 meta-schema, default fetcher.
    pub fn get_instance() -> &'static SchemaFactory {
        use std::sync::OnceLock;
        static INSTANCE: OnceLock<SchemaFactory> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            SchemaFactory::builder()
                .build()
                .expect("default factory configuration is always valid")
        })
    }

    pub fn get_schema(&self, schema: Value) -> Result<Arc<CompiledSchema>, CompilationError> {
        let default_base = Url::parse("http://example.com/").expect("valid URL");
        self.get_schema_with_base(schema, default_base)
    }

    pub fn get_schema_from_str(&self, raw: &str) -> Result<Arc<CompiledSchema>, CompilationError> {
        let value: Value = serde_json::from_str(raw)?;
        self.get_schema(value)
    }

    pub fn get_schema_from_reader(
        &self,
        mut reader: impl Read,
    ) -> Result<Arc<CompiledSchema>, CompilationError> {
        let mut raw = String::new();
        reader.read_to_string(&mut raw)?;
        self.get_schema_from_str(&raw)
    }

    /// Fetch a schema document over the configured `UrlFetcher` and compile
    /// it with `url` itself as the base scope, not a placeholder — so a
    /// relative `$ref` inside the document resolves against where it was
    /// actually loaded from, and a same-document `$ref` is correctly
    /// recognized as such even when the document's own `id` is absent or
    /// written as a relative URL.
    pub fn get_schema_from_url(&self, url: &str) -> Result<Arc<CompiledSchema>, CompilationError> {
        let url = Url::parse(url)?;
        let value = self.handle.fetch(&url)?;
        self.get_schema_with_base(value, url)
    }

    fn get_schema_with_base(
        &self,
        schema: Value,
        default_base: Url,
    ) -> Result<Arc<CompiledSchema>, CompilationError> {
        let meta_schema = self.handle.meta_schema_for(&schema)?;
        let scope = schema
            .as_object()
            .and_then(|obj| meta_schema.id_of(&Value::Object(obj.clone())))
            .and_then(|id| Url::options().base_url(Some(&default_base)).parse(id).ok())
            .unwrap_or(default_base);
        let vctx = ValidationContext::new(meta_schema, schema.clone(), self.handle.clone());
        let ctx = CompilationContext::root(scope, vctx);
        schema::compile(&schema, &ctx)
    }
}

pub struct SchemaFactoryBuilder {
    meta_schemas: HashMap<String, Arc<JsonMetaSchema>>,
    default_meta_schema_uri: String,
    fetcher: Arc<dyn UrlFetcher>,
}

impl Default for SchemaFactoryBuilder {
    fn default() -> Self {
        let mut meta_schemas = HashMap::new();
        let draft4 = Arc::new(JsonMetaSchema::draft4());
        let default_uri = draft4.uri.clone();
        meta_schemas.insert(default_uri.clone(), draft4);
        SchemaFactoryBuilder {
            meta_schemas,
            default_meta_schema_uri: default_uri,
            fetcher: Arc::new(DefaultUrlFetcher),
        }
    }
}

impl SchemaFactoryBuilder {
    pub fn url_fetcher(mut self, fetcher: Arc<dyn UrlFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn default_meta_schema_uri(mut self, uri: impl Into<String>) -> Self {
        self.default_meta_schema_uri = uri.into();
        self
    }

    pub fn add_meta_schema(mut self, meta_schema: JsonMetaSchema) -> Self {
        self.meta_schemas.insert(meta_schema.uri.clone(), Arc::new(meta_schema));
        self
    }

    pub fn build(self) -> Result<SchemaFactory, CompilationError> {
        if !self.meta_schemas.contains_key(&self.default_meta_schema_uri) {
            return Err(CompilationError::InvalidConfiguration(format!(
                "default meta-schema uri '{}' is not among the registered meta-schemas",
                self.default_meta_schema_uri
            )));
        }
        log::debug!(
            "built SchemaFactory with {} registered meta-schema(s), default '{}'",
            self.meta_schemas.len(),
            self.default_meta_schema_uri
        );
        Ok(SchemaFactory {
            handle: FactoryHandle(Arc::new(FactoryInner {
                meta_schemas: self.meta_schemas,
                default_meta_schema_uri: self.default_meta_schema_uri,
                fetcher: self.fetcher,
            })),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_rejects_unknown_default_meta_schema() {
        let result = SchemaFactory::builder()
            .default_meta_schema_uri("http://example.com/unknown#")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn compiles_a_trivial_schema() {
        let factory = SchemaFactory::builder().build().unwrap();
        let compiled = factory.get_schema(json!({"type": "string"})).unwrap();
        assert!(compiled.is_valid(&json!("hello")));
        assert!(!compiled.is_valid(&json!(1)));
    }
}
