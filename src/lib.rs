//! # schema4
//!
//! A JSON Schema Draft 4 validator. Schemas are compiled once into a tree of
//! validators (one node per sub-schema, one validator per active keyword),
//! then reused to check any number of instances without re-parsing the
//! schema JSON.
//!
//! Supports:
//!   - The full Draft 4 keyword set, including `$ref` (same-document and
//!     remote, resolved lazily so cyclic schemas compile without looping);
//!   - A pluggable meta-schema/keyword/format registry, so a caller can add
//!     custom keywords or formats without forking the crate;
//!   - Loading schemas from a `Value`, a string, a reader, or a URL.
//!
//! ## Example
//!
//! ```rust
//! use schema4::SchemaFactory;
//! use serde_json::json;
//!
//! fn main() -> Result<(), schema4::CompilationError> {
//!     let factory = SchemaFactory::get_instance();
//!     let compiled = factory.get_schema(json!({"type": "string", "maxLength": 5}))?;
//!     let messages = compiled.validate_instance(&json!("foo"));
//!     assert!(messages.is_empty());
//!     let messages = compiled.validate_instance(&json!("too long"));
//!     for message in messages.iter() {
//!         println!("validation error: {}", message.message);
//!     }
//!     Ok(())
//! }
//! ```
mod context;
mod error;
mod factory;
mod formats;
mod helpers;
mod keywords;
mod message;
mod metaschema;
mod path;
mod primitive_type;
mod resolver;
mod schema;

pub use error::CompilationError;
pub use factory::{SchemaFactory, SchemaFactoryBuilder};
pub use message::{MessageSet, ValidationMessage, ValidatorTypeCode};
pub use metaschema::{FormatValidator, JsonMetaSchema};
pub use path::{Path, PathSegment, SchemaPath};
pub use resolver::{DefaultUrlFetcher, UrlFetcher};
pub use schema::CompiledSchema;

use serde_json::Value;

/// A shortcut for validating `instance` against `schema` under the default
/// Draft 4 factory. Panics if `schema` fails to compile.
///
/// ```rust
/// use schema4::is_valid;
/// use serde_json::json;
///
/// let schema = json!({"maxLength": 5});
/// let instance = json!("foo");
/// assert!(is_valid(&schema, &instance));
/// ```
pub fn is_valid(schema: &Value, instance: &Value) -> bool {
    let compiled = SchemaFactory::get_instance()
        .get_schema(schema.clone())
        .expect("invalid schema");
    compiled.is_valid(instance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn is_valid_shortcut() {
        let schema = json!({"minLength": 5});
        assert!(is_valid(&schema, &json!("foobar")));
        assert!(!is_valid(&schema, &json!("foo")));
    }

    #[test]
    fn end_to_end_compile_and_validate() {
        let factory = SchemaFactory::builder().build().unwrap();
        let compiled = factory
            .get_schema(json!({
                "type": "object",
                "required": ["name"],
                "properties": {"name": {"type": "string", "minLength": 1}},
            }))
            .unwrap();
        assert!(compiled.validate_instance(&json!({"name": "a"})).is_empty());
        let messages = compiled.validate_instance(&json!({}));
        assert_eq!(messages.len(), 1);
        assert_eq!(messages.iter().next().unwrap().code, "required");
    }
}
