use std::rc::Rc;
use std::sync::Arc;

use serde_json::Value;

use crate::error::CompilationError;
use crate::message::MessageSet;
use crate::path::Path;
use crate::schema::CompiledSchema;

pub mod additional_items;
pub mod additional_properties;
pub mod all_of;
pub mod any_of;
pub mod const_;
pub mod dependencies;
pub mod enum_;
pub mod format;
pub mod items;
pub mod max_items;
pub mod max_length;
pub mod max_properties;
pub mod maximum;
pub mod min_items;
pub mod min_length;
pub mod min_properties;
pub mod minimum;
pub mod multiple_of;
pub mod not_;
pub mod one_of;
pub mod pattern;
pub mod pattern_properties;
pub mod properties;
pub mod ref_;
pub mod required;
pub mod type_;
pub mod unique_items;

/// Implemented by every keyword validator. A validator owns whatever it
/// needs at validate time (a compiled regex, a bound limit, a child
/// `CompiledSchema`) and never looks anything up in the schema JSON again
/// after compilation.
pub trait Validate: Send + Sync {
    /// Cheap existence check, used by combinators (`anyOf`, `not`, ...) that
    /// only need to know pass/fail, not the failure detail.
    fn is_valid(&self, instance: &Value) -> bool;

    /// Full check, collecting every failure this validator (and any child
    /// schema it owns) finds at or below `at`.
    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet;

    /// Keyword name, for introspection and `CompiledSchema` debug output.
    fn name(&self) -> &'static str;

    /// Sub-schemas this validator owns, if any. Used only to back-patch
    /// `CompiledSchema::parent` pointers after a node finishes compiling;
    /// leaf validators (`minLength`, `pattern`, ...) keep the default.
    fn children(&self) -> Vec<Arc<CompiledSchema>> {
        Vec::new()
    }
}

pub type BoxedValidator = Box<dyn Validate>;
/// Ordered keyword -> validator pairs; order is insertion order, which is
/// also evaluation order (the order the keywords appeared in the schema
/// object), matching how `serde_json::Map` preserves key order during parse.
pub type Validators = Vec<(String, BoxedValidator)>;

pub type CompilationResult = Result<BoxedValidator, CompilationError>;

/// Signature every per-keyword `compile` function shares. Returns `None`
/// when the keyword is absent from this schema node (the caller tries the
/// next registered keyword), `Some(Err(_))` when it's present but malformed.
pub type KeywordFactory = fn(
    object: &serde_json::Map<String, Value>,
    value: &Value,
    ctx: &crate::context::CompilationContext,
) -> Option<CompilationResult>;

pub(crate) fn no_error() -> MessageSet {
    MessageSet::new()
}
