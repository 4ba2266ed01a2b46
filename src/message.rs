use crate::path::{Path, SchemaPath};
use indexmap::IndexSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

/// One entry per keyword family that can fail validation. Mirrors the
/// keyword dispatch table used at compile time (`crate::metaschema`), kept
/// as its own enum so a `ValidationMessage` can be matched on without
/// re-parsing its `code` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidatorTypeCode {
    Type,
    Enum,
    Const,
    AllOf,
    AnyOf,
    OneOf,
    Not,
    Properties,
    PatternProperties,
    AdditionalProperties,
    Required,
    MinProperties,
    MaxProperties,
    Dependencies,
    Items,
    AdditionalItems,
    MinItems,
    MaxItems,
    UniqueItems,
    MinLength,
    MaxLength,
    Pattern,
    Format,
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    MultipleOf,
    Ref,
}

impl ValidatorTypeCode {
    pub fn code(self) -> &'static str {
        match self {
            ValidatorTypeCode::Type => "type",
            ValidatorTypeCode::Enum => "enum",
            ValidatorTypeCode::Const => "const",
            ValidatorTypeCode::AllOf => "allOf",
            ValidatorTypeCode::AnyOf => "anyOf",
            ValidatorTypeCode::OneOf => "oneOf",
            ValidatorTypeCode::Not => "not",
            ValidatorTypeCode::Properties => "properties",
            ValidatorTypeCode::PatternProperties => "patternProperties",
            ValidatorTypeCode::AdditionalProperties => "additionalProperties",
            ValidatorTypeCode::Required => "required",
            ValidatorTypeCode::MinProperties => "minProperties",
            ValidatorTypeCode::MaxProperties => "maxProperties",
            ValidatorTypeCode::Dependencies => "dependencies",
            ValidatorTypeCode::Items => "items",
            ValidatorTypeCode::AdditionalItems => "additionalItems",
            ValidatorTypeCode::MinItems => "minItems",
            ValidatorTypeCode::MaxItems => "maxItems",
            ValidatorTypeCode::UniqueItems => "uniqueItems",
            ValidatorTypeCode::MinLength => "minLength",
            ValidatorTypeCode::MaxLength => "maxLength",
            ValidatorTypeCode::Pattern => "pattern",
            ValidatorTypeCode::Format => "format",
            ValidatorTypeCode::Minimum => "minimum",
            ValidatorTypeCode::Maximum => "maximum",
            ValidatorTypeCode::ExclusiveMinimum => "exclusiveMinimum",
            ValidatorTypeCode::ExclusiveMaximum => "exclusiveMaximum",
            ValidatorTypeCode::MultipleOf => "multipleOf",
            ValidatorTypeCode::Ref => "$ref",
        }
    }
}

impl fmt::Display for ValidatorTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single, structured validation failure. Two messages describing the same
/// logical failure (same keyword, same code, same instance location, same
/// arguments) are considered equal regardless of the exact rendered
/// `message` text, which lets [`MessageSet`] dedupe across validators that
/// independently discover the same violation (e.g. `anyOf` branches that all
/// fail for the same reason).
#[derive(Debug, Clone)]
pub struct ValidationMessage {
    pub keyword: ValidatorTypeCode,
    pub code: String,
    pub path: Rc<Path>,
    pub schema_path: SchemaPath,
    pub arguments: Vec<String>,
    pub message: String,
}

impl ValidationMessage {
    pub fn new(
        keyword: ValidatorTypeCode,
        path: Rc<Path>,
        schema_path: SchemaPath,
        arguments: Vec<String>,
        message: impl Into<String>,
    ) -> Self {
        ValidationMessage {
            code: keyword.code().to_string(),
            keyword,
            path,
            schema_path,
            arguments,
            message: message.into(),
        }
    }
}

impl PartialEq for ValidationMessage {
    fn eq(&self, other: &Self) -> bool {
        self.keyword == other.keyword
            && self.code == other.code
            && self.path.to_string() == other.path.to_string()
            && self.arguments == other.arguments
    }
}

impl Eq for ValidationMessage {}

impl Hash for ValidationMessage {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.keyword.hash(state);
        self.code.hash(state);
        self.path.to_string().hash(state);
        self.arguments.hash(state);
    }
}

/// Insertion-order-preserving, deduplicating collection of
/// [`ValidationMessage`]s — the return type of every `validate` call.
#[derive(Debug, Clone, Default)]
pub struct MessageSet(IndexSet<ValidationMessage>);

impl MessageSet {
    pub fn new() -> Self {
        MessageSet(IndexSet::new())
    }

    pub fn single(message: ValidationMessage) -> Self {
        let mut set = IndexSet::new();
        set.insert(message);
        MessageSet(set)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn push(&mut self, message: ValidationMessage) {
        self.0.insert(message);
    }

    pub fn extend(&mut self, other: MessageSet) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationMessage> {
        self.0.iter()
    }
}

impl IntoIterator for MessageSet {
    type Item = ValidationMessage;
    type IntoIter = indexmap::set::IntoIter<ValidationMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<ValidationMessage> for MessageSet {
    fn from_iter<T: IntoIterator<Item = ValidationMessage>>(iter: T) -> Self {
        MessageSet(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_messages_collapse() {
        let root = Rc::new(Path::root());
        let mut set = MessageSet::new();
        set.push(ValidationMessage::new(
            ValidatorTypeCode::Type,
            Rc::clone(&root),
            SchemaPath::root(),
            vec!["string".into()],
            "'1' is not of type 'string'",
        ));
        set.push(ValidationMessage::new(
            ValidatorTypeCode::Type,
            Rc::clone(&root),
            SchemaPath::root(),
            vec!["string".into()],
            "'1' is not of type 'string'",
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn preserves_insertion_order() {
        let root = Rc::new(Path::root());
        let mut set = MessageSet::new();
        set.push(ValidationMessage::new(
            ValidatorTypeCode::MinItems,
            Rc::clone(&root),
            SchemaPath::root(),
            vec![],
            "too few",
        ));
        set.push(ValidationMessage::new(
            ValidatorTypeCode::Required,
            Rc::clone(&root),
            SchemaPath::root(),
            vec!["id".into()],
            "missing",
        ));
        let codes: Vec<_> = set.iter().map(|m| m.code.clone()).collect();
        assert_eq!(codes, vec!["minItems", "required"]);
    }
}
