use std::collections::HashMap;

use serde_json::Value;

use crate::keywords;
use crate::keywords::KeywordFactory;

pub type FormatValidator = fn(&str) -> bool;

/// Data-driven description of a dialect: which keywords are active, which
/// `compile` function backs each one, which formats `format` recognizes,
/// and which property name carries a schema's self-identifying URI. New
/// dialects (or a schema with custom keywords) are added by constructing
/// another `JsonMetaSchema`, never by editing a hardcoded per-draft match
/// table in the compiler.
pub struct JsonMetaSchema {
    pub uri: String,
    pub id_keyword: &'static str,
    keywords: HashMap<&'static str, KeywordFactory>,
    formats: HashMap<&'static str, FormatValidator>,
}

impl JsonMetaSchema {
    pub fn builder(uri: impl Into<String>, id_keyword: &'static str) -> JsonMetaSchemaBuilder {
        JsonMetaSchemaBuilder {
            uri: uri.into(),
            id_keyword,
            keywords: HashMap::new(),
            formats: HashMap::new(),
        }
    }

    pub fn keyword(&self, name: &str) -> Option<KeywordFactory> {
        self.keywords.get(name).copied()
    }

    pub fn format(&self, name: &str) -> Option<FormatValidator> {
        self.formats.get(name).copied()
    }

    pub fn id_of<'a>(&self, schema: &'a Value) -> Option<&'a str> {
        schema.as_object()?.get(self.id_keyword)?.as_str()
    }

    /// The Draft 4 dialect: `id` (not `$id`) as the scope keyword,
    /// `exclusiveMinimum`/`exclusiveMaximum` as booleans riding alongside
    /// `minimum`/`maximum` rather than standalone numeric limits.
    pub fn draft4() -> JsonMetaSchema {
        let mut builder = JsonMetaSchema::builder("http://json-schema.org/draft-04/schema#", "id");
        builder = builder
            .keyword("type", keywords::type_::compile)
            .keyword("enum", keywords::enum_::compile)
            .keyword("const", keywords::const_::compile)
            .keyword("allOf", keywords::all_of::compile)
            .keyword("anyOf", keywords::any_of::compile)
            .keyword("oneOf", keywords::one_of::compile)
            .keyword("not", keywords::not_::compile)
            .keyword("properties", keywords::properties::compile)
            .keyword("patternProperties", keywords::pattern_properties::compile)
            .keyword("additionalProperties", keywords::additional_properties::compile)
            .keyword("required", keywords::required::compile)
            .keyword("minProperties", keywords::min_properties::compile)
            .keyword("maxProperties", keywords::max_properties::compile)
            .keyword("dependencies", keywords::dependencies::compile)
            .keyword("items", keywords::items::compile)
            .keyword("additionalItems", keywords::additional_items::compile)
            .keyword("minItems", keywords::min_items::compile)
            .keyword("maxItems", keywords::max_items::compile)
            .keyword("uniqueItems", keywords::unique_items::compile)
            .keyword("minLength", keywords::min_length::compile)
            .keyword("maxLength", keywords::max_length::compile)
            .keyword("pattern", keywords::pattern::compile)
            .keyword("format", keywords::format::compile)
            .keyword("minimum", keywords::minimum::compile)
            .keyword("maximum", keywords::maximum::compile)
            .keyword("multipleOf", keywords::multiple_of::compile)
            .keyword("$ref", keywords::ref_::compile);
        for (name, validator) in crate::formats::draft4_formats() {
            builder = builder.format(name, validator);
        }
        builder.build()
    }
}

pub struct JsonMetaSchemaBuilder {
    uri: String,
    id_keyword: &'static str,
    keywords: HashMap<&'static str, KeywordFactory>,
    formats: HashMap<&'static str, FormatValidator>,
}

impl JsonMetaSchemaBuilder {
    pub fn keyword(mut self, name: &'static str, factory: KeywordFactory) -> Self {
        self.keywords.insert(name, factory);
        self
    }

    pub fn format(mut self, name: &'static str, validator: FormatValidator) -> Self {
        self.formats.insert(name, validator);
        self
    }

    pub fn build(self) -> JsonMetaSchema {
        JsonMetaSchema {
            uri: self.uri,
            id_keyword: self.id_keyword,
            keywords: self.keywords,
            formats: self.formats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn draft4_uses_id_not_dollar_id() {
        let meta = JsonMetaSchema::draft4();
        let schema = json!({"id": "http://example.com/schema.json"});
        assert_eq!(meta.id_of(&schema), Some("http://example.com/schema.json"));
    }

    #[test]
    fn unregistered_keyword_is_absent() {
        let meta = JsonMetaSchema::draft4();
        assert!(meta.keyword("unknownKeyword").is_none());
        assert!(meta.keyword("properties").is_some());
    }
}
