//! Whole-crate coverage of the testable properties a conforming
//! implementation must satisfy, independent of any single keyword.
use std::rc::Rc;

use schema4::{Path, SchemaFactory};
use serde_json::json;

fn compile(schema: serde_json::Value) -> std::sync::Arc<schema4::CompiledSchema> {
    SchemaFactory::get_instance().get_schema(schema).unwrap()
}

#[test]
fn determinism_across_repeated_calls() {
    let schema = compile(json!({
        "type": "object",
        "required": ["a", "b"],
        "properties": {"a": {"type": "integer"}, "b": {"minItems": 2}},
    }));
    let instance = json!({"a": "not an integer", "b": [1]});
    let first: Vec<_> = schema.validate_instance(&instance).iter().map(|m| m.code.clone()).collect();
    let second: Vec<_> = schema.validate_instance(&instance).iter().map(|m| m.code.clone()).collect();
    assert_eq!(first, second);
}

#[test]
fn empty_schema_passes_everything() {
    let schema = compile(json!({}));
    for instance in [json!(null), json!(1), json!("x"), json!([1, 2]), json!({"a": 1})] {
        assert!(schema.validate_instance(&instance).is_empty());
    }
}

#[test]
fn always_fail_schema_fails_everything() {
    let schema = compile(json!({"not": {}}));
    for instance in [json!(null), json!(1), json!("x"), json!([1, 2]), json!({"a": 1})] {
        assert!(!schema.validate_instance(&instance).is_empty());
    }
}

#[test]
fn type_mismatch_produces_exactly_one_message() {
    let schema = compile(json!({"type": "integer"}));
    let messages = schema.validate_instance(&json!(3.5));
    assert_eq!(messages.len(), 1);
    assert_eq!(messages.iter().next().unwrap().code, "type");
    assert_eq!(messages.iter().next().unwrap().path.to_string(), "$");
}

#[test]
fn one_of_is_empty_iff_exactly_one_branch_passes() {
    let schema = compile(json!({"oneOf": [{"minimum": 10}, {"maximum": 0}]}));
    assert!(schema.validate_instance(&json!(20)).is_empty());
    assert!(schema.validate_instance(&json!(-5)).is_empty());
    assert!(!schema.validate_instance(&json!(5)).is_empty());
}

#[test]
fn ref_transparency_matches_the_pointed_to_subschema() {
    let direct = compile(json!({"type": "integer", "minimum": 1}));
    let via_ref = compile(json!({
        "definitions": {"pos": {"type": "integer", "minimum": 1}},
        "$ref": "#/definitions/pos",
    }));
    for instance in [json!(0), json!(5), json!(-1), json!("x")] {
        let direct_codes: Vec<_> = direct.validate_instance(&instance).iter().map(|m| m.code.clone()).collect();
        let ref_codes: Vec<_> = via_ref.validate_instance(&instance).iter().map(|m| m.code.clone()).collect();
        assert_eq!(direct_codes, ref_codes);
    }
}

#[test]
fn min_length_counts_unicode_code_points_not_utf16_units() {
    let schema = compile(json!({"minLength": 1}));
    assert!(!schema.validate_instance(&json!("")).is_empty());
    assert!(schema.validate_instance(&json!("\u{1F642}")).is_empty());
}

#[test]
fn error_equality_ignores_rendered_message_text() {
    let root = Rc::new(Path::root());
    let a = schema4::ValidationMessage::new(
        schema4::ValidatorTypeCode::MinItems,
        Rc::clone(&root),
        schema4::SchemaPath::root(),
        vec!["2".into()],
        "rendered text A",
    );
    let b = schema4::ValidationMessage::new(
        schema4::ValidatorTypeCode::MinItems,
        Rc::clone(&root),
        schema4::SchemaPath::root(),
        vec!["2".into()],
        "a completely different rendering of the same failure",
    );
    assert_eq!(a, b);
}

#[test]
fn scenario_required_reports_missing_property_name() {
    let schema = compile(json!({
        "properties": {"a": {"type": "string"}},
        "required": ["a"],
    }));
    let messages = schema.validate_instance(&json!({}));
    assert_eq!(messages.len(), 1);
    let message = messages.iter().next().unwrap();
    assert_eq!(message.code, "required");
    assert!(message.arguments.iter().any(|arg| arg == "a"));
}
