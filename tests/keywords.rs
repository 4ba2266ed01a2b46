//! Table-driven coverage of the Draft 4 keyword set end to end, through the
//! public `SchemaFactory` surface rather than any single keyword module.
use schema4::SchemaFactory;
use serde_json::{json, Value};
use test_case::test_case;

fn is_valid(schema: Value, instance: Value) -> bool {
    SchemaFactory::get_instance().get_schema(schema).unwrap().is_valid(&instance)
}

#[test_case(json!({"type": "string"}), json!("hi"), true; "type string matches a string")]
#[test_case(json!({"type": "string"}), json!(1), false; "type string rejects a number")]
#[test_case(json!({"type": "integer"}), json!(3.5), false; "type integer rejects a fractional number")]
#[test_case(json!({"type": "integer"}), json!(3.0), true; "type integer accepts an integral float")]
#[test_case(json!({"type": ["string", "null"]}), Value::Null, true; "type array accepts any listed type")]
#[test_case(json!({"enum": [1, 2, 3]}), json!(2), true; "enum accepts a listed value")]
#[test_case(json!({"enum": [1, 2, 3]}), json!(4), false; "enum rejects an unlisted value")]
#[test_case(json!({"const": {"a": 1}}), json!({"a": 1.0}), true; "const compares numbers by value")]
#[test_case(json!({"allOf": [{"type": "integer"}, {"minimum": 0}]}), json!(5), true; "allOf requires every branch")]
#[test_case(json!({"allOf": [{"type": "integer"}, {"minimum": 0}]}), json!(-5), false; "allOf fails if one branch fails")]
#[test_case(json!({"anyOf": [{"type": "integer"}, {"type": "string"}]}), json!("x"), true; "anyOf accepts if any branch passes")]
#[test_case(json!({"oneOf": [{"type": "integer"}, {"type": "number"}]}), json!(1), false; "oneOf rejects when more than one branch passes")]
#[test_case(json!({"not": {"type": "integer"}}), json!("x"), true; "not accepts when the sub-schema fails")]
#[test_case(json!({"not": {}}), json!(1), false; "not rejects when the sub-schema always passes")]
#[test_case(json!({"properties": {"a": {"type": "string"}}}), json!({"a": 1}), false; "properties checks a matching key's value")]
#[test_case(json!({"properties": {"a": {"type": "string"}}}), json!({"b": 1}), true; "properties ignores non-matching keys")]
#[test_case(json!({"patternProperties": {"^s_": {"type": "string"}}}), json!({"s_x": 1}), false; "patternProperties matches by key regex")]
#[test_case(json!({"additionalProperties": false, "properties": {"a": {}}}), json!({"a": 1, "b": 2}), false; "additionalProperties false rejects extras")]
#[test_case(json!({"additionalProperties": {"type": "integer"}, "properties": {"a": {}}}), json!({"a": 1, "b": 2}), true; "additionalProperties schema validates extras")]
#[test_case(json!({"required": ["a"]}), json!({}), false; "required reports a missing key")]
#[test_case(json!({"minProperties": 2}), json!({"a": 1}), false; "minProperties enforces a lower bound")]
#[test_case(json!({"maxProperties": 1}), json!({"a": 1, "b": 2}), false; "maxProperties enforces an upper bound")]
#[test_case(json!({"dependencies": {"a": ["b"]}}), json!({"a": 1}), false; "dependencies enforces array form as implicit required")]
#[test_case(json!({"dependencies": {"a": {"required": ["b"]}}}), json!({"a": 1, "b": 2}), true; "dependencies enforces schema form")]
#[test_case(json!({"items": {"type": "integer"}}), json!([1, 2, "x"]), false; "items single schema applies to every element")]
#[test_case(json!({"items": [{"type": "integer"}], "additionalItems": false}), json!([1, 2]), false; "additionalItems false rejects excess elements")]
#[test_case(json!({"minItems": 2}), json!([1]), false; "minItems enforces a lower bound")]
#[test_case(json!({"maxItems": 1}), json!([1, 2]), false; "maxItems enforces an upper bound")]
#[test_case(json!({"uniqueItems": true}), json!([1, 2, 1]), false; "uniqueItems rejects duplicates")]
#[test_case(json!({"minLength": 3}), json!("ab"), false; "minLength enforces a lower bound")]
#[test_case(json!({"maxLength": 1}), json!("ab"), false; "maxLength enforces an upper bound")]
#[test_case(json!({"pattern": "^a"}), json!("banana"), false; "pattern anchors at the start when written that way")]
#[test_case(json!({"pattern": "nan"}), json!("banana"), true; "pattern matches as an unanchored subsequence")]
#[test_case(json!({"format": "email"}), json!("not-an-email"), false; "format dispatches to the named checker")]
#[test_case(json!({"format": "made-up"}), json!("anything"), true; "format ignores an unregistered name")]
#[test_case(json!({"minimum": 1}), json!(0), false; "minimum enforces a lower bound")]
#[test_case(json!({"maximum": 1, "exclusiveMaximum": true}), json!(1), false; "exclusiveMaximum tightens the boundary")]
#[test_case(json!({"multipleOf": 0.1}), json!(0.2), true; "multipleOf handles decimal factors")]
#[test_case(json!({"multipleOf": 2}), json!(3), false; "multipleOf rejects a non-multiple")]
fn keyword_table(schema: Value, instance: Value, expected: bool) {
    assert_eq!(is_valid(schema, instance), expected);
}

#[test]
fn empty_schema_accepts_everything() {
    assert!(is_valid(json!({}), json!(null)));
    assert!(is_valid(json!({}), json!([1, 2, 3])));
    assert!(is_valid(json!(true), json!("anything")));
}

#[test]
fn false_schema_rejects_everything() {
    assert!(!is_valid(json!(false), json!(null)));
    assert!(!is_valid(json!(false), json!(1)));
}
