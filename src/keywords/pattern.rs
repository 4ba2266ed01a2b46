use std::rc::Rc;

use regex::Regex;
use serde_json::{Map, Value};

use crate::context::CompilationContext;
use crate::error::CompilationError;
use crate::keywords::{CompilationResult, Validate};
use crate::message::{MessageSet, ValidationMessage, ValidatorTypeCode};
use crate::path::{Path, SchemaPath};

lazy_static::lazy_static! {
    static ref CONTROL_GROUPS_RE: Regex = Regex::new(r"\(\?P?<([^>]+)>").expect("valid regex");
}

/// A best-effort translation from ECMA 262 regex syntax (what JSON Schema's
/// `pattern` keyword is specified against) to the subset the `regex` crate
/// accepts. `regex` has no backtracking engine, so lookaround and
/// backreferences are not supported and patterns using them will fail to
/// compile rather than silently behave differently — that divergence is
/// intentional and documented here rather than worked around with an
/// alternate backtracking engine.
pub fn translate_ecma_regex(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some('d') => {
                    out.push_str("[0-9]");
                    chars.next();
                }
                Some('D') => {
                    out.push_str("[^0-9]");
                    chars.next();
                }
                Some('w') => {
                    out.push_str("[A-Za-z0-9_]");
                    chars.next();
                }
                Some('W') => {
                    out.push_str("[^A-Za-z0-9_]");
                    chars.next();
                }
                _ => out.push(ch),
            }
        } else {
            out.push(ch);
        }
    }
    CONTROL_GROUPS_RE.replace_all(&out, "(?P<$1>").to_string()
}

struct PatternValidator {
    regex: Regex,
    schema_path: SchemaPath,
}

impl Validate for PatternValidator {
    fn is_valid(&self, instance: &Value) -> bool {
        match instance.as_str() {
            Some(string) => self.regex.is_match(string),
            None => true,
        }
    }

    fn validate(&self, instance: &Value, at: &Rc<Path>) -> MessageSet {
        if self.is_valid(instance) {
            return MessageSet::new();
        }
        MessageSet::single(ValidationMessage::new(
            ValidatorTypeCode::Pattern,
            Rc::clone(at),
            self.schema_path.clone(),
            vec![self.regex.as_str().to_string()],
            format!(
                "'{}' does not match the pattern '{}'",
                instance.as_str().unwrap_or_default(),
                self.regex.as_str()
            ),
        ))
    }

    fn name(&self) -> &'static str {
        "pattern"
    }
}

pub fn compile(
    _object: &Map<String, Value>,
    value: &Value,
    ctx: &CompilationContext,
) -> Option<CompilationResult> {
    let pattern = match value.as_str() {
        Some(pattern) => pattern,
        None => {
            return Some(Err(CompilationError::SchemaError(
                "'pattern' must be a string".to_string(),
            )))
        }
    };
    let regex = match Regex::new(&translate_ecma_regex(pattern)) {
        Ok(regex) => regex,
        Err(err) => return Some(Err(err.into())),
    };
    Some(Ok(Box::new(PatternValidator {
        regex,
        schema_path: ctx.schema_path.push("pattern"),
    })))
}
