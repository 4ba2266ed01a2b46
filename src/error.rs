use std::fmt;

/// Errors raised while building a [`crate::CompiledSchema`]. These never
/// describe an instance failing validation — that information is returned as
/// a [`crate::message::MessageSet`], not raised as an error. See
/// `ValidationErrorKind` in older jsonschema-rs snapshots for the symmetrical
/// per-keyword variant this crate deliberately does not carry over: this
/// enum only covers failures to *compile*.
#[derive(Debug)]
pub enum CompilationError {
    /// The factory/builder was given contradictory or incomplete settings,
    /// e.g. a `defaultMetaSchemaUri` that does not name a registered
    /// `JsonMetaSchema`.
    InvalidConfiguration(String),
    /// `$schema` named a URI with no matching registered `JsonMetaSchema`.
    UnknownMetaSchema(String),
    /// The raw input (string, reader, URL response) could not be parsed as
    /// JSON, or the network/filesystem fetch failed outright.
    SchemaLoadError(String),
    /// A `$ref` could not be resolved: unknown scheme, fetch failure, or a
    /// fragment that does not resolve against the target document.
    UnresolvableReference(String),
    /// A keyword's value had the wrong JSON shape, e.g. `required` given a
    /// string instead of an array of strings.
    SchemaError(String),
}

impl fmt::Display for CompilationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompilationError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {}", message)
            }
            CompilationError::UnknownMetaSchema(uri) => {
                write!(f, "unknown meta-schema: '{}'", uri)
            }
            CompilationError::SchemaLoadError(message) => {
                write!(f, "failed to load schema: {}", message)
            }
            CompilationError::UnresolvableReference(reference) => {
                write!(f, "unresolvable reference: '{}'", reference)
            }
            CompilationError::SchemaError(message) => {
                write!(f, "invalid schema: {}", message)
            }
        }
    }
}

impl std::error::Error for CompilationError {}

impl From<serde_json::Error> for CompilationError {
    fn from(error: serde_json::Error) -> Self {
        CompilationError::SchemaLoadError(error.to_string())
    }
}

impl From<std::io::Error> for CompilationError {
    fn from(error: std::io::Error) -> Self {
        CompilationError::SchemaLoadError(error.to_string())
    }
}

impl From<url::ParseError> for CompilationError {
    fn from(error: url::ParseError) -> Self {
        CompilationError::UnresolvableReference(error.to_string())
    }
}

impl From<regex::Error> for CompilationError {
    fn from(error: regex::Error) -> Self {
        CompilationError::SchemaError(format!("invalid pattern: {}", error))
    }
}
