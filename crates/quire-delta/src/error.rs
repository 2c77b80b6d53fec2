use miette::Diagnostic;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum DeltaError {
    #[error("expected a sequence of operations, found {found}")]
    #[diagnostic(
        code(quire::delta::not_a_sequence),
        help("a delta is a JSON array of ops, or an object with an `ops` array")
    )]
    NotASequence { found: &'static str },

    #[error("malformed operation at index {index}")]
    #[diagnostic(code(quire::delta::malformed_op))]
    MalformedOp {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid delta json: {0}")]
    #[diagnostic(code(quire::delta::json))]
    Json(#[from] serde_json::Error),

    #[error("clipboard engine failed")]
    #[diagnostic(code(quire::delta::engine))]
    Engine(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Short name of a JSON value's type, for error messages.
pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
