use std::fmt;

use thiserror::Error;

use crate::lang::tags::known_tags;

/// Failure to decode a record into a node
#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Unknown node: {0} (expected one of {})", known_tags())]
    UnrecognizedNodeTag(String),
    #[error("Record has no tag")]
    EmptyRecord,
    #[error("Expected a tagged record or \"Null\", found {0}")]
    MalformedRecord(String),
    #[error("Malformed {tag} payload: expected {expected}, found {found}")]
    MalformedPayload {
        tag: &'static str,
        expected: &'static str,
        found: String,
    },
    #[error("Print record is missing field '{0}'")]
    MissingField(&'static str),
    #[error("Print argument #{index} failed to build: {source}")]
    Argument {
        index: usize,
        #[source]
        source: Box<BuildError>,
    },
}

/// Failure while evaluating a built tree
#[derive(Error, Debug)]
pub enum EvalError {
    #[error("Format placeholder #{placeholder} has no argument ({available} available)")]
    FormatArgumentUnderflow { placeholder: usize, available: usize },
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),
}

/// A recovered condition
///
/// Diagnostics never stop building or evaluation; they are collected and handed back to the
/// caller.
#[derive(Debug)]
pub enum Diagnostic {
    /// Record at `index` in the program root
    Build { index: usize, error: BuildError },
    /// `selector` is `None` when the template ends with a lone `\`
    MalformedEscape {
        position: usize,
        selector: Option<char>,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Build { index, error } => write!(f, "Record #{}: {}", index, error),
            Diagnostic::MalformedEscape {
                position,
                selector: Some(c),
            } => write!(
                f,
                "Unexpected character {:?} in formatting string at {}",
                c, position
            ),
            Diagnostic::MalformedEscape {
                position,
                selector: None,
            } => write!(f, "Dangling escape at end of formatting string ({})", position),
        }
    }
}

/// Short description of a json value for error messages
pub(crate) fn describe(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => "null".to_string(),
        serde_json::Value::Bool(b) => format!("boolean {}", b),
        serde_json::Value::Number(n) => format!("number {}", n),
        serde_json::Value::String(s) => format!("string {:?}", s),
        serde_json::Value::Array(a) => format!("array of {} elements", a.len()),
        serde_json::Value::Object(o) => format!("object with {} keys", o.len()),
    }
}

#[test]
fn test_messages() {
    let err = BuildError::UnrecognizedNodeTag("Float".to_string());
    assert_eq!(
        err.to_string(),
        "Unknown node: Float (expected one of Null, Integer, Boolean, Print)"
    );

    let err = EvalError::FormatArgumentUnderflow {
        placeholder: 2,
        available: 1,
    };
    assert_eq!(
        err.to_string(),
        "Format placeholder #2 has no argument (1 available)"
    );

    let diag = Diagnostic::MalformedEscape {
        position: 3,
        selector: Some('q'),
    };
    assert_eq!(
        diag.to_string(),
        "Unexpected character 'q' in formatting string at 3"
    );
}
