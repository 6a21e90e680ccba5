use std::io::Write;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::lang::build::{BuildMode, Builder};
use crate::lang::error::Diagnostic;
use crate::lang::eval::Eval;

/// Outcome of a run
///
/// Diagnostics are kept even when the run fails hard, so whatever was recovered before the
/// failure can still be reported.
pub struct Report {
    /// What the program root evaluated to, or why building or evaluating it failed
    pub value: Result<i64>,
    /// Build diagnostics followed by format diagnostics
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Runtime<'a> {
    builder: Builder,
    eval: Eval<'a>,
}

impl<'a> Runtime<'a> {
    /// Create a new `Runtime` instance
    ///
    /// `sink` is where output should be written. eg. result of `Print` nodes
    ///
    /// `mode` decides whether records that fail to build are skipped or abort the run
    pub fn new(sink: &'a mut dyn Write, mode: BuildMode) -> Self {
        Self {
            builder: Builder::new(mode),
            eval: Eval::new(sink),
        }
    }

    /// Build the program out of the `"Top"` records and evaluate it once
    pub fn run(mut self, top: &[Value]) -> Report {
        let value = match self.builder.build_root(top) {
            Ok(root) => self.eval.eval(&root).context("Failed to run program"),
            Err(e) => Err(e).context("Failed to build program"),
        };

        let mut diagnostics = self.builder.into_diagnostics();
        diagnostics.extend(self.eval.into_diagnostics());

        Report { value, diagnostics }
    }
}

#[test]
fn test_run() {
    use serde_json::json;

    let top = vec![
        json!({ "Print": { "format": "Hello, ~!\\n", "arguments": [{ "Integer": 7 }] } }),
        json!({ "Mystery": 1 }),
        json!("Null"),
        json!({ "Print": { "format": "~ \\z~\\n", "arguments": ["Null", { "Boolean": true }] } }),
    ];

    let mut output = Vec::new();
    let report = Runtime::new(&mut output, BuildMode::Lenient).run(&top);

    assert_eq!(report.value.unwrap(), 1);
    assert_eq!(report.diagnostics.len(), 2);
    assert!(matches!(
        report.diagnostics[0],
        Diagnostic::Build { index: 1, .. }
    ));
    assert!(matches!(
        report.diagnostics[1],
        Diagnostic::MalformedEscape {
            selector: Some('z'),
            ..
        }
    ));
    assert_eq!(
        String::from_utf8(output).expect("Output not utf-8"),
        "Hello, 7!\nnull true\n"
    );
}

#[test]
fn test_run_strict() {
    use serde_json::json;

    let top = vec![
        json!({ "Print": { "format": "never printed", "arguments": [] } }),
        json!({ "Mystery": 1 }),
    ];

    let mut output = Vec::new();
    let report = Runtime::new(&mut output, BuildMode::Strict).run(&top);
    assert!(report.value.is_err());
    assert!(output.is_empty());
}

#[test]
fn test_run_underflow() {
    use crate::lang::error::EvalError;
    use serde_json::json;

    let top = vec![
        json!({ "Mystery": 1 }),
        json!({ "Print": { "format": "\\q~~", "arguments": [{ "Integer": 1 }] } }),
    ];

    let mut output = Vec::new();
    let report = Runtime::new(&mut output, BuildMode::Lenient).run(&top);

    let err = report.value.err().unwrap();
    assert!(matches!(
        err.downcast_ref::<EvalError>(),
        Some(EvalError::FormatArgumentUnderflow {
            placeholder: 1,
            available: 1
        })
    ));

    // Everything recovered before the failure is still reported
    assert_eq!(report.diagnostics.len(), 2);
    assert!(matches!(
        report.diagnostics[0],
        Diagnostic::Build { index: 0, .. }
    ));
    assert!(matches!(
        report.diagnostics[1],
        Diagnostic::MalformedEscape {
            position: 0,
            selector: Some('q')
        }
    ));
    assert!(output.is_empty());
}
