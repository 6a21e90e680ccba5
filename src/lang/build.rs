//! Decodes json records into executable nodes.
//!
//! A record is either the bare string `"Null"` or an object mapping a tag to its payload, eg.
//! `{"Integer": 3}` or `{"Print": {"format": "~\n", "arguments": [{"Boolean": true}]}}`.
//!
//! Every shape mismatch surfaces as a `BuildError` here so evaluation never has to look at json.

use std::convert::TryFrom;

use log::{info, warn};
use serde_json::Value;

use crate::lang::ast::Node;
use crate::lang::error::{describe, BuildError, Diagnostic};
use crate::lang::tags::Tag;

type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum BuildMode {
    /// Records that fail to build are reported and left out of the program
    Lenient,
    /// The first record that fails to build aborts the whole build
    Strict,
}

pub struct Builder {
    mode: BuildMode,
    /// Index of the root record currently being built
    index: usize,
    diagnostics: Vec<Diagnostic>,
}

impl Builder {
    pub fn new(mode: BuildMode) -> Self {
        Self {
            mode,
            index: 0,
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, error: BuildError) {
        warn!("Record #{}: {}", self.index, error);
        self.diagnostics.push(Diagnostic::Build {
            index: self.index,
            error,
        });
    }

    fn build_print(&mut self, payload: &Value) -> BuildResult<Node> {
        let fields = payload
            .as_object()
            .ok_or_else(|| BuildError::MalformedPayload {
                tag: "Print",
                expected: "object",
                found: describe(payload),
            })?;

        let format = match fields.get("format") {
            Some(Value::String(s)) => s.clone(),
            Some(v) => {
                return Err(BuildError::MalformedPayload {
                    tag: "Print",
                    expected: "string format",
                    found: describe(v),
                })
            }
            None => return Err(BuildError::MissingField("format")),
        };

        let records: &[Value] = match fields.get("arguments") {
            Some(Value::Array(a)) => a,
            None | Some(Value::Null) => &[],
            Some(v) => {
                return Err(BuildError::MalformedPayload {
                    tag: "Print",
                    expected: "array of arguments",
                    found: describe(v),
                })
            }
        };

        let mut arguments = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            info!("Building argument #{}: {}", index, record);
            let arg = self.build(record).map_err(|e| BuildError::Argument {
                index,
                source: Box::new(e),
            })?;
            arguments.push(arg);
        }

        Ok(Node::Print(format, arguments))
    }

    fn build_tagged(&mut self, tag: Tag, payload: &Value) -> BuildResult<Node> {
        let node = match tag {
            Tag::Null => Node::Null,
            Tag::Integer => {
                Node::Integer(payload.as_i64().ok_or_else(|| BuildError::MalformedPayload {
                    tag: "Integer",
                    expected: "64 bit signed integer",
                    found: describe(payload),
                })?)
            }
            Tag::Boolean => {
                Node::Boolean(payload.as_bool().ok_or_else(|| BuildError::MalformedPayload {
                    tag: "Boolean",
                    expected: "boolean",
                    found: describe(payload),
                })?)
            }
            Tag::Print => self.build_print(payload)?,
        };

        Ok(node)
    }

    /// Build a single record (and, for `Print`, its arguments)
    ///
    /// Keys of a record are visited in order and the first recognized tag wins. Unrecognized keys
    /// seen before it are reported as diagnostics. In strict mode any unrecognized key fails the
    /// record, wherever it sits.
    pub fn build(&mut self, record: &Value) -> BuildResult<Node> {
        let fields = match record {
            Value::String(s) if s == "Null" => return Ok(Node::Null),
            Value::Object(fields) => fields,
            v => return Err(BuildError::MalformedRecord(describe(v))),
        };

        if self.mode == BuildMode::Strict {
            for key in fields.keys() {
                Tag::try_from(key.as_str())?;
            }
        }

        let mut unknown = Vec::new();
        for (key, payload) in fields {
            match Tag::try_from(key.as_str()) {
                Ok(tag) => {
                    for e in unknown {
                        self.report(e);
                    }
                    return self.build_tagged(tag, payload);
                }
                Err(e) => unknown.push(e),
            }
        }

        let mut unknown = unknown.into_iter();
        match unknown.next() {
            Some(first) => {
                for e in unknown {
                    self.report(e);
                }
                Err(first)
            }
            None => Err(BuildError::EmptyRecord),
        }
    }

    /// Build the program root out of the elements of the `"Top"` array
    pub fn build_root(&mut self, top: &[Value]) -> BuildResult<Node> {
        let mut nodes = Vec::with_capacity(top.len());

        for (index, record) in top.iter().enumerate() {
            self.index = index;
            info!("Building record #{}: {}", index, record);

            match self.build(record) {
                Ok(node) => nodes.push(node),
                Err(e) => match self.mode {
                    BuildMode::Strict => return Err(e),
                    BuildMode::Lenient => self.report(e),
                },
            }
        }

        Ok(Node::Sequence(nodes))
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
fn build(record: Value) -> BuildResult<Node> {
    Builder::new(BuildMode::Lenient).build(&record)
}

#[test]
fn test_build_literals() {
    use serde_json::json;

    let tests = vec![
        (json!("Null"), Node::Null),
        (json!({ "Null": null }), Node::Null),
        (json!({ "Null": 12 }), Node::Null),
        (json!({ "Integer": 42 }), Node::Integer(42)),
        (json!({ "Integer": -7 }), Node::Integer(-7)),
        (json!({ "Boolean": true }), Node::Boolean(true)),
        (json!({ "Boolean": false }), Node::Boolean(false)),
    ];

    for (record, expected) in tests {
        assert_eq!(build(record).unwrap(), expected);
    }
}

#[test]
fn test_build_print() {
    use serde_json::json;

    let record = json!({
        "Print": {
            "format": "a~b~",
            "arguments": [{ "Integer": 1 }, { "Boolean": false }, "Null"]
        }
    });
    assert_eq!(
        build(record).unwrap(),
        Node::Print(
            "a~b~".to_string(),
            vec![Node::Integer(1), Node::Boolean(false), Node::Null]
        )
    );

    // Missing arguments are treated as none
    let record = json!({ "Print": { "format": "hi" } });
    assert_eq!(
        build(record).unwrap(),
        Node::Print("hi".to_string(), vec![])
    );
}

#[test]
fn test_build_malformed() {
    use serde_json::json;

    let tests = vec![
        json!("null"),
        json!(3),
        json!({}),
        json!({ "Integer": "3" }),
        json!({ "Integer": 1.5 }),
        json!({ "Integer": 18446744073709551615u64 }),
        json!({ "Boolean": 1 }),
        json!({ "Print": "~" }),
        json!({ "Print": { "arguments": [] } }),
        json!({ "Print": { "format": 3, "arguments": [] } }),
        json!({ "Print": { "format": "~", "arguments": { "Integer": 1 } } }),
    ];

    for record in tests {
        assert!(build(record).is_err());
    }

    assert!(matches!(build(json!({})), Err(BuildError::EmptyRecord)));
    assert!(matches!(
        build(json!({ "Print": { "arguments": [] } })),
        Err(BuildError::MissingField("format"))
    ));
}

#[test]
fn test_unrecognized_argument_fails_print() {
    use serde_json::json;

    let record = json!({
        "Print": {
            "format": "~~",
            "arguments": [{ "Integer": 1 }, { "Float": 2.5 }]
        }
    });

    match build(record) {
        Err(BuildError::Argument { index, source }) => {
            assert_eq!(index, 1);
            assert!(matches!(*source, BuildError::UnrecognizedNodeTag(ref t) if t == "Float"));
        }
        _ => assert!(false),
    }
}

#[test]
fn test_multiple_keys() {
    use serde_json::json;

    // Keys are visited in sorted order: "Alpha" is reported, "Integer" is built
    let mut builder = Builder::new(BuildMode::Lenient);
    let node = builder
        .build(&json!({ "Integer": 5, "Alpha": 1 }))
        .unwrap();
    assert_eq!(node, Node::Integer(5));
    assert_eq!(builder.into_diagnostics().len(), 1);

    // Strict mode rejects unknown keys on either side of the tag
    let tests = vec![
        json!({ "Integer": 5, "Alpha": 1 }),
        json!({ "Integer": 5, "Zeta": 1 }),
    ];
    for record in tests {
        let mut builder = Builder::new(BuildMode::Strict);
        assert!(matches!(
            builder.build(&record),
            Err(BuildError::UnrecognizedNodeTag(_))
        ));
    }

    // Lenient mode stops at the first tag, later keys are never looked at
    let mut builder = Builder::new(BuildMode::Lenient);
    let node = builder.build(&json!({ "Integer": 5, "Zeta": 1 })).unwrap();
    assert_eq!(node, Node::Integer(5));
    assert!(builder.into_diagnostics().is_empty());

    // No recognized key at all: first key is the error, the rest are reported
    let mut builder = Builder::new(BuildMode::Lenient);
    let res = builder.build(&json!({ "Bar": 1, "Foo": 2 }));
    assert!(matches!(res, Err(BuildError::UnrecognizedNodeTag(ref t)) if t == "Bar"));
    assert_eq!(builder.into_diagnostics().len(), 1);
}

#[test]
fn test_build_root() {
    use serde_json::json;

    let top = vec![
        json!({ "Integer": 1 }),
        json!({ "Unknown": 2 }),
        json!({ "Boolean": true }),
    ];

    let mut builder = Builder::new(BuildMode::Lenient);
    let root = builder.build_root(&top).unwrap();
    assert_eq!(
        root,
        Node::Sequence(vec![Node::Integer(1), Node::Boolean(true)])
    );

    let diagnostics = builder.into_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    match &diagnostics[0] {
        Diagnostic::Build { index, error } => {
            assert_eq!(*index, 1);
            assert!(matches!(error, BuildError::UnrecognizedNodeTag(t) if t == "Unknown"));
        }
        _ => assert!(false),
    }

    let mut builder = Builder::new(BuildMode::Strict);
    assert!(builder.build_root(&top).is_err());

    let mut builder = Builder::new(BuildMode::Lenient);
    assert_eq!(builder.build_root(&[]).unwrap(), Node::Sequence(vec![]));
    assert!(builder.into_diagnostics().is_empty());
}
