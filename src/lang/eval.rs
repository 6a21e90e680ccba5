use std::io::Write;

use log::info;

use crate::lang::ast::Node;
use crate::lang::error::{Diagnostic, EvalError};
use crate::lang::format::format;

/// Result of evaluating a statement that has no value of its own
const SUCCESS: i64 = 1;

pub struct Eval<'a> {
    sink: &'a mut dyn Write,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Eval<'a> {
    /// Create a new `Eval` instance
    ///
    /// `sink` is where output should be written. eg. result of `Print` nodes
    pub fn new(sink: &'a mut dyn Write) -> Self {
        Self {
            sink,
            diagnostics: Vec::new(),
        }
    }

    fn eval_print(&mut self, template: &str, arguments: &[Node]) -> Result<i64, EvalError> {
        // Format fully before writing so an underflow never leaves half a line behind
        let text = format(template, arguments, &mut self.diagnostics)?;
        self.sink.write_all(text.as_bytes())?;
        self.sink.flush()?;

        Ok(SUCCESS)
    }

    /// Evaluate `node`, writing any output to the sink
    ///
    /// Nodes are never mutated, so evaluating the same tree twice produces the same output twice.
    pub fn eval(&mut self, node: &Node) -> Result<i64, EvalError> {
        info!("Evaluating {}", node);

        match node {
            Node::Null => Ok(0),
            Node::Integer(i) => Ok(*i),
            Node::Boolean(b) => Ok(*b as i64),
            Node::Print(template, arguments) => self.eval_print(template, arguments),
            Node::Sequence(nodes) => {
                for node in nodes {
                    self.eval(node)?;
                }

                Ok(SUCCESS)
            }
        }
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
fn print(template: &str, arguments: Vec<Node>) -> Node {
    Node::Print(template.to_string(), arguments)
}

#[test]
fn test_values() {
    let tests = vec![
        (Node::Null, 0),
        (Node::Integer(0), 0),
        (Node::Integer(-12), -12),
        (Node::Boolean(true), 1),
        (Node::Boolean(false), 0),
        (print("", vec![]), 1),
        (Node::Sequence(vec![]), 1),
        (Node::Sequence(vec![Node::Integer(5), Node::Null]), 1),
    ];

    for (node, expected) in tests {
        let mut output = Vec::new();
        let mut eval = Eval::new(&mut output);
        assert_eq!(eval.eval(&node).unwrap(), expected);
        assert!(output.is_empty());
    }
}

#[test]
fn test_print() {
    let tests = vec![
        (print("~", vec![Node::Integer(42)]), "42"),
        (print("\\n\\t\\~", vec![]), "\n\t~"),
        (
            print("a~b~", vec![Node::Integer(1), Node::Boolean(false)]),
            "a1bfalse",
        ),
        (
            Node::Sequence(vec![
                print("first\\n", vec![]),
                Node::Integer(3),
                print("~ second\\n", vec![Node::Null]),
            ]),
            "first\nnull second\n",
        ),
    ];

    for (node, expected) in tests {
        let mut output = Vec::new();
        let mut eval = Eval::new(&mut output);
        assert_eq!(eval.eval(&node).unwrap(), 1);
        assert_eq!(
            String::from_utf8(output).expect("Output not utf-8"),
            expected
        );
    }
}

#[test]
fn test_nested_print_not_evaluated() {
    let node = print("<~>", vec![print("inner", vec![])]);

    let mut output = Vec::new();
    let mut eval = Eval::new(&mut output);
    eval.eval(&node).unwrap();
    assert_eq!(String::from_utf8(output).expect("Output not utf-8"), "<>");
}

#[test]
fn test_underflow_stops_sequence() {
    let node = Node::Sequence(vec![
        print("one\\n", vec![]),
        print("two ~ ~\\n", vec![Node::Integer(2)]),
        print("three\\n", vec![]),
    ]);

    let mut output = Vec::new();
    let mut eval = Eval::new(&mut output);
    assert!(matches!(
        eval.eval(&node),
        Err(EvalError::FormatArgumentUnderflow { .. })
    ));
    assert_eq!(String::from_utf8(output).expect("Output not utf-8"), "one\n");
}

#[test]
fn test_idempotent() {
    let node = Node::Sequence(vec![
        print("~,", vec![Node::Integer(1)]),
        print("\\q~\\n", vec![Node::Boolean(true)]),
    ]);

    let mut output = Vec::new();
    let mut eval = Eval::new(&mut output);
    eval.eval(&node).unwrap();
    eval.eval(&node).unwrap();
    assert_eq!(eval.into_diagnostics().len(), 2);
    assert_eq!(
        String::from_utf8(output).expect("Output not utf-8"),
        "1,true\n1,true\n"
    );
}
