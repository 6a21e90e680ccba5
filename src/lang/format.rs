//! The `Print` formatting mini-language.
//!
//! `~` is a placeholder: it is replaced by the rendered form of the next argument. `\` starts a
//! two character escape:
//!
//! | escape | output |
//! |--------|--------|
//! | `\~`   | `~`    |
//! | `\n`   | LF     |
//! | `\"`   | `"`    |
//! | `\r`   | CR     |
//! | `\t`   | TAB    |
//! | `\\`   | `\`    |
//!
//! Anything else is copied verbatim.

use log::warn;

use crate::lang::ast::Node;
use crate::lang::error::{Diagnostic, EvalError};

fn escape(selector: char) -> Option<char> {
    match selector {
        '~' => Some('~'),
        'n' => Some('\n'),
        '"' => Some('"'),
        'r' => Some('\r'),
        't' => Some('\t'),
        '\\' => Some('\\'),
        _ => None,
    }
}

/// Expand `template` against `arguments`
///
/// Malformed escapes are pushed onto `diagnostics` as they are seen, so they survive a later
/// failure. Unused trailing arguments are ignored. Running out of arguments is a hard error.
pub fn format(
    template: &str,
    arguments: &[Node],
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<String, EvalError> {
    let mut text = String::new();
    let mut next_arg = 0;
    let mut chars = template.chars().enumerate();

    while let Some((position, c)) = chars.next() {
        match c {
            '\\' => {
                let selector = chars.next().map(|(_, s)| s);
                match selector.and_then(escape) {
                    Some(e) => text.push(e),
                    None => {
                        let diag = Diagnostic::MalformedEscape { position, selector };
                        warn!("{}", diag);
                        diagnostics.push(diag);
                    }
                }
            }
            '~' => {
                let arg = arguments
                    .get(next_arg)
                    .ok_or(EvalError::FormatArgumentUnderflow {
                        placeholder: next_arg,
                        available: arguments.len(),
                    })?;
                text += &arg.render();
                next_arg += 1;
            }
            c => text.push(c),
        }
    }

    Ok(text)
}

#[test]
fn test_format() {
    let tests = vec![
        ("~", vec![Node::Integer(42)], "42"),
        ("\\n\\t\\~", vec![], "\n\t~"),
        (
            "a~b~",
            vec![Node::Integer(1), Node::Boolean(false)],
            "a1bfalse",
        ),
        ("\\\"quoted\\\"", vec![], "\"quoted\""),
        ("\\r\\\\", vec![], "\r\\"),
        ("no placeholders", vec![Node::Integer(1)], "no placeholders"),
        ("~ ~", vec![Node::Null, Node::Integer(-3), Node::Null], "null -3"),
        ("", vec![], ""),
        ("é~ü", vec![Node::Boolean(true)], "étrueü"),
        ("[~]", vec![Node::Print("~".to_string(), vec![])], "[]"),
    ];

    for (template, args, expected) in tests {
        let mut diagnostics = Vec::new();
        assert_eq!(format(template, &args, &mut diagnostics).unwrap(), expected);
        assert!(diagnostics.is_empty());
    }
}

#[test]
fn test_malformed_escape() {
    let mut diagnostics = Vec::new();
    let text = format("a\\qb~", &[Node::Integer(7)], &mut diagnostics).unwrap();
    assert_eq!(text, "ab7");
    assert_eq!(diagnostics.len(), 1);
    assert!(matches!(
        diagnostics[0],
        Diagnostic::MalformedEscape {
            position: 1,
            selector: Some('q')
        }
    ));

    // An escaped `~` is not a placeholder, even if the escape before it was malformed
    let mut diagnostics = Vec::new();
    assert_eq!(format("\\x\\~", &[], &mut diagnostics).unwrap(), "~");
    assert_eq!(diagnostics.len(), 1);

    let mut diagnostics = Vec::new();
    assert_eq!(format("end\\", &[], &mut diagnostics).unwrap(), "end");
    assert!(matches!(
        diagnostics[0],
        Diagnostic::MalformedEscape {
            position: 3,
            selector: None
        }
    ));
}

#[test]
fn test_underflow() {
    let mut diagnostics = Vec::new();
    let res = format("~ and ~", &[Node::Integer(1)], &mut diagnostics);
    assert!(matches!(
        res,
        Err(EvalError::FormatArgumentUnderflow {
            placeholder: 1,
            available: 1
        })
    ));

    assert!(format("~", &[], &mut diagnostics).is_err());

    // Escapes seen before the missing argument are still reported
    let mut diagnostics = Vec::new();
    assert!(format("\\q~~", &[Node::Integer(1)], &mut diagnostics).is_err());
    assert_eq!(diagnostics.len(), 1);
}
