use std::fmt;

/// A single executable node of a program
///
/// Every node owns its children by value, so a tree can never share or cycle.
#[derive(Debug, PartialEq, Clone)]
pub enum Node {
    Null,
    /// All integers are represented as 64 bit signed
    Integer(i64),
    Boolean(bool),
    /// (format, arguments)
    Print(String, Vec<Node>),
    /// Program root
    Sequence(Vec<Node>),
}

impl Node {
    /// Textual form used when the node is interpolated into `Print` output
    ///
    /// Statements (`Print` and `Sequence`) have no textual form and render as an empty string.
    pub fn render(&self) -> String {
        match self {
            Node::Null => "null".to_string(),
            Node::Integer(i) => i.to_string(),
            Node::Boolean(b) => (if *b { "true" } else { "false" }).to_string(),
            Node::Print(_, _) | Node::Sequence(_) => String::new(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Print(format, args) => write!(f, "Print({:?}, {} args)", format, args.len()),
            Node::Sequence(nodes) => write!(f, "Sequence({} nodes)", nodes.len()),
            n => write!(f, "{}", n.render()),
        }
    }
}

#[test]
fn test_render() {
    let tests = vec![
        (Node::Null, "null"),
        (Node::Integer(0), "0"),
        (Node::Integer(42), "42"),
        (Node::Integer(-17), "-17"),
        (Node::Integer(i64::MAX), "9223372036854775807"),
        (Node::Integer(i64::MIN), "-9223372036854775808"),
        (Node::Boolean(true), "true"),
        (Node::Boolean(false), "false"),
        (Node::Print("~".to_string(), vec![Node::Integer(1)]), ""),
        (Node::Sequence(vec![Node::Null]), ""),
    ];

    for (node, expected) in tests {
        assert_eq!(node.render(), expected);
    }
}
