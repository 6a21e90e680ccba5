use std::convert::TryFrom;
use std::fmt;

use lazy_static::lazy_static;

use crate::lang::error::BuildError;

/// Keys that identify a node record's kind
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Tag {
    Null,
    Integer,
    Boolean,
    Print,
}

impl TryFrom<&str> for Tag {
    type Error = BuildError;

    fn try_from(t: &str) -> Result<Self, Self::Error> {
        Ok(match t {
            "Null" => Self::Null,
            "Integer" => Self::Integer,
            "Boolean" => Self::Boolean,
            "Print" => Self::Print,
            _ => return Err(BuildError::UnrecognizedNodeTag(t.to_string())),
        })
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tag::Null => write!(f, "Null"),
            Tag::Integer => write!(f, "Integer"),
            Tag::Boolean => write!(f, "Boolean"),
            Tag::Print => write!(f, "Print"),
        }
    }
}

lazy_static! {
    pub static ref TAGS: Vec<Tag> = vec![Tag::Null, Tag::Integer, Tag::Boolean, Tag::Print,];
}

/// Comma separated list of every known tag, for error messages
pub fn known_tags() -> String {
    TAGS.iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[test]
fn test_tag_names_round_trip() {
    for tag in &*TAGS {
        assert_eq!(Tag::try_from(tag.to_string().as_str()).unwrap(), *tag);
    }
}

#[test]
fn test_unknown_tag() {
    assert!(matches!(
        Tag::try_from("Float"),
        Err(BuildError::UnrecognizedNodeTag(t)) if t == "Float"
    ));
    // Tags are case sensitive
    assert!(Tag::try_from("integer").is_err());
}
