use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;

/// Name of the field holding the program's records
const ROOT_FIELD: &str = "Top";

/// Pull the `"Top"` records out of a parsed program document
pub fn program_records(document: Value) -> Result<Vec<Value>> {
    let mut root = match document {
        Value::Object(o) => o,
        _ => bail!("Program root is not an object"),
    };

    match root.remove(ROOT_FIELD) {
        Some(Value::Array(records)) => Ok(records),
        Some(_) => bail!("Field '{}' is not an array", ROOT_FIELD),
        None => bail!("Program is missing root field '{}'", ROOT_FIELD),
    }
}

/// Read and parse the program at `path`
pub fn load_program(path: &Path) -> Result<Vec<Value>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let document: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    program_records(document)
}

#[test]
fn test_program_records() {
    use serde_json::json;

    let records = program_records(json!({ "Top": [{ "Integer": 1 }, "Null"] })).unwrap();
    assert_eq!(records, vec![json!({ "Integer": 1 }), json!("Null")]);

    assert!(program_records(json!({ "Top": [] })).unwrap().is_empty());

    let bad = vec![
        json!([]),
        json!("Top"),
        json!({}),
        json!({ "Bottom": [] }),
        json!({ "Top": { "Integer": 1 } }),
    ];
    for document in bad {
        assert!(program_records(document).is_err());
    }
}

#[test]
fn test_load_program_missing_file() {
    assert!(load_program(Path::new("/nonexistent/program.json")).is_err());
}
