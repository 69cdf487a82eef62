//! Syntactic validation: parse raw text as JSON.
//!
//! This stage is synchronous and runs before any semantic or network step.
//! The parser's own diagnostic is surfaced verbatim — serde_json reports
//! line and column, which is exactly what a user fixing a hand-edited
//! document needs, so we never paraphrase it.

use crate::error::Oas2DocsError;
use crate::pipeline::acquire::RawInput;
use serde_json::Value;

/// A successfully parsed JSON document.
///
/// Exists only if syntactic validation succeeded. Immutable once produced;
/// the next successful parse yields a new instance rather than mutating
/// this one.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument(Value);

impl ParsedDocument {
    /// Borrow the underlying JSON value.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Consume the document and return the underlying JSON value.
    pub fn into_json(self) -> Value {
        self.0
    }
}

/// Parse raw text as JSON.
///
/// # Errors
///
/// [`Oas2DocsError::MalformedJson`] carrying the parser's diagnostic
/// verbatim for any input that is not a single well-formed JSON value.
pub fn parse(raw: &str) -> Result<ParsedDocument, Oas2DocsError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| Oas2DocsError::MalformedJson {
        detail: e.to_string(),
    })?;
    Ok(ParsedDocument(value))
}

/// Parse the text carried by an acquired input.
pub fn parse_input(input: &RawInput) -> Result<ParsedDocument, Oas2DocsError> {
    parse(input.text())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_json_parses() {
        let doc = parse(r#"{"openapi":"3.0.0","info":{},"paths":{}}"#).unwrap();
        assert_eq!(doc.as_json()["openapi"], json!("3.0.0"));
    }

    #[test]
    fn malformed_json_carries_parser_detail() {
        let err = parse("{not json").unwrap_err();
        match err {
            Oas2DocsError::MalformedJson { detail } => {
                // serde_json reports position information; we must not
                // swallow it.
                assert!(
                    detail.contains("line") || detail.contains("column"),
                    "diagnostic lost parser detail: {detail}"
                );
            }
            other => panic!("expected MalformedJson, got {other:?}"),
        }
    }

    #[test]
    fn empty_string_is_malformed() {
        assert!(matches!(
            parse(""),
            Err(Oas2DocsError::MalformedJson { .. })
        ));
    }

    #[test]
    fn trailing_garbage_is_malformed() {
        assert!(matches!(
            parse("{} trailing"),
            Err(Oas2DocsError::MalformedJson { .. })
        ));
    }

    #[test]
    fn non_object_roots_still_parse_syntactically() {
        // Rejecting non-object roots is the semantic validator's job, with
        // a schema diagnostic rather than a parse error.
        assert!(parse("[1, 2, 3]").is_ok());
        assert!(parse("\"just a string\"").is_ok());
    }
}
