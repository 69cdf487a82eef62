//! Semantic validation: is the parsed JSON a supported OpenAPI document?
//!
//! ## Check order matters
//!
//! Structural checks run first and the version gate runs last, so a
//! malformed 3.1 document reports "malformed" and a well-formed 3.1
//! document reports "unsupported version" — never the reverse. Reporting
//! an unsupported version on a document that is also structurally broken
//! would mislead the user about what to fix first.
//!
//! Validation is all-or-nothing per attempt: the verdict is either
//! `Valid` with the whole document or `Invalid` with the first violation
//! encountered, located by JSON-pointer path.

use crate::error::Oas2DocsError;
use crate::pipeline::parse::ParsedDocument;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Accepted `openapi` version strings: 3.0.0, 3.0.1, … — not 2.0, not 3.1.x.
static SUPPORTED_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^3\.0\.\d+$").expect("version pattern is valid"));

/// Outcome of semantic validation.
///
/// A document is never partially valid: `Valid` carries the full document
/// onward to dispatch, `Invalid` carries the first violation and the
/// document goes nowhere.
#[derive(Debug, Clone)]
pub enum ValidationVerdict {
    /// The document is a structurally valid OpenAPI 3.0.x document.
    Valid(ParsedDocument),
    /// The document violates the OpenAPI object schema or declares an
    /// unsupported version.
    Invalid(Oas2DocsError),
}

impl ValidationVerdict {
    /// Convert the verdict into a `Result`, consuming it.
    pub fn into_result(self) -> Result<ParsedDocument, Oas2DocsError> {
        match self {
            ValidationVerdict::Valid(doc) => Ok(doc),
            ValidationVerdict::Invalid(err) => Err(err),
        }
    }
}

/// Validate a parsed document against the OpenAPI 3.0 object schema.
///
/// Checks, in order:
/// 1. root is an object with required `openapi` / `info` / `paths` fields
///    of the right types (`info.title` and `info.version` non-empty strings,
///    path keys starting with `/`)
/// 2. every internal `$ref` resolves within the document
/// 3. the `openapi` version string matches `3.0.x`
pub fn validate(doc: ParsedDocument) -> ValidationVerdict {
    if let Err(e) = check_structure(doc.as_json()) {
        debug!("Semantic validation failed: {e}");
        return ValidationVerdict::Invalid(e);
    }
    if let Err(e) = check_refs(doc.as_json()) {
        debug!("Reference resolution failed: {e}");
        return ValidationVerdict::Invalid(e);
    }
    if let Err(e) = check_version(doc.as_json()) {
        debug!("Version gate failed: {e}");
        return ValidationVerdict::Invalid(e);
    }
    ValidationVerdict::Valid(doc)
}

/// Human-readable JSON type name for diagnostics.
fn type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Required top-level shape: `openapi` (string), `info` (object with
/// non-empty `title` and `version` strings), `paths` (object of `/…` keys
/// mapping to objects).
fn check_structure(root: &Value) -> Result<(), Oas2DocsError> {
    let obj = root.as_object().ok_or_else(|| Oas2DocsError::WrongType {
        pointer: String::new(),
        expected: "an object",
        actual: type_name(root),
    })?;

    let openapi = obj.get("openapi").ok_or(Oas2DocsError::MissingField {
        pointer: String::new(),
        field: "openapi",
    })?;
    if !openapi.is_string() {
        return Err(Oas2DocsError::WrongType {
            pointer: "/openapi".into(),
            expected: "a string",
            actual: type_name(openapi),
        });
    }

    let info = obj.get("info").ok_or(Oas2DocsError::MissingField {
        pointer: String::new(),
        field: "info",
    })?;
    let info_obj = info.as_object().ok_or_else(|| Oas2DocsError::WrongType {
        pointer: "/info".into(),
        expected: "an object",
        actual: type_name(info),
    })?;
    for field in ["title", "version"] {
        let value = info_obj.get(field).ok_or(Oas2DocsError::MissingField {
            pointer: "/info".into(),
            field,
        })?;
        match value.as_str() {
            Some(s) if !s.trim().is_empty() => {}
            Some(_) => {
                return Err(Oas2DocsError::WrongType {
                    pointer: format!("/info/{field}"),
                    expected: "a non-empty string",
                    actual: "an empty string",
                });
            }
            None => {
                return Err(Oas2DocsError::WrongType {
                    pointer: format!("/info/{field}"),
                    expected: "a string",
                    actual: type_name(value),
                });
            }
        }
    }

    let paths = obj.get("paths").ok_or(Oas2DocsError::MissingField {
        pointer: String::new(),
        field: "paths",
    })?;
    let paths_obj = paths.as_object().ok_or_else(|| Oas2DocsError::WrongType {
        pointer: "/paths".into(),
        expected: "an object",
        actual: type_name(paths),
    })?;
    for (key, item) in paths_obj {
        if !key.starts_with('/') {
            return Err(Oas2DocsError::BadPathKey { key: key.clone() });
        }
        if !item.is_object() {
            return Err(Oas2DocsError::WrongType {
                pointer: format!("/paths/{}", escape_pointer_token(key)),
                expected: "an object",
                actual: type_name(item),
            });
        }
    }

    Ok(())
}

/// Walk the whole document and resolve every internal `$ref`.
///
/// External references (anything not starting with `#`) describe other
/// files or URLs and are outside this validator's scope.
fn check_refs(root: &Value) -> Result<(), Oas2DocsError> {
    fn walk(root: &Value, node: &Value, at: &str) -> Result<(), Oas2DocsError> {
        match node {
            Value::Object(map) => {
                if let Some(Value::String(reference)) = map.get("$ref") {
                    if let Some(fragment) = reference.strip_prefix('#') {
                        if root.pointer(fragment).is_none() {
                            return Err(Oas2DocsError::UnresolvedRef {
                                pointer: format!("{at}/$ref"),
                                reference: reference.clone(),
                            });
                        }
                    }
                }
                for (key, child) in map {
                    walk(root, child, &format!("{at}/{}", escape_pointer_token(key)))?;
                }
                Ok(())
            }
            Value::Array(items) => {
                for (i, child) in items.iter().enumerate() {
                    walk(root, child, &format!("{at}/{i}"))?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
    walk(root, root, "")
}

/// Version gate: the declared `openapi` major.minor must be 3.0.
///
/// Runs only after structure is confirmed, so `openapi` is known to be a
/// string here.
fn check_version(root: &Value) -> Result<(), Oas2DocsError> {
    let found = root["openapi"].as_str().unwrap_or_default();
    if SUPPORTED_VERSION.is_match(found) {
        Ok(())
    } else {
        Err(Oas2DocsError::UnsupportedVersion {
            found: found.to_string(),
        })
    }
}

/// Escape a map key for use as a JSON-pointer token (RFC 6901).
fn escape_pointer_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::parse::parse;

    fn verdict(json: &str) -> ValidationVerdict {
        validate(parse(json).expect("test documents must be valid JSON"))
    }

    fn invalid(json: &str) -> Oas2DocsError {
        match verdict(json) {
            ValidationVerdict::Invalid(e) => e,
            ValidationVerdict::Valid(_) => panic!("expected Invalid for {json}"),
        }
    }

    const MINIMAL: &str =
        r#"{"openapi":"3.0.0","info":{"title":"x","version":"1"},"paths":{}}"#;

    #[test]
    fn minimal_document_is_valid() {
        assert!(matches!(verdict(MINIMAL), ValidationVerdict::Valid(_)));
    }

    #[test]
    fn accepts_any_patch_of_3_0() {
        for v in ["3.0.0", "3.0.1", "3.0.3", "3.0.17"] {
            let json = format!(
                r#"{{"openapi":"{v}","info":{{"title":"x","version":"1"}},"paths":{{}}}}"#
            );
            assert!(
                matches!(verdict(&json), ValidationVerdict::Valid(_)),
                "version {v} should pass"
            );
        }
    }

    #[test]
    fn rejects_2_0_with_version_specific_reason() {
        let json = r#"{"openapi":"2.0","info":{"title":"x","version":"1"},"paths":{}}"#;
        match invalid(json) {
            Oas2DocsError::UnsupportedVersion { found } => assert_eq!(found, "2.0"),
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn rejects_3_1_with_version_specific_reason() {
        let json = r#"{"openapi":"3.1.0","info":{"title":"x","version":"1"},"paths":{}}"#;
        match invalid(json) {
            Oas2DocsError::UnsupportedVersion { found } => assert_eq!(found, "3.1.0"),
            other => panic!("expected UnsupportedVersion, got {other:?}"),
        }
    }

    #[test]
    fn missing_openapi_cites_the_field() {
        let err = invalid(r#"{"info":{"title":"x","version":"1"},"paths":{}}"#);
        assert!(matches!(
            err,
            Oas2DocsError::MissingField { field: "openapi", .. }
        ));
    }

    #[test]
    fn missing_info_cites_the_field() {
        let err = invalid(r#"{"openapi":"3.0.0","paths":{}}"#);
        assert!(matches!(
            err,
            Oas2DocsError::MissingField { field: "info", .. }
        ));
    }

    #[test]
    fn missing_paths_cites_the_field() {
        let err = invalid(r#"{"openapi":"3.0.0","info":{"title":"x","version":"1"}}"#);
        assert!(matches!(
            err,
            Oas2DocsError::MissingField { field: "paths", .. }
        ));
    }

    #[test]
    fn malformed_3_1_reports_structure_not_version() {
        // info is an array — the structural fault must win over the
        // unsupported version.
        let err = invalid(r#"{"openapi":"3.1.0","info":[],"paths":{}}"#);
        match err {
            Oas2DocsError::WrongType { pointer, .. } => assert_eq!(pointer, "/info"),
            other => panic!("expected WrongType at /info, got {other:?}"),
        }
    }

    #[test]
    fn non_object_root_is_a_type_error_at_root() {
        let err = invalid("[1, 2, 3]");
        match err {
            Oas2DocsError::WrongType { pointer, actual, .. } => {
                assert_eq!(pointer, "");
                assert_eq!(actual, "an array");
            }
            other => panic!("expected WrongType at root, got {other:?}"),
        }
    }

    #[test]
    fn empty_info_title_is_rejected() {
        let err = invalid(r#"{"openapi":"3.0.0","info":{"title":"  ","version":"1"},"paths":{}}"#);
        match err {
            Oas2DocsError::WrongType { pointer, .. } => assert_eq!(pointer, "/info/title"),
            other => panic!("expected WrongType at /info/title, got {other:?}"),
        }
    }

    #[test]
    fn path_key_must_start_with_slash() {
        let err = invalid(
            r#"{"openapi":"3.0.0","info":{"title":"x","version":"1"},"paths":{"pets":{}}}"#,
        );
        assert!(matches!(err, Oas2DocsError::BadPathKey { key } if key == "pets"));
    }

    #[test]
    fn resolvable_internal_ref_passes() {
        let json = r##"{
            "openapi": "3.0.0",
            "info": {"title": "x", "version": "1"},
            "paths": {
                "/pets": {
                    "get": {
                        "responses": {
                            "200": {
                                "description": "ok",
                                "content": {
                                    "application/json": {
                                        "schema": {"$ref": "#/components/schemas/Pet"}
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {"schemas": {"Pet": {"type": "object"}}}
        }"##;
        assert!(matches!(verdict(json), ValidationVerdict::Valid(_)));
    }

    #[test]
    fn dangling_internal_ref_is_located() {
        let json = r##"{
            "openapi": "3.0.0",
            "info": {"title": "x", "version": "1"},
            "paths": {
                "/pets": {"get": {"schema": {"$ref": "#/components/schemas/Missing"}}}
            }
        }"##;
        match invalid(json) {
            Oas2DocsError::UnresolvedRef { reference, pointer } => {
                assert_eq!(reference, "#/components/schemas/Missing");
                assert!(pointer.ends_with("/$ref"), "pointer was {pointer}");
            }
            other => panic!("expected UnresolvedRef, got {other:?}"),
        }
    }

    #[test]
    fn external_refs_are_skipped() {
        let json = r#"{
            "openapi": "3.0.0",
            "info": {"title": "x", "version": "1"},
            "paths": {
                "/pets": {"get": {"schema": {"$ref": "common.json#/Pet"}}}
            }
        }"#;
        assert!(matches!(verdict(json), ValidationVerdict::Valid(_)));
    }

    #[test]
    fn verdict_into_result_round_trips() {
        assert!(verdict(MINIMAL).into_result().is_ok());
        assert!(verdict(r#"{"openapi":"2.0","info":{"title":"x","version":"1"},"paths":{}}"#)
            .into_result()
            .is_err());
    }
}
