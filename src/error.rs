//! Error types for the oas2docs library.
//!
//! The taxonomy mirrors the pipeline stages: each variant names the first
//! stage that can produce it, and every variant is terminal for the run that
//! raised it — the pipeline parks in `Failed` with a displayable reason
//! rather than propagating an unhandled fault.
//!
//! Validation errors (`NoInputSelected`, `MalformedJson`, the schema
//! variants) are always resolved locally; only documents that pass semantic
//! validation ever reach the network boundary, so `ConversionFailed` implies
//! the document itself was well-formed.
//!
//! The enum is `Clone` so a terminal error can live inside
//! [`crate::state::PipelineState::Failed`] while the caller keeps its own
//! copy.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the oas2docs library.
#[derive(Debug, Clone, Error)]
pub enum Oas2DocsError {
    // ── Acquisition errors ────────────────────────────────────────────────
    /// Neither a file nor non-empty pasted text was available at submission.
    #[error("No input selected: provide a file or paste a non-empty document before submitting")]
    NoInputSelected,

    /// Input file was not found at the given path.
    #[error("Document file not found: '{}'\nCheck the path exists and is readable.", .path.display())]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{}'\nTry: chmod +r '{}'", .path.display(), .path.display())]
    PermissionDenied { path: PathBuf },

    /// The file exists but its contents are not valid UTF-8 text.
    #[error("File '{}' is not valid UTF-8 text: {}", .path.display(), .detail)]
    NotText { path: PathBuf, detail: String },

    // ── Syntactic validation errors ───────────────────────────────────────
    /// The raw input is not parseable JSON. `detail` is the parser's own
    /// diagnostic, verbatim — it carries line/column information.
    #[error("Malformed JSON: {detail}")]
    MalformedJson { detail: String },

    // ── Semantic validation errors ────────────────────────────────────────
    /// A required field is absent.
    #[error("Invalid OpenAPI document: missing required field `{field}` at `{pointer}`")]
    MissingField {
        /// JSON-pointer path of the enclosing object (`""` = document root).
        pointer: String,
        field: &'static str,
    },

    /// A field exists but has the wrong JSON type.
    #[error("Invalid OpenAPI document: `{pointer}` should be {expected}, found {actual}")]
    WrongType {
        pointer: String,
        expected: &'static str,
        actual: &'static str,
    },

    /// A `$ref` points inside the document but its target does not exist.
    #[error("Invalid OpenAPI document: `$ref` at `{pointer}` does not resolve: '{reference}'")]
    UnresolvedRef { pointer: String, reference: String },

    /// A path key under `paths` does not start with `/`.
    #[error("Invalid OpenAPI document: path key '{key}' must start with '/'")]
    BadPathKey { key: String },

    /// The document is structurally sound but declares an unsupported
    /// OpenAPI version. Only raised after all structural checks pass, so a
    /// malformed 3.1 document reports "malformed", never "unsupported".
    #[error("Unsupported OpenAPI version '{found}': only 3.0.x documents are supported")]
    UnsupportedVersion { found: String },

    // ── Conversion errors ─────────────────────────────────────────────────
    /// The conversion exchange failed: a service-reported rejection (the
    /// `details` body of a non-2xx response) or a transport failure after
    /// all retries. `reason` is user-displayable.
    #[error("Conversion failed: {reason}")]
    ConversionFailed { reason: String },

    // ── Gateway errors ────────────────────────────────────────────────────
    /// The persistence gateway refused or failed to store the documentation.
    #[error("Failed to persist documentation for '{doc_id}': {reason}")]
    PersistFailed { doc_id: String, reason: String },

    /// Project lookup through the persistence gateway failed.
    #[error("Failed to fetch project '{project_id}': {reason}")]
    ProjectFetchFailed { project_id: String, reason: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Oas2DocsError {
    /// True for errors raised by syntactic or semantic validation — these
    /// never involve the network and are safe to retry after editing the
    /// document.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Oas2DocsError::MalformedJson { .. }
                | Oas2DocsError::MissingField { .. }
                | Oas2DocsError::WrongType { .. }
                | Oas2DocsError::UnresolvedRef { .. }
                | Oas2DocsError::BadPathKey { .. }
                | Oas2DocsError::UnsupportedVersion { .. }
        )
    }
}
