//! One-shot (single run) entry points.
//!
//! These wrap a throwaway [`DocumentSession`] for callers that have one
//! document and want one answer — the common CLI and script case. Hosts
//! that keep a document open for repeated editing should hold a
//! [`DocumentSession`] instead and drive it through
//! [`DocumentSession::submit`].

use crate::config::PipelineConfig;
use crate::error::Oas2DocsError;
use crate::output::GenerationOutput;
use crate::pipeline::acquire::RawInput;
use crate::pipeline::parse::{self, ParsedDocument};
use crate::pipeline::validate::{self, ValidationVerdict};
use crate::session::{DocumentSession, SubmitOutcome};
use std::path::Path;
use tracing::info;

/// Validate and convert one document.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input`  — Acquired raw document (see [`RawInput::from_file`] /
///   [`RawInput::from_text`])
/// * `config` — Pipeline configuration
///
/// # Errors
/// Any variant of [`Oas2DocsError`]: validation errors never touch the
/// network; `ConversionFailed` means the document was valid but the
/// exchange failed or the service rejected it.
pub async fn generate(
    input: RawInput,
    config: &PipelineConfig,
) -> Result<GenerationOutput, Oas2DocsError> {
    info!("Starting one-shot generation ({} input)", input.modality());

    // The document is re-parsed here so the output can carry it alongside
    // the model; the session re-validates internally, which is cheap and
    // keeps submit() the single sequencing authority.
    let document = check_input(&input)?;

    let session = DocumentSession::new(config.clone())?;
    match session.submit(input).await {
        SubmitOutcome::Published { model, stats } => Ok(GenerationOutput {
            model: (*model).clone(),
            document: document.into_json(),
            stats,
        }),
        SubmitOutcome::Rejected(e) => Err(e),
        // Unreachable for a private single-run session.
        SubmitOutcome::Superseded => Err(Oas2DocsError::Internal(
            "single-run session reported a superseded run".into(),
        )),
    }
}

/// Validate a document without converting it.
///
/// Runs acquisition, syntactic, and semantic validation only — no network.
/// Returns the parsed document on success so callers can inspect it.
pub fn check(input: &RawInput) -> Result<ParsedDocument, Oas2DocsError> {
    check_input(input)
}

fn check_input(input: &RawInput) -> Result<ParsedDocument, Oas2DocsError> {
    let document = parse::parse_input(input)?;
    match validate::validate(document) {
        ValidationVerdict::Valid(doc) => Ok(doc),
        ValidationVerdict::Invalid(e) => Err(e),
    }
}

/// Generate and write the model as JSON directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn generate_to_file(
    input: RawInput,
    output_path: impl AsRef<Path>,
    config: &PipelineConfig,
) -> Result<GenerationOutput, Oas2DocsError> {
    let output = generate(input, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| Oas2DocsError::Internal(format!("create output dir: {e}")))?;
        }
    }

    let rendered = serde_json::to_string_pretty(output.model.as_json())
        .map_err(|e| Oas2DocsError::Internal(format!("serialise model: {e}")))?;

    let tmp_path = path.with_extension("json.tmp");
    tokio::fs::write(&tmp_path, &rendered)
        .await
        .map_err(|e| Oas2DocsError::Internal(format!("write '{}': {e}", path.display())))?;
    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| Oas2DocsError::Internal(format!("rename '{}': {e}", path.display())))?;

    Ok(output)
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    input: RawInput,
    config: &PipelineConfig,
) -> Result<GenerationOutput, Oas2DocsError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Oas2DocsError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(generate(input, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str =
        r#"{"openapi":"3.0.0","info":{"title":"x","version":"1"},"paths":{}}"#;

    #[test]
    fn check_accepts_minimal_document() {
        let input = RawInput::from_text(MINIMAL).unwrap();
        let doc = check(&input).unwrap();
        assert_eq!(doc.as_json()["openapi"], "3.0.0");
    }

    #[test]
    fn check_rejects_malformed_json_without_network() {
        let input = RawInput::from_text("\"{not json").unwrap();
        assert!(matches!(
            check(&input),
            Err(Oas2DocsError::MalformedJson { .. })
        ));
    }

    #[test]
    fn check_rejects_unsupported_version() {
        let input = RawInput::from_text(
            r#"{"openapi":"3.1.0","info":{"title":"x","version":"1"},"paths":{}}"#,
        )
        .unwrap();
        assert!(matches!(
            check(&input),
            Err(Oas2DocsError::UnsupportedVersion { .. })
        ));
    }
}
