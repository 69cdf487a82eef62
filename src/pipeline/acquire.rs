//! Input acquisition: obtain raw document text from exactly one source.
//!
//! ## Why a tagged `RawInput` instead of two optional fields?
//!
//! A host UI offers two mutually exclusive entry paths, upload a file or
//! paste text. Tracking them with independent nullable slots allows
//! contradictory combinations (a stale file alongside newer pasted text).
//! Tagging the raw text with its [`InputModality`] at the moment of
//! acquisition makes "exactly one source" a type-level fact: everything
//! downstream sees one string and one tag, never both sources.

use crate::error::Oas2DocsError;
use std::path::Path;
use tracing::debug;

/// The input source the user selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputModality {
    /// Document uploaded as a file.
    File,
    /// Document pasted as text.
    Text,
}

impl std::fmt::Display for InputModality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputModality::File => write!(f, "file"),
            InputModality::Text => write!(f, "text"),
        }
    }
}

/// Raw document text tagged with the modality it came from.
///
/// Exactly one modality is active per instance. A `RawInput` is created per
/// submission and superseded — never mutated — when the user changes the
/// source or its content.
#[derive(Debug, Clone)]
pub struct RawInput {
    modality: InputModality,
    text: String,
}

impl RawInput {
    /// The modality this input was acquired from.
    pub fn modality(&self) -> InputModality {
        self.modality
    }

    /// The raw document text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Acquire raw text from the selected modality.
///
/// * `InputModality::File` — `file` must be present and readable as UTF-8
///   text.
/// * `InputModality::Text` — `pasted` must be non-empty after trimming.
///
/// # Errors
///
/// [`Oas2DocsError::NoInputSelected`] when the selected modality has no
/// usable source at submission time. This blocks dispatch — it is a real
/// failure, not a silent no-op. File reads can also fail with
/// `FileNotFound`, `PermissionDenied`, or `NotText`.
pub fn acquire(
    modality: InputModality,
    file: Option<&Path>,
    pasted: Option<&str>,
) -> Result<RawInput, Oas2DocsError> {
    match modality {
        InputModality::File => {
            let path = file.ok_or(Oas2DocsError::NoInputSelected)?;
            read_file(path)
        }
        InputModality::Text => {
            let text = pasted.unwrap_or("");
            if text.trim().is_empty() {
                return Err(Oas2DocsError::NoInputSelected);
            }
            Ok(RawInput {
                modality: InputModality::Text,
                text: text.to_string(),
            })
        }
    }
}

/// Read a document file, mapping I/O failures to acquisition errors.
fn read_file(path: &Path) -> Result<RawInput, Oas2DocsError> {
    if !path.exists() {
        return Err(Oas2DocsError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(Oas2DocsError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(Oas2DocsError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    };

    let text = String::from_utf8(bytes).map_err(|e| Oas2DocsError::NotText {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;

    debug!("Acquired {} bytes from file: {}", text.len(), path.display());
    Ok(RawInput {
        modality: InputModality::File,
        text,
    })
}

impl RawInput {
    /// Convenience constructor for the file modality.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Oas2DocsError> {
        acquire(InputModality::File, Some(path.as_ref()), None)
    }

    /// Convenience constructor for the text modality.
    pub fn from_text(text: impl Into<String>) -> Result<Self, Oas2DocsError> {
        let text = text.into();
        acquire(InputModality::Text, None, Some(&text))
    }

    /// Path-less constructor used when the host application already read the
    /// file contents itself (e.g. a browser upload).
    pub fn from_file_contents(text: impl Into<String>) -> Self {
        Self {
            modality: InputModality::File,
            text: text.into(),
        }
    }
}
