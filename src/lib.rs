//! # oas2docs
//!
//! Validate OpenAPI 3.0 documents and convert them into render-ready
//! documentation models via an external conversion service.
//!
//! ## Why this crate?
//!
//! Turning an API definition into documentation has two failure-prone
//! halves: deciding whether the input is a usable OpenAPI 3.0.x document at
//! all, and exchanging it with a conversion service without ever showing
//! the user a stale or partial result. This crate owns both: a strict
//! validate-before-dispatch pipeline and an explicit state machine that
//! makes contradictory UI states (done-but-stale, loading-and-failed)
//! unrepresentable.
//!
//! ## Pipeline Overview
//!
//! ```text
//! document (file or pasted text)
//!  │
//!  ├─ 1. Acquire   exactly one input modality, tagged at the source
//!  ├─ 2. Parse     syntactic JSON validation, parser diagnostics verbatim
//!  ├─ 3. Validate  OpenAPI object schema + $ref resolution, version gate last
//!  ├─ 4. Dispatch  POST to the conversion service, transport retries only
//!  └─ 5. Handoff   Ready(model) published; late responses of superseded
//!                  runs are discarded, never written over newer state
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use oas2docs::{generate, PipelineConfig, RawInput};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PipelineConfig::builder()
//!         .convert_url("http://localhost:8000/convert")
//!         .build()?;
//!     let input = RawInput::from_file("petstore.json")?;
//!     let output = generate(input, &config).await?;
//!     println!("{}", serde_json::to_string_pretty(output.model.as_json())?);
//!     Ok(())
//! }
//! ```
//!
//! Hosts that keep a document open for repeated editing should hold a
//! [`DocumentSession`] instead: it exposes the live [`PipelineState`],
//! guarantees a newly submitted run supersedes any still-pending one, and
//! defines the reset boundary (new input ⇒ [`DocumentSession::reset`]).
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `oas2docs` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! oas2docs = { version = "0.3", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod gateway;
pub mod generate;
pub mod observe;
pub mod output;
pub mod pipeline;
pub mod session;
pub mod state;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PipelineConfig, PipelineConfigBuilder, DEFAULT_CONVERT_URL, DEFAULT_GATEWAY_URL};
pub use error::Oas2DocsError;
pub use gateway::{PersistenceGateway, StoreRequest};
pub use generate::{check, generate, generate_sync, generate_to_file};
pub use observe::{NoopObserver, ObserverCallback, PipelineObserver};
pub use output::{GenerationOutput, NormalizedModel, RunStats};
pub use pipeline::acquire::{acquire, InputModality, RawInput};
pub use pipeline::dispatch::{ConversionBackend, HttpConversionService};
pub use pipeline::parse::ParsedDocument;
pub use pipeline::validate::ValidationVerdict;
pub use session::{DocumentSession, SubmitOutcome};
pub use state::PipelineState;
