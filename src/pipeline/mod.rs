//! Pipeline stages for OpenAPI-to-documentation conversion.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different conversion backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! acquire ──▶ parse ──▶ validate ──▶ dispatch
//! (file/text)  (JSON)   (OpenAPI 3.0)  (conversion service)
//! ```
//!
//! 1. [`acquire`]  — obtain raw text from exactly one of the two input
//!    modalities (uploaded file or pasted text)
//! 2. [`parse`]    — syntactic validation; the parser's diagnostic is
//!    surfaced verbatim
//! 3. [`validate`] — semantic validation against the OpenAPI 3.0 object
//!    schema, version gate last
//! 4. [`dispatch`] — the conversion exchange; the only stage with network
//!    I/O and the pipeline's only suspension point
//!
//! Sequencing and result monotonicity are owned by
//! [`crate::session::DocumentSession`]; these stages are pure functions of
//! their inputs (plus the dispatcher's network call).

pub mod acquire;
pub mod dispatch;
pub mod parse;
pub mod validate;
