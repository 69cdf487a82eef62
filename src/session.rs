//! Session-scoped pipeline instance.
//!
//! A [`DocumentSession`] owns one [`crate::state::StateMachine`] and drives
//! the acquire → parse → validate → dispatch sequence for one document at a
//! time. The model is cooperative: all stages run on the caller's control
//! flow, with the conversion exchange as the only suspension point.
//!
//! Handles are cheap to clone and share one session, so a host can start
//! run B while run A is still awaiting the conversion service. That race is
//! what the run-token gating resolves: A's late response is discarded,
//! never written over B's newer state.

use crate::config::PipelineConfig;
use crate::error::Oas2DocsError;
use crate::observe::ObserverCallback;
use crate::output::{NormalizedModel, RunStats};
use crate::pipeline::acquire::RawInput;
use crate::pipeline::dispatch::{ConversionBackend, HttpConversionService};
use crate::pipeline::validate::ValidationVerdict;
use crate::pipeline::{parse, validate};
use crate::state::{PipelineState, RunToken, StateMachine};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing::{debug, info};

/// What became of one submitted run.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The run reached `Ready`; the model is published and readable via
    /// [`DocumentSession::model`].
    Published {
        model: Arc<NormalizedModel>,
        stats: RunStats,
    },
    /// The run reached `Failed`; the error is also visible in the session
    /// state until the next run starts.
    Rejected(Oas2DocsError),
    /// A newer run (or a reset) superseded this one before it finished;
    /// its result was discarded and the state was not touched.
    Superseded,
}

/// A document session: one pipeline instance with a defined reset boundary.
///
/// Create one per document being edited; call [`DocumentSession::reset`]
/// when the user switches input modality or starts a new document, which
/// returns the session to `Idle` and invalidates any in-flight run.
#[derive(Clone)]
pub struct DocumentSession {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    machine: Mutex<StateMachine>,
    backend: Arc<dyn ConversionBackend>,
    observer: Option<ObserverCallback>,
}

impl DocumentSession {
    /// Create a session from the given configuration.
    ///
    /// Uses the pre-built backend from the config when present, otherwise
    /// constructs an [`HttpConversionService`] against `convert_url`.
    ///
    /// # Errors
    ///
    /// [`Oas2DocsError::InvalidConfig`] when no backend override is given
    /// and the conversion endpoint is not a valid URL.
    pub fn new(config: PipelineConfig) -> Result<Self, Oas2DocsError> {
        let backend: Arc<dyn ConversionBackend> = match config.backend.clone() {
            Some(backend) => backend,
            None => Arc::new(HttpConversionService::new(&config)?),
        };
        Ok(Self {
            inner: Arc::new(SessionInner {
                machine: Mutex::new(StateMachine::new()),
                backend,
                observer: config.observer,
            }),
        })
    }

    /// Snapshot of the current pipeline state.
    pub fn state(&self) -> PipelineState {
        self.lock_machine().state().clone()
    }

    /// Read the published model, if the session is `Ready`.
    ///
    /// This is the result handoff: the renderer and persistence gateway may
    /// call it any number of times; reads are side-effect free and all
    /// observe the same model until the next run replaces it.
    pub fn model(&self) -> Option<Arc<NormalizedModel>> {
        match self.lock_machine().state() {
            PipelineState::Ready(model) => Some(Arc::clone(model)),
            _ => None,
        }
    }

    /// Return to `Idle`, clearing any result and invalidating any
    /// still-pending run. Call when the user changes the input modality or
    /// content.
    pub fn reset(&self) {
        let mut machine = self.lock_machine();
        machine.reset();
        self.notify(machine.state());
    }

    /// Run the full pipeline on one acquired input.
    ///
    /// Admission immediately clears the previous result and enters
    /// `Validating` — the most recent error stays visible only until the
    /// next run starts. The returned outcome mirrors the terminal state the
    /// run produced, or reports that the run was superseded.
    pub async fn submit(&self, input: RawInput) -> SubmitOutcome {
        let total_start = Instant::now();
        info!("Submitting {} input ({} bytes)", input.modality(), input.text().len());

        let token = {
            let mut machine = self.lock_machine();
            let token = machine.begin_run();
            self.notify(machine.state());
            token
        };

        // ── Syntactic + semantic validation (synchronous, local) ─────────
        let validate_start = Instant::now();
        let document = match parse::parse_input(&input) {
            Ok(doc) => doc,
            Err(e) => return self.fail(token, e),
        };
        let document = match validate::validate(document) {
            ValidationVerdict::Valid(doc) => doc,
            ValidationVerdict::Invalid(e) => return self.fail(token, e),
        };
        let validate_duration_ms = validate_start.elapsed().as_millis() as u64;
        debug!("Validation passed in {validate_duration_ms}ms");

        // ── Dispatch ─────────────────────────────────────────────────────
        {
            let mut machine = self.lock_machine();
            if !machine.to_converting(token) {
                self.notify_superseded();
                return SubmitOutcome::Superseded;
            }
            self.notify(machine.state());
        }

        let convert_start = Instant::now();
        let result = self.inner.backend.convert(&document).await;
        let convert_duration_ms = convert_start.elapsed().as_millis() as u64;

        // ── Terminal transition — only if this run is still current ──────
        let mut machine = self.lock_machine();
        match result {
            Ok(model) => {
                let model = Arc::new(model);
                if !machine.to_ready(token, Arc::clone(&model)) {
                    self.notify_superseded();
                    return SubmitOutcome::Superseded;
                }
                self.notify(machine.state());
                let stats = RunStats {
                    validate_duration_ms,
                    convert_duration_ms,
                    total_duration_ms: total_start.elapsed().as_millis() as u64,
                };
                info!(
                    "Run complete: ready in {}ms ({}ms conversion)",
                    stats.total_duration_ms, stats.convert_duration_ms
                );
                SubmitOutcome::Published { model, stats }
            }
            Err(e) => {
                if !machine.to_failed(token, e.clone()) {
                    self.notify_superseded();
                    return SubmitOutcome::Superseded;
                }
                self.notify(machine.state());
                SubmitOutcome::Rejected(e)
            }
        }
    }

    /// Record a validation-stage failure, unless the run was superseded.
    fn fail(&self, token: RunToken, error: Oas2DocsError) -> SubmitOutcome {
        let mut machine = self.lock_machine();
        if !machine.to_failed(token, error.clone()) {
            self.notify_superseded();
            return SubmitOutcome::Superseded;
        }
        self.notify(machine.state());
        SubmitOutcome::Rejected(error)
    }

    fn notify(&self, state: &PipelineState) {
        if let Some(ref observer) = self.inner.observer {
            observer.on_state_change(state);
        }
    }

    fn notify_superseded(&self) {
        if let Some(ref observer) = self.inner.observer {
            observer.on_run_superseded();
        }
    }

    fn lock_machine(&self) -> std::sync::MutexGuard<'_, StateMachine> {
        // The lock is only ever held for non-awaiting critical sections, so
        // a poisoned mutex means a panic mid-transition; recovering the
        // guard keeps the session observable rather than cascading panics.
        self.inner
            .machine
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
