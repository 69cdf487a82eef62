//! The pipeline state machine: ordering authority for a document session.
//!
//! ## Why an explicit sum type?
//!
//! Tracking this lifecycle with independent `loading` / `error` / result
//! flags admits contradictory combinations (not loading, yet a stale result
//! still displayed). A single [`PipelineState`] value makes those states
//! unrepresentable: exactly one variant is current at any instant, and only
//! the [`StateMachine`] may replace it.
//!
//! ## Run tokens and result monotonicity
//!
//! Every admitted run gets a [`RunToken`] carrying the machine's sequence
//! number at admission. Completing a transition requires presenting the
//! token; if a newer run (or a reset) has bumped the sequence in the
//! meantime, the transition is refused and the late result is discarded.
//! This is what guarantees that a superseded run's response — however late
//! it arrives — can never overwrite a newer state with a stale `Ready` or
//! `Failed`.

use crate::error::Oas2DocsError;
use crate::output::NormalizedModel;
use std::sync::Arc;
use tracing::{debug, warn};

/// Current status of the pipeline, observable by the rest of the system.
///
/// `Ready` and `Failed` are terminal for a given run; both clear any prior
/// result before being set. `Idle` is re-entered when the user changes the
/// input modality or content.
#[derive(Debug, Clone)]
pub enum PipelineState {
    /// No run in progress and no result held.
    Idle,
    /// A run was admitted; acquisition, parsing, and semantic validation
    /// are in progress.
    Validating,
    /// The document passed validation; the conversion exchange is in flight.
    Converting,
    /// The run completed; the normalized model is published.
    Ready(Arc<NormalizedModel>),
    /// The run failed; the reason is user-displayable.
    Failed(Oas2DocsError),
}

impl PipelineState {
    /// Short status name, for logging and CLI display.
    pub fn name(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Validating => "validating",
            PipelineState::Converting => "converting",
            PipelineState::Ready(_) => "ready",
            PipelineState::Failed(_) => "failed",
        }
    }

    /// True for `Ready` and `Failed` — the terminal states of a run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Ready(_) | PipelineState::Failed(_))
    }
}

/// Proof that a transition belongs to a specific admitted run.
///
/// Tokens are cheap and `Copy`; holding one grants nothing except the right
/// to *attempt* a transition — the machine refuses tokens from superseded
/// runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunToken {
    seq: u64,
}

/// The single mutator of [`PipelineState`].
///
/// Owned by [`crate::session::DocumentSession`] behind a mutex; no other
/// component writes the state or the published result.
#[derive(Debug)]
pub struct StateMachine {
    state: PipelineState,
    run_seq: u64,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            state: PipelineState::Idle,
            run_seq: 0,
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Admit a new run: clears any prior result, enters `Validating`, and
    /// invalidates every token issued before this call.
    pub fn begin_run(&mut self) -> RunToken {
        self.run_seq += 1;
        debug!(
            "Run {} admitted ({} -> validating)",
            self.run_seq,
            self.state.name()
        );
        self.state = PipelineState::Validating;
        RunToken { seq: self.run_seq }
    }

    /// Whether `token` still belongs to the current run.
    pub fn is_current(&self, token: RunToken) -> bool {
        token.seq == self.run_seq
    }

    /// `Validating → Converting`, on a `Valid` verdict.
    ///
    /// Returns false (and leaves the state untouched) if the run was
    /// superseded or the machine is not in `Validating`.
    pub fn to_converting(&mut self, token: RunToken) -> bool {
        if !self.is_current(token) {
            debug!("Run {}: converting transition dropped (superseded)", token.seq);
            return false;
        }
        match self.state {
            PipelineState::Validating => {
                self.state = PipelineState::Converting;
                true
            }
            ref s => {
                warn!("Run {}: illegal transition {} -> converting refused", token.seq, s.name());
                false
            }
        }
    }

    /// `Converting → Ready`, publishing the model.
    pub fn to_ready(&mut self, token: RunToken, model: Arc<NormalizedModel>) -> bool {
        if !self.is_current(token) {
            debug!("Run {}: stale ready result discarded", token.seq);
            return false;
        }
        match self.state {
            PipelineState::Converting => {
                debug!("Run {}: converting -> ready", token.seq);
                self.state = PipelineState::Ready(model);
                true
            }
            ref s => {
                warn!("Run {}: illegal transition {} -> ready refused", token.seq, s.name());
                false
            }
        }
    }

    /// `Validating|Converting → Failed` with a displayable reason.
    pub fn to_failed(&mut self, token: RunToken, error: Oas2DocsError) -> bool {
        if !self.is_current(token) {
            debug!("Run {}: stale failure discarded", token.seq);
            return false;
        }
        match self.state {
            PipelineState::Validating | PipelineState::Converting => {
                debug!("Run {}: {} -> failed: {error}", token.seq, self.state.name());
                self.state = PipelineState::Failed(error);
                true
            }
            ref s => {
                warn!("Run {}: illegal transition {} -> failed refused", token.seq, s.name());
                false
            }
        }
    }

    /// `* → Idle`: the user changed the input modality or content, which
    /// invalidates all downstream results and any still-pending run.
    pub fn reset(&mut self) {
        debug!("Session reset ({} -> idle)", self.state.name());
        self.run_seq += 1;
        self.state = PipelineState::Idle;
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
