//! Output types: the normalized documentation model and run reporting.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The render-ready documentation model returned by the conversion service.
///
/// Opaque to this crate: the pipeline treats it as a single indivisible
/// payload and never interprets its internal shape. Downstream consumers
/// (renderer, persistence gateway) receive it via
/// [`crate::session::DocumentSession::model`] as a shared read-only handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedModel(Value);

impl NormalizedModel {
    /// Wrap a raw JSON value produced by the conversion service.
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying JSON payload.
    pub fn as_json(&self) -> &Value {
        &self.0
    }

    /// Consume the handle and return the underlying JSON payload.
    pub fn into_json(self) -> Value {
        self.0
    }
}

/// Result of a successful one-shot [`crate::generate`] run.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// The normalized documentation model, ready for the renderer.
    pub model: NormalizedModel,

    /// The validated document that was sent to the conversion service.
    /// Kept so callers can persist raw input and model together.
    pub document: Value,

    /// Per-stage timing for the run.
    pub stats: RunStats,
}

/// Per-stage wall-clock timing for one pipeline run.
///
/// Validation is synchronous and local, so `validate_duration_ms` is
/// typically single-digit milliseconds; `convert_duration_ms` is dominated
/// by the network round-trip.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Time spent in syntactic + semantic validation.
    pub validate_duration_ms: u64,

    /// Time spent in the conversion exchange (including transport retries).
    pub convert_duration_ms: u64,

    /// End-to-end run time, acquisition through handoff.
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn normalized_model_is_transparent_json() {
        let m = NormalizedModel::new(json!({"endpoints": [{"path": "/pets"}]}));
        let encoded = serde_json::to_value(&m).unwrap();
        assert_eq!(encoded, json!({"endpoints": [{"path": "/pets"}]}));

        let decoded: NormalizedModel = serde_json::from_value(encoded).unwrap();
        assert_eq!(decoded, m);
    }

    #[test]
    fn normalized_model_round_trips_payload() {
        let payload = json!({"title": "Pet Store", "sections": []});
        let m = NormalizedModel::new(payload.clone());
        assert_eq!(m.as_json(), &payload);
        assert_eq!(m.into_json(), payload);
    }
}
