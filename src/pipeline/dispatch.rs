//! Conversion dispatch: exchange a validated document for a normalized model.
//!
//! This is the only stage with network I/O and the pipeline's only
//! suspension point. The service contract is a single request-response
//! exchange: `POST` the validated JSON document, receive either a 2xx body
//! with an `ans` field holding the normalized model, or a non-2xx body with
//! a `details` string describing the rejection.
//!
//! ## Retry strategy
//!
//! Transport failures (connect refused, timeout) are transient and retried
//! with exponential backoff (`retry_backoff_ms * 2^attempt`). A
//! service-reported rejection is never retried: the service examined the
//! document and said no, and re-sending the same bytes cannot change its
//! mind. Both outcomes surface to the caller as
//! [`Oas2DocsError::ConversionFailed`].

use crate::config::PipelineConfig;
use crate::error::Oas2DocsError;
use crate::output::NormalizedModel;
use crate::pipeline::parse::ParsedDocument;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

/// The conversion-service seam.
///
/// The pipeline only ever talks to the service through this trait, so hosts
/// and tests can inject their own backend (a mock, a cache, an in-process
/// converter) via [`crate::config::PipelineConfigBuilder::backend`] without
/// touching the state machine.
#[async_trait]
pub trait ConversionBackend: Send + Sync {
    /// Convert a validated document into a normalized documentation model.
    ///
    /// # Errors
    ///
    /// [`Oas2DocsError::ConversionFailed`] for both transport failures and
    /// service-reported rejections.
    async fn convert(&self, doc: &ParsedDocument) -> Result<NormalizedModel, Oas2DocsError>;
}

/// Success body: `{"ans": <model>}`.
#[derive(Debug, Deserialize)]
struct ConvertResponse {
    ans: Option<Value>,
}

/// Failure body: `{"details": "<reason>"}`.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    details: Option<String>,
}

/// HTTP implementation of [`ConversionBackend`].
#[derive(Debug)]
pub struct HttpConversionService {
    client: reqwest::Client,
    url: reqwest::Url,
    max_retries: u32,
    retry_backoff_ms: u64,
}

impl HttpConversionService {
    /// Build the service client from the pipeline configuration.
    ///
    /// The optional `api_timeout` is layered onto the HTTP client here; the
    /// state machine never sees it — an elapsed timeout is just one more
    /// failed exchange.
    pub fn new(config: &PipelineConfig) -> Result<Self, Oas2DocsError> {
        let url = reqwest::Url::parse(&config.convert_url).map_err(|e| {
            Oas2DocsError::InvalidConfig(format!(
                "conversion endpoint '{}' is not a valid URL: {e}",
                config.convert_url
            ))
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.api_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Oas2DocsError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            url,
            max_retries: config.max_retries,
            retry_backoff_ms: config.retry_backoff_ms,
        })
    }

    /// One exchange attempt. `Err` here means the transport failed and the
    /// attempt may be retried; a service-level rejection comes back as
    /// `Ok(Err(reason))` and is terminal.
    async fn exchange(
        &self,
        doc: &ParsedDocument,
    ) -> Result<Result<NormalizedModel, String>, reqwest::Error> {
        let response = self
            .client
            .post(self.url.clone())
            .json(doc.as_json())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the service's structured reason; fall back to a
            // generic exchange-failure message naming the status.
            let reason = match response.json::<ErrorBody>().await {
                Ok(ErrorBody { details: Some(d) }) if !d.is_empty() => d,
                _ => format!("conversion service returned HTTP {status}"),
            };
            return Ok(Err(reason));
        }

        match response.json::<ConvertResponse>().await {
            Ok(ConvertResponse { ans: Some(model) }) => Ok(Ok(NormalizedModel::new(model))),
            Ok(ConvertResponse { ans: None }) => {
                Ok(Err("conversion service response is missing the `ans` field".to_string()))
            }
            // Body arrived but was not the promised JSON shape — not a
            // transport fault, so not retryable.
            Err(e) if e.is_decode() => Ok(Err(format!(
                "conversion service returned an unreadable body: {e}"
            ))),
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl ConversionBackend for HttpConversionService {
    async fn convert(&self, doc: &ParsedDocument) -> Result<NormalizedModel, Oas2DocsError> {
        let mut last_err: Option<String> = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let backoff = self.retry_backoff_ms * 2u64.pow(attempt - 1);
                warn!(
                    "Conversion exchange: retry {}/{} after {}ms",
                    attempt, self.max_retries, backoff
                );
                sleep(Duration::from_millis(backoff)).await;
            }

            match self.exchange(doc).await {
                Ok(Ok(model)) => {
                    debug!("Conversion exchange succeeded on attempt {}", attempt + 1);
                    return Ok(model);
                }
                Ok(Err(reason)) => {
                    // Service-reported rejection: terminal, no retry.
                    return Err(Oas2DocsError::ConversionFailed { reason });
                }
                Err(e) => {
                    warn!("Conversion exchange attempt {} failed: {e}", attempt + 1);
                    last_err = Some(e.to_string());
                }
            }
        }

        Err(Oas2DocsError::ConversionFailed {
            reason: last_err
                .unwrap_or_else(|| "conversion service exchange failed".to_string()),
        })
    }
}
