//! Configuration for the documentation pipeline.
//!
//! All pipeline behaviour is controlled through [`PipelineConfig`], built
//! via its [`PipelineConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across sessions and to diff two runs to
//! understand why their outcomes differ.

use crate::error::Oas2DocsError;
use crate::observe::ObserverCallback;
use crate::pipeline::dispatch::ConversionBackend;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Default conversion endpoint, matching the development service.
pub const DEFAULT_CONVERT_URL: &str = "http://localhost:8000/convert";

/// Default persistence-gateway base URL.
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:8000/api/v1";

/// Configuration for a documentation pipeline session.
///
/// Built via [`PipelineConfig::builder()`] or using
/// [`PipelineConfig::default()`].
///
/// # Example
/// ```rust
/// use oas2docs::PipelineConfig;
/// use std::time::Duration;
///
/// let config = PipelineConfig::builder()
///     .convert_url("https://converter.internal/convert")
///     .api_timeout(Duration::from_secs(30))
///     .max_retries(2)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct PipelineConfig {
    /// Conversion-service endpoint. The validated document is `POST`ed here.
    pub convert_url: String,

    /// Persistence-gateway base URL ([`crate::gateway`]).
    pub gateway_url: String,

    /// Per-exchange timeout on the conversion call. Default: none.
    ///
    /// The pipeline does not mandate a timeout; when set, it is layered
    /// onto the HTTP client only — an elapsed timeout surfaces as an
    /// ordinary `ConversionFailed` and the state machine's transition
    /// table is unchanged.
    pub api_timeout: Option<Duration>,

    /// Maximum retry attempts on a transport failure. Default: 2.
    ///
    /// Only transport faults (connect refused, timeout) are retried;
    /// a service-reported rejection is terminal immediately, since
    /// re-sending a document the service already refused cannot succeed.
    pub max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff). Default: 500.
    ///
    /// Doubles after each attempt: 500 ms → 1 s → 2 s.
    pub retry_backoff_ms: u64,

    /// Pre-constructed conversion backend. Takes precedence over
    /// `convert_url`; the seam tests and embedding hosts use to bypass HTTP.
    pub backend: Option<Arc<dyn ConversionBackend>>,

    /// State-transition observer. Default: none.
    pub observer: Option<ObserverCallback>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            convert_url: DEFAULT_CONVERT_URL.to_string(),
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            api_timeout: None,
            max_retries: 2,
            retry_backoff_ms: 500,
            backend: None,
            observer: None,
        }
    }
}

impl fmt::Debug for PipelineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineConfig")
            .field("convert_url", &self.convert_url)
            .field("gateway_url", &self.gateway_url)
            .field("api_timeout", &self.api_timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn ConversionBackend>"))
            .field("observer", &self.observer.as_ref().map(|_| "<dyn PipelineObserver>"))
            .finish()
    }
}

impl PipelineConfig {
    /// Create a new builder for `PipelineConfig`.
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`PipelineConfig`].
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    pub fn convert_url(mut self, url: impl Into<String>) -> Self {
        self.config.convert_url = url.into();
        self
    }

    pub fn gateway_url(mut self, url: impl Into<String>) -> Self {
        self.config.gateway_url = url.into();
        self
    }

    pub fn api_timeout(mut self, timeout: Duration) -> Self {
        self.config.api_timeout = Some(timeout);
        self
    }

    pub fn max_retries(mut self, n: u32) -> Self {
        self.config.max_retries = n;
        self
    }

    pub fn retry_backoff_ms(mut self, ms: u64) -> Self {
        self.config.retry_backoff_ms = ms;
        self
    }

    pub fn backend(mut self, backend: Arc<dyn ConversionBackend>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    pub fn observer(mut self, observer: ObserverCallback) -> Self {
        self.config.observer = Some(observer);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<PipelineConfig, Oas2DocsError> {
        let c = &self.config;
        if c.backend.is_none() {
            reqwest::Url::parse(&c.convert_url).map_err(|e| {
                Oas2DocsError::InvalidConfig(format!(
                    "conversion endpoint '{}' is not a valid URL: {e}",
                    c.convert_url
                ))
            })?;
        }
        if let Some(timeout) = c.api_timeout {
            if timeout.is_zero() {
                return Err(Oas2DocsError::InvalidConfig(
                    "api_timeout must be non-zero when set".into(),
                ));
            }
        }
        Ok(self.config)
    }

    /// Build without validation. Used by tests that deliberately construct
    /// broken configurations.
    #[doc(hidden)]
    pub fn build_unchecked(self) -> PipelineConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_builds() {
        let config = PipelineConfig::builder().build().unwrap();
        assert_eq!(config.convert_url, DEFAULT_CONVERT_URL);
        assert_eq!(config.max_retries, 2);
        assert!(config.api_timeout.is_none());
    }

    #[test]
    fn invalid_convert_url_is_rejected() {
        let err = PipelineConfig::builder()
            .convert_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, Oas2DocsError::InvalidConfig(_)));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = PipelineConfig::builder()
            .api_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert!(matches!(err, Oas2DocsError::InvalidConfig(_)));
    }

    #[test]
    fn debug_redacts_dyn_fields() {
        let config = PipelineConfig::default();
        let dbg = format!("{config:?}");
        assert!(dbg.contains("convert_url"));
        assert!(!dbg.contains("panic"));
    }
}
