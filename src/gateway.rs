//! Persistence-gateway client.
//!
//! The gateway is an external collaborator: it receives the raw document
//! and the normalized model together with document / project / user
//! identifiers and an auth token, and stores them. No further contract is
//! assumed — success or failure is all the core observes, and a gateway
//! failure never disturbs the pipeline state (the session published the
//! model already; persistence is downstream of the handoff).

use crate::error::Oas2DocsError;
use crate::output::NormalizedModel;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Everything the gateway needs to store one generated documentation set.
#[derive(Debug, Clone, Serialize)]
pub struct StoreRequest<'a> {
    /// The raw validated OpenAPI document, as submitted.
    pub document: &'a Value,
    /// The normalized model produced by the conversion service.
    pub model: &'a NormalizedModel,
    /// Identifier of the documentation record to attach to.
    pub doc_id: &'a str,
    /// Owning project.
    pub project_id: &'a str,
    /// Acting user.
    pub user_id: &'a str,
}

/// HTTP client for the persistence gateway.
#[derive(Debug)]
pub struct PersistenceGateway {
    client: reqwest::Client,
    base_url: String,
}

impl PersistenceGateway {
    /// Create a gateway client for the given base URL
    /// (e.g. `http://localhost:8000/api/v1`).
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self, Oas2DocsError> {
        let base_url = base_url.into();
        reqwest::Url::parse(&base_url).map_err(|e| {
            Oas2DocsError::InvalidConfig(format!(
                "gateway base URL '{base_url}' is not a valid URL: {e}"
            ))
        })?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| Oas2DocsError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Store a generated documentation set:
    /// `POST {base}/documentations/{doc_id}/add/schema` with a bearer token.
    ///
    /// # Errors
    ///
    /// [`Oas2DocsError::PersistFailed`] on transport failure or any
    /// non-success response.
    pub async fn store_documentation(
        &self,
        request: &StoreRequest<'_>,
        token: &str,
    ) -> Result<(), Oas2DocsError> {
        let url = format!(
            "{}/documentations/{}/add/schema",
            self.base_url, request.doc_id
        );
        debug!("Persisting documentation to {url}");

        let response = self
            .client
            .post(&url)
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|e| Oas2DocsError::PersistFailed {
                doc_id: request.doc_id.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Oas2DocsError::PersistFailed {
                doc_id: request.doc_id.to_string(),
                reason: format!("gateway returned HTTP {status}"),
            });
        }

        info!("Documentation '{}' persisted", request.doc_id);
        Ok(())
    }

    /// Fetch a project record: `POST {base}/project/{project_id}` with the
    /// acting user in the body.
    ///
    /// # Errors
    ///
    /// [`Oas2DocsError::ProjectFetchFailed`] on transport failure or any
    /// non-success response.
    pub async fn fetch_project(
        &self,
        project_id: &str,
        user_id: &str,
    ) -> Result<Value, Oas2DocsError> {
        #[derive(Serialize)]
        struct Body<'a> {
            #[serde(rename = "userId")]
            user_id: &'a str,
        }

        let url = format!("{}/project/{project_id}", self.base_url);
        debug!("Fetching project from {url}");

        let response = self
            .client
            .post(&url)
            .json(&Body { user_id })
            .send()
            .await
            .map_err(|e| Oas2DocsError::ProjectFetchFailed {
                project_id: project_id.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Oas2DocsError::ProjectFetchFailed {
                project_id: project_id.to_string(),
                reason: format!("gateway returned HTTP {status}"),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| Oas2DocsError::ProjectFetchFailed {
                project_id: project_id.to_string(),
                reason: format!("unreadable gateway response: {e}"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = PersistenceGateway::new("not a url", None).unwrap_err();
        assert!(matches!(err, Oas2DocsError::InvalidConfig(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_normalised() {
        let gw = PersistenceGateway::new("http://localhost:8000/api/v1/", None).unwrap();
        assert_eq!(gw.base_url, "http://localhost:8000/api/v1");
    }

    #[test]
    fn store_request_serialises_all_identifiers() {
        let document = json!({"openapi": "3.0.0"});
        let model = NormalizedModel::new(json!({"sections": []}));
        let request = StoreRequest {
            document: &document,
            model: &model,
            doc_id: "doc-1",
            project_id: "proj-1",
            user_id: "user-1",
        };
        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["doc_id"], "doc-1");
        assert_eq!(encoded["project_id"], "proj-1");
        assert_eq!(encoded["user_id"], "user-1");
        assert_eq!(encoded["document"]["openapi"], "3.0.0");
    }
}
