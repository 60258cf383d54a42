//! Minimal GraphQL client over the shared HTTP runtime
//!
//! One method: POST `{query, variables}` with bearer auth and decode the
//! `data` payload. Retrying belongs to the call sites (see
//! [`prospector_core::retry`]); the client itself classifies failures.

use prospector_core::{ApiError, SHARED_RUNTIME, http_client};
use serde::de::DeserializeOwned;

/// Handle on the GraphQL endpoint. Cheap to share by reference across
/// worker threads; the underlying HTTP client and runtime are global.
pub struct GraphQLClient {
    endpoint: String,
    token: String,
}

impl GraphQLClient {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: token.into(),
        }
    }

    /// Execute one operation and deserialize its `data` payload.
    ///
    /// GraphQL-level errors surface as [`ApiError::GraphQL`]; a missing or
    /// undecodable `data` payload surfaces as [`ApiError::Malformed`].
    pub fn execute<R: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
    ) -> Result<R, ApiError> {
        let body = serde_json::json!({ "query": query, "variables": variables });

        let envelope: serde_json::Value = SHARED_RUNTIME
            .handle()
            .block_on(async {
                let resp = http_client()
                    .post(&self.endpoint)
                    .bearer_auth(&self.token)
                    .json(&body)
                    .send()
                    .await?
                    .error_for_status()?;
                resp.json().await
            })
            .map_err(|e: reqwest::Error| ApiError::from_reqwest(&e))?;

        if let Some(errors) = envelope.get("errors").and_then(|v| v.as_array()) {
            if !errors.is_empty() {
                return Err(ApiError::GraphQL(join_error_messages(errors)));
            }
        }

        let data = envelope
            .get("data")
            .filter(|v| !v.is_null())
            .cloned()
            .ok_or_else(|| ApiError::Malformed("response has no data".to_string()))?;
        serde_json::from_value(data).map_err(|e| ApiError::Malformed(e.to_string()))
    }
}

impl std::fmt::Debug for GraphQLClient {
    // Token never appears in debug output
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphQLClient")
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

fn join_error_messages(errors: &[serde_json::Value]) -> String {
    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|e| e.get("message").and_then(|m| m.as_str()))
        .collect();
    if messages.is_empty() {
        "unspecified error".to_string()
    } else {
        messages.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_error_messages() {
        let errors = vec![
            serde_json::json!({ "message": "first" }),
            serde_json::json!({ "message": "second" }),
        ];
        assert_eq!(join_error_messages(&errors), "first; second");
    }

    #[test]
    fn error_without_message_field() {
        let errors = vec![serde_json::json!({ "type": "SOME_ERROR" })];
        assert_eq!(join_error_messages(&errors), "unspecified error");
    }

    #[test]
    fn debug_hides_token() {
        let client = GraphQLClient::new("https://api.github.com/graphql", "ghp_secret");
        let dbg = format!("{client:?}");
        assert!(!dbg.contains("ghp_secret"));
        assert!(dbg.contains("api.github.com"));
    }
}
