//! OpenAI-compatible client configuration and error mapping.
//!
//! The same client serves the embedding and chat-completion endpoints; the
//! base URL and token come from [`ApiSettings`] and [`Credentials`].

use crate::config::{ApiSettings, Credentials};
use crate::error::{DocmindError, Result};
use async_openai::{config::OpenAIConfig, error::OpenAIError, Client};
use std::time::Duration;

/// Which remote service a request went to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Embeddings,
    Chat,
}

impl std::fmt::Display for Service {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Service::Embeddings => write!(f, "embedding service"),
            Service::Chat => write!(f, "chat-completion service"),
        }
    }
}

/// Create a client for the configured endpoint with a request timeout.
///
/// No request is made here; a missing key only surfaces on first use, and
/// callers check [`Credentials::require`] before that.
pub fn create_client(api: &ApiSettings, credentials: &Credentials) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(api.timeout_secs))
        .build()
        .map_err(|e| DocmindError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let config = OpenAIConfig::new()
        .with_api_base(api.base_url.trim_end_matches('/'))
        .with_api_key(credentials.api_key_or_empty());

    Ok(Client::with_config(config).with_http_client(http_client))
}

/// Map a client error into the pipeline's error taxonomy.
pub fn classify_error(err: OpenAIError, service: Service) -> DocmindError {
    match err {
        OpenAIError::Reqwest(e) => {
            DocmindError::ServiceUnavailable(format!("{} unreachable: {}", service, e))
        }
        OpenAIError::ApiError(api) => {
            let detail = format!("{} {:?} {:?}", api.message, api.r#type, api.code).to_lowercase();
            if is_auth_failure(&detail) {
                DocmindError::Config(format!(
                    "{} rejected the API token ({}). Supply a valid token in the configured environment variable.",
                    service, api.message
                ))
            } else {
                DocmindError::ServiceUnavailable(format!("{} returned an error: {}", service, api.message))
            }
        }
        OpenAIError::JSONDeserialize(e) => {
            let detail = e.to_string().to_lowercase();
            if is_auth_failure(&detail) {
                DocmindError::Config(format!("{} rejected the API token: {}", service, e))
            } else if service == Service::Chat {
                DocmindError::Generation(format!("Malformed response from {}: {}", service, e))
            } else {
                DocmindError::ServiceUnavailable(format!("Malformed response from {}: {}", service, e))
            }
        }
        OpenAIError::InvalidArgument(msg) => {
            DocmindError::Config(format!("Invalid request to {}: {}", service, msg))
        }
        other => DocmindError::ServiceUnavailable(format!("{} failed: {}", service, other)),
    }
}

fn is_auth_failure(detail: &str) -> bool {
    ["invalid_api_key", "invalid api key", "unauthorized", "authentication", "invalid credentials", "401"]
        .iter()
        .any(|needle| detail.contains(needle))
}
