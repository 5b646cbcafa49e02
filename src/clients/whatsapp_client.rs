//! HyperSender WhatsApp API client
//!
//! Performs single authenticated POSTs against `{baseUri}/{instanceId}/{action}`
//! and classifies failures. Nothing here retries.

use std::sync::Arc;

use reqwest::header::{ACCEPT, HeaderValue};
use reqwest::multipart::Form;
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;
use tracing::{debug, info, warn};

use super::error_classifier::classify_error_response;
use crate::core::config::ClientConfig;
use crate::core::models::{Endpoint, Payload};
use crate::errors::SendError;

/// Client for one configured HyperSender instance.
///
/// Cheap to clone; clones share the HTTP connection pool and the configuration.
#[derive(Debug, Clone)]
pub struct WhatsappClient {
    http: Client,
    config: Arc<ClientConfig>,
}

impl WhatsappClient {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build configured HTTP client, using defaults: {}", e);
                Client::new()
            });

        Self {
            http,
            config: Arc::new(config),
        }
    }

    /// # Errors
    ///
    /// Returns an error if the environment configuration is incomplete.
    pub fn from_env() -> Result<Self, SendError> {
        Ok(Self::new(ClientConfig::from_env()?))
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    #[must_use]
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!(
            "{}/{}/{}",
            self.config.api_base_uri(),
            self.config.instance_id(),
            endpoint
        )
    }

    /// Send a text payload to `send-text`, or `send-text-safe` in safe mode.
    ///
    /// # Errors
    ///
    /// See [`WhatsappClient::post_json`].
    pub async fn send_message(
        &self,
        params: &Payload,
        safe_mode: bool,
        token: Option<&str>,
    ) -> Result<Response, SendError> {
        self.post_json(Endpoint::text(safe_mode), params, token)
            .await
    }

    /// Fetch pending updates for the instance and decode the JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the body is not JSON.
    pub async fn get_updates(
        &self,
        params: &Payload,
        token: Option<&str>,
    ) -> Result<Value, SendError> {
        let response = self.post_json(Endpoint::GetUpdates, params, token).await?;
        read_json(response).await
    }

    /// POST `params` as a JSON body.
    ///
    /// `token` overrides the configured credential for this call only.
    ///
    /// # Errors
    ///
    /// - [`SendError::CredentialMissing`] when no non-blank token is available;
    ///   no request is made in that case.
    /// - [`SendError::CommunicationFailure`] when no response was received.
    /// - [`SendError::BackendError`] for HTTP 4xx/5xx responses.
    pub async fn post_json(
        &self,
        endpoint: Endpoint,
        params: &Payload,
        token: Option<&str>,
    ) -> Result<Response, SendError> {
        let token = self.resolve_token(token)?;

        #[cfg(feature = "debug-logs")]
        debug!("HyperSender {} payload: {:?}", endpoint, params);

        #[cfg(not(feature = "debug-logs"))]
        debug!("HyperSender {} payload with {} fields", endpoint, params.len());

        let request = self
            .http
            .post(self.endpoint_url(endpoint))
            .bearer_auth(token)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .json(params);

        self.execute(endpoint, request).await
    }

    /// POST a multipart form, used for binary file uploads.
    ///
    /// # Errors
    ///
    /// Same as [`WhatsappClient::post_json`].
    pub async fn post_multipart(
        &self,
        endpoint: Endpoint,
        form: Form,
        token: Option<&str>,
    ) -> Result<Response, SendError> {
        let token = self.resolve_token(token)?;

        let request = self
            .http
            .post(self.endpoint_url(endpoint))
            .bearer_auth(token)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .multipart(form);

        self.execute(endpoint, request).await
    }

    fn resolve_token<'a>(&'a self, token: Option<&'a str>) -> Result<&'a str, SendError> {
        token
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.config.token().filter(|t| !t.trim().is_empty()))
            .ok_or_else(SendError::token_not_provided)
    }

    async fn execute(
        &self,
        endpoint: Endpoint,
        request: RequestBuilder,
    ) -> Result<Response, SendError> {
        info!(
            "POST {} (instance={})",
            endpoint,
            self.config.instance_id()
        );

        let response = request.send().await.map_err(|e| {
            warn!("Could not reach HyperSender for {}: {}", endpoint, e);
            SendError::from(e)
        })?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            let cause = response.error_for_status_ref().err();
            let body = response
                .text()
                .await
                .ok()
                .filter(|body| !body.trim().is_empty());
            let err = classify_error_response(status, body.as_deref(), cause);
            warn!("HyperSender {} failed: {}", endpoint, err);
            return Err(err);
        }

        Ok(response)
    }
}

/// Decode a successful response body as JSON; an empty body decodes to `null`.
pub(crate) async fn read_json(response: Response) -> Result<Value, SendError> {
    let body = response.text().await?;
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(|e| SendError::InvalidResponse(e.to_string()))
}
