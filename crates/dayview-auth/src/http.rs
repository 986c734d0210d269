//! Authorized HTTP client shared by the calendar and tasks gateways.
//!
//! Every request carries a bearer token from the [`TokenProvider`]. The
//! token contract is enforced in one place so both gateways behave
//! identically: no token fails fast, a 401 gets exactly one refresh and one
//! retry, and a 401 that survives the retry is an authentication failure.

use std::sync::Arc;

use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::provider::TokenProvider;

#[derive(Error, Debug)]
pub enum ApiClientError {
    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Authentication failed")]
    AuthenticationFailed,

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiClientError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotAuthenticated => "Please sign in to your Google account".to_string(),
            Self::AuthenticationFailed => {
                "Your session has expired. Please sign in again.".to_string()
            }
            Self::Api { message, .. } => message.clone(),
            Self::InvalidResponse(_) => "Received an unexpected response.".to_string(),
            Self::Network(_) => "Network error. Check your connection.".to_string(),
        }
    }
}

/// Shape of a Google API error body.
#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: Option<GoogleErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    message: Option<String>,
}

pub struct AuthorizedClient {
    http: reqwest::Client,
    tokens: Arc<dyn TokenProvider>,
}

impl AuthorizedClient {
    pub fn new(tokens: Arc<dyn TokenProvider>) -> Self {
        Self { http: reqwest::Client::new(), tokens }
    }

    /// GET returning a deserialized JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiClientError> {
        let response = self.send(Method::GET, url, None).await?;
        Self::parse_json(response).await
    }

    /// POST a JSON body, returning the deserialized response.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiClientError> {
        let response = self.send(Method::POST, url, Some(body)).await?;
        Self::parse_json(response).await
    }

    /// PUT a JSON body (full replace), returning the deserialized response.
    pub async fn put_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiClientError> {
        let response = self.send(Method::PUT, url, Some(body)).await?;
        Self::parse_json(response).await
    }

    /// PATCH a JSON body (partial update), returning the deserialized response.
    pub async fn patch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<T, ApiClientError> {
        let response = self.send(Method::PATCH, url, Some(body)).await?;
        Self::parse_json(response).await
    }

    /// DELETE, expecting an empty success response.
    pub async fn delete(&self, url: &str) -> Result<(), ApiClientError> {
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<Response, ApiClientError> {
        let Some(token) = self.tokens.access_token().await else {
            return Err(ApiClientError::NotAuthenticated);
        };

        let response = self.dispatch(method.clone(), url, body, &token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check(response).await;
        }

        // One refresh, one retry. A second 401 is terminal.
        tracing::debug!("Got 401 for {} {}, refreshing token", method, url);
        let Some(token) = self.tokens.refresh_access_token().await else {
            return Err(ApiClientError::AuthenticationFailed);
        };
        let response = self.dispatch(method, url, body, &token).await?;
        Self::check(response).await
    }

    async fn dispatch(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
        token: &str,
    ) -> Result<Response, reqwest::Error> {
        let mut request = self.http.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await
    }

    async fn check(response: Response) -> Result<Response, ApiClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiClientError::AuthenticationFailed);
        }

        let code = status.as_u16();
        let message = response
            .json::<GoogleErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error)
            .and_then(|detail| detail.message)
            .unwrap_or_else(|| format!("API error: {}", code));
        Err(ApiClientError::Api { status: code, message })
    }

    async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiClientError> {
        response
            .json()
            .await
            .map_err(|e| ApiClientError::InvalidResponse(format!("JSON parse error: {}", e)))
    }
}
