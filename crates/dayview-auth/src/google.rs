//! Google OAuth2 provider for Calendar and Tasks access.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

// Scopes for Calendar and Tasks access
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";
const TASKS_SCOPE: &str = "https://www.googleapis.com/auth/tasks";
const USERINFO_SCOPE: &str = "https://www.googleapis.com/auth/userinfo.email";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: u64,
    pub token_type: String,
    pub scope: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleUserInfo {
    pub email: String,
    pub name: Option<String>,
    pub picture: Option<String>,
}

pub struct GoogleOAuth2Provider {
    pub client_id: String,
    pub client_secret: String,
    token_url: String,
}

impl GoogleOAuth2Provider {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self { client_id, client_secret, token_url: GOOGLE_TOKEN_URL.to_string() }
    }

    #[cfg(test)]
    pub fn new_with_token_url(client_id: String, client_secret: String, token_url: &str) -> Self {
        Self { client_id, client_secret, token_url: token_url.to_string() }
    }

    /// Generate authorization URL for OAuth flow.
    /// Returns (url, state) where state should be verified on callback.
    pub fn authorization_url(&self, redirect_uri: &str) -> (String, String) {
        let state = uuid::Uuid::new_v4().to_string();
        let scopes = format!("{} {} {}", CALENDAR_SCOPE, TASKS_SCOPE, USERINFO_SCOPE);

        let url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&access_type=offline&prompt=consent",
            GOOGLE_AUTH_URL,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(&state),
        );

        (url, state)
    }

    /// Exchange authorization code for tokens.
    #[tracing::instrument(skip(self, code), level = "info")]
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<GoogleTokenResponse> {
        let client = reqwest::Client::new();

        let response = client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", redirect_uri),
            ])
            .send()
            .await
            .context("Failed to send token request")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Token exchange failed: {}", error_text);
        }

        response.json::<GoogleTokenResponse>().await.context("Failed to parse token response")
    }

    /// Refresh an expired access token.
    #[tracing::instrument(skip(self, refresh_token), level = "info")]
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<GoogleTokenResponse> {
        let client = reqwest::Client::new();

        let response = client
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .context("Failed to send refresh request")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Token refresh failed: {}", error_text);
        }

        response.json::<GoogleTokenResponse>().await.context("Failed to parse refresh response")
    }

    /// Get user info (email) from access token.
    #[tracing::instrument(skip(self, access_token), level = "info")]
    pub async fn get_user_info(&self, access_token: &str) -> Result<GoogleUserInfo> {
        let client = reqwest::Client::new();

        let response = client
            .get(GOOGLE_USERINFO_URL)
            .bearer_auth(access_token)
            .send()
            .await
            .context("Failed to fetch user info")?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("User info request failed: {}", error_text);
        }

        response.json::<GoogleUserInfo>().await.context("Failed to parse user info")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_auth_url_contains_scopes() {
        let provider = GoogleOAuth2Provider::new(
            "test_client_id".to_string(),
            "test_client_secret".to_string(),
        );
        let (url, _state) = provider.authorization_url("com.dayview:/oauth2redirect");
        assert!(url.contains("scope="));
        assert!(url.contains("calendar"));
        assert!(url.contains("tasks"));
    }

    #[test]
    fn test_auth_url_requests_offline_access() {
        let provider = GoogleOAuth2Provider::new(
            "test_client_id".to_string(),
            "test_client_secret".to_string(),
        );
        let (url, _state) = provider.authorization_url("com.dayview:/oauth2redirect");
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
    }

    #[test]
    fn test_state_is_unique() {
        let provider = GoogleOAuth2Provider::new(
            "test_client_id".to_string(),
            "test_client_secret".to_string(),
        );
        let (_, state1) = provider.authorization_url("com.dayview:/oauth2redirect");
        let (_, state2) = provider.authorization_url("com.dayview:/oauth2redirect");
        assert_ne!(state1, state2);
    }

    #[tokio::test]
    async fn test_refresh_token_parses_response() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_string_contains("grant_type=refresh_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "new_access",
                "expires_in": 3599,
                "token_type": "Bearer",
                "scope": "https://www.googleapis.com/auth/calendar"
            })))
            .mount(&mock_server)
            .await;

        let provider = GoogleOAuth2Provider::new_with_token_url(
            "id".to_string(),
            "secret".to_string(),
            &format!("{}/", mock_server.uri()),
        );
        let tokens = provider.refresh_token("old_refresh").await.unwrap();
        assert_eq!(tokens.access_token, "new_access");
        assert!(tokens.refresh_token.is_none());
    }

    #[tokio::test]
    async fn test_refresh_token_failure_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_grant"))
            .mount(&mock_server)
            .await;

        let provider = GoogleOAuth2Provider::new_with_token_url(
            "id".to_string(),
            "secret".to_string(),
            &format!("{}/", mock_server.uri()),
        );
        let result = provider.refresh_token("revoked").await;
        assert!(result.is_err());
    }
}
