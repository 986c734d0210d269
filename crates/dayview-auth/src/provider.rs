//! Token provider contract consumed by the API gateways.
//!
//! The contract is deliberately forgiving: both methods return `None` rather
//! than an error when no session exists or a refresh fails, and gateways
//! translate `None` into their own auth errors.

use async_trait::async_trait;

use crate::google::GoogleOAuth2Provider;
use crate::storage::AuthStorage;

#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Current access token, or `None` when not signed in.
    async fn access_token(&self) -> Option<String>;

    /// Attempt one token refresh; returns the new access token, or `None`
    /// when there is no refresh token or the refresh fails.
    async fn refresh_access_token(&self) -> Option<String>;
}

/// Token provider over persisted auth state and the Google token endpoint.
pub struct StoredTokenProvider {
    storage: AuthStorage,
    oauth: GoogleOAuth2Provider,
}

impl StoredTokenProvider {
    pub fn new(storage: AuthStorage, oauth: GoogleOAuth2Provider) -> Self {
        Self { storage, oauth }
    }
}

#[async_trait]
impl TokenProvider for StoredTokenProvider {
    async fn access_token(&self) -> Option<String> {
        self.storage.access_token()
    }

    async fn refresh_access_token(&self) -> Option<String> {
        let refresh_token = self.storage.refresh_token()?;

        let tokens = match self.oauth.refresh_token(&refresh_token).await {
            Ok(tokens) => tokens,
            Err(e) => {
                tracing::warn!("Token refresh failed: {}", e);
                return None;
            }
        };

        if let Err(e) = self.storage.set_access_token(&tokens.access_token) {
            tracing::warn!("Failed to persist refreshed access token: {}", e);
        }
        if let Some(new_refresh) = &tokens.refresh_token {
            if let Err(e) = self.storage.set_refresh_token(new_refresh) {
                tracing::warn!("Failed to persist rotated refresh token: {}", e);
            }
        }

        Some(tokens.access_token)
    }
}
