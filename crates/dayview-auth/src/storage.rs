//! Persisted auth artifacts: tokens and the signed-in user record.
//!
//! Backed by the shared key-value store; keys mirror what the gateways
//! expect. Absence of a key means "not signed in", which is a normal state.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use dayview_core::error::StorageError;
use dayview_core::kv::KvStore;

const ACCESS_TOKEN_KEY: &str = "google_calendar_access_token";
const REFRESH_TOKEN_KEY: &str = "google_calendar_refresh_token";
const USER_INFO_KEY: &str = "google_calendar_user_info";

/// Signed-in user record, stored serialized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredUser {
    pub email: Option<String>,
    pub name: Option<String>,
    pub picture: Option<String>,
}

/// Snapshot of the persisted auth state.
#[derive(Debug, Clone)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub user: Option<StoredUser>,
}

/// Auth artifact storage over the key-value store.
#[derive(Clone)]
pub struct AuthStorage {
    store: Arc<KvStore>,
}

impl AuthStorage {
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    /// Persist a full session after sign-in or token exchange.
    pub fn store_session(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
        user: &StoredUser,
    ) -> Result<(), StorageError> {
        self.store.set(ACCESS_TOKEN_KEY, access_token)?;
        if let Some(refresh) = refresh_token {
            self.store.set(REFRESH_TOKEN_KEY, refresh)?;
        }
        let user_json = serde_json::to_string(user)
            .map_err(|e| StorageError::WriteFailed(e.to_string()))?;
        self.store.set(USER_INFO_KEY, &user_json)
    }

    pub fn access_token(&self) -> Option<String> {
        self.store.get(ACCESS_TOKEN_KEY)
    }

    pub fn set_access_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(ACCESS_TOKEN_KEY, token)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.store.get(REFRESH_TOKEN_KEY)
    }

    pub fn set_refresh_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(REFRESH_TOKEN_KEY, token)
    }

    pub fn user(&self) -> Option<StoredUser> {
        let json = self.store.get(USER_INFO_KEY)?;
        serde_json::from_str(&json).ok()
    }

    /// Current auth state; authenticated means an access token is present.
    pub fn auth_state(&self) -> AuthState {
        let access_token = self.access_token();
        AuthState {
            is_authenticated: access_token.is_some(),
            access_token,
            refresh_token: self.refresh_token(),
            user: self.user(),
        }
    }

    /// Sign out: clear every auth artifact in one pass.
    pub fn sign_out(&self) -> Result<(), StorageError> {
        self.store.remove_many(&[ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_INFO_KEY])
    }
}
