//! Google OAuth2 for Dayview: token endpoints, persisted auth state, and the
//! authorized HTTP client shared by the calendar and tasks gateways.

pub mod google;
pub mod http;
pub mod provider;
pub mod storage;

pub use google::{GoogleOAuth2Provider, GoogleTokenResponse, GoogleUserInfo};
pub use http::{ApiClientError, AuthorizedClient};
pub use provider::{StoredTokenProvider, TokenProvider};
pub use storage::{AuthState, AuthStorage, StoredUser};
