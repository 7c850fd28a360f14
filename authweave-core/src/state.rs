use serde::{Deserialize, Serialize};

use crate::profile::ProviderProfile;
use crate::provider::Provider;

/// The session record carried in the signed session cookie.
///
/// The identity fields are written once, by the token enrichment at sign-in;
/// expiry bookkeeping lives in the token layer's claims.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    /// Stable subject identifier from the provider, when one was supplied.
    pub id: Option<String>,
    /// Display name; empty when the provider supplied none.
    #[serde(default)]
    pub name: String,
    /// Email address; empty when the provider supplied none.
    #[serde(default)]
    pub email: String,
    /// Public profile URL derived at sign-in; empty for unrecognized providers.
    #[serde(default)]
    pub profile_url: String,
}

/// The raw token-endpoint response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthToken {
    /// The bearer access token.
    pub access_token: String,
    /// Token type, normally `bearer`.
    pub token_type: Option<String>,
    /// Lifetime of the access token in seconds.
    pub expires_in: Option<u64>,
    /// Refresh token, when the provider issued one.
    pub refresh_token: Option<String>,
    /// Space- or comma-separated scopes actually granted.
    pub scope: Option<String>,
    /// OIDC identity token, when the provider issued one.
    pub id_token: Option<String>,
}

/// The per-sign-in account record assembled from the token exchange.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Provider identifier, e.g. `google`.
    pub provider: String,
    /// The provider-side account identifier.
    pub id: Option<String>,
    /// Bearer access token returned by the token endpoint.
    pub access_token: Option<String>,
    /// Token type, normally `bearer`.
    pub token_type: Option<String>,
    /// Scopes actually granted.
    pub scope: Option<String>,
    /// Refresh token, when the provider issued one.
    pub refresh_token: Option<String>,
    /// Unix timestamp at which the access token expires.
    pub expires_at: Option<i64>,
}

impl Account {
    /// Assemble an account record from a token-endpoint response.
    pub fn from_token(provider: Provider, id: Option<String>, token: &OAuthToken) -> Self {
        let expires_at = token
            .expires_in
            .map(|expires_in| chrono::Utc::now().timestamp() + expires_in as i64);
        Self {
            provider: provider.as_str().to_string(),
            id,
            access_token: Some(token.access_token.clone()),
            token_type: token.token_type.clone(),
            scope: token.scope.clone(),
            refresh_token: token.refresh_token.clone(),
            expires_at,
        }
    }
}

/// The provider-mapped user, produced by each provider's profile mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Provider account identifier, when one was supplied.
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Avatar URL.
    pub image: Option<String>,
}

/// Everything known about one completed sign-in, handed to the callback gates.
///
/// Token refreshes re-run the gates without a fresh exchange, so `account`
/// and `profile` are absent there and enrichment leaves the session token
/// untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignInEvent {
    /// The provider-mapped user.
    pub user: AuthUser,
    /// The account record; absent on token refreshes.
    pub account: Option<Account>,
    /// The raw provider profile; absent on token refreshes.
    pub profile: Option<ProviderProfile>,
}

/// The user block of the client-facing session view.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    /// Display name from the session token.
    pub name: String,
    /// Email address from the session token.
    pub email: String,
}

/// The client-facing session view returned by the session endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionView {
    /// The signed-in user.
    pub user: SessionUser,
    /// When the session expires.
    pub expires: chrono::DateTime<chrono::Utc>,
}
