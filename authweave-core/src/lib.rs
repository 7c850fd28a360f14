//! # Authweave Core
//!
//! `authweave-core` provides the foundational traits and types for the authweave
//! social sign-in framework. It defines the provider abstractions, the typed
//! per-provider profile payloads and the identity normalization step that runs
//! at every sign-in.

#![warn(missing_docs)]

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// PKCE (Proof Key for Code Exchange) utilities.
pub mod pkce;

/// Errors that can occur during the sign-in process.
pub mod error;
pub use crate::error::AuthError;

/// The set of providers known to the sign-in flow.
pub mod provider;
pub use crate::provider::Provider;

/// Typed per-provider profile payloads.
pub mod profile;
pub use crate::profile::ProviderProfile;

/// State passed between the flow stages.
pub mod state;
pub use crate::state::{
    Account, AuthUser, OAuthToken, SessionToken, SessionUser, SessionView, SignInEvent,
};

/// Identity normalization across providers.
pub mod identity;
pub use crate::identity::{normalize, VerifiedIdentity};

/// Controls whether a cookie is sent with cross-site requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    /// The cookie is sent with "safe" cross-site requests (e.g., following a link).
    Lax,
    /// The cookie is only sent for same-site requests.
    Strict,
    /// The cookie is sent with all requests, including cross-site. Requires `Secure`.
    None,
}

/// Trait for an OAuth2-compatible provider.
#[async_trait]
pub trait OAuthProvider: Send + Sync {
    /// The provider this implementation talks to.
    fn provider(&self) -> Provider;

    /// Helper to get the authorization URL.
    fn authorization_url(&self, state: &str, code_challenge: Option<&str>) -> String;

    /// Exchange an authorization code for a completed sign-in event.
    ///
    /// Implementations redeem the code at the token endpoint, fetch the
    /// userinfo payload and assemble the event's user, account and profile.
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<SignInEvent, AuthError>;
}

/// Orchestrates the Authorization Code flow.
#[async_trait]
pub trait ErasedOAuthFlow: Send + Sync {
    /// Get the provider behind this flow.
    fn provider(&self) -> Provider;
    /// Generates the redirect URL and CSRF state.
    fn initiate_login(&self, pkce_challenge: Option<&str>) -> (String, String);
    /// Completes the flow by exchanging the code.
    async fn finalize_login(
        &self,
        code: &str,
        received_state: &str,
        expected_state: &str,
        pkce_verifier: Option<&str>,
    ) -> Result<SignInEvent, AuthError>;
}

#[async_trait]
impl<T: ErasedOAuthFlow + ?Sized> ErasedOAuthFlow for std::sync::Arc<T> {
    fn provider(&self) -> Provider {
        (**self).provider()
    }

    fn initiate_login(&self, pkce_challenge: Option<&str>) -> (String, String) {
        (**self).initiate_login(pkce_challenge)
    }

    async fn finalize_login(
        &self,
        code: &str,
        received_state: &str,
        expected_state: &str,
        pkce_verifier: Option<&str>,
    ) -> Result<SignInEvent, AuthError> {
        (**self)
            .finalize_login(code, received_state, expected_state, pkce_verifier)
            .await
    }
}

#[async_trait]
impl<T: ErasedOAuthFlow + ?Sized> ErasedOAuthFlow for Box<T> {
    fn provider(&self) -> Provider {
        (**self).provider()
    }

    fn initiate_login(&self, pkce_challenge: Option<&str>) -> (String, String) {
        (**self).initiate_login(pkce_challenge)
    }

    async fn finalize_login(
        &self,
        code: &str,
        received_state: &str,
        expected_state: &str,
        pkce_verifier: Option<&str>,
    ) -> Result<SignInEvent, AuthError> {
        (**self)
            .finalize_login(code, received_state, expected_state, pkce_verifier)
            .await
    }
}
