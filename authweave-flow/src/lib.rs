//! # Authweave Flow
//!
//! `authweave-flow` orchestrates the sign-in flows: the OAuth2 Authorization
//! Code flow around each provider, and the callback gates that run at every
//! sign-in (sign-in authorization, redirect resolution, token enrichment and
//! session shaping).
//!
//! ## Key Components
//!
//! - **[`OAuth2Flow`]**: Orchestrates the standard OAuth2 Authorization Code flow.
//! - **[`Authweave`]**: The main service holding the provider registry, the
//!   token manager and the cookie configuration.
//! - **[`AuthweaveBuilder`]**: A builder for configuring and creating an
//!   [`Authweave`] instance.
//! - **[`callbacks`]**: The gates applied to every sign-in.

#![warn(missing_docs)]

pub use authweave_core::ErasedOAuthFlow;
use authweave_core::{
    error::AuthError, state::SessionToken, state::SignInEvent, OAuthProvider, SameSite,
};
use authweave_token::TokenManager;

use std::collections::HashMap;
use std::sync::Arc;

/// Callback gates applied to every sign-in.
pub mod callbacks;
/// OAuth2 Authorization Code flow implementation.
pub mod oauth2;

pub use oauth2::OAuth2Flow;

pub use chrono;

/// Configuration for the session cookie and the short-lived flow cookies.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name of the session cookie.
    pub cookie_name: String,
    /// Cookie path.
    pub path: String,
    /// Whether cookies should only be sent over HTTPS.
    pub secure: bool,
    /// Whether cookies are hidden from client-side scripts.
    pub http_only: bool,
    /// Cross-site behavior of the session cookie.
    pub same_site: SameSite,
    /// Session lifetime; also bounds the session JWT `exp` claim.
    pub max_age: Option<chrono::Duration>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "authweave.session-token".to_string(),
            path: "/".to_string(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            max_age: Some(chrono::Duration::days(30)),
        }
    }
}

/// The unified Authweave service.
#[derive(Clone)]
pub struct Authweave {
    /// Map of registered OAuth provider flows, keyed by provider identifier.
    pub providers: HashMap<String, Arc<dyn ErasedOAuthFlow>>,
    /// Manager for session JWT signing and validation.
    pub token_manager: Arc<TokenManager>,
    /// Configuration for the session and flow cookies.
    pub session_config: SessionConfig,
    /// Base URL every post-auth redirect resolves to.
    pub base_url: String,
    /// Path of an app-hosted sign-in page replacing the built-in one.
    pub signin_page: Option<String>,
    /// Emit debug diagnostics for every sign-in event.
    pub debug: bool,
}

impl Authweave {
    /// Create a new [`AuthweaveBuilder`] to configure the service.
    pub fn builder() -> AuthweaveBuilder {
        AuthweaveBuilder::default()
    }

    /// Run the callback gates over a completed sign-in and issue the session JWT.
    pub fn issue_session(&self, event: &SignInEvent) -> Result<String, AuthError> {
        if !callbacks::authorize_sign_in(event) {
            return Err(AuthError::Callback("sign-in rejected".to_string()));
        }

        if self.debug {
            log::debug!("sign-in event: {event:?}");
        }

        let session = callbacks::enrich_token(SessionToken::default(), event);
        self.token_manager
            .issue_session_token(&session, self.session_max_age())
    }

    /// Resolve the post-auth redirect target.
    pub fn resolve_redirect(&self, requested: &str) -> String {
        callbacks::resolve_redirect(requested, &self.base_url)
    }

    /// The configured session lifetime.
    pub fn session_max_age(&self) -> chrono::Duration {
        self.session_config
            .max_age
            .unwrap_or_else(|| chrono::Duration::days(30))
    }
}

/// A builder for configuring and creating an [`Authweave`] instance.
pub struct AuthweaveBuilder {
    providers: HashMap<String, Arc<dyn ErasedOAuthFlow>>,
    token_manager: Option<Arc<TokenManager>>,
    session_config: SessionConfig,
    base_url: String,
    signin_page: Option<String>,
    debug: bool,
}

impl Default for AuthweaveBuilder {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            token_manager: None,
            session_config: SessionConfig::default(),
            base_url: "/".to_string(),
            signin_page: None,
            debug: false,
        }
    }
}

impl AuthweaveBuilder {
    /// Register an OAuth provider flow.
    pub fn provider<P>(mut self, flow: OAuth2Flow<P>) -> Self
    where
        P: OAuthProvider + 'static,
    {
        let id = flow.provider().as_str().to_string();
        self.providers.insert(id, Arc::new(flow));
        self
    }

    /// Set the token manager.
    pub fn token_manager(mut self, manager: Arc<TokenManager>) -> Self {
        self.token_manager = Some(manager);
        self
    }

    /// Set the JWT secret for the default token manager.
    pub fn jwt_secret(self, secret: &[u8]) -> Self {
        self.token_manager(Arc::new(TokenManager::new(secret)))
    }

    /// Set the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Set the base URL every post-auth redirect resolves to.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Host the sign-in page at `path` instead of the built-in one.
    pub fn signin_page(mut self, path: impl Into<String>) -> Self {
        self.signin_page = Some(path.into());
        self
    }

    /// Emit debug diagnostics for every sign-in event.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Build the [`Authweave`] instance.
    ///
    /// Fails when neither a token manager nor a JWT secret was configured.
    pub fn build(self) -> Result<Authweave, AuthError> {
        let token_manager = self.token_manager.ok_or_else(|| {
            AuthError::Token("no JWT secret or token manager configured".to_string())
        })?;

        Ok(Authweave {
            providers: self.providers,
            token_manager,
            session_config: self.session_config,
            base_url: self.base_url,
            signin_page: self.signin_page,
            debug: self.debug,
        })
    }
}
