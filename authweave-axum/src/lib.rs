pub use authweave_core::{Provider, SessionToken, SessionUser, SessionView};
pub use authweave_flow::{Authweave, SessionConfig};
use authweave_token::TokenManager;
use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::sync::Arc;
pub use tower_cookies::cookie::SameSite;
pub use tower_cookies::Cookie;
use tower_cookies::Cookies;

pub mod helpers;

pub use helpers::*;

#[derive(Clone)]
pub struct AuthweaveState {
    pub authweave: Authweave,
}

impl From<Authweave> for AuthweaveState {
    fn from(authweave: Authweave) -> Self {
        Self { authweave }
    }
}

impl FromRef<AuthweaveState> for Authweave {
    fn from_ref(state: &AuthweaveState) -> Self {
        state.authweave.clone()
    }
}

impl FromRef<AuthweaveState> for SessionConfig {
    fn from_ref(state: &AuthweaveState) -> Self {
        state.authweave.session_config.clone()
    }
}

impl FromRef<AuthweaveState> for Arc<TokenManager> {
    fn from_ref(state: &AuthweaveState) -> Self {
        state.authweave.token_manager.clone()
    }
}

/// The extractor for a validated session.
pub struct AuthSession(pub authweave_token::Claims);

impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
    Arc<TokenManager>: FromRef<S>,
    SessionConfig: FromRef<S>,
{
    type Rejection = AuthweaveAxumError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token_manager = Arc::<TokenManager>::from_ref(state);
        let session_config = SessionConfig::from_ref(state);
        let cookies = Cookies::from_request_parts(parts, state)
            .await
            .map_err(|e| AuthweaveAxumError::Internal(e.1.to_string()))?;

        let claims = helpers::get_session(&token_manager, &session_config, &cookies)?;

        Ok(AuthSession(claims))
    }
}

pub trait AuthweaveAxumExt {
    fn axum_router<S>(&self) -> axum::Router<S>
    where
        S: Clone + Send + Sync + 'static,
        Authweave: FromRef<S>;
}

impl AuthweaveAxumExt for Authweave {
    fn axum_router<S>(&self) -> axum::Router<S>
    where
        S: Clone + Send + Sync + 'static,
        Authweave: FromRef<S>,
    {
        use axum::routing::get;
        axum::Router::new()
            .route(
                "/api/auth/signin",
                get(helpers::axum_signin_page_handler::<S>),
            )
            .route(
                "/api/auth/signin/{provider}",
                get(helpers::axum_signin_handler::<S>).post(helpers::axum_signin_handler::<S>),
            )
            .route(
                "/api/auth/callback/{provider}",
                get(helpers::axum_callback_handler::<S>),
            )
            .route(
                "/api/auth/session",
                get(helpers::axum_session_handler::<S>),
            )
            .route(
                "/api/auth/signout",
                get(helpers::axum_signout_handler::<S>).post(helpers::axum_signout_handler::<S>),
            )
            .route(
                "/api/auth/providers",
                get(helpers::axum_providers_handler::<S>),
            )
            .route("/api/auth/telegram", get(helpers::axum_telegram_handler))
    }
}
