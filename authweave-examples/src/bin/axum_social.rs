//! # Axum Social Sign-In Example
//!
//! A small site wired up with every supported social provider. Providers are
//! registered from environment variables (only configured ones show up), the
//! sign-in routes live under `/api/auth/*`, and `/profile` is protected by
//! the `AuthSession` extractor.
//!
//! ```sh
//! GOOGLE_CLIENT_ID=... GOOGLE_CLIENT_SECRET=... cargo run --bin axum_social
//! ```

use authweave::flow::{Authweave, OAuth2Flow};
use authweave_axum::{AuthSession, AuthweaveAxumExt, AuthweaveState, SessionConfig};
use authweave_providers_facebook::FacebookProvider;
use authweave_providers_google::GoogleProvider;
use authweave_providers_instagram::InstagramProvider;
use authweave_providers_linkedin::LinkedInProvider;
use authweave_providers_tiktok::TikTokProvider;
use authweave_providers_twitter::TwitterProvider;
use axum::{
    extract::State,
    response::{Html, IntoResponse},
    routing::get,
    Router,
};
use tower_cookies::CookieManagerLayer;

fn callback_url(base: &str, provider: &str) -> String {
    format!("{}/api/auth/callback/{provider}", base.trim_end_matches('/'))
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let base_url = std::env::var("AUTHWEAVE_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:3000".to_string());

    let mut builder = Authweave::builder();

    // --- Google ---
    if let (Ok(client_id), Ok(client_secret)) = (
        std::env::var("GOOGLE_CLIENT_ID"),
        std::env::var("GOOGLE_CLIENT_SECRET"),
    ) {
        let provider = GoogleProvider::new(client_id, client_secret, callback_url(&base_url, "google"));
        builder = builder.provider(OAuth2Flow::new(provider));
    }

    // --- Facebook ---
    if let (Ok(client_id), Ok(client_secret)) = (
        std::env::var("FACEBOOK_CLIENT_ID"),
        std::env::var("FACEBOOK_CLIENT_SECRET"),
    ) {
        let provider =
            FacebookProvider::new(client_id, client_secret, callback_url(&base_url, "facebook"));
        builder = builder.provider(OAuth2Flow::new(provider));
    }

    // --- Instagram ---
    if let (Ok(client_id), Ok(client_secret)) = (
        std::env::var("INSTAGRAM_CLIENT_ID"),
        std::env::var("INSTAGRAM_CLIENT_SECRET"),
    ) {
        let provider =
            InstagramProvider::new(client_id, client_secret, callback_url(&base_url, "instagram"));
        builder = builder.provider(OAuth2Flow::new(provider));
    }

    // --- LinkedIn ---
    if let (Ok(client_id), Ok(client_secret)) = (
        std::env::var("LINKEDIN_CLIENT_ID"),
        std::env::var("LINKEDIN_CLIENT_SECRET"),
    ) {
        let provider =
            LinkedInProvider::new(client_id, client_secret, callback_url(&base_url, "linkedin"));
        builder = builder.provider(OAuth2Flow::new(provider));
    }

    // --- Twitter ---
    if let (Ok(client_id), Ok(client_secret)) = (
        std::env::var("TWITTER_ID"),
        std::env::var("TWITTER_SECRET"),
    ) {
        let provider =
            TwitterProvider::new(client_id, client_secret, callback_url(&base_url, "twitter"));
        builder = builder.provider(OAuth2Flow::new(provider));
    }

    // --- TikTok ---
    if let (Ok(client_key), Ok(client_secret)) = (
        std::env::var("TIKTOK_CLIENT_KEY"),
        std::env::var("TIKTOK_CLIENT_SECRET"),
    ) {
        let provider =
            TikTokProvider::new(client_key, client_secret, callback_url(&base_url, "tiktok"));
        builder = builder.provider(OAuth2Flow::new(provider));
    }

    let jwt_secret = std::env::var("AUTHWEAVE_JWT_SECRET").unwrap_or_else(|_| {
        log::warn!("AUTHWEAVE_JWT_SECRET not set, using a development-only secret");
        "authweave-dev-secret".to_string()
    });

    let authweave = builder
        .jwt_secret(jwt_secret.as_bytes())
        .base_url(base_url)
        .signin_page("/auth/signin")
        .session_config(SessionConfig {
            secure: false, // For local development
            ..Default::default()
        })
        .debug(true)
        .build()
        .unwrap();

    let state = AuthweaveState::from(authweave.clone());

    let app = Router::new()
        .route("/", get(index))
        .route("/auth/signin", get(signin_page))
        .route("/profile", get(profile))
        .merge(authweave.axum_router())
        .layer(CookieManagerLayer::new())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await.unwrap();
    println!("Listening on http://0.0.0.0:3000");
    axum::serve(listener, app).await.unwrap();
}

async fn index(State(state): State<AuthweaveState>) -> impl IntoResponse {
    let mut html = String::from("<h1>Authweave Social Sign-In Example</h1><ul>");
    for provider in [
        "google",
        "facebook",
        "instagram",
        "linkedin",
        "twitter",
        "tiktok",
    ] {
        if state.authweave.providers.contains_key(provider) {
            html.push_str(&format!(
                "<li><a href=\"/api/auth/signin/{provider}\">Sign in with {provider}</a></li>"
            ));
        }
    }
    html.push_str("</ul>");

    if state.authweave.providers.is_empty() {
        html.push_str(
            "<p><i>No providers configured. Set GOOGLE_CLIENT_ID/GOOGLE_CLIENT_SECRET, \
             TWITTER_ID/TWITTER_SECRET, ...</i></p>",
        );
    }

    html.push_str("<p><a href=\"/profile\">Profile</a> | <a href=\"/api/auth/signout\">Sign out</a></p>");
    Html(html)
}

/// The app-hosted sign-in page registered with the builder.
async fn signin_page(State(state): State<AuthweaveState>) -> Html<String> {
    let mut html = String::from("<h1>Sign in</h1><ul>");
    let mut ids: Vec<&String> = state.authweave.providers.keys().collect();
    ids.sort();
    for id in ids {
        html.push_str(&format!(
            "<li><a href=\"/api/auth/signin/{id}\">Sign in with {id}</a></li>"
        ));
    }
    html.push_str("</ul>");
    Html(html)
}

async fn profile(AuthSession(claims): AuthSession) -> impl IntoResponse {
    format!(
        "Hello, {}! Your email is {}. Your profile: {}. <br><a href=\"/api/auth/signout\">Sign out</a>",
        claims.session.name, claims.session.email, claims.session.profile_url,
    )
}
