// Integration tests for authweave-axum
//
// HTTP-level tests using tower::ServiceExt::oneshot to exercise the full
// axum router without starting a real TCP server.

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use http_body_util::BodyExt;
use tower::ServiceExt;
use tower_cookies::CookieManagerLayer;

use authweave_axum::{AuthSession, AuthweaveAxumExt, AuthweaveState};
use authweave_core::{
    Account, AuthError, AuthUser, OAuthProvider, Provider, ProviderProfile, SignInEvent,
};
use authweave_flow::{Authweave, OAuth2Flow, SessionConfig};

/// A stub provider that skips the network: the authorization URL points at a
/// fixture host and the exchange returns a fixed twitter-shaped event.
struct StubProvider;

#[async_trait]
impl OAuthProvider for StubProvider {
    fn provider(&self) -> Provider {
        Provider::Twitter
    }

    fn authorization_url(&self, state: &str, code_challenge: Option<&str>) -> String {
        format!(
            "https://provider.test/authorize?state={state}&code_challenge={}",
            code_challenge.unwrap_or_default()
        )
    }

    async fn exchange_code(
        &self,
        code: &str,
        _code_verifier: Option<&str>,
    ) -> Result<SignInEvent, AuthError> {
        if code != "good-code" {
            return Err(AuthError::InvalidCode(code.to_string()));
        }
        Ok(stub_event())
    }
}

fn stub_event() -> SignInEvent {
    SignInEvent {
        user: AuthUser {
            id: Some("1".to_string()),
            name: Some("Alice".to_string()),
            email: Some("a@x.com".to_string()),
            image: None,
        },
        account: Some(Account {
            provider: "twitter".to_string(),
            id: Some("1".to_string()),
            ..Account::default()
        }),
        profile: Some(ProviderProfile::from_raw(
            "twitter",
            serde_json::json!({
                "sub": "1",
                "name": "Alice",
                "username": "alice",
                "email": "a@x.com"
            }),
        )),
    }
}

fn build_authweave() -> Authweave {
    Authweave::builder()
        .provider(OAuth2Flow::new(StubProvider))
        .jwt_secret(b"integration-test-secret")
        .base_url("https://app.example.com")
        .session_config(SessionConfig {
            secure: false,
            ..SessionConfig::default()
        })
        .build()
        .unwrap()
}

async fn whoami(AuthSession(claims): AuthSession) -> String {
    claims.session.name
}

fn build_app(authweave: &Authweave) -> axum::Router {
    axum::Router::new()
        .route("/whoami", get(whoami))
        .merge(authweave.axum_router())
        .layer(CookieManagerLayer::new())
        .with_state(AuthweaveState::from(authweave.clone()))
}

async fn body_to_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn set_cookies(response: &axum::response::Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect()
}

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn signin_page_lists_configured_providers() {
    let app = build_app(&build_authweave());

    let response = app
        .oneshot(
            Request::get("/api/auth/signin")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    assert!(body.contains("/api/auth/signin/twitter"));
    assert!(body.contains("Sign in with Twitter"));
}

#[tokio::test]
async fn configured_signin_page_replaces_the_builtin_one() {
    let authweave = Authweave::builder()
        .provider(OAuth2Flow::new(StubProvider))
        .jwt_secret(b"integration-test-secret")
        .base_url("https://app.example.com")
        .signin_page("/auth/signin")
        .build()
        .unwrap();
    let app = build_app(&authweave);

    let response = app
        .oneshot(
            Request::get("/api/auth/signin")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://app.example.com/auth/signin");
}

#[tokio::test]
async fn signin_redirects_to_the_provider_with_a_flow_cookie() {
    let app = build_app(&build_authweave());

    let response = app
        .oneshot(
            Request::get("/api/auth/signin/twitter")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    let location = location(&response).to_string();
    assert!(location.starts_with("https://provider.test/authorize?state="));

    // The challenge rode along on the authorization URL.
    let challenge = location.split("code_challenge=").nth(1).unwrap();
    assert!(!challenge.is_empty());

    // The verifier was parked in a flow cookie named after the state.
    let state = location
        .split("state=")
        .nth(1)
        .unwrap()
        .split('&')
        .next()
        .unwrap();
    let cookies = set_cookies(&response);
    assert!(cookies
        .iter()
        .any(|c| c.starts_with(&format!("authweave_flow_{state}="))));
}

#[tokio::test]
async fn signin_with_unknown_provider_is_not_found() {
    let app = build_app(&build_authweave());

    let response = app
        .oneshot(
            Request::get("/api/auth/signin/github")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_to_string(response.into_body()).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"]["message"], "Provider github not found");
}

#[tokio::test]
async fn callback_without_flow_cookie_is_unauthorized() {
    let app = build_app(&build_authweave());

    let response = app
        .oneshot(
            Request::get("/api/auth/callback/twitter?code=good-code&state=state-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_to_string(response.into_body()).await;
    assert!(body.contains("CSRF validation failed"));
}

#[tokio::test]
async fn callback_sets_the_session_cookie_and_redirects_home() {
    let authweave = build_authweave();
    let app = build_app(&authweave);

    let response = app
        .oneshot(
            Request::get("/api/auth/callback/twitter?code=good-code&state=state-1")
                .header(header::COOKIE, "authweave_flow_state-1=test-verifier")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://app.example.com");

    let cookies = set_cookies(&response);
    let session_cookie = cookies
        .iter()
        .find(|c| c.starts_with("authweave.session-token="))
        .expect("session cookie set");

    // The cookie value is a session JWT carrying the normalized identity.
    let jwt = session_cookie
        .split('=')
        .nth(1)
        .unwrap()
        .split(';')
        .next()
        .unwrap();
    let claims = authweave.token_manager.validate_session_token(jwt).unwrap();
    assert_eq!(claims.session.name, "Alice");
    assert_eq!(claims.session.profile_url, "https://twitter.com/alice");

    // The flow cookie was cleared.
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("authweave_flow_state-1=") && c.contains("Max-Age=0")));
}

#[tokio::test]
async fn callback_with_a_bad_code_is_unauthorized() {
    let app = build_app(&build_authweave());

    let response = app
        .oneshot(
            Request::get("/api/auth/callback/twitter?code=bad-code&state=state-2")
                .header(header::COOKIE, "authweave_flow_state-2=test-verifier")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_to_string(response.into_body()).await;
    assert!(body.contains("Authentication failed"));
}

#[tokio::test]
async fn callback_with_denied_consent_is_unauthorized() {
    let app = build_app(&build_authweave());

    let response = app
        .oneshot(
            Request::get("/api/auth/callback/twitter?error=access_denied&state=state-3")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_to_string(response.into_body()).await;
    assert!(body.contains("access_denied"));
}

#[tokio::test]
async fn session_without_a_cookie_is_null() {
    let app = build_app(&build_authweave());

    let response = app
        .oneshot(
            Request::get("/api/auth/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    assert_eq!(body, "null");
}

#[tokio::test]
async fn session_with_a_valid_cookie_returns_the_view() {
    let authweave = build_authweave();
    let jwt = authweave.issue_session(&stub_event()).unwrap();
    let app = build_app(&authweave);

    let response = app
        .oneshot(
            Request::get("/api/auth/session")
                .header(
                    header::COOKIE,
                    format!("authweave.session-token={jwt}"),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["user"]["name"], "Alice");
    assert_eq!(json["user"]["email"], "a@x.com");
    assert!(json["expires"].is_string());
}

#[tokio::test]
async fn expired_session_reads_as_null() {
    let authweave = build_authweave();
    let jwt = authweave
        .token_manager
        .issue_session_token(&Default::default(), authweave_flow::chrono::Duration::hours(-1))
        .unwrap();
    let app = build_app(&authweave);

    let response = app
        .oneshot(
            Request::get("/api/auth/session")
                .header(
                    header::COOKIE,
                    format!("authweave.session-token={jwt}"),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    assert_eq!(body, "null");
}

#[tokio::test]
async fn signout_clears_the_session_cookie() {
    let app = build_app(&build_authweave());

    let response = app
        .oneshot(
            Request::get("/api/auth/signout")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "https://app.example.com");

    let cookies = set_cookies(&response);
    assert!(cookies
        .iter()
        .any(|c| c.starts_with("authweave.session-token=") && c.contains("Max-Age=0")));
}

#[tokio::test]
async fn providers_endpoint_lists_the_registry() {
    let app = build_app(&build_authweave());

    let response = app
        .oneshot(
            Request::get("/api/auth/providers")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_to_string(response.into_body()).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["twitter"]["id"], "twitter");
    assert_eq!(json["twitter"]["name"], "Twitter");
    assert_eq!(
        json["twitter"]["signinUrl"],
        "https://app.example.com/api/auth/signin/twitter"
    );
    assert_eq!(
        json["twitter"]["callbackUrl"],
        "https://app.example.com/api/auth/callback/twitter"
    );
}

#[tokio::test]
async fn telegram_route_is_reserved() {
    let app = build_app(&build_authweave());

    let response = app
        .oneshot(
            Request::get("/api/auth/telegram")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn auth_session_extractor_guards_routes() {
    let authweave = build_authweave();
    let jwt = authweave.issue_session(&stub_event()).unwrap();
    let app = build_app(&authweave);

    let response = app
        .clone()
        .oneshot(Request::get("/whoami").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(
            Request::get("/whoami")
                .header(
                    header::COOKIE,
                    format!("authweave.session-token={jwt}"),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_string(response.into_body()).await, "Alice");
}
