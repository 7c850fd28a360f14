use authweave_core::pkce::Pkce;
use authweave_core::{Provider, SessionUser, SessionView};
use authweave_flow::{callbacks, Authweave, SessionConfig};
use authweave_token::{Claims, TokenManager};
use axum::extract::{FromRef, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use tower_cookies::cookie::time;
use tower_cookies::{Cookie, Cookies};

/// Errors surfaced by the axum handlers and extractors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthweaveAxumError {
    /// The request carried no valid session or flow state.
    Unauthorized(String),
    /// The requested provider is not registered.
    NotFound(String),
    /// The request was missing a required parameter.
    BadRequest(String),
    /// Anything that should not happen during normal operation.
    Internal(String),
}

impl AuthweaveAxumError {
    fn status(&self) -> StatusCode {
        match self {
            AuthweaveAxumError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AuthweaveAxumError::NotFound(_) => StatusCode::NOT_FOUND,
            AuthweaveAxumError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AuthweaveAxumError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn message(&self) -> &str {
        match self {
            AuthweaveAxumError::Unauthorized(m)
            | AuthweaveAxumError::NotFound(m)
            | AuthweaveAxumError::BadRequest(m)
            | AuthweaveAxumError::Internal(m) => m,
        }
    }
}

impl IntoResponse for AuthweaveAxumError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = serde_json::json!({
            "error": {
                "message": self.message(),
                "status": status.as_u16(),
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Query parameters of the OAuth callback request.
#[derive(serde::Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
}

/// Create a 302 Found redirect response.
pub fn redirect_found(url: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, url.to_string())]).into_response()
}

pub fn to_cookie_same_site(ss: authweave_core::SameSite) -> tower_cookies::cookie::SameSite {
    match ss {
        authweave_core::SameSite::Lax => tower_cookies::cookie::SameSite::Lax,
        authweave_core::SameSite::Strict => tower_cookies::cookie::SameSite::Strict,
        authweave_core::SameSite::None => tower_cookies::cookie::SameSite::None,
    }
}

/// Build the session cookie carrying the signed session JWT.
pub fn create_session_cookie(config: &SessionConfig, value: String) -> Cookie<'static> {
    let mut builder = Cookie::build((config.cookie_name.clone(), value))
        .path(config.path.clone())
        .secure(config.secure)
        .http_only(config.http_only)
        .same_site(to_cookie_same_site(config.same_site));

    if let Some(max_age) = config.max_age {
        builder = builder.max_age(time::Duration::seconds(max_age.num_seconds()));
    }
    builder.build()
}

/// Build a cookie that removes `name` when added to the response.
pub fn removal_cookie(name: String, path: String) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path(path)
        .max_age(time::Duration::ZERO)
        .build()
}

fn flow_cookie_name(state: &str) -> String {
    format!("authweave_flow_{state}")
}

/// Read and validate the session JWT from the session cookie.
pub fn get_session(
    token_manager: &TokenManager,
    config: &SessionConfig,
    cookies: &Cookies,
) -> Result<Claims, AuthweaveAxumError> {
    let cookie = cookies
        .get(&config.cookie_name)
        .ok_or_else(|| AuthweaveAxumError::Unauthorized("No session cookie".to_string()))?;

    token_manager
        .validate_session_token(cookie.value())
        .map_err(|e| AuthweaveAxumError::Unauthorized(format!("Invalid session: {e}")))
}

/// Derive the client-facing session view from validated claims.
pub fn session_view_from_claims(claims: &Claims) -> SessionView {
    SessionView {
        user: SessionUser {
            name: claims.session.name.clone(),
            email: claims.session.email.clone(),
        },
        expires: chrono::DateTime::from_timestamp(claims.exp, 0).unwrap_or_default(),
    }
}

/// The sign-in page: redirects to the app-hosted page when one is
/// configured, otherwise renders a plain HTML list of the providers.
pub async fn axum_signin_page_handler<S>(State(authweave): State<Authweave>) -> Response
where
    S: Send + Sync,
    Authweave: FromRef<S>,
{
    if let Some(page) = &authweave.signin_page {
        let target = if page.starts_with('/') {
            format!("{}{page}", authweave.base_url.trim_end_matches('/'))
        } else {
            page.clone()
        };
        return redirect_found(&target);
    }

    let mut ids: Vec<&String> = authweave.providers.keys().collect();
    ids.sort();

    let mut html = String::from("<h1>Sign in</h1>\n<ul>\n");
    for id in ids {
        let label = Provider::parse(id).map(|p| p.label()).unwrap_or(id);
        html.push_str(&format!(
            "<li><a href=\"/api/auth/signin/{id}\">Sign in with {label}</a></li>\n"
        ));
    }
    html.push_str("</ul>\n");

    Html(html).into_response()
}

/// Initiate the OAuth2 login flow for `provider`.
///
/// Mints the CSRF state and PKCE pair, parks the verifier in a short-lived
/// flow cookie keyed by the state, and redirects to the provider.
pub async fn axum_signin_handler<S>(
    Path(provider): Path<String>,
    State(authweave): State<Authweave>,
    cookies: Cookies,
) -> Result<Response, AuthweaveAxumError>
where
    S: Send + Sync,
    Authweave: FromRef<S>,
{
    let flow = authweave
        .providers
        .get(&provider)
        .ok_or_else(|| AuthweaveAxumError::NotFound(format!("Provider {provider} not found")))?;

    let pkce = Pkce::new();
    let (url, csrf_state) = flow.initiate_login(Some(&pkce.code_challenge));

    let cookie = Cookie::build((flow_cookie_name(&csrf_state), pkce.code_verifier))
        .path("/")
        .http_only(true)
        .same_site(tower_cookies::cookie::SameSite::Lax)
        .secure(authweave.session_config.secure)
        .max_age(time::Duration::minutes(15))
        .build();
    cookies.add(cookie);

    Ok(redirect_found(&url))
}

/// Complete the OAuth2 login flow for `provider`.
///
/// Validates the flow cookie (the CSRF check), exchanges the code, runs the
/// sign-in gates, sets the session cookie and redirects to the base URL.
pub async fn axum_callback_handler<S>(
    Path(provider): Path<String>,
    State(authweave): State<Authweave>,
    cookies: Cookies,
    Query(params): Query<OAuthCallbackParams>,
) -> Result<Response, AuthweaveAxumError>
where
    S: Send + Sync,
    Authweave: FromRef<S>,
{
    let flow = authweave
        .providers
        .get(&provider)
        .ok_or_else(|| AuthweaveAxumError::NotFound(format!("Provider {provider} not found")))?;

    if let Some(error) = params.error {
        return Err(AuthweaveAxumError::Unauthorized(format!(
            "Provider returned error: {error}"
        )));
    }
    let code = params
        .code
        .ok_or_else(|| AuthweaveAxumError::BadRequest("Missing code parameter".to_string()))?;
    let state = params
        .state
        .ok_or_else(|| AuthweaveAxumError::BadRequest("Missing state parameter".to_string()))?;

    let cookie_name = flow_cookie_name(&state);
    let pkce_verifier = cookies
        .get(&cookie_name)
        .map(|c| c.value().to_string())
        .ok_or_else(|| {
            AuthweaveAxumError::Unauthorized("CSRF validation failed or login expired".to_string())
        })?;

    // Exchange code; the state itself is the expected state, the flow cookie
    // already proved it round-tripped through this browser.
    let event = flow
        .finalize_login(&code, &state, &state, Some(&pkce_verifier))
        .await
        .map_err(|e| AuthweaveAxumError::Unauthorized(format!("Authentication failed: {e}")))?;

    let jwt = authweave
        .issue_session(&event)
        .map_err(|e| AuthweaveAxumError::Internal(format!("Session error: {e}")))?;

    log::debug!("issued session for {provider} sign-in");

    cookies.add(create_session_cookie(&authweave.session_config, jwt));
    cookies.add(removal_cookie(cookie_name, "/".to_string()));

    Ok(redirect_found(&authweave.resolve_redirect("")))
}

/// The client-facing session view, or JSON `null` without a valid session.
pub async fn axum_session_handler<S>(
    State(authweave): State<Authweave>,
    cookies: Cookies,
) -> Response
where
    S: Send + Sync,
    Authweave: FromRef<S>,
{
    match get_session(&authweave.token_manager, &authweave.session_config, &cookies) {
        Ok(claims) => {
            let view = session_view_from_claims(&claims);
            let view = callbacks::shape_session(view, &claims.session);
            Json(view).into_response()
        }
        Err(_) => Json(serde_json::Value::Null).into_response(),
    }
}

/// Clear the session cookie and redirect to the base URL.
pub async fn axum_signout_handler<S>(
    State(authweave): State<Authweave>,
    cookies: Cookies,
) -> Response
where
    S: Send + Sync,
    Authweave: FromRef<S>,
{
    cookies.add(removal_cookie(
        authweave.session_config.cookie_name.clone(),
        authweave.session_config.path.clone(),
    ));

    redirect_found(&authweave.resolve_redirect(""))
}

/// JSON map of the configured providers with their sign-in and callback URLs.
pub async fn axum_providers_handler<S>(
    State(authweave): State<Authweave>,
) -> Json<serde_json::Value>
where
    S: Send + Sync,
    Authweave: FromRef<S>,
{
    let base = authweave.base_url.trim_end_matches('/');
    let mut map = serde_json::Map::new();
    for id in authweave.providers.keys() {
        let label = Provider::parse(id).map(|p| p.label()).unwrap_or(id);
        map.insert(
            id.clone(),
            serde_json::json!({
                "id": id,
                "name": label,
                "signinUrl": format!("{base}/api/auth/signin/{id}"),
                "callbackUrl": format!("{base}/api/auth/callback/{id}"),
            }),
        );
    }

    Json(serde_json::Value::Object(map))
}

/// The Telegram login-widget callback slot.
///
/// Telegram does not run an OAuth code exchange; the widget posts its own
/// signed payload. The route is reserved until that payload handling lands.
pub async fn axum_telegram_handler() -> (StatusCode, &'static str) {
    (
        StatusCode::NOT_IMPLEMENTED,
        "Telegram login-widget callback not implemented",
    )
}
