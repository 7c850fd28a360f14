//! Twitter (X) OAuth2 provider for the authweave framework.
//!
//! Twitter's v2 API requires PKCE on the authorization request and HTTP
//! Basic credentials on the token exchange, so this provider expects a
//! code challenge/verifier pair from the flow layer.

use async_trait::async_trait;
use authweave_core::{
    Account, AuthError, AuthUser, OAuthProvider, OAuthToken, Provider, ProviderProfile,
    SignInEvent,
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{json, Value};

const AUTH_URL: &str = "https://twitter.com/i/oauth2/authorize";
const TOKEN_URL: &str = "https://api.twitter.com/2/oauth2/token";
const USERINFO_URL: &str = "https://api.twitter.com/2/users/me";
const SCOPE: &str = "users.read tweet.read offline.access";

/// Twitter OAuth2 provider (v2 endpoints).
pub struct TwitterProvider {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    token_url: String,
    userinfo_url: String,
}

impl TwitterProvider {
    /// Create a provider with the standard Twitter v2 endpoints.
    pub fn new(client_id: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_id,
            client_secret,
            redirect_uri,
            token_url: TOKEN_URL.to_string(),
            userinfo_url: USERINFO_URL.to_string(),
        }
    }

    /// Override the token and userinfo endpoints, e.g. to point at a mock server.
    pub fn with_endpoints(
        mut self,
        token_url: impl Into<String>,
        userinfo_url: impl Into<String>,
    ) -> Self {
        self.token_url = token_url.into();
        self.userinfo_url = userinfo_url.into();
        self
    }

    fn basic_credentials(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret))
    }
}

#[async_trait]
impl OAuthProvider for TwitterProvider {
    fn provider(&self) -> Provider {
        Provider::Twitter
    }

    fn authorization_url(&self, state: &str, code_challenge: Option<&str>) -> String {
        let mut url = format!(
            "{AUTH_URL}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(SCOPE),
            urlencoding::encode(state),
        );
        if let Some(challenge) = code_challenge {
            url.push_str(&format!(
                "&code_challenge={}&code_challenge_method=S256",
                urlencoding::encode(challenge)
            ));
        }
        url
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<SignInEvent, AuthError> {
        let client = reqwest::Client::new();

        // Confidential clients authenticate with Basic credentials, so the
        // form itself carries no client_secret.
        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
        ];
        if let Some(verifier) = code_verifier {
            form.push(("code_verifier", verifier));
        }

        let response = client
            .post(&self.token_url)
            .header("Authorization", format!("Basic {}", self.basic_credentials()))
            .form(&form)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::InvalidCode(format!("{status}: {body}")));
        }
        let token: OAuthToken = response.json().await?;

        let response = client
            .get(&self.userinfo_url)
            .query(&[("user.fields", "profile_image_url")])
            .bearer_auth(&token.access_token)
            .send()
            .await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Provider(format!(
                "userinfo request failed: {status}: {body}"
            )));
        }
        let raw: Value = response.json().await?;

        // /2/users/me wraps the user in a "data" envelope.
        let data = raw.get("data").unwrap_or(&raw);
        let user = AuthUser {
            id: data.get("id").and_then(Value::as_str).map(str::to_owned),
            name: data.get("name").and_then(Value::as_str).map(str::to_owned),
            email: data.get("email").and_then(Value::as_str).map(str::to_owned),
            image: data
                .get("profile_image_url")
                .and_then(Value::as_str)
                .map(str::to_owned),
        };
        let account = Account::from_token(Provider::Twitter, user.id.clone(), &token);
        let claims = json!({
            "sub": data.get("id").cloned().unwrap_or(Value::Null),
            "name": data.get("name").cloned().unwrap_or(Value::Null),
            "username": data.get("username").cloned().unwrap_or(Value::Null),
            "email": data.get("email").cloned().unwrap_or(Value::Null),
        });
        let profile = ProviderProfile::from_raw(Provider::Twitter.as_str(), claims);

        Ok(SignInEvent {
            user,
            account: Some(account),
            profile: Some(profile),
        })
    }
}
