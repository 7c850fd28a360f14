//! TikTok OAuth provider for the authweave framework.
//!
//! TikTok is not a stock OAuth2 deployment: the app credential is sent as
//! `client_key`, and both the token and userinfo responses wrap their
//! payloads in a `data` envelope. This provider unwraps both.

use async_trait::async_trait;
use authweave_core::{
    Account, AuthError, AuthUser, OAuthProvider, OAuthToken, Provider, ProviderProfile,
    SignInEvent,
};
use serde::Deserialize;
use serde_json::Value;

const AUTH_URL: &str = "https://open-api.tiktok.com/platform/oauth/connect";
const TOKEN_URL: &str = "https://open-api.tiktok.com/oauth/access_token/";
const USERINFO_URL: &str = "https://open-api.tiktok.com/user/info/";
const SCOPE: &str = "user.info.basic";

#[derive(Debug, Default, Deserialize)]
struct TikTokTokenEnvelope {
    #[serde(default)]
    data: TikTokTokenData,
}

#[derive(Debug, Default, Deserialize)]
struct TikTokTokenData {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    open_id: Option<String>,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    scope: Option<String>,
}

impl From<TikTokTokenData> for OAuthToken {
    fn from(data: TikTokTokenData) -> Self {
        OAuthToken {
            access_token: data.access_token,
            token_type: Some("bearer".to_string()),
            expires_in: data.expires_in,
            refresh_token: data.refresh_token,
            scope: data.scope,
            id_token: None,
        }
    }
}

/// TikTok OAuth provider (open-api endpoints).
pub struct TikTokProvider {
    client_key: String,
    client_secret: String,
    redirect_uri: String,
    token_url: String,
    userinfo_url: String,
}

impl TikTokProvider {
    /// Create a provider with the standard TikTok open-api endpoints.
    ///
    /// TikTok calls the app credential a "client key" rather than a client
    /// id, matching the `TIKTOK_CLIENT_KEY` environment variable.
    pub fn new(client_key: String, client_secret: String, redirect_uri: String) -> Self {
        Self {
            client_key,
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
}

#[async_trait]
impl OAuthProvider for TikTokProvider {
    fn provider(&self) -> Provider {
        Provider::TikTok
    }

    fn authorization_url(&self, state: &str, _code_challenge: Option<&str>) -> String {
        format!(
            "{AUTH_URL}?client_key={}&redirect_uri={}&response_type=code&scope={}&state={}",
            urlencoding::encode(&self.client_key),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(SCOPE),
            urlencoding::encode(state),
        )
    }

    async fn exchange_code(
        &self,
        code: &str,
        _code_verifier: Option<&str>,
    ) -> Result<SignInEvent, AuthError> {
        let client = reqwest::Client::new();

        let form = vec![
            ("client_key", self.client_key.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("code", code),
            ("grant_type", "authorization_code"),
        ];

        let response = client.post(&self.token_url).form(&form).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::InvalidCode(format!("{status}: {body}")));
        }
        // TikTok reports errors with a 200 status and an empty data object.
        let envelope: TikTokTokenEnvelope = response.json().await?;
        if envelope.data.access_token.is_empty() {
            return Err(AuthError::InvalidCode(
                "token response carried no access_token".to_string(),
            ));
        }
        let open_id = envelope.data.open_id.clone();
        let token: OAuthToken = envelope.data.into();

        let response = client
            .get(&self.userinfo_url)
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
        let claims = raw.pointer("/data/user").unwrap_or(&raw).clone();

        let user_id = claims
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .or_else(|| open_id.clone());
        let user = AuthUser {
            id: user_id.clone(),
            name: claims
                .get("display_name")
                .and_then(Value::as_str)
                .map(str::to_owned),
            email: None,
            image: claims
                .get("avatar_large")
                .and_then(Value::as_str)
                .map(str::to_owned),
        };
        let account = Account::from_token(Provider::TikTok, user_id, &token);
        let profile = ProviderProfile::from_raw(Provider::TikTok.as_str(), claims);

        Ok(SignInEvent {
            user,
            account: Some(account),
            profile: Some(profile),
        })
    }
}
