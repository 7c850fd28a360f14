//! Google OIDC provider for the authweave framework.

use async_trait::async_trait;
use authweave_core::{
    Account, AuthError, AuthUser, OAuthProvider, OAuthToken, Provider, ProviderProfile,
    SignInEvent,
};
use serde_json::Value;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://openidconnect.googleapis.com/v1/userinfo";
const SCOPE: &str = "openid email profile";

/// Google OAuth2/OIDC provider.
pub struct GoogleProvider {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    token_url: String,
    userinfo_url: String,
}

impl GoogleProvider {
    /// Create a provider with the standard Google endpoints.
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
}

#[async_trait]
impl OAuthProvider for GoogleProvider {
    fn provider(&self) -> Provider {
        Provider::Google
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

        let mut form = vec![
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];
        if let Some(verifier) = code_verifier {
            form.push(("code_verifier", verifier));
        }

        let response = client.post(&self.token_url).form(&form).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::InvalidCode(format!("{status}: {body}")));
        }
        let token: OAuthToken = response.json().await?;

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

        let user = AuthUser {
            id: raw.get("sub").and_then(Value::as_str).map(str::to_owned),
            name: raw.get("name").and_then(Value::as_str).map(str::to_owned),
            email: raw.get("email").and_then(Value::as_str).map(str::to_owned),
            image: raw.get("picture").and_then(Value::as_str).map(str::to_owned),
        };
        let account = Account::from_token(Provider::Google, user.id.clone(), &token);
        let profile = ProviderProfile::from_raw(Provider::Google.as_str(), raw);

        Ok(SignInEvent {
            user,
            account: Some(account),
            profile: Some(profile),
        })
    }
}
