//! LinkedIn OIDC provider for the authweave framework.

use async_trait::async_trait;
use authweave_core::{
    Account, AuthError, AuthUser, OAuthProvider, OAuthToken, Provider, ProviderProfile,
    SignInEvent,
};
use serde_json::Value;

const AUTH_URL: &str = "https://www.linkedin.com/oauth/v2/authorization";
const TOKEN_URL: &str = "https://www.linkedin.com/oauth/v2/accessToken";
const USERINFO_URL: &str = "https://api.linkedin.com/v2/userinfo";
const SCOPE: &str = "openid profile email";

/// LinkedIn OAuth2/OIDC provider.
pub struct LinkedInProvider {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    token_url: String,
    userinfo_url: String,
}

impl LinkedInProvider {
    /// Create a provider with the standard LinkedIn endpoints.
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
impl OAuthProvider for LinkedInProvider {
    fn provider(&self) -> Provider {
        Provider::LinkedIn
    }

    fn authorization_url(&self, state: &str, _code_challenge: Option<&str>) -> String {
        format!(
            "{AUTH_URL}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            urlencoding::encode(&self.client_id),
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
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.redirect_uri.as_str()),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
        ];

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
        let account = Account::from_token(Provider::LinkedIn, user.id.clone(), &token);
        let profile = ProviderProfile::from_raw(Provider::LinkedIn.as_str(), raw);

        Ok(SignInEvent {
            user,
            account: Some(account),
            profile: Some(profile),
        })
    }
}
