//! Instagram Basic Display OAuth provider for the authweave framework.

use async_trait::async_trait;
use authweave_core::{
    Account, AuthError, AuthUser, OAuthProvider, OAuthToken, Provider, ProviderProfile,
    SignInEvent,
};
use serde::Deserialize;
use serde_json::Value;

const AUTH_URL: &str = "https://api.instagram.com/oauth/authorize";
const TOKEN_URL: &str = "https://api.instagram.com/oauth/access_token";
const USERINFO_URL: &str = "https://graph.instagram.com/me";
const SCOPE: &str = "user_profile";
const PROFILE_FIELDS: &str = "id,username,account_type";

/// Instagram OAuth2 provider against the Basic Display API.
pub struct InstagramProvider {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
    token_url: String,
    userinfo_url: String,
}

/// The Basic Display token response: an access token plus the numeric user id.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct InstagramTokenResponse {
    access_token: String,
    user_id: Option<Value>,
}

impl InstagramProvider {
    /// Create a provider with the standard Basic Display endpoints.
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

fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[async_trait]
impl OAuthProvider for InstagramProvider {
    fn provider(&self) -> Provider {
        Provider::Instagram
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
        let token_response: InstagramTokenResponse = response.json().await?;
        let token = OAuthToken {
            access_token: token_response.access_token.clone(),
            ..OAuthToken::default()
        };

        // Basic Display authenticates userinfo with a query parameter.
        let response = client
            .get(&self.userinfo_url)
            .query(&[
                ("fields", PROFILE_FIELDS),
                ("access_token", token.access_token.as_str()),
            ])
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

        let account_id = token_response
            .user_id
            .as_ref()
            .and_then(value_to_id)
            .or_else(|| raw.get("id").and_then(Value::as_str).map(str::to_owned));

        let user = AuthUser {
            id: raw.get("id").and_then(Value::as_str).map(str::to_owned),
            name: raw
                .get("username")
                .and_then(Value::as_str)
                .map(str::to_owned),
            email: None,
            image: None,
        };
        let account = Account::from_token(Provider::Instagram, account_id, &token);
        let profile = ProviderProfile::from_raw(Provider::Instagram.as_str(), raw);

        Ok(SignInEvent {
            user,
            account: Some(account),
            profile: Some(profile),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider() -> InstagramProvider {
        InstagramProvider::new(
            "ig-app-id".to_string(),
            "ig-app-secret".to_string(),
            "http://localhost:3000/api/auth/callback/instagram".to_string(),
        )
    }

    fn provider_for(server: &MockServer) -> InstagramProvider {
        provider().with_endpoints(
            format!("{}/oauth/access_token", server.uri()),
            format!("{}/me", server.uri()),
        )
    }

    #[test]
    fn authorization_url_requests_the_user_profile_scope() {
        let url = provider().authorization_url("state-1", None);
        assert!(url.starts_with("https://api.instagram.com/oauth/authorize?"));
        assert!(url.contains("scope=user_profile"));
        assert!(url.contains("response_type=code"));
    }

    #[tokio::test]
    async fn exchange_code_uses_the_numeric_user_id_as_account_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/oauth/access_token"))
            .and(body_string_contains("code=auth-code"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "at-ig",
                "user_id": 17841400
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/me"))
            .and(query_param("access_token", "at-ig"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "17841400",
                "username": "adalovelace",
                "account_type": "PERSONAL"
            })))
            .mount(&server)
            .await;

        let event = provider_for(&server)
            .exchange_code("auth-code", None)
            .await
            .unwrap();

        let account = event.account.unwrap();
        assert_eq!(account.provider, "instagram");
        assert_eq!(account.id.as_deref(), Some("17841400"));
        assert_eq!(event.user.name.as_deref(), Some("adalovelace"));

        match event.profile.unwrap() {
            ProviderProfile::Instagram(p) => {
                assert_eq!(p.username.as_deref(), Some("adalovelace"));
            }
            other => panic!("expected instagram profile, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rejected_code_surfaces_as_invalid_code() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/oauth/access_token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error_type": "OAuthException",
                "error_message": "Invalid authorization code"
            })))
            .mount(&server)
            .await;

        let result = provider_for(&server).exchange_code("bad-code", None).await;
        assert!(matches!(result, Err(AuthError::InvalidCode(_))));
    }
}
