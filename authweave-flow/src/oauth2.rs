use async_trait::async_trait;
use authweave_core::{AuthError, ErasedOAuthFlow, OAuthProvider, Provider, SignInEvent};

/// Orchestrates the standard OAuth2 Authorization Code flow.
pub struct OAuth2Flow<P: OAuthProvider> {
    provider: P,
}

#[async_trait]
impl<P: OAuthProvider> ErasedOAuthFlow for OAuth2Flow<P> {
    fn provider(&self) -> Provider {
        self.provider.provider()
    }

    fn initiate_login(&self, pkce_challenge: Option<&str>) -> (String, String) {
        self.initiate_login(pkce_challenge)
    }

    async fn finalize_login(
        &self,
        code: &str,
        received_state: &str,
        expected_state: &str,
        pkce_verifier: Option<&str>,
    ) -> Result<SignInEvent, AuthError> {
        self.finalize_login(code, received_state, expected_state, pkce_verifier)
            .await
    }
}

impl<P: OAuthProvider> OAuth2Flow<P> {
    /// Create a new `OAuth2Flow` with the given provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Generates the redirect URL and CSRF state.
    pub fn initiate_login(&self, pkce_challenge: Option<&str>) -> (String, String) {
        let state = uuid::Uuid::new_v4().to_string();
        let url = self.provider.authorization_url(&state, pkce_challenge);
        (url, state)
    }

    /// Completes the flow by exchanging the code.
    pub async fn finalize_login(
        &self,
        code: &str,
        received_state: &str,
        expected_state: &str,
        pkce_verifier: Option<&str>,
    ) -> Result<SignInEvent, AuthError> {
        if received_state != expected_state {
            return Err(AuthError::CsrfMismatch);
        }

        log::debug!("exchanging code with {}", self.provider.provider());
        self.provider.exchange_code(code, pkce_verifier).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use authweave_core::{AuthUser, SignInEvent};

    struct FixtureProvider;

    #[async_trait]
    impl OAuthProvider for FixtureProvider {
        fn provider(&self) -> Provider {
            Provider::Google
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
            Ok(SignInEvent {
                user: AuthUser {
                    id: Some(code.to_string()),
                    ..AuthUser::default()
                },
                account: None,
                profile: None,
            })
        }
    }

    #[test]
    fn initiate_login_mints_a_fresh_state_per_call() {
        let flow = OAuth2Flow::new(FixtureProvider);

        let (url_a, state_a) = flow.initiate_login(Some("challenge"));
        let (_, state_b) = flow.initiate_login(Some("challenge"));

        assert_ne!(state_a, state_b);
        assert!(url_a.contains(&format!("state={state_a}")));
        assert!(url_a.contains("code_challenge=challenge"));
    }

    #[tokio::test]
    async fn finalize_login_rejects_a_state_mismatch() {
        let flow = OAuth2Flow::new(FixtureProvider);

        let result = flow
            .finalize_login("code", "state-a", "state-b", None)
            .await;
        assert!(matches!(result, Err(AuthError::CsrfMismatch)));
    }

    #[tokio::test]
    async fn finalize_login_exchanges_the_code_when_states_match() {
        let flow = OAuth2Flow::new(FixtureProvider);

        let event = flow
            .finalize_login("code-1", "state", "state", None)
            .await
            .unwrap();
        assert_eq!(event.user.id.as_deref(), Some("code-1"));
    }
}
