//! The four decision points of the sign-in pipeline: whether a sign-in may
//! proceed, where the browser goes afterwards, what gets written into the
//! session token, and what the client-facing session looks like.

use authweave_core::{normalize, SessionToken, SessionView, SignInEvent};

/// Decide whether a completed sign-in may proceed.
///
/// Accepts every sign-in unconditionally; no allow-list or block-list is
/// consulted.
pub fn authorize_sign_in(_event: &SignInEvent) -> bool {
    true
}

/// Resolve the post-auth redirect target.
///
/// Always resolves to the configured base URL; the requested target is
/// deliberately ignored.
pub fn resolve_redirect(_requested: &str, base_url: &str) -> String {
    base_url.to_string()
}

/// Write the normalized identity into the session token.
///
/// Runs only when the event carries both an account and a profile. Token
/// refreshes carry neither, and the token passes through untouched.
pub fn enrich_token(mut token: SessionToken, event: &SignInEvent) -> SessionToken {
    let (Some(account), Some(profile)) = (&event.account, &event.profile) else {
        log::debug!("no fresh account/profile on event; session token unchanged");
        return token;
    };

    log::debug!(
        "enriching session token from {} sign-in, account id {:?}",
        account.provider,
        account.id
    );

    let identity = normalize(profile, account, &event.user);
    token.id = identity.id;
    token.name = identity.name;
    token.email = identity.email;
    token.profile_url = identity.profile_url;

    log::debug!("session token enriched, profile url {:?}", token.profile_url);
    token
}

/// Shape the client-facing session view.
///
/// A passthrough: the default view derived from the session token is returned
/// as-is.
pub fn shape_session(view: SessionView, _token: &SessionToken) -> SessionView {
    view
}

#[cfg(test)]
mod tests {
    use super::*;
    use authweave_core::{Account, AuthUser, ProviderProfile, SessionUser};
    use serde_json::json;

    fn twitter_event() -> SignInEvent {
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
                json!({"username": "alice", "sub": "1", "name": "Alice", "email": "a@x.com"}),
            )),
        }
    }

    fn enriched_token() -> SessionToken {
        SessionToken {
            id: Some("prev-id".to_string()),
            name: "Prev".to_string(),
            email: "prev@x.com".to_string(),
            profile_url: "https://twitter.com/prev".to_string(),
        }
    }

    #[test]
    fn every_sign_in_is_authorized() {
        assert!(authorize_sign_in(&twitter_event()));
        let refresh = SignInEvent {
            user: AuthUser::default(),
            account: None,
            profile: None,
        };
        assert!(authorize_sign_in(&refresh));
    }

    #[test]
    fn redirect_ignores_the_requested_target() {
        assert_eq!(
            resolve_redirect("https://elsewhere.example.org", "https://app.example.com"),
            "https://app.example.com"
        );
    }

    #[test]
    fn enrichment_writes_all_four_identity_fields() {
        let token = enrich_token(SessionToken::default(), &twitter_event());
        assert_eq!(token.id.as_deref(), Some("1"));
        assert_eq!(token.name, "Alice");
        assert_eq!(token.email, "a@x.com");
        assert_eq!(token.profile_url, "https://twitter.com/alice");
    }

    #[test]
    fn refresh_without_account_leaves_the_token_unchanged() {
        let mut event = twitter_event();
        event.account = None;

        let token = enrich_token(enriched_token(), &event);
        assert_eq!(token, enriched_token());
    }

    #[test]
    fn refresh_without_profile_leaves_the_token_unchanged() {
        let mut event = twitter_event();
        event.profile = None;

        let token = enrich_token(enriched_token(), &event);
        assert_eq!(token, enriched_token());
    }

    #[test]
    fn session_shaping_is_a_passthrough() {
        let view = SessionView {
            user: SessionUser {
                name: "Alice".to_string(),
                email: "a@x.com".to_string(),
            },
            expires: chrono::Utc::now(),
        };
        let shaped = shape_session(view.clone(), &enriched_token());
        assert_eq!(shaped, view);
    }
}
