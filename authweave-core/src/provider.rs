use serde::{Deserialize, Serialize};
use std::fmt;

/// The social providers known to the sign-in flow.
///
/// Telegram has no OAuth flow; it is listed because its login-widget callback
/// and profile shape are part of the surface, pending a provider
/// implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Google (OIDC).
    Google,
    /// Facebook (Graph API).
    Facebook,
    /// Instagram (Basic Display API).
    Instagram,
    /// LinkedIn (OIDC).
    LinkedIn,
    /// Twitter/X (OAuth 2.0 with PKCE).
    Twitter,
    /// TikTok (open-api, `client_key` parameters).
    TikTok,
    /// Telegram (login widget; no OAuth flow).
    Telegram,
}

impl Provider {
    /// The canonical lowercase identifier, as used in routes and account records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Google => "google",
            Provider::Facebook => "facebook",
            Provider::Instagram => "instagram",
            Provider::LinkedIn => "linkedin",
            Provider::Twitter => "twitter",
            Provider::TikTok => "tiktok",
            Provider::Telegram => "telegram",
        }
    }

    /// Human-readable name for sign-in pages and provider listings.
    pub fn label(&self) -> &'static str {
        match self {
            Provider::Google => "Google",
            Provider::Facebook => "Facebook",
            Provider::Instagram => "Instagram",
            Provider::LinkedIn => "LinkedIn",
            Provider::Twitter => "Twitter",
            Provider::TikTok => "TikTok",
            Provider::Telegram => "Telegram",
        }
    }

    /// Parse a provider identifier; `None` for unrecognized names.
    pub fn parse(s: &str) -> Option<Provider> {
        match s {
            "google" => Some(Provider::Google),
            "facebook" => Some(Provider::Facebook),
            "instagram" => Some(Provider::Instagram),
            "linkedin" => Some(Provider::LinkedIn),
            "twitter" => Some(Provider::Twitter),
            "tiktok" => Some(Provider::TikTok),
            "telegram" => Some(Provider::Telegram),
            _ => None,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Provider {
    type Err = crate::error::AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Provider::parse(s)
            .ok_or_else(|| crate::error::AuthError::Provider(format!("unknown provider: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_roundtrips_canonical_names() {
        for provider in [
            Provider::Google,
            Provider::Facebook,
            Provider::Instagram,
            Provider::LinkedIn,
            Provider::Twitter,
            Provider::TikTok,
            Provider::Telegram,
        ] {
            assert_eq!(Provider::parse(provider.as_str()), Some(provider));
        }
    }

    #[test]
    fn parse_rejects_unknown_and_cased_names() {
        assert_eq!(Provider::parse("github"), None);
        assert_eq!(Provider::parse("Google"), None);
        assert_eq!(Provider::parse(""), None);
    }

    #[test]
    fn from_str_mirrors_parse() {
        assert_eq!("tiktok".parse::<Provider>().unwrap(), Provider::TikTok);
        assert!("github".parse::<Provider>().is_err());
    }

    #[test]
    fn serializes_to_lowercase_identifier() {
        let json = serde_json::to_string(&Provider::LinkedIn).unwrap();
        assert_eq!(json, "\"linkedin\"");
    }
}
