use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::provider::Provider;

/// Userinfo claims returned by Google's OIDC endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoogleProfile {
    /// Stable subject identifier.
    pub sub: Option<String>,
    /// Full display name.
    pub name: Option<String>,
    /// Given name.
    pub given_name: Option<String>,
    /// Family name.
    pub family_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Whether Google has verified the email address.
    pub email_verified: Option<bool>,
    /// Avatar URL.
    pub picture: Option<String>,
}

/// Profile fields returned by the Facebook Graph `/me` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacebookProfile {
    /// App-scoped user identifier.
    pub id: Option<String>,
    /// Full display name.
    pub name: Option<String>,
    /// Email address, when the `email` scope was granted.
    pub email: Option<String>,
    /// Picture envelope (`{"data": {"url": ...}}`).
    pub picture: Option<Value>,
}

/// Profile fields returned by the Instagram Basic Display `/me` endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InstagramProfile {
    /// Instagram user identifier.
    pub id: Option<String>,
    /// Instagram handle.
    pub username: Option<String>,
    /// Account type (`PERSONAL`, `BUSINESS`, ...).
    pub account_type: Option<String>,
}

/// Userinfo claims returned by LinkedIn's OIDC endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkedInProfile {
    /// Stable subject identifier.
    pub sub: Option<String>,
    /// Full display name.
    pub name: Option<String>,
    /// Given name.
    pub given_name: Option<String>,
    /// Family name.
    pub family_name: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Avatar URL.
    pub picture: Option<String>,
    /// Public profile URL, when LinkedIn exposes one.
    #[serde(rename = "publicProfileUrl")]
    pub public_profile_url: Option<String>,
}

/// Twitter/X user fields, flattened out of the v2 `data` envelope.
///
/// The provider maps the v2 `data.id` into `sub` so the subject claim lines
/// up with the OIDC providers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TwitterProfile {
    /// Stable subject identifier (the v2 user id).
    pub sub: Option<String>,
    /// Full display name.
    pub name: Option<String>,
    /// Twitter handle, without the leading `@`.
    pub username: Option<String>,
    /// Email address; absent unless the app has elevated access.
    pub email: Option<String>,
}

/// TikTok user fields, taken from the `data.user` envelope of the
/// open-api userinfo response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TikTokProfile {
    /// User identifier.
    pub id: Option<String>,
    /// Stable open-api identifier.
    pub open_id: Option<String>,
    /// Identifier shared across apps of the same developer.
    pub union_id: Option<String>,
    /// TikTok handle, without the leading `@`.
    pub unique_id: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Large avatar URL.
    pub avatar_large: Option<String>,
}

/// Fields delivered by the Telegram login widget.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramProfile {
    /// Telegram user identifier.
    pub id: Option<i64>,
    /// Display name.
    pub name: Option<String>,
    /// Telegram handle.
    pub username: Option<String>,
    /// Avatar URL.
    pub photo_url: Option<String>,
}

/// A provider profile payload, tagged by the provider it came from.
///
/// Payloads from providers outside the known set are carried verbatim in
/// [`ProviderProfile::Other`]; normalization treats them uniformly (empty
/// profile URL, top-level `sub`/`name`/`email` lookups).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", content = "claims", rename_all = "lowercase")]
pub enum ProviderProfile {
    /// Google userinfo claims.
    Google(GoogleProfile),
    /// Facebook Graph profile.
    Facebook(FacebookProfile),
    /// Instagram Basic Display profile.
    Instagram(InstagramProfile),
    /// LinkedIn userinfo claims.
    LinkedIn(LinkedInProfile),
    /// Twitter/X user fields.
    Twitter(TwitterProfile),
    /// TikTok user fields.
    TikTok(TikTokProfile),
    /// Telegram login-widget fields.
    Telegram(TelegramProfile),
    /// Raw payload from an unrecognized provider.
    Other(Value),
}

impl ProviderProfile {
    /// Parse a raw userinfo payload into the typed variant for `provider`.
    ///
    /// Unknown provider names, and payloads that do not match the expected
    /// shape, fall back to [`ProviderProfile::Other`].
    pub fn from_raw(provider: &str, raw: Value) -> Self {
        let parsed = match Provider::parse(provider) {
            Some(Provider::Google) => GoogleProfile::deserialize(&raw).map(Self::Google),
            Some(Provider::Facebook) => FacebookProfile::deserialize(&raw).map(Self::Facebook),
            Some(Provider::Instagram) => InstagramProfile::deserialize(&raw).map(Self::Instagram),
            Some(Provider::LinkedIn) => LinkedInProfile::deserialize(&raw).map(Self::LinkedIn),
            Some(Provider::Twitter) => TwitterProfile::deserialize(&raw).map(Self::Twitter),
            Some(Provider::TikTok) => TikTokProfile::deserialize(&raw).map(Self::TikTok),
            Some(Provider::Telegram) => TelegramProfile::deserialize(&raw).map(Self::Telegram),
            None => return Self::Other(raw),
        };
        parsed.unwrap_or(Self::Other(raw))
    }

    /// The provider this payload belongs to; `None` for unrecognized payloads.
    pub fn provider(&self) -> Option<Provider> {
        match self {
            Self::Google(_) => Some(Provider::Google),
            Self::Facebook(_) => Some(Provider::Facebook),
            Self::Instagram(_) => Some(Provider::Instagram),
            Self::LinkedIn(_) => Some(Provider::LinkedIn),
            Self::Twitter(_) => Some(Provider::Twitter),
            Self::TikTok(_) => Some(Provider::TikTok),
            Self::Telegram(_) => Some(Provider::Telegram),
            Self::Other(_) => None,
        }
    }

    /// The stable subject identifier, when the payload carries one.
    pub fn sub(&self) -> Option<&str> {
        match self {
            Self::Google(p) => p.sub.as_deref(),
            Self::LinkedIn(p) => p.sub.as_deref(),
            Self::Twitter(p) => p.sub.as_deref(),
            Self::Facebook(_) | Self::Instagram(_) | Self::TikTok(_) | Self::Telegram(_) => None,
            Self::Other(v) => v.get("sub").and_then(Value::as_str),
        }
    }

    /// The literal `name` field, when the payload carries one.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Google(p) => p.name.as_deref(),
            Self::Facebook(p) => p.name.as_deref(),
            Self::LinkedIn(p) => p.name.as_deref(),
            Self::Twitter(p) => p.name.as_deref(),
            Self::Telegram(p) => p.name.as_deref(),
            Self::Instagram(_) | Self::TikTok(_) => None,
            Self::Other(v) => v.get("name").and_then(Value::as_str),
        }
    }

    /// The email claim, when the payload carries one.
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Google(p) => p.email.as_deref(),
            Self::Facebook(p) => p.email.as_deref(),
            Self::LinkedIn(p) => p.email.as_deref(),
            Self::Twitter(p) => p.email.as_deref(),
            Self::Instagram(_) | Self::TikTok(_) | Self::Telegram(_) => None,
            Self::Other(v) => v.get("email").and_then(Value::as_str),
        }
    }
}
