use serde::{Deserialize, Serialize};

use crate::profile::ProviderProfile;
use crate::state::{Account, AuthUser};

/// The uniform identity record produced by [`normalize`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedIdentity {
    /// Stable subject identifier, `None` when the profile carries no `sub`.
    pub id: Option<String>,
    /// Display name, empty when the profile carries no `name`.
    pub name: String,
    /// Email address, empty when the profile carries no `email`.
    pub email: String,
    /// Public profile URL, empty for unrecognized providers.
    pub profile_url: String,
}

/// Map a provider profile to the uniform identity record.
///
/// A pure function of its inputs: no I/O, no clock, no randomness. The
/// profile URL follows one fixed template per provider:
///
/// * twitter    `https://twitter.com/{profile.username}`
/// * linkedin   `profile.publicProfileUrl` verbatim, else empty
/// * facebook   `https://www.facebook.com/{account.id}`
/// * instagram  `https://www.instagram.com/{account.id}`
/// * google     `https://plus.google.com/{user.id}`
/// * tiktok     `https://www.tiktok.com/@{profile.unique_id}`
/// * telegram   `https://t.me/{profile.name}`
///
/// A missing template source renders as the empty string inside the
/// template; an unrecognized provider yields an empty profile URL.
pub fn normalize(
    profile: &ProviderProfile,
    account: &Account,
    user: &AuthUser,
) -> VerifiedIdentity {
    VerifiedIdentity {
        id: profile.sub().map(str::to_owned),
        name: profile.name().unwrap_or_default().to_owned(),
        email: profile.email().unwrap_or_default().to_owned(),
        profile_url: profile_url(profile, account, user),
    }
}

fn profile_url(profile: &ProviderProfile, account: &Account, user: &AuthUser) -> String {
    match profile {
        ProviderProfile::Twitter(p) => {
            format!("https://twitter.com/{}", p.username.as_deref().unwrap_or_default())
        }
        ProviderProfile::LinkedIn(p) => p.public_profile_url.clone().unwrap_or_default(),
        ProviderProfile::Facebook(_) => {
            format!(
                "https://www.facebook.com/{}",
                account.id.as_deref().unwrap_or_default()
            )
        }
        ProviderProfile::Instagram(_) => {
            format!(
                "https://www.instagram.com/{}",
                account.id.as_deref().unwrap_or_default()
            )
        }
        ProviderProfile::Google(_) => {
            format!(
                "https://plus.google.com/{}",
                user.id.as_deref().unwrap_or_default()
            )
        }
        ProviderProfile::TikTok(p) => {
            format!(
                "https://www.tiktok.com/@{}",
                p.unique_id.as_deref().unwrap_or_default()
            )
        }
        ProviderProfile::Telegram(p) => {
            format!("https://t.me/{}", p.name.as_deref().unwrap_or_default())
        }
        ProviderProfile::Other(_) => String::new(),
    }
}
