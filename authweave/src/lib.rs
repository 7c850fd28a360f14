//! # Authweave
//!
//! A modular social sign-in framework. Each concern lives in its own crate
//! and this facade re-exports them behind feature flags, so an application
//! pulls in only the providers and integrations it uses.
//!
//! - [`core`]: provider abstractions, typed profiles and identity
//!   normalization.
//! - [`flow`]: the OAuth2 Authorization Code flow and the sign-in gates.
//! - [`token`]: signed, client-held session tokens (JWT).
//! - [`axum`]: the axum router, handlers and session extractor.
//! - Provider crates for Google, Facebook, Instagram, LinkedIn, Twitter and
//!   TikTok.
//!
//! Enable what you need:
//!
//! ```toml
//! [dependencies]
//! authweave = { version = "0.1", features = ["axum", "google", "twitter"] }
//! ```
//!
//! or everything at once with the `full` feature.

pub use authweave_core as core;

#[cfg(feature = "flow")]
pub use authweave_flow as flow;

#[cfg(feature = "token")]
pub use authweave_token as token;

#[cfg(feature = "axum")]
pub use authweave_axum as axum;

#[cfg(feature = "google")]
pub use authweave_providers_google as google;

#[cfg(feature = "facebook")]
pub use authweave_providers_facebook as facebook;

#[cfg(feature = "instagram")]
pub use authweave_providers_instagram as instagram;

#[cfg(feature = "linkedin")]
pub use authweave_providers_linkedin as linkedin;

#[cfg(feature = "twitter")]
pub use authweave_providers_twitter as twitter;

#[cfg(feature = "tiktok")]
pub use authweave_providers_tiktok as tiktok;
