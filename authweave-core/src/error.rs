/// Errors raised across the sign-in flow.
///
/// Missing optional profile fields and unrecognized providers are not errors;
/// normalization degrades to empty defaults for those. The variants below
/// cover the failures that abort a sign-in.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The provider rejected a request or returned an unexpected payload.
    #[error("Provider error: {0}")]
    Provider(String),
    /// The token endpoint rejected the authorization code.
    #[error("Invalid code: {0}")]
    InvalidCode(String),
    /// The callback state does not match the state minted at initiation.
    #[error("CSRF state mismatch")]
    CsrfMismatch,
    /// Transport failure while talking to the provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Signing or validating a session token failed.
    #[error("Token error: {0}")]
    Token(String),
    /// The callback request was malformed or missing required parameters.
    #[error("Callback error: {0}")]
    Callback(String),
}
