use thiserror::Error;

use crate::model::error::AuthenticationErrorKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The configured redirect URI could not be parsed as a URL. This is a construction-time failure; no session can be
    /// built from such a configuration.
    #[error("Invalid redirect URI: {0}")]
    InvalidRedirectUri(String),

    /// The authorization code given to the token exchange is invalid.
    #[error("The authorization code is invalid")]
    InvalidAuthorizationCode,

    /// Spotify rate-limited the request. The facade never retries on its own; the value is the upstream Retry-After in
    /// seconds.
    #[error("Request rate limit hit; retry after {0} seconds")]
    RateLimit(u64),

    #[error(
        "Missing or invalid Retry-After header in 429 rate-limit response. This is likely an issue on Spotify's side"
    )]
    InvalidRateLimitResponse,

    #[error("Unhandled authentication error: {0:?}: {1}")]
    UnhandledAuthenticationError(AuthenticationErrorKind, String),
    #[error("Unhandled API error {0}: {1}")]
    UnhandledSpotifyError(u16, String),

    #[error(transparent)]
    HttpError(#[from] reqwest::Error),
}
