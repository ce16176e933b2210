//! A session and access-control facade for the [Spotify Web API](https://developer.spotify.com/documentation/web-api/).
//!
//! The crate performs the OAuth2 authorization code handshake, holds the resulting credentials in a single
//! [session](crate::session::SpotifySession), and exposes a small set of read operations on top of them: the current
//! user's identity, their saved playlists, the tracks in a playlist and per-track audio feature analysis.
//!
//! # Usage
//!
//! ```no_run
//! # use spotify_facade::{ClientIdentity, Scope, SessionClient, SpotifySession};
//! # async fn foo() {
//! // the client identity is fixed for the lifetime of the process
//! let identity = ClientIdentity::new(
//!     "application client ID",
//!     "application client secret",
//!     // should match one of the callback URLs specified in your Spotify application
//!     "http://localhost:9000/callback",
//! );
//!
//! // build the session. this precomputes the authorization URL from the scopes, the state and the client
//! // identity; it is stable from here on out
//! let session = SpotifySession::builder(identity)
//!     .scopes([Scope::UserReadPrivate, Scope::UserLibraryRead])
//!     .state("some-state-of-my-choice")
//!     .show_dialog(true)
//!     .build()
//!     .expect("failed to build Spotify session");
//!
//! let client = SessionClient::new(session);
//!
//! // the user should be directed to this URL in some manner. once they approve the application, they are
//! // redirected to the callback URL with an authorization code (`code`) and the state echoed back in the
//! // query parameters. validating the echoed state is the callback handler's responsibility
//! println!("authorize at: {}", client.authorize_url());
//! # let code = "";
//!
//! // exchange the code for an access token and a refresh token. the exchange runs in a spawned task and
//! // never fails from the caller's point of view; the returned handle may be awaited for the outcome, or
//! // simply dropped
//! let _exchange = client.exchange_code(code);
//!
//! // once the exchange has completed, the stored access token backs every read operation
//! if let Some(user) = client.current_user().await {
//!     println!("authenticated as {}", user.name());
//! }
//! # }
//! ```
//!
//! # Failure policies
//!
//! The read operations deliberately differ in how they handle upstream failures:
//!
//! - [`current_user_id`](SessionClient::current_user_id), [`saved_playlists`](SessionClient::saved_playlists) and
//!   [`playlist_tracks`](SessionClient::playlist_tracks) propagate every upstream failure as an [Error].
//! - [`current_user`](SessionClient::current_user) logs the failure and returns `None`.
//! - [`audio_features`](SessionClient::audio_features) logs the failure and returns
//!   [`AudioFeatureResult::Absent`](crate::model::AudioFeatureResult::Absent), so that a caller iterating hundreds of
//!   tracks keeps going when Spotify throttles the requests.

pub mod client;
pub mod error;
pub mod model;
pub mod scope;
pub mod session;

use const_format::concatcp;

const RANDOM_STATE_LENGTH: usize = 16;

const API_BASE_URL: &str = "https://api.spotify.com/v1";

const ACCOUNTS_BASE_URL: &str = "https://accounts.spotify.com";
const ACCOUNTS_AUTHORIZE_ENDPOINT: &str = concatcp!(ACCOUNTS_BASE_URL, "/authorize");
const ACCOUNTS_API_TOKEN_ENDPOINT: &str = concatcp!(ACCOUNTS_BASE_URL, "/api/token");

pub use crate::{
    client::{ExchangeOutcome, SessionClient, SessionClientBuilder, TokenExchange},
    error::{Error, Result},
    model::{AudioFeatureResult, AudioFeatures, PlaylistTrack, SimplePlaylist, UserIdentity},
    scope::Scope,
    session::{ClientIdentity, SpotifySession, SpotifySessionBuilder},
};
