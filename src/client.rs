//! Contains the [SessionClient], the facade that owns the OAuth handshake and wraps the read endpoints of the API.
//!
//! # Usage
//!
//! A [SessionClient] is built around a [SpotifySession](crate::session::SpotifySession). Direct the user to the
//! session's [authorization URL](SessionClient::authorize_url), receive the authorization code in your redirect
//! callback and hand it to [`exchange_code`](SessionClient::exchange_code). Once the exchange has completed, the
//! session holds the access token and the read operations are available. See the [crate-level documentation](crate)
//! for a full walkthrough.
//!
//! This client uses `Arc` internally, so it may be cloned and shared freely; every clone operates on the same session.

use std::sync::Arc;

use base64::Engine;
use log::{debug, error, warn};
use reqwest::{header, Client as AsyncClient, Response, StatusCode};
use serde::Deserialize;
use tokio::sync::oneshot;

use crate::{
    error::{Error, Result},
    model::{
        error::{ApiErrorResponse, AuthenticationErrorKind, AuthenticationErrorResponse},
        AudioFeatureResult, AudioFeatures, PageObject, PlaylistTrack, SimplePlaylist, UserIdentity, UserObject,
    },
    session::SpotifySession,
    ACCOUNTS_API_TOKEN_ENDPOINT, API_BASE_URL,
};

/// The facade over the authorization-code handshake and the authenticated read endpoints.
///
/// Cheap to clone; all clones share the same [SpotifySession](crate::session::SpotifySession) and HTTP client.
#[derive(Debug, Clone)]
pub struct SessionClient {
    session: Arc<SpotifySession>,
    http_client: AsyncClient,
    api_base_url: Arc<str>,
    token_endpoint: Arc<str>,
}

/// Builder for [SessionClient].
///
/// The base URLs default to the real Spotify endpoints and only need overriding when pointing the client at a test
/// server.
#[derive(Debug)]
pub struct SessionClientBuilder {
    session: SpotifySession,
    api_base_url: String,
    token_endpoint: String,
}

/// Completion handle for a token exchange started with [`exchange_code`](SessionClient::exchange_code).
///
/// The exchange itself runs in a spawned task; this handle only observes it. Dropping the handle does not cancel the
/// exchange.
#[derive(Debug)]
pub struct TokenExchange {
    completion: oneshot::Receiver<ExchangeOutcome>,
}

/// The outcome of a token exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The exchange succeeded and the session now holds the exchanged tokens.
    Complete,
    /// The exchange failed. The failure has been logged; the session's previous credentials, if any, are unchanged.
    Failed,
}

#[derive(Debug, Deserialize)]
struct UserTokenResponse {
    access_token: String,
    refresh_token: String,

    // these fields are in the response but the facade doesn't need them. keep them here for logging purposes
    #[allow(dead_code)]
    scope: Option<String>,
    #[allow(dead_code)]
    expires_in: u32,
    #[allow(dead_code)]
    token_type: String,
}

impl SessionClient {
    /// Returns a new client for the given session, using the real Spotify endpoints.
    pub fn new(session: SpotifySession) -> Self {
        Self::builder(session).build()
    }

    /// Returns a new builder for a client around the given session.
    pub fn builder(session: SpotifySession) -> SessionClientBuilder {
        SessionClientBuilder {
            session,
            api_base_url: API_BASE_URL.to_owned(),
            token_endpoint: ACCOUNTS_API_TOKEN_ENDPOINT.to_owned(),
        }
    }

    /// Returns the session this client operates on.
    pub fn session(&self) -> &SpotifySession {
        &self.session
    }

    /// Returns the authorization URL the user should be directed to. Precomputed when the session was built; this
    /// never touches the network.
    pub fn authorize_url(&self) -> &str {
        self.session.authorize_url()
    }

    /// Exchange an authorization code for an access token and a refresh token.
    ///
    /// The exchange runs in a spawned task and is fire-and-forget from the caller's point of view: this function
    /// returns immediately and never fails. On success the tokens are stored into the session, overwriting any
    /// previous credentials; on failure the facade logs the error and leaves the previous credentials untouched.
    ///
    /// The returned [TokenExchange] may be awaited to observe the [outcome](ExchangeOutcome), or simply dropped.
    ///
    /// This function must be called within a tokio runtime.
    pub fn exchange_code<S>(&self, code: S) -> TokenExchange
    where
        S: Into<String>,
    {
        let code = code.into();
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let client = self.clone();

        tokio::spawn(async move {
            let outcome = match client.request_user_tokens(&code).await {
                Ok(token_response) => {
                    client
                        .session
                        .set_credentials(token_response.access_token, token_response.refresh_token);

                    ExchangeOutcome::Complete
                }

                Err(err) => {
                    error!("Token exchange for authorization code failed: {}", err);
                    ExchangeOutcome::Failed
                }
            };

            // the caller is free to drop the handle without awaiting it
            let _ = outcome_tx.send(outcome);
        });

        TokenExchange { completion: outcome_rx }
    }

    /// Get the identity of the user the session is authenticated as.
    ///
    /// This function never fails: when the upstream request fails for any reason, the failure is logged and `None` is
    /// returned. Callers should treat an absent identity as a valid, degraded outcome.
    pub async fn current_user(&self) -> Option<UserIdentity> {
        match self.current_user_object().await {
            Ok(user) => Some(user.into()),

            Err(err) => {
                warn!("Failed to retrieve the current user's profile: {}", err);
                None
            }
        }
    }

    /// Get the Spotify ID of the user the session is authenticated as.
    ///
    /// Unlike [`current_user`](SessionClient::current_user), this function propagates upstream failures.
    pub async fn current_user_id(&self) -> Result<String> {
        let user = self.current_user_object().await?;
        Ok(user.id)
    }

    /// Get the playlists saved in the current user's library.
    ///
    /// Resolves the user's ID first; a failure there, or in the playlist request itself, is propagated.
    pub async fn saved_playlists(&self) -> Result<Vec<SimplePlaylist>> {
        let user_id = self.current_user_id().await?;

        let response = self
            .send_api_request(format!("{}/users/{}/playlists", self.api_base_url, user_id))
            .await?;

        let page: PageObject<SimplePlaylist> = response.json().await?;
        debug!("Playlists for user {}: {:?}", user_id, page);

        Ok(page.take_items())
    }

    /// Get the tracks in the given playlist.
    pub async fn playlist_tracks(&self, playlist: &SimplePlaylist) -> Result<Vec<PlaylistTrack>> {
        let response = self
            .send_api_request(format!(
                "{}/users/{}/playlists/{}/tracks",
                self.api_base_url, playlist.owner.id, playlist.id
            ))
            .await?;

        let page: PageObject<PlaylistTrack> = response.json().await?;
        debug!("Tracks for playlist {}: {:?}", playlist.id, page);

        Ok(page.take_items())
    }

    /// Get the audio feature analysis for a single track.
    ///
    /// This function never fails: every error, notably the 429 rate-limit response Spotify returns during bulk
    /// retrieval, is logged and converted into [AudioFeatureResult::Absent]. A caller computing features for hundreds
    /// of tracks may loop over this function without any per-item error handling.
    pub async fn audio_features(&self, track_id: &str) -> AudioFeatureResult {
        let result: Result<AudioFeatures> = async {
            let response = self
                .send_api_request(format!("{}/audio-features/{}", self.api_base_url, track_id))
                .await?;

            Ok(response.json().await?)
        }
        .await;

        match result {
            Ok(features) => AudioFeatureResult::Present(features),

            Err(err) => {
                warn!("Failed to retrieve audio features for track {}: {}", track_id, err);
                AudioFeatureResult::Absent
            }
        }
    }

    async fn current_user_object(&self) -> Result<UserObject> {
        let response = self.send_api_request(format!("{}/me", self.api_base_url)).await?;

        let user: UserObject = response.json().await?;
        debug!("Current user: {:?}", user);

        Ok(user)
    }

    /// Sends a GET request to the given API URL with the session's access token, if one is set, and maps error
    /// responses into [Error]. No retries: a rate-limited request surfaces as [Error::RateLimit] right away.
    async fn send_api_request(&self, url: String) -> Result<Response> {
        let mut request = self.http_client.get(&url);

        if let Some(access_token) = self.session.access_token() {
            request = request.bearer_auth(access_token);
        }

        let response = request.send().await?;
        extract_api_error(response).await
    }

    async fn request_user_tokens(&self, code: &str) -> Result<UserTokenResponse> {
        debug!("Requesting access and refresh tokens for authorization code: {}", code);

        let token_request_form = &[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.session.identity().redirect_uri()),
        ];

        let response = self
            .http_client
            .post(self.token_endpoint.as_ref())
            .form(token_request_form)
            .send()
            .await?;

        let response = extract_authentication_error(response)
            .await
            .map_err(map_authentication_error)?;

        let token_response: UserTokenResponse = response.json().await?;
        debug!("Got token response for authorization code flow: {:?}", token_response);

        Ok(token_response)
    }
}

impl SessionClientBuilder {
    /// Override the base URL for the API endpoints.
    pub fn api_base_url<S>(self, api_base_url: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            api_base_url: api_base_url.into(),
            ..self
        }
    }

    /// Override the URL of the token endpoint the authorization code is exchanged at.
    pub fn token_endpoint<S>(self, token_endpoint: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            token_endpoint: token_endpoint.into(),
            ..self
        }
    }

    /// Finalize the builder and return a [SessionClient].
    pub fn build(self) -> SessionClient {
        let identity = self.session.identity();

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&build_authorization_header(
                identity.client_id(),
                identity.client_secret(),
            ))
            // this can only fail if the header value contains non-ASCII characters, which cannot happen since the
            // given header value is in base64
            .expect("failed to insert authorization header into header map"),
        );

        let http_client = AsyncClient::builder()
            .default_headers(default_headers)
            .build()
            // this can only fail due to a system error; there is no way to detect or recover from it here
            .expect("failed to build HTTP client");

        SessionClient {
            session: Arc::new(self.session),
            http_client,
            api_base_url: self.api_base_url.into(),
            token_endpoint: self.token_endpoint.into(),
        }
    }
}

impl TokenExchange {
    /// Wait for the exchange to finish and return its [outcome](ExchangeOutcome).
    pub async fn wait(self) -> ExchangeOutcome {
        // the sender is dropped without sending only if the exchange task panicked
        self.completion.await.unwrap_or(ExchangeOutcome::Failed)
    }
}

fn build_authorization_header(client_id: &str, client_secret: &str) -> String {
    let auth = format!("{}:{}", client_id, client_secret);
    format!("Basic {}", base64::engine::general_purpose::STANDARD.encode(auth))
}

/// Takes a response for a token request and if its status is 400, parses its body as an authentication error. On
/// success returns the given response without modifying it.
async fn extract_authentication_error(response: Response) -> Result<Response> {
    if let StatusCode::BAD_REQUEST = response.status() {
        let error_response: AuthenticationErrorResponse = response.json().await?;
        Err(error_response.into_unhandled_error())
    } else {
        Ok(response)
    }
}

/// Takes a response for an API request and maps error statuses into [Error]. On success returns the given response
/// without modifying it.
async fn extract_api_error(response: Response) -> Result<Response> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return if let Some(retry_after) = response
            .headers()
            .get(header::RETRY_AFTER)
            .and_then(|header| header.to_str().ok())
            .and_then(|header_str| header_str.parse::<u64>().ok())
        {
            warn!("Got 429 rate-limit response from Spotify with Retry-After: {}", retry_after);
            Err(Error::RateLimit(retry_after))
        } else {
            warn!("Invalid rate-limit response");
            Err(Error::InvalidRateLimitResponse)
        };
    }

    if status.is_client_error() || status.is_server_error() {
        let message = match response.json::<ApiErrorResponse>().await {
            Ok(error_response) => error_response.error.message,
            Err(_) => status.canonical_reason().unwrap_or("unknown error").to_owned(),
        };

        warn!("Got error response from Spotify: {}: {}", status, message);
        return Err(Error::UnhandledSpotifyError(status.as_u16(), message));
    }

    Ok(response)
}

fn map_authentication_error(err: Error) -> Error {
    if let Error::UnhandledAuthenticationError(AuthenticationErrorKind::InvalidGrant, _) = err {
        Error::InvalidAuthorizationCode
    } else {
        err
    }
}
