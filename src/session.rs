//! Contains the [SpotifySession] and its builder. The session is the single holder of the authenticated state every
//! facade operation depends on: the application's [client identity](ClientIdentity), the precomputed authorization URL
//! and the access and refresh tokens from the most recent token exchange.
//!
//! The session holds at most one set of credentials at a time. A later token exchange overwrites the previous tokens;
//! there is no per-user multiplexing. The session is an explicitly constructed value with a normal lifetime; hand it to
//! a [SessionClient](crate::client::SessionClient) and share that instead of stashing it in a global.

use std::sync::RwLock;

use rand::{distributions::Alphanumeric, Rng};
use reqwest::Url;

use crate::{
    error::{Error, Result},
    scope::{Scope, ToScopesString},
    ACCOUNTS_AUTHORIZE_ENDPOINT, RANDOM_STATE_LENGTH,
};

/// The application's static client identity: its ID, its secret and the redirect URI the user is sent back to after
/// authorizing the application. Fixed for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    client_id: String,
    client_secret: String,
    redirect_uri: String,
}

/// A single authenticated Spotify session.
///
/// Created once through [`SpotifySession::builder`], which precomputes the authorization URL; the URL never changes
/// afterwards since the scopes, the state and the client identity are all fixed at build time. The tokens start out
/// unset and are written by the token exchange in
/// [`SessionClient::exchange_code`](crate::client::SessionClient::exchange_code).
///
/// Credentials are kept behind an `RwLock`, so a token written by a completed exchange is visible to every subsequent
/// read, from any thread.
#[derive(Debug)]
pub struct SpotifySession {
    identity: ClientIdentity,
    authorize_url: String,
    state: String,
    credentials: RwLock<SessionCredentials>,
}

#[derive(Debug, Default)]
struct SessionCredentials {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Builder for [SpotifySession].
#[derive(Debug)]
pub struct SpotifySessionBuilder {
    identity: ClientIdentity,
    scopes: Option<String>,
    state: Option<String>,
    show_dialog: bool,
}

impl ClientIdentity {
    pub fn new<S>(client_id: S, client_secret: S, redirect_uri: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri: redirect_uri.into(),
        }
    }

    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    pub(crate) fn client_secret(&self) -> &str {
        &self.client_secret
    }

    pub fn redirect_uri(&self) -> &str {
        &self.redirect_uri
    }
}

impl SpotifySession {
    /// Returns a new builder for a session with the given client identity.
    pub fn builder(identity: ClientIdentity) -> SpotifySessionBuilder {
        SpotifySessionBuilder {
            identity,
            scopes: None,
            state: None,
            show_dialog: false,
        }
    }

    /// Returns the authorization URL the user should be directed to in some manner.
    ///
    /// The URL was computed once when the session was built; this accessor never recomputes it and never touches the
    /// network.
    pub fn authorize_url(&self) -> &str {
        &self.authorize_url
    }

    /// Returns the anti-CSRF state parameter embedded in the authorization URL. The redirect callback should compare
    /// the echoed state against this value before trusting the authorization code.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub(crate) fn identity(&self) -> &ClientIdentity {
        &self.identity
    }

    /// Overwrites the stored access and refresh tokens. The tokens are not validated in any way.
    pub fn set_credentials<S>(&self, access_token: S, refresh_token: S)
    where
        S: Into<String>,
    {
        let mut credentials = self.credentials.write().expect("credentials rwlock poisoned");

        credentials.access_token = Some(access_token.into());
        credentials.refresh_token = Some(refresh_token.into());
    }

    /// Returns the current access token, or `None` if no token exchange has completed yet.
    ///
    /// This function returns an owned String by cloning the internal token.
    pub fn access_token(&self) -> Option<String> {
        self.credentials
            .read()
            .expect("credentials rwlock poisoned")
            .access_token
            .clone()
    }

    /// Returns the current refresh token, or `None` if no token exchange has completed yet.
    ///
    /// The session stores the refresh token but never uses it on its own; a caller that needs a fresh access token
    /// should run the user through the authorization flow again.
    pub fn refresh_token(&self) -> Option<String> {
        self.credentials
            .read()
            .expect("credentials rwlock poisoned")
            .refresh_token
            .clone()
    }
}

impl SpotifySessionBuilder {
    /// Specify the [OAuth authorization scopes](crate::scope::Scope) that the user is asked to grant for the
    /// application.
    pub fn scopes<T>(self, scopes: T) -> Self
    where
        T: IntoIterator<Item = Scope>,
    {
        Self {
            scopes: Some(scopes.to_scopes_string()),
            ..self
        }
    }

    /// Specify the anti-CSRF state parameter embedded in the authorization URL. If not given, a random alphanumeric
    /// state is generated.
    pub fn state<S>(self, state: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            state: Some(state.into()),
            ..self
        }
    }

    /// Set whether or not to force the user to approve the application again, if they've already done so.
    ///
    /// If false (default), a user who has already approved the application is automatically redirected to the specified
    /// redirect URL. If true, the user will not be automatically redirected and will have to approve the application
    /// again.
    pub fn show_dialog(self, show_dialog: bool) -> Self {
        Self { show_dialog, ..self }
    }

    /// Finalize the builder and return a [SpotifySession] with no credentials and a precomputed authorization URL.
    ///
    /// Fails with [Error::InvalidRedirectUri] if the configured redirect URI is not a valid URL.
    pub fn build(self) -> Result<SpotifySession> {
        Url::parse(&self.identity.redirect_uri).map_err(|err| Error::InvalidRedirectUri(err.to_string()))?;

        let state = if let Some(state) = self.state {
            state
        } else {
            rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(RANDOM_STATE_LENGTH)
                .map(char::from)
                .collect()
        };

        let authorize_url = build_authorize_url(&self.identity, self.scopes.as_deref(), &state, self.show_dialog);

        Ok(SpotifySession {
            identity: self.identity,
            authorize_url,
            state,
            credentials: RwLock::new(SessionCredentials::default()),
        })
    }
}

fn build_authorize_url(identity: &ClientIdentity, scopes: Option<&str>, state: &str, show_dialog: bool) -> String {
    let mut query_params = vec![
        ("response_type", "code"),
        ("redirect_uri", identity.redirect_uri.as_str()),
        ("client_id", identity.client_id.as_str()),
        ("state", state),
        ("show_dialog", if show_dialog { "true" } else { "false" }),
    ];

    if let Some(scopes) = scopes {
        query_params.push(("scope", scopes));
    }

    // parsing the URL fails only if the base URL is invalid, not the parameters. if this fails, there's a bug in the
    // library
    let authorize_url = Url::parse_with_params(ACCOUNTS_AUTHORIZE_ENDPOINT, &query_params)
        .expect("failed to build authorize URL: invalid base URL (this is likely a bug)");

    authorize_url.into()
}
