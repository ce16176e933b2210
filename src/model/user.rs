//! Everything related to the current user.

use serde::{Deserialize, Serialize};

/// The raw user object Spotify returns from the current-user endpoint. Only the fields the facade reads are kept.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub(crate) struct UserObject {
    pub(crate) id: String,
    pub(crate) display_name: Option<String>,
    pub(crate) uri: String,
}

/// The identity of the user the session is authenticated as.
///
/// This is a read-only projection of the upstream user object; it is fetched fresh on every
/// [`current_user`](crate::client::SessionClient::current_user) call and never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserIdentity {
    /// The user's Spotify ID.
    pub id: String,
    /// The user's display name, if they have set one.
    pub display_name: Option<String>,
    /// The user's Spotify URI, of the form `spotify:user:username`.
    pub uri: String,
}

impl UserIdentity {
    /// Returns a human-readable name for the user: the display name when one is set upstream, otherwise the username
    /// from the trailing segment of the user's URI.
    pub fn name(&self) -> &str {
        match self.display_name.as_deref() {
            Some(display_name) => display_name,

            // rsplit always yields at least one item: the entire string, when there is no separator in it
            None => self.uri.rsplit(':').next().unwrap_or(&self.uri),
        }
    }
}

impl From<UserObject> for UserIdentity {
    fn from(user: UserObject) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            uri: user.uri,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_prefers_display_name() {
        let user = UserIdentity {
            id: "alice".to_owned(),
            display_name: Some("Alice Example".to_owned()),
            uri: "spotify:user:alice".to_owned(),
        };

        assert_eq!(user.name(), "Alice Example");
    }

    #[test]
    fn name_falls_back_to_uri_tail() {
        let user = UserIdentity {
            id: "alice".to_owned(),
            display_name: None,
            uri: "scheme:user:alice".to_owned(),
        };

        assert_eq!(user.name(), "alice");
    }

    #[test]
    fn name_fallback_handles_uri_without_separators() {
        let user = UserIdentity {
            id: "alice".to_owned(),
            display_name: None,
            uri: "alice".to_owned(),
        };

        assert_eq!(user.name(), "alice");
    }
}
