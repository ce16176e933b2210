use serde::{Deserialize, Serialize};

/// A playlist in the user's library, as returned from the playlists-for-user endpoint.
///
/// The playlist carries its owner's ID so it can later be given to
/// [`playlist_tracks`](crate::client::SessionClient::playlist_tracks) as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimplePlaylist {
    pub id: String,
    pub name: String,
    pub owner: PlaylistOwner,
}

/// The owner of a playlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistOwner {
    pub id: String,
}
