use serde::{Deserialize, Serialize};

/// One entry in a playlist.
///
/// The track itself may be missing: Spotify returns `null` for tracks that are no longer available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistTrack {
    pub track: Option<TrackObject>,
}

/// A track reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackObject {
    /// The track's Spotify ID. Local tracks in a playlist do not have one.
    pub id: Option<String>,
    pub name: String,
    pub uri: String,
}

impl PlaylistTrack {
    /// Returns the contained track's Spotify ID, if the track is still available and is not a local track. The ID is
    /// what [`audio_features`](crate::client::SessionClient::audio_features) expects.
    pub fn track_id(&self) -> Option<&str> {
        self.track.as_ref().and_then(|track| track.id.as_deref())
    }
}
