use serde::{Deserialize, Serialize};

/// The audio feature analysis of a single track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioFeatures {
    pub id: String,
    pub acousticness: f32,
    pub danceability: f32,
    pub energy: f32,
    pub instrumentalness: f32,
    pub key: i32,
    pub liveness: f32,
    pub loudness: f32,
    pub mode: i32,
    pub speechiness: f32,
    pub tempo: f32,
    pub time_signature: i32,
    pub valence: f32,
    pub duration_ms: u32,
}

/// The outcome of retrieving a track's [AudioFeatures].
///
/// Absence is a first-class value, not an error: when the analysis for a track cannot be retrieved for any reason, most
/// commonly because Spotify rate-limits a bulk retrieval, the result is [Absent](AudioFeatureResult::Absent). A caller
/// looping over many tracks never has to handle per-item errors; it only has to accept gaps.
#[derive(Debug, Clone, PartialEq)]
pub enum AudioFeatureResult {
    Present(AudioFeatures),
    Absent,
}

impl AudioFeatureResult {
    pub fn is_present(&self) -> bool {
        matches!(self, AudioFeatureResult::Present(_))
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, AudioFeatureResult::Absent)
    }

    /// Converts the result into an `Option`, discarding the distinction between the different causes of absence (which
    /// the facade has already logged).
    pub fn into_option(self) -> Option<AudioFeatures> {
        match self {
            AudioFeatureResult::Present(features) => Some(features),
            AudioFeatureResult::Absent => None,
        }
    }
}

impl From<AudioFeatureResult> for Option<AudioFeatures> {
    fn from(result: AudioFeatureResult) -> Self {
        result.into_option()
    }
}
