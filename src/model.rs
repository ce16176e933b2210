//! Everything related to the objects the facade reads from the API.
//!
//! The models are thin projections: they keep only the fields the facade and its callers actually use and strip the
//! rest of the API response.

mod audio_features;
pub mod error;
mod page;
mod playlist;
mod track;
mod user;

pub use self::{
    audio_features::{AudioFeatureResult, AudioFeatures},
    playlist::{PlaylistOwner, SimplePlaylist},
    track::{PlaylistTrack, TrackObject},
    user::UserIdentity,
};
pub(crate) use self::{page::PageObject, user::UserObject};
