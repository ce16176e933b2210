//! The [OAuth authorization scopes](https://developer.spotify.com/documentation/general/guides/authorization/scopes/)
//! the facade may request from the user.

use std::fmt::Display;

pub(crate) trait ToScopesString
where
    Self: IntoIterator<Item = Scope>,
{
    fn to_scopes_string(self) -> String;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    UserReadEmail,
    UserReadPrivate,
    UserLibraryModify,
    UserLibraryRead,
    PlaylistReadCollaborative,
    PlaylistReadPrivate,
    PlaylistModifyPublic,
}

impl Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scope::UserReadEmail => write!(f, "user-read-email"),
            Scope::UserReadPrivate => write!(f, "user-read-private"),
            Scope::UserLibraryModify => write!(f, "user-library-modify"),
            Scope::UserLibraryRead => write!(f, "user-library-read"),
            Scope::PlaylistReadCollaborative => write!(f, "playlist-read-collaborative"),
            Scope::PlaylistReadPrivate => write!(f, "playlist-read-private"),
            Scope::PlaylistModifyPublic => write!(f, "playlist-modify-public"),
        }
    }
}

impl<I> ToScopesString for I
where
    I: IntoIterator<Item = Scope>,
{
    fn to_scopes_string(self) -> String {
        self.into_iter()
            .map(|scope| scope.to_string())
            .collect::<Vec<String>>()
            .join(" ")
    }
}
