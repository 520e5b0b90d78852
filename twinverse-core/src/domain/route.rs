//! Navigation routes
//!
//! The views the client can ask the navigation router to display. Routes
//! carry the identifiers they need as typed fields rather than relying on
//! parsing them back out of a path.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::job::JobId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    CreateMusic,
    MusicPlayer {
        music_id: JobId,
    },
    CreateAvatar {
        music_id: JobId,
    },
    AvatarPreview {
        avatar_id: JobId,
    },
    CreateFilm {
        music_id: JobId,
        avatar_id: JobId,
    },
    FilmPreview {
        film_id: JobId,
    },
    CreatePublication {
        music_id: JobId,
        avatar_id: JobId,
        film_id: JobId,
    },
    PublicationPreview {
        publication_id: JobId,
    },
}

impl Route {
    /// The path as the web front end spells it.
    pub fn path(&self) -> String {
        match self {
            Route::CreateMusic => "/create".to_string(),
            Route::MusicPlayer { music_id } => format!("/player/{music_id}"),
            Route::CreateAvatar { music_id } => format!("/avatar/create/{music_id}"),
            Route::AvatarPreview { avatar_id } => format!("/avatar/{avatar_id}/preview"),
            Route::CreateFilm {
                music_id,
                avatar_id,
            } => format!("/film/create/{music_id}/{avatar_id}"),
            Route::FilmPreview { film_id } => format!("/film/{film_id}/preview"),
            Route::CreatePublication {
                music_id,
                avatar_id,
                film_id,
            } => format!("/publication/create/{music_id}/{avatar_id}/{film_id}"),
            Route::PublicationPreview { publication_id } => {
                format!("/publication/{publication_id}/preview")
            }
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_paths() {
        assert_eq!(Route::CreateMusic.path(), "/create");
        assert_eq!(
            Route::MusicPlayer {
                music_id: JobId::from("m1")
            }
            .path(),
            "/player/m1"
        );
        assert_eq!(
            Route::CreateFilm {
                music_id: JobId::from("m1"),
                avatar_id: JobId::from("a1"),
            }
            .path(),
            "/film/create/m1/a1"
        );
        assert_eq!(
            Route::CreatePublication {
                music_id: JobId::from("m1"),
                avatar_id: JobId::from("a1"),
                film_id: JobId::from("f1"),
            }
            .path(),
            "/publication/create/m1/a1/f1"
        );
    }
}
