use serde::{Deserialize, Serialize};

use crate::constants::limits::DEFAULT_RATE;
use crate::domain::{Genre, MovieId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: u32,
    pub poster: String,
    pub genre: Vec<Genre>,
    #[serde(default = "default_rate")]
    pub rate: f64,
}

const fn default_rate() -> f64 {
    DEFAULT_RATE
}

impl Movie {
    #[must_use]
    pub fn has_genre(&self, filter: &str) -> bool {
        self.genre.iter().any(|g| g.matches(filter))
    }
}

/// A fully validated movie body that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub director: String,
    pub duration: u32,
    pub poster: String,
    pub genre: Vec<Genre>,
    pub rate: f64,
}

impl NewMovie {
    #[must_use]
    pub fn with_id(self, id: MovieId) -> Movie {
        Movie {
            id,
            title: self.title,
            year: self.year,
            director: self.director,
            duration: self.duration,
            poster: self.poster,
            genre: self.genre,
            rate: self.rate,
        }
    }
}

/// Validated subset of movie fields. `None` means "keep the stored value".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoviePatch {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub director: Option<String>,
    pub duration: Option<u32>,
    pub poster: Option<String>,
    pub genre: Option<Vec<Genre>>,
    pub rate: Option<f64>,
}

impl MoviePatch {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Shallow merge over `movie`. The id is always carried over.
    #[must_use]
    pub fn apply(self, movie: &Movie) -> Movie {
        Movie {
            id: movie.id.clone(),
            title: self.title.unwrap_or_else(|| movie.title.clone()),
            year: self.year.unwrap_or(movie.year),
            director: self.director.unwrap_or_else(|| movie.director.clone()),
            duration: self.duration.unwrap_or(movie.duration),
            poster: self.poster.unwrap_or_else(|| movie.poster.clone()),
            genre: self.genre.unwrap_or_else(|| movie.genre.clone()),
            rate: self.rate.unwrap_or(movie.rate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> Movie {
        Movie {
            id: MovieId::new("m-1"),
            title: "The Matrix".to_string(),
            year: 1999,
            director: "Lana Wachowski".to_string(),
            duration: 136,
            poster: "https://example.com/matrix.jpg".to_string(),
            genre: vec![Genre::Action, Genre::SciFi],
            rate: 8.7,
        }
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let movie = matrix();
        let patch = MoviePatch::default();
        assert!(patch.is_empty());
        assert_eq!(patch.apply(&movie), movie);
    }

    #[test]
    fn test_patch_overrides_only_present_fields() {
        let movie = matrix();
        let patch = MoviePatch {
            year: Some(2000),
            genre: Some(vec![Genre::Drama]),
            ..MoviePatch::default()
        };

        let merged = patch.apply(&movie);
        assert_eq!(merged.year, 2000);
        assert_eq!(merged.genre, vec![Genre::Drama]);
        assert_eq!(merged.id, movie.id);
        assert_eq!(merged.title, movie.title);
        assert_eq!(merged.director, movie.director);
        assert_eq!(merged.duration, movie.duration);
        assert_eq!(merged.poster, movie.poster);
        assert!((merged.rate - movie.rate).abs() < f64::EPSILON);
    }

    #[test]
    fn test_has_genre() {
        let movie = matrix();
        assert!(movie.has_genre("action"));
        assert!(movie.has_genre("Sci-Fi"));
        assert!(!movie.has_genre("drama"));
        assert!(!movie.has_genre(""));
    }
}
