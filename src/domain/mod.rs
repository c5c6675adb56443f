//! Domain types for the movie catalogue with strong typing.
//!
//! This module provides type-safe wrappers and domain primitives shared by the
//! store, the validator and the HTTP layer.

pub mod id_generator;

pub use id_generator::{IdGenerator, UuidV4Generator};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a Movie in the catalogue.
///
/// Ids are opaque strings. They are assigned once on creation and never
/// rewritten afterwards.
///
/// # Examples
///
/// ```rust
/// use reelbox::domain::MovieId;
///
/// let id = MovieId::new("dcdd0fad-a94c-4810-8acc-5f108d3b18c3");
/// assert_eq!(id.as_str(), "dcdd0fad-a94c-4810-8acc-5f108d3b18c3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<String> for MovieId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MovieId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<MovieId> for String {
    fn from(id: MovieId) -> Self {
        id.0
    }
}

/// The closed set of genres a movie may be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Action,
    Adventure,
    Animation,
    Biography,
    Comedy,
    Crime,
    Drama,
    Fantasy,
    Horror,
    Romance,
    #[serde(rename = "Sci-Fi")]
    SciFi,
    Thriller,
}

impl Genre {
    pub const ALL: [Self; 12] = [
        Self::Action,
        Self::Adventure,
        Self::Animation,
        Self::Biography,
        Self::Comedy,
        Self::Crime,
        Self::Drama,
        Self::Fantasy,
        Self::Horror,
        Self::Romance,
        Self::SciFi,
        Self::Thriller,
    ];

    /// Display name, identical to the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Action => "Action",
            Self::Adventure => "Adventure",
            Self::Animation => "Animation",
            Self::Biography => "Biography",
            Self::Comedy => "Comedy",
            Self::Crime => "Crime",
            Self::Drama => "Drama",
            Self::Fantasy => "Fantasy",
            Self::Horror => "Horror",
            Self::Romance => "Romance",
            Self::SciFi => "Sci-Fi",
            Self::Thriller => "Thriller",
        }
    }

    /// Case-insensitive exact comparison used by genre filtering.
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        self.as_str().to_lowercase() == filter.to_lowercase()
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown genre '{0}'")]
pub struct UnknownGenre(pub String);

impl FromStr for Genre {
    type Err = UnknownGenre;

    /// Parses the exact display name. Filtering is case-insensitive, but
    /// stored values must use the canonical spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| UnknownGenre(s.to_string()))
    }
}
