//! In-memory implementation of [`MovieService`].

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::constants::metrics::{MOVIES_CREATED, MOVIES_UPDATED, VALIDATION_FAILURES};
use crate::domain::{IdGenerator, MovieId, UuidV4Generator};
use crate::models::Movie;
use crate::services::movie_service::{MovieError, MovieService};
use crate::validation::{validate_movie, validate_partial_movie};

/// Catalogue held in a `Vec` guarded by a read/write lock.
///
/// Writes keep the lock across lookup and mutation so a create or update is
/// applied atomically with respect to other requests.
pub struct InMemoryMovieService {
    movies: RwLock<Vec<Movie>>,
    ids: Arc<dyn IdGenerator>,
}

impl InMemoryMovieService {
    #[must_use]
    pub fn new(seed: Vec<Movie>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            movies: RwLock::new(seed),
            ids,
        }
    }

    /// Store using random UUID v4 ids.
    #[must_use]
    pub fn with_seed(seed: Vec<Movie>) -> Self {
        Self::new(seed, Arc::new(UuidV4Generator))
    }
}

#[async_trait::async_trait]
impl MovieService for InMemoryMovieService {
    async fn list(&self, genre: Option<&str>) -> Vec<Movie> {
        let movies = self.movies.read().await;
        match genre {
            Some(filter) => movies
                .iter()
                .filter(|m| m.has_genre(filter))
                .cloned()
                .collect(),
            None => movies.clone(),
        }
    }

    async fn get(&self, id: &MovieId) -> Result<Movie, MovieError> {
        self.movies
            .read()
            .await
            .iter()
            .find(|m| &m.id == id)
            .cloned()
            .ok_or_else(|| MovieError::NotFound(id.clone()))
    }

    async fn create(&self, body: &Value) -> Result<Movie, MovieError> {
        let new_movie = validate_movie(body).inspect_err(|e| {
            debug!(error = %e, "Rejected movie create");
            metrics::counter!(VALIDATION_FAILURES, "operation" => "create")
                .increment(1);
        })?;

        let movie = new_movie.with_id(self.ids.generate());
        self.movies.write().await.push(movie.clone());

        info!(movie_id = %movie.id, title = %movie.title, "Movie created");
        metrics::counter!(MOVIES_CREATED).increment(1);
        Ok(movie)
    }

    async fn update(&self, id: &MovieId, body: &Value) -> Result<Movie, MovieError> {
        let patch = validate_partial_movie(body).inspect_err(|e| {
            debug!(movie_id = %id, error = %e, "Rejected movie update");
            metrics::counter!(VALIDATION_FAILURES, "operation" => "update")
                .increment(1);
        })?;

        let mut movies = self.movies.write().await;
        let slot = movies
            .iter_mut()
            .find(|m| &m.id == id)
            .ok_or_else(|| MovieError::NotFound(id.clone()))?;

        if patch.is_empty() {
            return Ok(slot.clone());
        }

        let merged = patch.apply(slot);
        *slot = merged.clone();

        info!(movie_id = %id, "Movie updated");
        metrics::counter!(MOVIES_UPDATED).increment(1);
        Ok(merged)
    }

    async fn count(&self) -> usize {
        self.movies.read().await.len()
    }
}
