//! Domain service for the movie catalogue.
//!
//! Handlers talk to the catalogue only through [`MovieService`], which keeps
//! them independent of where the collection lives.

use serde_json::Value;
use thiserror::Error;

use crate::domain::MovieId;
use crate::models::Movie;
use crate::validation::ValidationErrors;

/// Domain errors for movie operations.
#[derive(Debug, Error)]
pub enum MovieError {
    #[error("Movie not found: {0}")]
    NotFound(MovieId),

    #[error("Invalid movie data: {0}")]
    Validation(#[from] ValidationErrors),
}

/// Domain service trait for movie operations.
///
/// # Examples
///
/// ```rust,ignore
/// use reelbox::services::{MovieError, MovieService};
/// use reelbox::domain::MovieId;
/// use std::sync::Arc;
///
/// async fn example(service: Arc<dyn MovieService>) -> Result<(), MovieError> {
///     let dramas = service.list(Some("drama")).await;
///     let _movie = service.get(&dramas[0].id).await?;
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait MovieService: Send + Sync {
    /// Lists the catalogue in insertion order, optionally keeping only movies
    /// tagged with `genre` (case-insensitive exact match).
    async fn list(&self, genre: Option<&str>) -> Vec<Movie>;

    /// Fetches one movie.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::NotFound`] if no movie has this id.
    async fn get(&self, id: &MovieId) -> Result<Movie, MovieError>;

    /// Validates `body` against the full schema, assigns a fresh id and
    /// appends the movie to the catalogue.
    ///
    /// # Errors
    ///
    /// Returns [`MovieError::Validation`]; the catalogue is left untouched.
    async fn create(&self, body: &Value) -> Result<Movie, MovieError>;

    /// Validates `body` against the partial schema, then merges the present
    /// fields over the stored movie.
    ///
    /// # Errors
    ///
    /// - Returns [`MovieError::Validation`] before any lookup happens
    /// - Returns [`MovieError::NotFound`] if no movie has this id
    async fn update(&self, id: &MovieId, body: &Value) -> Result<Movie, MovieError>;

    /// Number of movies currently held.
    async fn count(&self) -> usize;
}
