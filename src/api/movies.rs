use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

use super::{ApiError, AppState};
use crate::domain::MovieId;
use crate::models::Movie;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub genre: Option<String>,
}

pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    params: Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<Movie>>, ApiError> {
    let Query(params) = params?;
    // `?genre=` with no value lists everything.
    let genre = params.genre.as_deref().filter(|g| !g.is_empty());
    Ok(Json(state.movies().list(genre).await))
}

pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, ApiError> {
    let movie = state.movies().get(&MovieId::from(id)).await?;
    Ok(Json(movie))
}

pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Movie>), ApiError> {
    let Json(body) = body?;
    let movie = state.movies().create(&body).await?;
    Ok((StatusCode::CREATED, Json(movie)))
}

pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Movie>, ApiError> {
    let Json(body) = body?;
    let movie = state.movies().update(&MovieId::from(id), &body).await?;
    Ok(Json(movie))
}
