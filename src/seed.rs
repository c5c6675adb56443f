//! Startup dataset for the catalogue.
//!
//! The default dataset is compiled into the binary. A file on disk can replace
//! it; either way every record must satisfy the full movie schema and carry a
//! unique id before the server accepts requests.

use anyhow::{Context, Result, bail};
use rust_embed::RustEmbed;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

use crate::constants::SEED_FILE;
use crate::models::Movie;
use crate::validation::validate_movie;

#[derive(RustEmbed)]
#[folder = "data/"]
struct SeedData;

/// Loads the dataset from `path`, or the embedded one when `None`.
pub fn load(path: Option<&Path>) -> Result<Vec<Movie>> {
    match path {
        Some(path) => load_from_path(path),
        None => load_embedded(),
    }
}

pub fn load_embedded() -> Result<Vec<Movie>> {
    let file = SeedData::get(SEED_FILE)
        .with_context(|| format!("Embedded seed file {SEED_FILE} is missing"))?;
    let movies = parse(&file.data).context("Failed to parse embedded seed dataset")?;
    info!("Loaded {} movies from embedded seed", movies.len());
    Ok(movies)
}

pub fn load_from_path(path: &Path) -> Result<Vec<Movie>> {
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read seed file: {}", path.display()))?;
    let movies = parse(&content)
        .with_context(|| format!("Failed to parse seed file: {}", path.display()))?;
    info!("Loaded {} movies from {}", movies.len(), path.display());
    Ok(movies)
}

/// Decodes and checks a JSON array of movies.
pub fn parse(bytes: &[u8]) -> Result<Vec<Movie>> {
    let movies: Vec<Movie> = serde_json::from_slice(bytes)?;
    check(&movies)?;
    Ok(movies)
}

fn check(movies: &[Movie]) -> Result<()> {
    let mut seen = HashSet::with_capacity(movies.len());

    for (index, movie) in movies.iter().enumerate() {
        if !seen.insert(&movie.id) {
            bail!("Duplicate movie id {} at index {}", movie.id, index);
        }

        let value = serde_json::to_value(movie)?;
        if let Err(errors) = validate_movie(&value) {
            bail!("Invalid movie {} at index {}: {}", movie.id, index, errors);
        }
    }

    Ok(())
}
