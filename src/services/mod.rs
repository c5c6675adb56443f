pub mod movie_service;
pub use movie_service::{MovieError, MovieService};

pub mod movie_service_impl;
pub use movie_service_impl::InMemoryMovieService;
