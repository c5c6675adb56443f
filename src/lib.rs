pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod models;
pub mod seed;
pub mod services;
pub mod validation;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio::signal;

use anyhow::Context;
pub use cli::{Cli, Commands};
pub use config::{Config, ConfigSource};
use models::Movie;
use services::{InMemoryMovieService, MovieService};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Resolves the effective config: file, then `PORT`, then CLI flags.
pub fn load_config(cli: &Cli) -> anyhow::Result<(Config, ConfigSource)> {
    let (mut config, source) = match &cli.config {
        Some(path) => Config::load_with_path(path)?,
        None => Config::load()?,
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(seed) = &cli.seed {
        config.general.seed_path = Some(seed.to_string_lossy().to_string());
    }

    config.validate()?;
    Ok((config, source))
}

pub async fn run(cli: Cli, config: Config, source: ConfigSource) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Using config from {}", source);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(config).await,
        Commands::List { genre } => cmd_list(&config, genre.as_deref()).await,
        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists, leaving it untouched.");
            }
            Ok(())
        }
    }
}

async fn run_server(config: Config) -> anyhow::Result<()> {
    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    let state = api::create_app_state_from_config(&config, prometheus_handle)?;
    info!("Catalogue ready with {} movies", state.movies().count().await);

    let app = api::router(state);
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server is running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}

async fn cmd_list(config: &Config, genre: Option<&str>) -> anyhow::Result<()> {
    let movies = list_catalogue(config, genre).await?;
    let mut out = std::io::stdout().lock();
    write_listing(&movies, &mut out)?;
    Ok(())
}

/// Seeds a throwaway store from `config` and lists it through the same
/// filter the HTTP API uses.
pub async fn list_catalogue(config: &Config, genre: Option<&str>) -> anyhow::Result<Vec<Movie>> {
    let seed = seed::load(config.general.seed_path.as_deref().map(Path::new))?;
    let store: Arc<dyn MovieService> = Arc::new(InMemoryMovieService::with_seed(seed));
    Ok(store.list(genre).await)
}

pub fn write_listing(movies: &[Movie], out: &mut impl Write) -> std::io::Result<()> {
    if movies.is_empty() {
        writeln!(out, "No movies found.")?;
        return Ok(());
    }

    writeln!(out, "{:<38} {:<6} {:<5} Title", "ID", "Year", "Rate")?;
    writeln!(out, "{}", "-".repeat(80))?;
    for movie in movies {
        writeln!(
            out,
            "{:<38} {:<6} {:<5.1} {}",
            movie.id, movie.year, movie.rate, movie.title
        )?;
    }
    writeln!(out)?;
    writeln!(out, "{} movie(s)", movies.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[tokio::test]
    async fn test_list_catalogue_filters_embedded_seed() {
        let movies = list_catalogue(&Config::default(), Some("ROMANCE"))
            .await
            .unwrap();
        let titles: Vec<&str> = movies.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Forrest Gump", "Titanic"]);
    }

    #[tokio::test]
    async fn test_write_listing() {
        let movies = list_catalogue(&Config::default(), Some("animation"))
            .await
            .unwrap();

        let mut out = Vec::new();
        write_listing(&movies, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.starts_with("ID"));
        assert!(text.contains("2e6900e2-0b48-4fb6-ad48-09c7086e54fe"));
        assert!(text.contains("1994   8.5   The Lion King"));
        assert!(text.ends_with("1 movie(s)\n"));
    }

    #[test]
    fn test_write_listing_empty() {
        let mut out = Vec::new();
        write_listing(&[], &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No movies found.\n");
    }

    #[test]
    fn test_load_config_applies_cli_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nport = 7000\n").unwrap();

        let cli = Cli::try_parse_from([
            "reelbox",
            "--config",
            path.to_str().unwrap(),
            "--port",
            "7100",
            "--seed",
            "custom.json",
        ])
        .unwrap();

        let (config, source) = load_config(&cli).unwrap();
        assert_eq!(config.server.port, 7100);
        assert_eq!(config.general.seed_path.as_deref(), Some("custom.json"));
        assert_eq!(source, ConfigSource::File(path));
    }
}
