//! moviefind - terminal movie search client for The Movie Database.

/// Application configuration (TOML).
mod config;
/// Terminal UI components.
mod tui;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use moviefind_api::tmdb::{MovieId, TmdbClient};
use moviefind_core::{
    ChannelSink, FetchState, NotificationSink, SearchSession, TracingSink, View,
};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{AppConfig, resolve_config_path};
use crate::tui::run_browser;

/// Poster size linked from the details output.
const POSTER_SIZE: &str = "original";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search movies by title.
    Search(SearchArgs),
    /// Show the details of one movie from a search.
    Details(DetailsArgs),
    /// Browse search results interactively via TUI.
    Browse,
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config file populated with the defaults.
    Init(ConfigInitArgs),
}

/// Arguments for the `config init` subcommand.
#[derive(clap::Args)]
struct ConfigInitArgs {
    /// Overwrite an existing config file.
    #[arg(long)]
    force: bool,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search term.
    #[arg(long)]
    query: String,

    /// Result page (1-based).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// Search term the movie appears under.
    #[arg(long)]
    query: String,

    /// TMDB movie ID.
    #[arg(long)]
    id: MovieId,

    /// Result page the movie appears on (1-based).
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
}

/// Builds a `TmdbClient` from config and the `TMDB_API_TOKEN` environment variable.
///
/// A missing token is not an error here; it surfaces on the first search.
fn build_tmdb_client(config: &AppConfig) -> Result<TmdbClient> {
    let mut builder = TmdbClient::builder()
        .base_url(config.tmdb.base_url()?)
        .language(&config.tmdb.language)
        .timeout(config.tmdb.timeout())
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
    if let Ok(token) = std::env::var("TMDB_API_TOKEN") {
        builder = builder.api_token(token);
    }
    builder.build().context("failed to build TMDB client")
}

/// Loads config and builds a session around the TMDB client.
fn build_session<N: NotificationSink>(
    dir: Option<&PathBuf>,
    notifier: N,
) -> Result<SearchSession<TmdbClient, N>> {
    let config_path = resolve_config_path(dir)?;
    let config = AppConfig::load(&config_path)?;
    tracing::debug!(path = %config_path.display(), "config loaded");

    let client = build_tmdb_client(&config)?;
    Ok(SearchSession::new(client, notifier, config.cache.settings()))
}

/// Runs a search for `query` and moves to `page`.
///
/// Returns `Ok(false)` when the query was blank and nothing was fetched.
///
/// # Errors
///
/// Returns an error if the search ends in an error state or `page` is out of range.
async fn search_to_page<N: NotificationSink>(
    session: &mut SearchSession<TmdbClient, N>,
    query: &str,
    page: u32,
) -> Result<bool> {
    if matches!(session.search(query).await, FetchState::Idle) {
        return Ok(false);
    }
    if page > 1
        && let Some(result) = session.current_fetch_state().result()
    {
        let total_pages = result.total_pages;
        if page > total_pages {
            bail!("page {page} is out of range (1-{total_pages})");
        }
        let _ = session.go_to_page(page).await;
    }

    if let FetchState::Error(kind) = session.current_fetch_state() {
        bail!("{kind}");
    }
    Ok(true)
}

/// Logs the result grid and pagination line.
fn log_grid(view: &View<'_>) {
    let Some(movies) = view.grid else {
        return;
    };
    tracing::info!("ID\tTitle\t\t\tYear\tRating");
    for movie in movies {
        tracing::info!(
            "{}\t{}\t\t{}\t{:.1}",
            movie.id,
            movie.title,
            movie
                .release_year()
                .map_or_else(|| String::from("-"), |y| y.to_string()),
            movie.vote_average,
        );
    }
    if let Some(pagination) = view.pagination {
        tracing::info!("Page {} of {}", pagination.current, pagination.total);
    }
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the search fails.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let mut session = build_session(dir, TracingSink)?;
    if !search_to_page(&mut session, &args.query, args.page).await? {
        return Ok(());
    }

    if let Some(result) = session.current_fetch_state().result() {
        tracing::info!("Total results: {}", result.total_results);
    }
    log_grid(&session.view());
    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the search fails or the movie is not in the results.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let mut session = build_session(dir, TracingSink)?;
    if !search_to_page(&mut session, &args.query, args.page).await? {
        return Ok(());
    }

    let Some(movie) = session.select(args.id) else {
        bail!(
            "movie {} is not in the results for \"{}\" (page {})",
            args.id,
            args.query.trim(),
            args.page
        );
    };

    tracing::info!("ID: {}", movie.id);
    tracing::info!("Title: {}", movie.title);
    tracing::info!("Original Title: {}", movie.original_title);
    tracing::info!(
        "Release Date: {}",
        movie.release_date.as_deref().filter(|d| !d.is_empty()).unwrap_or("-")
    );
    tracing::info!("Rating: {:.1}/10 ({} votes)", movie.vote_average, movie.vote_count);
    tracing::info!("Overview: {}", movie.overview.as_deref().unwrap_or("-"));
    tracing::info!(
        "Poster: {}",
        movie.poster_url(POSTER_SIZE).as_deref().unwrap_or("-")
    );
    Ok(())
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the client fails to build or the TUI fails.
#[instrument(skip_all)]
async fn run_browse(dir: Option<&PathBuf>) -> Result<()> {
    let (sink, notices) = ChannelSink::new();
    let session = build_session(dir, sink)?;
    run_browser(session, notices).await
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the file already exists without `--force` or cannot be written.
#[instrument(skip_all)]
fn run_config_init(args: &ConfigInitArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config_path = resolve_config_path(dir)?;
    if config_path.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    AppConfig::default().save(&config_path)?;
    tracing::info!("Config written to {}", config_path.display());
    Ok(())
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }

    let cli = Cli::parse();
    match cli.command {
        Commands::Search(args) => run_search(&args, cli.dir.as_ref()).await,
        Commands::Details(args) => run_details(&args, cli.dir.as_ref()).await,
        Commands::Browse => run_browse(cli.dir.as_ref()).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Init(args) => run_config_init(&args, cli.dir.as_ref()),
        },
    }
}
