//! MGNREGA performance server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) layered under
//! `MGNREGA_*` environment variables, opens the SQLite store, and either
//! serves the JSON API or runs a one-shot ingestion.
//!
//! Nested keys use a double underscore, e.g. `MGNREGA_UPSTREAM__API_KEY`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use mgnrega_api::{AppState, ServerConfig};
use mgnrega_ingest::DataGovClient;
use mgnrega_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "MGNREGA district performance server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml", global = true)]
  config: PathBuf,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the HTTP API (the default).
  Serve,
  /// Populate the store from upstream, falling back to the local file.
  Initialize,
  /// Run a single ingestion and exit.
  Ingest {
    /// Only fetch records for this district name.
    #[arg(long)]
    district: Option<String>,

    /// Ingest this local document instead of calling upstream.
    #[arg(long, conflicts_with = "district")]
    file: Option<PathBuf>,
  },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::with_prefix("MGNREGA")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true),
    )
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.store_path = expand_tilde(&server_cfg.store_path);
  server_cfg.fallback_path = expand_tilde(&server_cfg.fallback_path);

  // Open SQLite store.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  let source = DataGovClient::new(server_cfg.upstream.clone())
    .context("failed to build upstream HTTP client")?;

  let state = AppState::new(Arc::new(store), source, &server_cfg);

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => {
      let app = mgnrega_api::app(state);
      let address = format!("{}:{}", server_cfg.host, server_cfg.port);

      tracing::info!("Listening on http://{address}/api/");
      let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

      axum::serve(listener, app).await.context("server error")?;
    }
    Command::Initialize => {
      let outcome = state
        .ingestor
        .initialize()
        .await
        .context("failed to initialize data")?;
      let report = outcome.report();
      println!(
        "{} ({} items, {} created, {} updated)",
        outcome.message(),
        report.items,
        report.created,
        report.updated
      );
    }
    Command::Ingest { district, file } => {
      let report = match file {
        Some(path) => state
          .ingestor
          .ingest_from_local_file(expand_tilde(&path))
          .await
          .with_context(|| format!("failed to ingest {path:?}"))?,
        None => state
          .ingestor
          .ingest_from_remote(district.as_deref())
          .await
          .context("remote ingest failed")?,
      };
      println!(
        "{} items, {} created, {} updated",
        report.items, report.created, report.updated
      );
    }
  }

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
