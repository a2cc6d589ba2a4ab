//! `threadiq` — command-line front end for the ThreadIQ wardrobe.
//!
//! # Usage
//!
//! ```text
//! threadiq add --image file:///tee.jpg --category tops \
//!   --subcategory t-shirt --color black
//! threadiq wear 6f1c… --outfit 0b9e…
//! threadiq list --category tops --sort wear-count
//! threadiq --json insights
//! ```
//!
//! Every invocation hydrates a dispatcher from the SQLite store, dispatches at
//! most one intent, and prints the result.

mod command;
mod render;
mod settings;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use threadiq_core::dispatch::Dispatcher;
use threadiq_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::{command::Command, settings::Settings};

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "threadiq", author, version, about = "Track clothes, wears and laundry")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, value_name = "FILE", default_value = "threadiq.toml")]
  config: PathBuf,

  /// SQLite database path; overrides `store_path` from the config.
  #[arg(long, value_name = "PATH")]
  store: Option<PathBuf>,

  /// Print JSON instead of plain lines.
  #[arg(long, global = true)]
  json: bool,

  #[command(subcommand)]
  command: Command,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Logs go to stderr so `--json` output stays parseable.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_writer(std::io::stderr)
    .init();

  let cli = Cli::parse();
  let settings = Settings::load(&cli.config)?;

  let store_path = cli.store.as_ref().unwrap_or(&settings.store_path);
  let store_path = settings::expand_tilde(store_path);
  if let Some(parent) = store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;
  let mut dispatcher = Dispatcher::hydrate(store)
    .await
    .context("failed to load wardrobe")?;
  tracing::debug!(
    items = dispatcher.state().items().len(),
    outfits = dispatcher.state().outfits().len(),
    "wardrobe loaded"
  );

  command::run(cli.command, &mut dispatcher, &settings, cli.json).await
}
