//! `tindev`: terminal client for the tindev developer-matching service.
//!
//! # Usage
//!
//! ```
//! tindev --url http://localhost:3333
//! tindev --config ~/.config/tindev/config.toml --log-file /tmp/tindev.log
//! ```

mod app;
mod client;
mod ui;

#[cfg(test)]
mod testing;

use std::{
  io,
  path::{Path, PathBuf},
  sync::Mutex,
  time::Duration,
};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use client::{ApiClient, ApiConfig};
use crossterm::{
  event::{self, Event},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use serde::Deserialize;
use tindev_core::{
  api::DevApi,
  store::{MemoryStore, SessionStore},
};
use tindev_store_sqlite::SqliteStore;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

const DEFAULT_URL: &str = "http://localhost:3333";
const DEFAULT_STORE: &str = "~/.tindev/session.db";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "tindev", version, about = "Terminal client for the tindev service")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE")]
  config: Option<PathBuf>,

  /// Base URL of the tindev service (default: http://localhost:3333).
  #[arg(long, env = "TINDEV_URL")]
  url: Option<String>,

  /// Where to persist the logged-in session (default: ~/.tindev/session.db).
  #[arg(long, env = "TINDEV_STORE", value_name = "FILE")]
  store: Option<PathBuf>,

  /// Keep the session in memory only; the next start asks to log in again.
  #[arg(long)]
  ephemeral: bool,

  /// Send dislikes to `/devs/:id/dislikes` instead of `/devs/:id/likes`.
  #[arg(long)]
  distinct_dislikes: bool,

  /// Append logs to this file. Nothing is logged without it.
  #[arg(long, env = "TINDEV_LOG_FILE", value_name = "FILE")]
  log_file: Option<PathBuf>,
}

// ─── Config file ──────────────────────────────────────────────────────────────

/// Shape of the optional TOML config file.
#[derive(Deserialize, Default, Debug)]
struct ConfigFile {
  #[serde(default)]
  url:               String,
  store_path:        Option<PathBuf>,
  timeout_secs:      Option<u64>,
  #[serde(default)]
  distinct_dislikes: bool,
  log_file:          Option<PathBuf>,
}

/// Fully resolved settings.
#[derive(Debug, PartialEq)]
struct Settings {
  api:        ApiConfig,
  store_path: Option<PathBuf>,
  log_file:   Option<PathBuf>,
}

impl Settings {
  /// CLI flags override the config file, which overrides defaults.
  /// `store_path` is `None` for an ephemeral session.
  fn resolve(args: Args, file: ConfigFile) -> Self {
    let store_path = (!args.ephemeral).then(|| {
      let path = args
        .store
        .or(file.store_path)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE));
      expand_tilde(&path)
    });

    Self {
      api: ApiConfig {
        base_url:          args
          .url
          .or_else(|| (!file.url.is_empty()).then(|| file.url.clone()))
          .unwrap_or_else(|| DEFAULT_URL.to_string()),
        timeout:           Duration::from_secs(file.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS)),
        distinct_dislikes: args.distinct_dislikes || file.distinct_dislikes,
      },
      store_path,
      log_file: args.log_file.or(file.log_file).map(|p| expand_tilde(&p)),
    }
  }
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  // Load config file if provided.
  let file_cfg: ConfigFile = if let Some(path) = &args.config {
    let raw = std::fs::read_to_string(path)
      .with_context(|| format!("reading config file {}", path.display()))?;
    toml::from_str(&raw).context("parsing config file")?
  } else {
    ConfigFile::default()
  };

  let settings = Settings::resolve(args, file_cfg);

  // The terminal belongs to the UI, so logs only ever go to a file.
  if let Some(path) = &settings.log_file {
    init_logging(path)?;
  }

  tracing::info!(url = %settings.api.base_url, "starting tindev");
  let client = ApiClient::new(settings.api)?;

  match &settings.store_path {
    Some(path) => {
      let store = SqliteStore::open(path)
        .await
        .with_context(|| format!("failed to open session store at {}", path.display()))?;
      run(App::new(client, store)).await
    }
    None => run(App::new(client, MemoryStore::new())).await,
  }
}

fn init_logging(path: &Path) -> Result<()> {
  let file = std::fs::OpenOptions::new()
    .create(true)
    .append(true)
    .open(path)
    .with_context(|| format!("opening log file {}", path.display()))?;

  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .with_ansi(false)
    .with_writer(Mutex::new(file))
    .init();
  Ok(())
}

/// Own the terminal for the lifetime of `app`.
async fn run<A, S>(mut app: App<A, S>) -> Result<()>
where
  A: DevApi + Clone + 'static,
  S: SessionStore,
{
  // Set up the terminal.
  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  // Mount the first screen. Auto-login only reads the local store; the
  // candidate load runs from the event loop.
  app.start().await;

  // Run the event loop; restore terminal even on error.
  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore terminal regardless of result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

// ─── Event loop ───────────────────────────────────────────────────────────────

async fn run_event_loop<A, S>(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App<A, S>,
) -> Result<()>
where
  A: DevApi + Clone + 'static,
  S: SessionStore,
{
  loop {
    app.process_completions();
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Slow steps run right after the frame that announces them.
    if app.pending_step().is_some() {
      app.run_pending_step().await;
      continue;
    }

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event {
      // Ignore key-release events on platforms that report them.
      if key.kind == event::KeyEventKind::Press && !app.handle_key(key).await {
        break;
      }
    }
    // Resizes are picked up by the next draw.
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
