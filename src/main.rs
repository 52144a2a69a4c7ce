//! Quiz Player · multiple-choice quiz server
//!
//! - Loads a JSON question bank once (file path or http(s) URL)
//! - Axum HTTP API + one WebSocket quiz session per browser tab
//! - Static quiz page (./static/index.html)
//! - `build` subcommand turns plain-text quiz files into the JSON bank
//!
//! Important env variables:
//!   PORT              : u16 (default 3000)
//!   QUIZ_CONFIG_PATH  : path to TOML config (bank source, static dir, session seed)
//!   QUESTIONS_SOURCE  : overrides `[bank] source`
//!   LOG_LEVEL         : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT        : "pretty" (default) or "json"

mod builder;
mod config;
mod domain;
mod evaluate;
mod module_index;
mod protocol;
mod render;
mod routes;
mod session;
mod state;
mod store;
mod telemetry;

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::load_player_config_from_env;
use crate::routes::build_router;
use crate::state::AppState;

#[derive(Parser)]
#[command(name = "quiz-player", version, about = "Multiple-choice quiz player")]
struct Cli {
  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
  /// Serve the quiz (default).
  Serve,
  /// Convert a directory of plain-text quiz files into a JSON question bank.
  Build {
    /// Directory holding the `*.txt` quiz files.
    #[arg(long, default_value = "quiz_txts")]
    input: PathBuf,
    /// Question bank to write.
    #[arg(long, default_value = "questions.json")]
    output: PathBuf,
  },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();
  let cli = Cli::parse();

  match cli.command.unwrap_or(Command::Serve) {
    Command::Serve => serve().await,
    Command::Build { input, output } => {
      let total = builder::build_bank(&input, &output)?;
      info!(target: "quiz_player", total, output = %output.display(), "Build finished");
      Ok(())
    }
  }
}

async fn serve() -> Result<(), Box<dyn std::error::Error>> {
  let config = load_player_config_from_env();

  // The bank is fetched once, before any client connects.
  let state = Arc::new(AppState::load(config).await);
  let app = build_router(state.clone());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "quiz_player", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "quiz_player", error = %e, "Failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  info!(target: "quiz_player", "Shutdown signal received");
}
