//! Loading player configuration (question bank source, static dir, session seed) from TOML.
//!
//! Expected schema:
//!
//! ```toml
//! [bank]
//! source = "static/questions.json"   # or "https://host/questions.json"
//!
//! [server]
//! static_dir = "static"
//!
//! [session]
//! seed = 42                          # optional; fixes the shuffle order
//! ```

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;
use tracing::{error, info};

use crate::store::BankSource;

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct PlayerConfig {
  #[serde(default)]
  pub bank: BankConfig,
  #[serde(default)]
  pub server: ServerConfig,
  #[serde(default)]
  pub session: SessionConfig,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct BankConfig {
  /// File path or http(s) URL of the JSON question bank.
  pub source: String,
}

impl Default for BankConfig {
  fn default() -> Self {
    Self { source: "static/questions.json".into() }
  }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
  pub static_dir: PathBuf,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self { static_dir: PathBuf::from("static") }
  }
}

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct SessionConfig {
  #[serde(default)] pub seed: Option<u64>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config file {path}: {source}")]
  Read {
    path: String,
    #[source]
    source: std::io::Error,
  },
  #[error("failed to parse config file {path}: {source}")]
  Parse {
    path: String,
    #[source]
    source: toml::de::Error,
  },
}

impl PlayerConfig {
  pub fn bank_source(&self) -> BankSource {
    BankSource::parse(&self.bank.source)
  }
}

pub fn load_config_file(path: &str) -> Result<PlayerConfig, ConfigError> {
  let s = std::fs::read_to_string(path).map_err(|source| ConfigError::Read { path: path.into(), source })?;
  toml::from_str::<PlayerConfig>(&s).map_err(|source| ConfigError::Parse { path: path.into(), source })
}

/// Build config from QUIZ_CONFIG_PATH (if set) plus env overrides.
/// A missing or broken file is logged and replaced by defaults.
pub fn load_player_config_from_env() -> PlayerConfig {
  let mut cfg = match std::env::var("QUIZ_CONFIG_PATH") {
    Ok(path) => match load_config_file(&path) {
      Ok(cfg) => {
        info!(target: "quiz_player", %path, "Loaded player config (TOML)");
        cfg
      }
      Err(e) => {
        error!(target: "quiz_player", error = %e, "Falling back to default config");
        PlayerConfig::default()
      }
    },
    Err(_) => PlayerConfig::default(),
  };

  if let Ok(source) = std::env::var("QUESTIONS_SOURCE") {
    if !source.trim().is_empty() {
      cfg.bank.source = source;
    }
  }
  cfg
}
