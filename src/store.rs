//! Question store: the bank is loaded once (file or HTTP) and then shared read-only.

use std::{
  fmt,
  path::{Path, PathBuf},
  sync::Arc,
};

use reqwest::header::USER_AGENT;
use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::QuestionRecord;

/// Where the question bank lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BankSource {
  Path(PathBuf),
  Url(String),
}

impl BankSource {
  /// `http://` and `https://` strings are URLs; everything else is a filesystem path.
  pub fn parse(s: &str) -> Self {
    let s = s.trim();
    if s.starts_with("http://") || s.starts_with("https://") {
      BankSource::Url(s.to_string())
    } else {
      BankSource::Path(PathBuf::from(s))
    }
  }
}

impl fmt::Display for BankSource {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BankSource::Path(p) => write!(f, "{}", p.display()),
      BankSource::Url(u) => f.write_str(u),
    }
  }
}

#[derive(Debug, Error)]
pub enum LoadError {
  #[error("question bank request to {url} returned HTTP {status}")]
  Status { url: String, status: u16 },

  #[error("question bank request to {url} failed: {source}")]
  Transport {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("failed to read question bank {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("question bank is not valid JSON: {0}")]
  Parse(#[from] serde_json::Error),

  #[error("question bank contains no questions")]
  Empty,
}

/// Immutable collection of question records. Cloning shares the same allocation.
#[derive(Clone, Debug)]
pub struct QuestionStore {
  records: Arc<[QuestionRecord]>,
}

impl QuestionStore {
  /// Wrap already-parsed records; zero records is an error like an empty payload.
  pub fn from_records(records: Vec<QuestionRecord>) -> Result<Self, LoadError> {
    if records.is_empty() {
      return Err(LoadError::Empty);
    }
    Ok(Self { records: records.into() })
  }

  pub fn records(&self) -> &[QuestionRecord] {
    &self.records
  }

  pub fn get(&self, idx: usize) -> Option<&QuestionRecord> {
    self.records.get(idx)
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }
}

/// Load the whole bank. All-or-nothing: any failure leaves no store behind.
#[instrument(level = "info", skip_all, fields(%source))]
pub async fn load(source: &BankSource) -> Result<QuestionStore, LoadError> {
  let payload = match source {
    BankSource::Path(path) => read_file(path).await?,
    BankSource::Url(url) => fetch_url(url).await?,
  };
  let records: Vec<QuestionRecord> = serde_json::from_str(&payload)?;
  let store = QuestionStore::from_records(records)?;
  info!(target: "quiz_player", questions = store.len(), "Question bank loaded");
  Ok(store)
}

async fn read_file(path: &Path) -> Result<String, LoadError> {
  tokio::fs::read_to_string(path)
    .await
    .map_err(|source| LoadError::Io { path: path.to_path_buf(), source })
}

async fn fetch_url(url: &str) -> Result<String, LoadError> {
  let transport = |source| LoadError::Transport { url: url.to_string(), source };

  // One request at startup; no timeout or retry.
  let client = reqwest::Client::builder()
    .build()
    .map_err(transport)?;

  let res = client
    .get(url)
    .header(USER_AGENT, "quiz-player/0.1")
    .send()
    .await
    .map_err(transport)?;

  if !res.status().is_success() {
    return Err(LoadError::Status { url: url.to_string(), status: res.status().as_u16() });
  }
  res.text().await.map_err(transport)
}
