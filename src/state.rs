//! Application state shared by every connection: the question store (or the reason it
//! failed to load), the derived module list, and the player config.
//!
//! Everything here is read-only after startup. Per-client quiz state lives in
//! `QuizSession`, owned by the connection that drives it.

use tracing::{error, info, instrument};

use crate::config::PlayerConfig;
use crate::module_index::distinct_modules;
use crate::session::QuizSession;
use crate::store::{self, LoadError, QuestionStore};

pub struct AppState {
    pub bank: Result<QuestionStore, LoadError>,
    pub modules: Vec<String>,
    pub config: PlayerConfig,
}

impl AppState {
    /// Load the question bank once. A failure is kept and served to every client.
    #[instrument(level = "info", skip_all, fields(source = %config.bank.source))]
    pub async fn load(config: PlayerConfig) -> Self {
        let bank = store::load(&config.bank_source()).await;
        match &bank {
            Ok(store) => info!(target: "quiz_player", questions = store.len(), "Question bank ready"),
            Err(e) => error!(target: "quiz_player", error = %e, "Question bank failed to load; quiz is unavailable"),
        }
        Self::from_bank(bank, config)
    }

    pub fn from_bank(bank: Result<QuestionStore, LoadError>, config: PlayerConfig) -> Self {
        let modules = match &bank {
            Ok(store) => distinct_modules(store.records()),
            Err(_) => Vec::new(),
        };
        if !modules.is_empty() {
            info!(target: "quiz_player", modules = ?modules, "Module index built");
        }
        Self { bank, modules, config }
    }

    /// A fresh, not yet started session, or the load error if there is no bank.
    pub fn new_session(&self) -> Result<QuizSession, &LoadError> {
        let store = self.bank.as_ref()?;
        Ok(QuizSession::new(store.clone(), self.config.session.seed))
    }

    pub fn question_count(&self) -> usize {
        self.bank.as_ref().map(QuestionStore::len).unwrap_or(0)
    }
}
