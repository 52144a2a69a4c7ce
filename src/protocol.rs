//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::render::QuestionView;

/// Selector entry that stands for "no module filter".
pub const ALL_MODULES_LABEL: &str = "All modules";

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    /// `module: null` (or absent) selects all modules.
    SelectModule {
        #[serde(default)]
        module: Option<String>,
    },
    SelectAnswer {
        index: usize,
    },
    Advance,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Modules(ModulesOut),
    Question {
        view: QuestionView,
    },
    QuizComplete {
        total: usize,
    },
    LoadFailed {
        message: String,
        view: QuestionView,
    },
    Error {
        message: String,
    },
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModulesOut {
    pub all_label: String,
    pub modules: Vec<String>,
}

impl ModulesOut {
    pub fn new(modules: Vec<String>) -> Self {
        Self { all_label: ALL_MODULES_LABEL.to_string(), modules }
    }
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
    pub questions: usize,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub message: String,
}
