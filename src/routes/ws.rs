//! WebSocket upgrade + message loop. Each connection owns one `QuizSession`; client
//! messages are parsed as JSON and applied to it in arrival order.

use std::sync::Arc;
use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::protocol::{ClientWsMessage, ModulesOut, ServerWsMessage};
use crate::render::load_failed_view;
use crate::session::{Advance, QuizSession};
use crate::state::AppState;
use crate::store::LoadError;

#[instrument(level = "info", skip(ws, state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "quiz_player", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state), fields(session_id = %Uuid::new_v4()))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  info!(target: "quiz_player", "WebSocket connected");

  let mut session = match state.new_session() {
    Ok(session) => session,
    Err(e) => {
      for msg in failed_session(e) {
        let _ = send(&mut socket, &msg).await;
      }
      let _ = socket.send(Message::Close(None)).await;
      info!(target: "quiz_player", "WebSocket closed: no question bank");
      return;
    }
  };

  for msg in open_session(&mut session, &state) {
    if send(&mut socket, &msg).await.is_err() {
      return;
    }
  }

  while let Some(Ok(msg)) = socket.recv().await {
    match msg {
      Message::Text(txt) => {
        let replies = match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "quiz", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &mut session)
          }
          Err(e) => vec![ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) }],
        };

        for reply in &replies {
          if let Err(e) = send(&mut socket, reply).await {
            error!(target: "quiz_player", error = %e, "WS send error");
            return;
          }
        }
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "quiz_player", "WebSocket disconnected");
}

async fn send(socket: &mut WebSocket, msg: &ServerWsMessage) -> Result<(), axum::Error> {
  let out = serde_json::to_string(msg).unwrap_or_else(|e| {
    serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
  });
  socket.send(Message::Text(out)).await
}

/// First messages of a connection: the selector contents, then the first question (all modules).
fn open_session(session: &mut QuizSession, state: &AppState) -> Vec<ServerWsMessage> {
  vec![
    ServerWsMessage::Modules(ModulesOut::new(state.modules.clone())),
    ServerWsMessage::Question { view: session.start(None) },
  ]
}

/// The only message a connection gets when there is no question bank; the socket closes after it.
fn failed_session(error: &LoadError) -> Vec<ServerWsMessage> {
  vec![ServerWsMessage::LoadFailed { message: error.to_string(), view: load_failed_view() }]
}

fn handle_client_ws(msg: ClientWsMessage, session: &mut QuizSession) -> Vec<ServerWsMessage> {
  let result = match msg {
    ClientWsMessage::Ping => return vec![ServerWsMessage::Pong],

    ClientWsMessage::SelectModule { module } => Ok(vec![ServerWsMessage::Question { view: session.start(module) }]),

    ClientWsMessage::SelectAnswer { index } => session
      .select_answer(index)
      .map(|view| vec![ServerWsMessage::Question { view }]),

    ClientWsMessage::Advance => session.advance().map(|advance| match advance {
      Advance::Next(view) => vec![ServerWsMessage::Question { view }],
      Advance::Completed { total, view } => vec![
        ServerWsMessage::QuizComplete { total },
        ServerWsMessage::Question { view },
      ],
    }),
  };

  let replies = result.unwrap_or_else(|e| {
    warn!(target: "quiz", error = %e, "Rejected client event");
    vec![ServerWsMessage::Error { message: e.to_string() }]
  });
  debug!(
    target: "quiz",
    filter = ?session.active_filter(),
    position = session.position(),
    working_set = session.working_set().count(),
    "Session updated"
  );
  replies
}
