use actix_web::{web, HttpResponse, Responder};
use chatbot_core::{Message, Role};
use chatbot_loop::{run_conversation, ExchangeStatus};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::state::AppState;

/// One replayed turn as the widget stores it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryTurn {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub status: ExchangeStatus,
    pub rounds: usize,
}

impl HistoryTurn {
    /// Parse the role leniently; unknown roles yield `None`.
    fn to_message(&self) -> Option<Message> {
        let role: Role =
            serde_json::from_value(Value::String(self.role.trim().to_ascii_lowercase())).ok()?;

        Some(Message {
            role,
            content: self.content.clone(),
            tool_calls: None,
            tool_call_id: None,
        })
    }
}

/// Keep only user/assistant turns with text. Anything else, notably a
/// client-supplied `system` turn, is dropped.
pub fn sanitize_history(history: &[HistoryTurn]) -> Vec<Message> {
    history
        .iter()
        .filter(|turn| !turn.content.trim().is_empty())
        .filter_map(|turn| match turn.to_message() {
            Some(message) if message.is_conversational() => Some(message),
            _ => {
                log::debug!("Dropping history turn with role '{}'", turn.role);
                None
            }
        })
        .collect()
}

pub async fn handler(state: web::Data<AppState>, req: web::Json<ChatRequest>) -> impl Responder {
    let message = req.message.trim();
    if message.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "message must not be empty"
        }));
    }

    let history = sanitize_history(&req.history);
    log::info!("Chat request: {} history turns", history.len());

    let outcome = run_conversation(
        state.persona.as_ref(),
        &history,
        message,
        state.llm.as_ref(),
        state.tools.as_ref(),
        &state.config,
    )
    .await;

    log::info!(
        "Chat reply: status={:?}, rounds={}",
        outcome.status,
        outcome.rounds
    );

    HttpResponse::Ok().json(ChatResponse {
        reply: outcome.answer,
        status: outcome.status,
        rounds: outcome.rounds,
    })
}
