use chatbot_core::tools::{ToolCall, ToolError, ToolExecutor};
use chatbot_core::{build_system_prompt, Message, PersonaContext};
use chatbot_llm::{LLMError, LLMProvider};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::config::ConversationConfig;

#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("model request failed in round {round}: {source}")]
    Llm {
        round: usize,
        #[source]
        source: LLMError,
    },

    #[error("model still requested tools after {0} rounds")]
    RoundLimitExceeded(usize),
}

pub type Result<T> = std::result::Result<T, ConversationError>;

/// How an exchange ended, as reported to the chat client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeStatus {
    Answered,
    RoundLimitReached,
    ModelUnavailable,
}

/// Plain answer produced by [`resolve_tool_rounds`].
#[derive(Debug, Clone, PartialEq)]
pub struct RoundsOutcome {
    pub answer: String,
    /// Number of model calls made, including the final one.
    pub rounds: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConversationOutcome {
    pub answer: String,
    /// Full transcript of the exchange, system prompt first.
    pub transcript: Vec<Message>,
    pub rounds: usize,
    pub status: ExchangeStatus,
}

/// `[system] + history + [user]`.
pub fn build_initial_messages(
    system_prompt: &str,
    history: &[Message],
    message: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_prompt));
    messages.extend(history.iter().cloned());
    messages.push(Message::user(message));
    messages
}

/// Answer one user message as the persona. Never fails: model errors and
/// runaway tool loops turn into fallback answers.
pub async fn run_conversation(
    persona: &PersonaContext,
    history: &[Message],
    message: &str,
    llm: &dyn LLMProvider,
    tools: &dyn ToolExecutor,
    config: &ConversationConfig,
) -> ConversationOutcome {
    let system_prompt = build_system_prompt(persona);
    let mut transcript = build_initial_messages(&system_prompt, history, message);

    log::debug!(
        "Starting exchange: {} prior turns, max_rounds={}",
        history.len(),
        config.round_bound()
    );

    let (answer, rounds, status) =
        match resolve_tool_rounds(&mut transcript, llm, tools, config).await {
            Ok(outcome) => (outcome.answer, outcome.rounds, ExchangeStatus::Answered),
            Err(ConversationError::RoundLimitExceeded(rounds)) => {
                log::warn!("Round limit of {} reached without a plain answer", rounds);
                (
                    config.round_limit_answer.clone(),
                    rounds,
                    ExchangeStatus::RoundLimitReached,
                )
            }
            Err(ConversationError::Llm { round, source }) => {
                log::error!("Model request failed in round {}: {}", round, source);
                (
                    config.unavailable_answer.clone(),
                    round,
                    ExchangeStatus::ModelUnavailable,
                )
            }
        };

    if status != ExchangeStatus::Answered {
        transcript.push(Message::assistant(answer.clone(), None));
    }

    ConversationOutcome {
        answer,
        transcript,
        rounds,
        status,
    }
}

/// Call the model until it answers without requesting tools.
///
/// Each round that requests tools appends the assistant message and one tool
/// result per call, in call order. The final plain answer is appended too.
/// When the last allowed round still requests tools, its calls are not
/// dispatched and [`ConversationError::RoundLimitExceeded`] is returned.
pub async fn resolve_tool_rounds(
    messages: &mut Vec<Message>,
    llm: &dyn LLMProvider,
    tools: &dyn ToolExecutor,
    config: &ConversationConfig,
) -> Result<RoundsOutcome> {
    let max_rounds = config.round_bound();
    let tool_schemas = tools.list_tools();

    for round in 1..=max_rounds {
        let response = llm
            .chat(messages.as_slice(), &tool_schemas, config.model.as_deref())
            .await
            .map_err(|source| ConversationError::Llm { round, source })?;

        if !response.requests_tools() {
            log::debug!("Round {}: plain answer ({} chars)", round, response.content.len());
            messages.push(Message::assistant(response.content.clone(), None));
            return Ok(RoundsOutcome {
                answer: response.content,
                rounds: round,
            });
        }

        if round == max_rounds {
            break;
        }

        log::debug!(
            "Round {}: model requested {} tool call(s)",
            round,
            response.tool_calls.len()
        );

        let results = dispatch_tool_calls(&response.tool_calls, tools).await;
        messages.push(Message::assistant(response.content, Some(response.tool_calls)));
        messages.extend(results);
    }

    Err(ConversationError::RoundLimitExceeded(max_rounds))
}

/// Execute calls in order and return one tool-result message per call.
pub async fn dispatch_tool_calls(calls: &[ToolCall], tools: &dyn ToolExecutor) -> Vec<Message> {
    let mut results = Vec::with_capacity(calls.len());

    for call in calls {
        let content = match tools.execute(call).await {
            Ok(result) if result.success => result.result,
            Ok(result) => error_marker(&result.result),
            Err(ToolError::NotFound(name)) => {
                log::warn!("Model requested unknown tool '{}'", name);
                error_marker(&format!("Tool '{}' doesn't exist", name))
            }
            Err(ToolError::InvalidArguments(reason)) | Err(ToolError::Execution(reason)) => {
                log::warn!("Tool '{}' failed: {}", call.function.name, reason);
                error_marker(&reason)
            }
        };

        results.push(Message::tool_result(call.id.clone(), content));
    }

    results
}

fn error_marker(reason: &str) -> String {
    json!({ "error": reason }).to_string()
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chatbot_core::tools::{FunctionCall, ToolSchema};
    use chatbot_core::Role;
    use chatbot_llm::LLMResponse;
    use chatbot_tools::{Notifier, NotifyError, ProfileToolExecutor};

    use super::*;

    /// Replays scripted responses and records every transcript it was sent.
    struct ScriptedProvider {
        responses: Mutex<VecDeque<std::result::Result<LLMResponse, LLMError>>>,
        calls: Mutex<Vec<Vec<Message>>>,
        tool_counts: Mutex<Vec<usize>>,
    }

    impl ScriptedProvider {
        fn new(responses: Vec<std::result::Result<LLMResponse, LLMError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
                tool_counts: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        async fn chat(
            &self,
            messages: &[Message],
            tools: &[ToolSchema],
            _model: Option<&str>,
        ) -> chatbot_llm::Result<LLMResponse> {
            self.calls.lock().unwrap().push(messages.to_vec());
            self.tool_counts.lock().unwrap().push(tools.len());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(LLMResponse::text("out of script")))
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        messages: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn notify(&self, message: &str) -> std::result::Result<(), NotifyError> {
            self.messages.lock().unwrap().push(message.to_string());
            Ok(())
        }
    }

    fn tool_call(id: &str, name: &str, arguments: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            tool_type: "function".to_string(),
            function: FunctionCall {
                name: name.to_string(),
                arguments: arguments.to_string(),
            },
        }
    }

    fn persona() -> PersonaContext {
        PersonaContext::new("Ada Lovelace", "Analyst at Babbage & Co.", "Mathematician.")
    }

    fn executor() -> (Arc<RecordingNotifier>, ProfileToolExecutor) {
        let notifier = Arc::new(RecordingNotifier::default());
        let executor = ProfileToolExecutor::new(notifier.clone());
        (notifier, executor)
    }

    #[test]
    fn initial_messages_wrap_history() {
        let history = vec![Message::user("Hi"), Message::assistant("Hello!", None)];
        let messages = build_initial_messages("prompt", &history, "What do you do?");

        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0], Message::system("prompt"));
        assert_eq!(messages[1], Message::user("Hi"));
        assert_eq!(messages[2], Message::assistant("Hello!", None));
        assert_eq!(messages[3], Message::user("What do you do?"));
    }

    #[tokio::test]
    async fn plain_answer_uses_exactly_one_call() {
        let llm = ScriptedProvider::new(vec![Ok(LLMResponse::text("I design engines."))]);
        let (notifier, tools) = executor();

        let outcome = run_conversation(
            &persona(),
            &[],
            "What do you do?",
            &llm,
            &tools,
            &ConversationConfig::default(),
        )
        .await;

        assert_eq!(outcome.answer, "I design engines.");
        assert_eq!(outcome.status, ExchangeStatus::Answered);
        assert_eq!(outcome.rounds, 1);
        assert_eq!(llm.call_count(), 1);
        assert!(notifier.messages.lock().unwrap().is_empty());

        let sent = &llm.calls.lock().unwrap()[0];
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].role, Role::System);
        assert!(sent[0].content.contains("Ada Lovelace"));
        assert_eq!(sent[1], Message::user("What do you do?"));
        assert_eq!(llm.tool_counts.lock().unwrap()[0], 2);
    }

    #[tokio::test]
    async fn tool_results_follow_call_order() {
        let llm = ScriptedProvider::new(vec![
            Ok(LLMResponse::with_tool_calls(vec![
                tool_call("call_a", "record_user_details", r#"{"email":"a@b.com"}"#),
                tool_call("call_b", "record_unknown_question", r#"{"question":"Salary?"}"#),
            ])),
            Ok(LLMResponse::text("Thanks, I'll be in touch.")),
        ]);
        let (notifier, tools) = executor();

        let outcome = run_conversation(
            &persona(),
            &[],
            "Reach me at a@b.com. What's your salary?",
            &llm,
            &tools,
            &ConversationConfig::default(),
        )
        .await;

        assert_eq!(outcome.status, ExchangeStatus::Answered);
        assert_eq!(outcome.rounds, 2);
        assert_eq!(llm.call_count(), 2);

        let second = &llm.calls.lock().unwrap()[1];
        assert_eq!(second.len(), 5);
        assert_eq!(second[2].role, Role::Assistant);
        assert_eq!(second[2].tool_calls.as_ref().map(Vec::len), Some(2));
        assert_eq!(second[3].tool_call_id.as_deref(), Some("call_a"));
        assert_eq!(second[4].tool_call_id.as_deref(), Some("call_b"));
        assert_eq!(second[3].content, r#"{"recorded":"ok"}"#);

        let sent = notifier.messages.lock().unwrap().clone();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].contains("a@b.com"));
        assert!(sent[1].contains("Salary?"));

        assert_eq!(
            outcome.transcript.last(),
            Some(&Message::assistant("Thanks, I'll be in touch.", None))
        );
    }

    #[tokio::test]
    async fn unknown_tool_yields_error_marker_without_side_effects() {
        let (notifier, tools) = executor();
        let calls = vec![tool_call("call_x", "send_money", "{}")];

        let results = dispatch_tool_calls(&calls, &tools).await;

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].tool_call_id.as_deref(), Some("call_x"));
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&results[0].content).unwrap(),
            json!({"error": "Tool 'send_money' doesn't exist"})
        );
        assert!(notifier.messages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_arguments_fail_only_that_call() {
        let (notifier, tools) = executor();
        let calls = vec![
            tool_call("call_1", "record_user_details", "{not json"),
            tool_call("call_2", "record_unknown_question", r#"{"question":"Hobbies?"}"#),
        ];

        let results = dispatch_tool_calls(&calls, &tools).await;

        assert_eq!(results.len(), 2);
        let first: serde_json::Value = serde_json::from_str(&results[0].content).unwrap();
        assert!(first["error"].is_string());
        assert_eq!(results[1].content, r#"{"recorded":"ok"}"#);
        assert_eq!(notifier.messages.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn round_limit_fails_closed() {
        let looping = || {
            Ok(LLMResponse::with_tool_calls(vec![tool_call(
                "call_loop",
                "record_unknown_question",
                r#"{"question":"again?"}"#,
            )]))
        };
        let llm = ScriptedProvider::new((0..10).map(|_| looping()).collect());
        let (notifier, tools) = executor();
        let config = ConversationConfig::default().with_max_rounds(3);

        let outcome = run_conversation(&persona(), &[], "Loop please", &llm, &tools, &config).await;

        assert_eq!(outcome.status, ExchangeStatus::RoundLimitReached);
        assert_eq!(outcome.answer, config.round_limit_answer);
        assert_eq!(outcome.rounds, 3);
        assert_eq!(llm.call_count(), 3);
        assert_eq!(notifier.messages.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn zero_max_rounds_still_allows_one_call() {
        let llm = ScriptedProvider::new(vec![Ok(LLMResponse::text("Hi"))]);
        let (_, tools) = executor();
        let config = ConversationConfig::default().with_max_rounds(0);

        let mut messages = build_initial_messages("prompt", &[], "Hello");
        let outcome = resolve_tool_rounds(&mut messages, &llm, &tools, &config)
            .await
            .unwrap();

        assert_eq!(outcome.rounds, 1);
        assert_eq!(messages.len(), 3);
    }

    #[tokio::test]
    async fn model_failure_returns_fallback() {
        let llm = ScriptedProvider::new(vec![Err(LLMError::Api("HTTP 503: busy".to_string()))]);
        let (_, tools) = executor();
        let config = ConversationConfig::default();

        let outcome = run_conversation(&persona(), &[], "Hello", &llm, &tools, &config).await;

        assert_eq!(outcome.status, ExchangeStatus::ModelUnavailable);
        assert_eq!(outcome.answer, config.unavailable_answer);
        assert_eq!(outcome.rounds, 1);
    }

    #[tokio::test]
    async fn history_is_replayed_before_the_new_message() {
        let llm = ScriptedProvider::new(vec![Ok(LLMResponse::text("Still here."))]);
        let (_, tools) = executor();
        let history = vec![Message::user("Hi"), Message::assistant("Hello!", None)];

        run_conversation(
            &persona(),
            &history,
            "Are you there?",
            &llm,
            &tools,
            &ConversationConfig::default(),
        )
        .await;

        let sent = &llm.calls.lock().unwrap()[0];
        assert_eq!(&sent[1..3], history.as_slice());
        assert_eq!(sent[3], Message::user("Are you there?"));
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_value(ExchangeStatus::RoundLimitReached).unwrap(),
            json!("round_limit_reached")
        );
        assert_eq!(
            serde_json::to_value(ExchangeStatus::ModelUnavailable).unwrap(),
            json!("model_unavailable")
        );
    }
}
