pub const DEFAULT_MAX_ROUNDS: usize = 5;

pub const ROUND_LIMIT_ANSWER: &str = "I'm sorry, I wasn't able to put together an answer to that just now. \
Could you try asking in a different way?";

pub const MODEL_UNAVAILABLE_ANSWER: &str =
    "I'm sorry, I'm having trouble responding right now. Please try again in a moment.";

/// Configuration for a single chat exchange.
#[derive(Debug, Clone)]
pub struct ConversationConfig {
    /// Upper bound on model calls per exchange; values below 1 are treated as 1.
    pub max_rounds: usize,
    /// Model override passed to the provider; `None` uses the provider default.
    pub model: Option<String>,
    /// Answer returned when the model keeps requesting tools past `max_rounds`.
    pub round_limit_answer: String,
    /// Answer returned when the model endpoint fails.
    pub unavailable_answer: String,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            model: None,
            round_limit_answer: ROUND_LIMIT_ANSWER.to_string(),
            unavailable_answer: MODEL_UNAVAILABLE_ANSWER.to_string(),
        }
    }
}

impl ConversationConfig {
    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub(crate) fn round_bound(&self) -> usize {
        self.max_rounds.max(1)
    }
}
