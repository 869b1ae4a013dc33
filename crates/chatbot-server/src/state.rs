use std::sync::Arc;

use chatbot_core::tools::ToolExecutor;
use chatbot_core::PersonaContext;
use chatbot_llm::LLMProvider;
use chatbot_loop::ConversationConfig;

/// Read-only state shared by every request.
pub struct AppState {
    pub persona: Arc<PersonaContext>,
    pub llm: Arc<dyn LLMProvider>,
    pub tools: Arc<dyn ToolExecutor>,
    pub config: ConversationConfig,
    /// Heading shown by the chat widget.
    pub title: String,
}

impl AppState {
    pub fn new(
        persona: PersonaContext,
        llm: Arc<dyn LLMProvider>,
        tools: Arc<dyn ToolExecutor>,
    ) -> Self {
        let title = default_title(&persona);
        Self {
            persona: Arc::new(persona),
            llm,
            tools,
            config: ConversationConfig::default(),
            title,
        }
    }

    pub fn with_config(mut self, config: ConversationConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the widget title; blank values keep the default.
    pub fn with_title(mut self, title: Option<String>) -> Self {
        if let Some(title) = title.map(|t| t.trim().to_string()).filter(|t| !t.is_empty()) {
            self.title = title;
        }
        self
    }
}

pub fn default_title(persona: &PersonaContext) -> String {
    format!("{}'s Profile Chatbot", persona.first_name())
}
