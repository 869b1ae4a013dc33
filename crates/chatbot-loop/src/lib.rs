pub mod config;
pub mod runner;

pub use config::ConversationConfig;
pub use runner::{
    build_initial_messages, dispatch_tool_calls, resolve_tool_rounds, run_conversation,
    ConversationError, ConversationOutcome, ExchangeStatus, RoundsOutcome,
};
