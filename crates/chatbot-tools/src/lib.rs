//! Profile tools the model can invoke, plus the push-notification channel they report through.

mod executor;
pub mod notifier;
pub mod tools;

pub use executor::ProfileToolExecutor;
pub use notifier::{notify_best_effort, NoopNotifier, Notifier, NotifyError, PushoverNotifier};
pub use tools::{RecordUnknownQuestionTool, RecordUserDetailsTool};
