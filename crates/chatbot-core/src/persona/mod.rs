//! Static persona context: who the chatbot speaks as, and what it knows about them.

pub mod profile;
pub mod prompt;

pub use profile::{load_persona, read_resume_text, ProfileError};
pub use prompt::{build_system_prompt, RECORD_UNKNOWN_QUESTION_TOOL, RECORD_USER_DETAILS_TOOL};

use serde::{Deserialize, Serialize};

/// Immutable context loaded once at startup and shared for the process lifetime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaContext {
    pub name: String,
    pub resume_text: String,
    pub summary_text: String,
}

impl PersonaContext {
    pub fn new(
        name: impl Into<String>,
        resume_text: impl Into<String>,
        summary_text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            resume_text: resume_text.into(),
            summary_text: summary_text.into(),
        }
    }

    /// First word of the persona name, used for short UI labels.
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or(&self.name)
    }
}
