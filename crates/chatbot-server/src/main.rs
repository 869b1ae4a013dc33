use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use chatbot_core::load_persona;
use chatbot_llm::providers::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use chatbot_llm::{LLMProvider, OpenAIProvider};
use chatbot_loop::ConversationConfig;
use chatbot_server::logging::init_logging;
use chatbot_server::{run_server, AppState};
use chatbot_tools::{NoopNotifier, Notifier, ProfileToolExecutor, PushoverNotifier};

#[derive(Parser, Debug, Clone)]
#[command(name = "chatbot-server")]
#[command(about = "Profile chatbot that answers as you, from your résumé")]
#[command(version)]
struct Cli {
    /// Enable debug mode
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// Bind address
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    host: String,

    /// Server port
    #[arg(long, env = "PORT", default_value = "7860")]
    port: u16,

    /// Name of the person the chatbot speaks as
    #[arg(long, env = "PERSONA_NAME", default_value = "Dhruv Tiwari")]
    persona_name: String,

    /// Résumé file (PDF, or plain .txt/.md)
    #[arg(long = "resume", env = "RESUME_PATH", default_value = "Profile.pdf")]
    resume_path: PathBuf,

    /// Free-text summary file
    #[arg(long = "summary", env = "SUMMARY_PATH", default_value = "summary.txt")]
    summary_path: PathBuf,

    /// Chat widget title
    #[arg(long, env = "CHAT_TITLE")]
    title: Option<String>,

    /// LLM API base URL
    #[arg(long, env = "LLM_BASE_URL", default_value = DEFAULT_BASE_URL)]
    llm_base_url: String,

    /// LLM model name
    #[arg(long, env = "LLM_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// LLM API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    api_key: String,

    /// LLM request timeout in seconds
    #[arg(long, env = "LLM_TIMEOUT_SECS", default_value = "60")]
    llm_timeout_secs: u64,

    /// Maximum model calls per chat exchange
    #[arg(long, env = "MAX_TOOL_ROUNDS", default_value = "5")]
    max_rounds: usize,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(cli.debug);

    log::info!("Starting profile chatbot for {}", cli.persona_name);
    log::info!("LLM Configuration:");
    log::info!("  Base URL: {}", cli.llm_base_url);
    log::info!("  Model: {}", cli.model);

    if cli.debug {
        log::debug!("Debug mode enabled");
        log::debug!("  Resume: {:?}", cli.resume_path);
        log::debug!("  Summary: {:?}", cli.summary_path);
        log::debug!("  Timeout: {}s", cli.llm_timeout_secs);
        log::debug!("  Max rounds: {}", cli.max_rounds);
    }

    let persona = load_persona(&cli.persona_name, &cli.resume_path, &cli.summary_path)
        .context("Failed to load persona profile")?;

    let llm: Arc<dyn LLMProvider> = Arc::new(
        OpenAIProvider::new(cli.api_key.clone())
            .with_base_url(cli.llm_base_url.clone())
            .with_model(cli.model.clone())
            .with_timeout(Duration::from_secs(cli.llm_timeout_secs)),
    );

    let pushover = PushoverNotifier::from_env();
    let notifier: Arc<dyn Notifier> = if pushover.has_credentials() {
        log::info!("Push notifications enabled");
        Arc::new(pushover)
    } else {
        log::warn!("PUSHOVER_USER/PUSHOVER_TOKEN not set; notifications will only be logged");
        Arc::new(NoopNotifier)
    };
    let tools = Arc::new(ProfileToolExecutor::new(notifier));

    let config = ConversationConfig::default()
        .with_max_rounds(cli.max_rounds)
        .with_model(cli.model.clone());

    let state = AppState::new(persona, llm, tools)
        .with_config(config)
        .with_title(cli.title.clone());

    run_server(state, &cli.host, cli.port)
        .await
        .with_context(|| format!("Server failed on {}:{}", cli.host, cli.port))
}
