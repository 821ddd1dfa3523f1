use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::llm_client::ProviderCredentials;

/// Application configuration loaded from environment variables once at startup.
/// Nothing else reads the process environment at call time — components get
/// their slice of this struct at construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Directory uploads are parked in while they are parsed. Created at startup.
    pub upload_dir: PathBuf,
    pub llm: LlmSettings,
}

/// The generation-facing slice of the configuration, handed to the
/// orchestrator at construction.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Configured model identifier. The literal "offline" disables API mode.
    pub model: String,
    /// Master switch for provider calls (`USE_LLM_API`).
    pub use_api: bool,
    pub credentials: ProviderCredentials,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            upload_dir: PathBuf::from(
                std::env::var("UPLOAD_FOLDER").unwrap_or_else(|_| "uploads".to_string()),
            ),
            llm: LlmSettings {
                model: std::env::var("LLM_MODEL").unwrap_or_else(|_| "offline".to_string()),
                use_api: std::env::var("USE_LLM_API")
                    .map(|v| v.eq_ignore_ascii_case("true"))
                    .unwrap_or(false),
                credentials: ProviderCredentials {
                    euron: optional_env("EURON_API_KEY"),
                    google: optional_env("GOOGLE_API_KEY"),
                    openai: optional_env("OPENAI_API_KEY"),
                    groq: optional_env("GROQ_API_KEY"),
                    together: optional_env("TOGETHER_API_KEY"),
                    alibaba: optional_env("ALIBABA_API_KEY"),
                },
            },
        })
    }
}

/// Empty values count as unset so a blank line in .env doesn't shadow a key.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}
