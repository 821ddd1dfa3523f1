//! LLM client — the single point of entry for all provider calls.
//!
//! ARCHITECTURAL RULE: no other module talks to an LLM backend directly.
//! Backends are selected through the closed [`Provider`] enumeration and
//! invoked behind the [`Dispatch`] trait, so the orchestrator treats every
//! provider identically and all provider-specific payload shapes stay
//! inside this module.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

use prompts::{render_prompt, PORTFOLIO_PROMPT_COMPACT, PORTFOLIO_PROMPT_FULL};

const EURON_API_URL: &str = "https://api.euron.one/api/v1/euri/chat/completions";
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
const GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const TOGETHER_API_URL: &str = "https://api.together.xyz/inference";
const QWEN_API_URL: &str =
    "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation";

/// Per-call network budget. A slow provider delays its request, never hangs it.
const REQUEST_TIMEOUT_SECS: u64 = 30;
/// Generation budget sent to every backend that accepts one.
const MAX_TOKENS: u32 = 4096;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("no provider matches model '{0}'")]
    UnknownModel(String),

    #[error("{provider} credential missing ({env_var} not set)")]
    MissingCredential {
        provider: &'static str,
        env_var: &'static str,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("provider returned empty content")]
    EmptyContent,
}

/// The closed set of supported backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    Euron,
    Gemini,
    OpenAi,
    Together,
    Qwen,
    Groq,
}

impl Provider {
    /// Resolves a model identifier to its backend. Matching is ordered;
    /// `llama` identifiers sub-dispatch to Together when they name it and
    /// otherwise to Groq, which hosts the open-weight Llama deployments.
    pub fn for_model(model: &str) -> Option<Provider> {
        if model.starts_with("euron") {
            Some(Provider::Euron)
        } else if model.starts_with("gemini") {
            Some(Provider::Gemini)
        } else if model.starts_with("gpt") {
            Some(Provider::OpenAi)
        } else if model.contains("llama") {
            if model.contains("together") {
                Some(Provider::Together)
            } else {
                Some(Provider::Groq)
            }
        } else if model.starts_with("qwen") {
            Some(Provider::Qwen)
        } else if model.starts_with("groq") {
            Some(Provider::Groq)
        } else {
            None
        }
    }

    /// Human-readable backend name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            Provider::Euron => "Euron",
            Provider::Gemini => "Google Gemini",
            Provider::OpenAi => "OpenAI",
            Provider::Together => "Together AI",
            Provider::Qwen => "Alibaba Qwen",
            Provider::Groq => "Groq",
        }
    }
}

/// One optional credential per backend, sourced from the environment at
/// startup. An explicit per-request key overrides the configured one.
#[derive(Debug, Clone, Default)]
pub struct ProviderCredentials {
    pub euron: Option<String>,
    pub google: Option<String>,
    pub openai: Option<String>,
    pub groq: Option<String>,
    pub together: Option<String>,
    pub alibaba: Option<String>,
}

impl ProviderCredentials {
    /// Resolves the credential for a backend, request key first.
    /// Fails without any network call when nothing is configured.
    fn resolve<'a>(
        &'a self,
        provider: Provider,
        override_key: Option<&'a str>,
    ) -> Result<&'a str, LlmError> {
        if let Some(key) = override_key {
            return Ok(key);
        }

        let (configured, env_var) = match provider {
            Provider::Euron => (&self.euron, "EURON_API_KEY"),
            Provider::Gemini => (&self.google, "GOOGLE_API_KEY"),
            Provider::OpenAi => (&self.openai, "OPENAI_API_KEY"),
            Provider::Groq => (&self.groq, "GROQ_API_KEY"),
            Provider::Together => (&self.together, "TOGETHER_API_KEY"),
            Provider::Qwen => (&self.alibaba, "ALIBABA_API_KEY"),
        };

        configured.as_deref().ok_or(LlmError::MissingCredential {
            provider: provider.name(),
            env_var,
        })
    }
}

/// Seam between the orchestrator and the provider integrations.
/// Implemented by [`LlmClient`] in production and by counting stubs in tests.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn generate(
        &self,
        model: &str,
        resume_text: &str,
        api_key: Option<&str>,
    ) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Provider payload shapes
// ────────────────────────────────────────────────────────────────────────────

/// OpenAI-compatible chat payload, shared by Euron, OpenAI, and Groq.
/// Sampling parameters differ per call site; omitted ones fall back to the
/// backend's defaults.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

impl ChatResponse {
    /// Generated text from the first choice.
    fn text(self) -> Option<String> {
        self.choices.into_iter().next().map(|c| c.message.content)
    }
}

#[derive(Debug, Serialize)]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiCandidateContent,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    text: Option<String>,
}

impl GeminiResponse {
    /// Text of the first candidate's first text part.
    fn text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content
            .parts
            .into_iter()
            .find_map(|p| p.text)
    }
}

#[derive(Debug, Serialize)]
struct TogetherRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct TogetherResponse {
    output: Option<TogetherOutput>,
}

#[derive(Debug, Deserialize)]
struct TogetherOutput {
    #[serde(default)]
    choices: Vec<TogetherChoice>,
}

#[derive(Debug, Deserialize)]
struct TogetherChoice {
    text: String,
}

impl TogetherResponse {
    fn text(self) -> Option<String> {
        self.output?.choices.into_iter().next().map(|c| c.text)
    }
}

#[derive(Debug, Serialize)]
struct QwenRequest<'a> {
    model: &'a str,
    input: QwenInput<'a>,
    parameters: QwenParameters,
}

#[derive(Debug, Serialize)]
struct QwenInput<'a> {
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct QwenParameters {
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct QwenResponse {
    output: Option<QwenOutput>,
}

#[derive(Debug, Deserialize)]
struct QwenOutput {
    text: Option<String>,
}

impl QwenResponse {
    fn text(self) -> Option<String> {
        self.output?.text
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// The production dispatcher. One shared HTTP client with a fixed timeout;
/// per-backend methods own their payload construction and reply extraction.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    credentials: ProviderCredentials,
}

impl LlmClient {
    pub fn new(credentials: ProviderCredentials) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            credentials,
        }
    }

    /// Posts a JSON body with bearer auth and deserializes the 2xx reply.
    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        url: &str,
        api_key: &str,
        body: &B,
    ) -> Result<R, LlmError> {
        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    async fn call_euron(
        &self,
        model: &str,
        resume_text: &str,
        api_key: &str,
    ) -> Result<String, LlmError> {
        // Identifier format: euron:<model-name>
        let model_name = model.split_once(':').map(|(_, m)| m).unwrap_or(model);
        let prompt = render_prompt(PORTFOLIO_PROMPT_FULL, resume_text);
        let body = ChatRequest {
            model: model_name,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: Some(0.7),
            max_tokens: MAX_TOKENS,
        };

        let reply: ChatResponse = self.post_json(EURON_API_URL, api_key, &body).await?;
        non_empty(reply.text())
    }

    async fn call_gemini(
        &self,
        model: &str,
        resume_text: &str,
        api_key: &str,
    ) -> Result<String, LlmError> {
        let prompt = render_prompt(PORTFOLIO_PROMPT_FULL, resume_text);
        let body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: &prompt }],
            }],
        };

        let url = format!("{GEMINI_API_BASE}/{model}:generateContent");
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: GeminiResponse = response.json().await?;
        non_empty(reply.text())
    }

    async fn call_openai(
        &self,
        model: &str,
        resume_text: &str,
        api_key: &str,
    ) -> Result<String, LlmError> {
        let prompt = render_prompt(PORTFOLIO_PROMPT_FULL, resume_text);
        let body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            temperature: Some(0.7),
            max_tokens: MAX_TOKENS,
        };

        let reply: ChatResponse = self.post_json(OPENAI_API_URL, api_key, &body).await?;
        non_empty(reply.text())
    }

    async fn call_groq(
        &self,
        model: &str,
        resume_text: &str,
        api_key: &str,
    ) -> Result<String, LlmError> {
        let prompt = render_prompt(PORTFOLIO_PROMPT_COMPACT, resume_text);
        let body = ChatRequest {
            model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            // Groq is left on backend-default sampling.
            temperature: None,
            max_tokens: MAX_TOKENS,
        };

        let reply: ChatResponse = self.post_json(GROQ_API_URL, api_key, &body).await?;
        non_empty(reply.text())
    }

    async fn call_together(
        &self,
        model: &str,
        resume_text: &str,
        api_key: &str,
    ) -> Result<String, LlmError> {
        let prompt = render_prompt(PORTFOLIO_PROMPT_COMPACT, resume_text);
        let body = TogetherRequest {
            model,
            prompt: &prompt,
            max_tokens: MAX_TOKENS,
            temperature: 0.7,
        };

        let reply: TogetherResponse = self.post_json(TOGETHER_API_URL, api_key, &body).await?;
        non_empty(reply.text())
    }

    async fn call_qwen(
        &self,
        model: &str,
        resume_text: &str,
        api_key: &str,
    ) -> Result<String, LlmError> {
        let prompt = render_prompt(PORTFOLIO_PROMPT_COMPACT, resume_text);
        let body = QwenRequest {
            model,
            input: QwenInput {
                messages: vec![ChatMessage {
                    role: "user",
                    content: &prompt,
                }],
            },
            parameters: QwenParameters {
                max_tokens: MAX_TOKENS,
            },
        };

        let reply: QwenResponse = self.post_json(QWEN_API_URL, api_key, &body).await?;
        non_empty(reply.text())
    }
}

#[async_trait]
impl Dispatch for LlmClient {
    async fn generate(
        &self,
        model: &str,
        resume_text: &str,
        api_key: Option<&str>,
    ) -> Result<String, LlmError> {
        let provider =
            Provider::for_model(model).ok_or_else(|| LlmError::UnknownModel(model.to_string()))?;
        let key = self.credentials.resolve(provider, api_key)?;

        debug!("Dispatching generation to {} (model: {model})", provider.name());

        match provider {
            Provider::Euron => self.call_euron(model, resume_text, key).await,
            Provider::Gemini => self.call_gemini(model, resume_text, key).await,
            Provider::OpenAi => self.call_openai(model, resume_text, key).await,
            Provider::Together => self.call_together(model, resume_text, key).await,
            Provider::Qwen => self.call_qwen(model, resume_text, key).await,
            Provider::Groq => self.call_groq(model, resume_text, key).await,
        }
    }
}

/// Collapses a missing or blank reply into `EmptyContent`.
fn non_empty(text: Option<String>) -> Result<String, LlmError> {
    match text {
        Some(t) if !t.trim().is_empty() => Ok(t),
        _ => Err(LlmError::EmptyContent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_for_model_matches_each_provider_prefix() {
        assert_eq!(
            Provider::for_model("euron:gpt-4.1-nano"),
            Some(Provider::Euron)
        );
        assert_eq!(
            Provider::for_model("gemini-2.5-flash"),
            Some(Provider::Gemini)
        );
        assert_eq!(Provider::for_model("gpt-5-mini"), Some(Provider::OpenAi));
        assert_eq!(
            Provider::for_model("qwen/qwen3-32b"),
            Some(Provider::Qwen)
        );
        assert_eq!(
            Provider::for_model("groq/compound"),
            Some(Provider::Groq)
        );
    }

    #[test]
    fn test_for_model_llama_defaults_to_groq() {
        assert_eq!(
            Provider::for_model("llama-3.3-70b"),
            Some(Provider::Groq)
        );
    }

    #[test]
    fn test_for_model_llama_via_together() {
        assert_eq!(
            Provider::for_model("togethercomputer/llama-2-70b"),
            Some(Provider::Together)
        );
        assert_eq!(
            Provider::for_model("together-llama-4-scout"),
            Some(Provider::Together)
        );
    }

    #[test]
    fn test_for_model_euron_wins_over_embedded_llama() {
        // Ordered matching: the euron prefix is checked before the llama substring.
        assert_eq!(
            Provider::for_model("euron:llama-guard"),
            Some(Provider::Euron)
        );
    }

    #[test]
    fn test_for_model_unknown_identifier() {
        assert_eq!(Provider::for_model("claude-sonnet-4-5"), None);
        assert_eq!(Provider::for_model(""), None);
        assert_eq!(Provider::for_model("offline"), None);
    }

    #[test]
    fn test_resolve_prefers_request_key_over_configured() {
        let credentials = ProviderCredentials {
            openai: Some("configured-key".to_string()),
            ..Default::default()
        };
        let key = credentials
            .resolve(Provider::OpenAi, Some("request-key"))
            .unwrap();
        assert_eq!(key, "request-key");
    }

    #[test]
    fn test_resolve_falls_back_to_configured_key() {
        let credentials = ProviderCredentials {
            groq: Some("configured-key".to_string()),
            ..Default::default()
        };
        let key = credentials.resolve(Provider::Groq, None).unwrap();
        assert_eq!(key, "configured-key");
    }

    #[test]
    fn test_resolve_names_missing_env_var() {
        let err = ProviderCredentials::default()
            .resolve(Provider::Qwen, None)
            .unwrap_err();
        match err {
            LlmError::MissingCredential { env_var, .. } => {
                assert_eq!(env_var, "ALIBABA_API_KEY");
            }
            other => panic!("Expected MissingCredential, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_generate_unknown_model_fails_without_network() {
        let client = LlmClient::new(ProviderCredentials::default());
        let err = client
            .generate("mystery-model", "resume", None)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::UnknownModel(m) if m == "mystery-model"));
    }

    #[tokio::test]
    async fn test_generate_missing_credential_fails_without_network() {
        let client = LlmClient::new(ProviderCredentials::default());
        let err = client
            .generate("gemini-2.5-flash", "resume", None)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingCredential { .. }));
    }

    #[test]
    fn test_chat_response_text_extraction() {
        let reply: ChatResponse = serde_json::from_value(json!({
            "choices": [{"message": {"role": "assistant", "content": "<!DOCTYPE html>…"}}]
        }))
        .unwrap();
        assert_eq!(reply.text().as_deref(), Some("<!DOCTYPE html>…"));
    }

    #[test]
    fn test_chat_response_no_choices() {
        let reply: ChatResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert!(reply.text().is_none());
    }

    #[test]
    fn test_gemini_response_text_extraction() {
        let reply: GeminiResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [{"text": "<!DOCTYPE html><html></html>"}]}
            }]
        }))
        .unwrap();
        assert_eq!(reply.text().as_deref(), Some("<!DOCTYPE html><html></html>"));
    }

    #[test]
    fn test_together_response_text_extraction() {
        let reply: TogetherResponse = serde_json::from_value(json!({
            "output": {"choices": [{"text": "generated"}]}
        }))
        .unwrap();
        assert_eq!(reply.text().as_deref(), Some("generated"));
    }

    #[test]
    fn test_qwen_response_text_extraction() {
        let reply: QwenResponse = serde_json::from_value(json!({
            "output": {"text": "generated"}
        }))
        .unwrap();
        assert_eq!(reply.text().as_deref(), Some("generated"));

        let missing: QwenResponse = serde_json::from_value(json!({})).unwrap();
        assert!(missing.text().is_none());
    }

    #[test]
    fn test_non_empty_rejects_blank_reply() {
        assert!(matches!(non_empty(None), Err(LlmError::EmptyContent)));
        assert!(matches!(
            non_empty(Some("   \n".to_string())),
            Err(LlmError::EmptyContent)
        ));
        assert_eq!(non_empty(Some("html".to_string())).unwrap(), "html");
    }
}
