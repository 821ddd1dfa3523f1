//! Portfolio generation — decides API vs offline mode per request and
//! guarantees an HTML document on every path.
//!
//! Flow: effective model → (maybe) provider dispatch → offline template
//! fallback. Provider failures are logged and absorbed here; they never
//! reach the HTTP layer.

pub mod sections;
pub mod template;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::LlmSettings;
use crate::llm_client::Dispatch;

/// Model identifier that disables API mode entirely.
pub const OFFLINE_MODEL: &str = "offline";

/// Everything needed to generate one portfolio. Built once per HTTP call,
/// never persisted.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub resume_text: String,
    /// Overrides the configured model when present.
    pub model: Option<String>,
    /// Overrides the configured provider credential when present.
    pub api_key: Option<String>,
}

/// Orchestrates provider dispatch with the offline template as the
/// unconditional fallback.
#[derive(Clone)]
pub struct PortfolioGenerator {
    settings: LlmSettings,
    dispatcher: Arc<dyn Dispatch>,
}

impl PortfolioGenerator {
    pub fn new(settings: LlmSettings, dispatcher: Arc<dyn Dispatch>) -> Self {
        Self {
            settings,
            dispatcher,
        }
    }

    /// Returns portfolio HTML for the given resume. API generation is
    /// attempted only when an explicit credential is supplied, or when the
    /// configured model is not "offline" and the API switch is on. Every
    /// dispatch failure degrades to the offline template — this function
    /// cannot fail.
    pub async fn generate(&self, request: &GenerationRequest) -> String {
        let model = request.model.as_deref().unwrap_or(&self.settings.model);

        if request.api_key.is_some() || (model != OFFLINE_MODEL && self.settings.use_api) {
            match self
                .dispatcher
                .generate(model, &request.resume_text, request.api_key.as_deref())
                .await
            {
                Ok(html) => {
                    info!("Generated portfolio via LLM (model: {model})");
                    return html;
                }
                Err(e) => {
                    warn!("LLM generation failed: {e}. Using offline template.");
                }
            }
        }

        template::render_portfolio(&request.resume_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::llm_client::{LlmError, ProviderCredentials};

    /// Counting stub — records calls, returns a canned reply or `EmptyContent`.
    struct StubDispatch {
        calls: AtomicUsize,
        reply: Option<String>,
    }

    impl StubDispatch {
        fn replying(reply: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: reply.map(String::from),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Dispatch for StubDispatch {
        async fn generate(
            &self,
            _model: &str,
            _resume_text: &str,
            _api_key: Option<&str>,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reply.clone().ok_or(LlmError::EmptyContent)
        }
    }

    /// Echoes the model it was asked for, for override assertions.
    struct EchoDispatch;

    #[async_trait]
    impl Dispatch for EchoDispatch {
        async fn generate(
            &self,
            model: &str,
            _resume_text: &str,
            _api_key: Option<&str>,
        ) -> Result<String, LlmError> {
            Ok(format!("<!DOCTYPE html><!-- {model} -->"))
        }
    }

    fn settings(model: &str, use_api: bool) -> LlmSettings {
        LlmSettings {
            model: model.to_string(),
            use_api,
            credentials: ProviderCredentials::default(),
        }
    }

    fn request(resume_text: &str) -> GenerationRequest {
        GenerationRequest {
            resume_text: resume_text.to_string(),
            model: None,
            api_key: None,
        }
    }

    #[tokio::test]
    async fn test_api_disabled_makes_no_dispatch_call() {
        let stub = StubDispatch::replying(Some("<!DOCTYPE html><html></html>"));
        let generator = PortfolioGenerator::new(settings("gemini-2.5-flash", false), stub.clone());

        let request = request("Jane Doe\njane@x.com\n");
        let html = generator.generate(&request).await;

        assert_eq!(stub.calls(), 0, "API mode off must not touch the dispatcher");
        assert_eq!(html, template::render_portfolio(&request.resume_text));
    }

    #[tokio::test]
    async fn test_offline_model_blocks_dispatch_even_with_api_enabled() {
        let stub = StubDispatch::replying(Some("<!DOCTYPE html><html></html>"));
        let generator = PortfolioGenerator::new(settings(OFFLINE_MODEL, true), stub.clone());

        let html = generator.generate(&request("resume")).await;

        assert_eq!(stub.calls(), 0);
        assert!(html.starts_with("<!DOCTYPE html>"));
    }

    #[tokio::test]
    async fn test_successful_dispatch_result_is_returned() {
        let stub = StubDispatch::replying(Some("<!DOCTYPE html><p>from provider</p>"));
        let generator = PortfolioGenerator::new(settings("gpt-5-mini", true), stub.clone());

        let html = generator.generate(&request("resume")).await;

        assert_eq!(stub.calls(), 1);
        assert_eq!(html, "<!DOCTYPE html><p>from provider</p>");
    }

    #[tokio::test]
    async fn test_dispatch_failure_falls_back_to_template() {
        let stub = StubDispatch::replying(None);
        let generator = PortfolioGenerator::new(settings("gpt-5-mini", true), stub.clone());

        let request = request("Jane Doe\njane@x.com\n");
        let html = generator.generate(&request).await;

        assert_eq!(stub.calls(), 1);
        assert_eq!(html, template::render_portfolio(&request.resume_text));
    }

    #[tokio::test]
    async fn test_explicit_api_key_forces_api_attempt() {
        let stub = StubDispatch::replying(Some("<!DOCTYPE html><html></html>"));
        let generator = PortfolioGenerator::new(settings("gemini-2.5-flash", false), stub.clone());

        let request = GenerationRequest {
            resume_text: "resume".to_string(),
            model: None,
            api_key: Some("sk-live".to_string()),
        };
        generator.generate(&request).await;

        assert_eq!(stub.calls(), 1, "explicit credential must force an attempt");
    }

    #[tokio::test]
    async fn test_request_model_overrides_configured_model() {
        let generator =
            PortfolioGenerator::new(settings("gemini-2.5-flash", true), Arc::new(EchoDispatch));

        let request = GenerationRequest {
            resume_text: "resume".to_string(),
            model: Some("groq/compound".to_string()),
            api_key: None,
        };
        let html = generator.generate(&request).await;

        assert!(html.contains("groq/compound"));
    }

    #[tokio::test]
    async fn test_offline_jane_resume_end_to_end() {
        let stub = StubDispatch::replying(Some("unused"));
        let generator = PortfolioGenerator::new(settings(OFFLINE_MODEL, false), stub.clone());

        let request = request(
            "Jane Doe\njane@x.com\nSkills: Python, Go, Rust, C++, Java, SQL, AWS, Docker, Kubernetes\n",
        );
        let html = generator.generate(&request).await;

        assert_eq!(stub.calls(), 0);
        assert!(html.contains("jane@x.com"));
        assert_eq!(html.matches(r#"<span class="skill-tag">"#).count(), 8);
        assert!(!html.contains("Kubernetes"), "ninth skill must be dropped");
    }
}
