use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use triage_core::{GenerateRequest, GenerateResponse, ProviderAdapter, TriageError};

use crate::error_for_status;

const DEFAULT_BASE_URL: &str = "https://api.openai.com";
const PROVIDER_NAME: &str = "openai";

/// Adapter for OpenAI-compatible chat completion endpoints.
///
/// Works against api.openai.com and any server speaking the same wire
/// format (self-hosted gateways, compatible vendors) via
/// [`base_url`](Self::base_url).
pub struct OpenAiAdapter {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl OpenAiAdapter {
    /// Adapter against the public OpenAI endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the adapter at a different OpenAI-compatible server.
    ///
    /// Trailing slashes are trimmed so path joining stays predictable.
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: Option<u32>,
    completion_tokens: Option<u32>,
}

#[async_trait]
impl ProviderAdapter for OpenAiAdapter {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "triage_llm::openai::generate", skip(self, req), fields(model = %req.config.model))
    )]
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, TriageError> {
        let body = ChatRequest {
            model: &req.config.model,
            messages: [ChatMessage {
                role: "user",
                content: &req.prompt,
            }],
            max_tokens: req.config.max_tokens,
            temperature: req.config.temperature,
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TriageError::provider(PROVIDER_NAME, format!("transport: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_for_status(PROVIDER_NAME, status));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| TriageError::provider(PROVIDER_NAME, format!("malformed response: {e}")))?;

        let choice = parsed.choices.into_iter().next().ok_or_else(|| {
            TriageError::provider(PROVIDER_NAME, "response contained no choices")
        })?;

        let (prompt_tokens, completion_tokens) = parsed
            .usage
            .map_or((None, None), |u| (u.prompt_tokens, u.completion_tokens));

        Ok(GenerateResponse {
            text: choice.message.content,
            model: req.config.model.clone(),
            prompt_tokens,
            completion_tokens,
        })
    }
}
