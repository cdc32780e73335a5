use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use triage_core::{GenerateRequest, GenerateResponse, ProviderAdapter, TriageError};

use crate::error_for_status;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const PROVIDER_NAME: &str = "anthropic";

/// Adapter for the Anthropic messages API.
pub struct AnthropicAdapter {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnthropicAdapter {
    /// Adapter against the public Anthropic endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the adapter at a different server (proxies, tests).
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f64,
    messages: [Message<'a>; 1],
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    input_tokens: Option<u32>,
    output_tokens: Option<u32>,
}

#[async_trait]
impl ProviderAdapter for AnthropicAdapter {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "triage_llm::anthropic::generate", skip(self, req), fields(model = %req.config.model))
    )]
    async fn generate(&self, req: &GenerateRequest) -> Result<GenerateResponse, TriageError> {
        let body = MessagesRequest {
            model: &req.config.model,
            max_tokens: req.config.max_tokens,
            temperature: req.config.temperature,
            messages: [Message {
                role: "user",
                content: &req.prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&body)
            .send()
            .await
            .map_err(|e| TriageError::provider(PROVIDER_NAME, format!("transport: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(error_for_status(PROVIDER_NAME, status));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| TriageError::provider(PROVIDER_NAME, format!("malformed response: {e}")))?;

        let text = parsed
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| {
                TriageError::provider(PROVIDER_NAME, "response contained no text block")
            })?;

        let (prompt_tokens, completion_tokens) = parsed
            .usage
            .map_or((None, None), |u| (u.input_tokens, u.output_tokens));

        Ok(GenerateResponse {
            text,
            model: req.config.model.clone(),
            prompt_tokens,
            completion_tokens,
        })
    }
}
