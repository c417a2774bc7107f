use async_trait::async_trait;
use log::{debug, error, warn};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::app_config::{ProviderConfig, TranslationProvider, ENV_API_KEY, ENV_ENDPOINT};
use crate::errors::{ProviderError, TranslationError};
use crate::providers::{Provider, Translator};

/// Default base URL for the public OpenAI API
pub const DEFAULT_OPENAI_ENDPOINT: &str = "https://api.openai.com/v1";

/// Chat-completions client for Azure OpenAI deployments and OpenAI-compatible servers
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// Fully built chat-completions URL
    url: Url,
    /// Which authentication and URL scheme to use
    flavor: TranslationProvider,
    /// Model or deployment name
    model: String,
    /// Sampling temperature sent with every request
    temperature: f32,
}

impl std::fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAI")
            .field("url", &self.url.as_str())
            .field("flavor", &self.flavor)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .finish_non_exhaustive()
    }
}

/// Chat completion request
#[derive(Debug, Serialize, Default)]
pub struct OpenAIRequest {
    /// The model to use; Azure takes it from the URL instead
    #[serde(skip_serializing_if = "String::is_empty")]
    model: String,

    /// The messages for the conversation
    messages: Vec<OpenAIMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// Message sent to the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Chat completion response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    /// Generated alternatives; only the first is used
    #[serde(default)]
    pub choices: Vec<OpenAIChoice>,
    /// Token usage information
    #[serde(default)]
    pub usage: Option<OpenAIUsage>,
}

/// One generated alternative
#[derive(Debug, Deserialize)]
pub struct OpenAIChoice {
    /// The generated message
    pub message: OpenAIResponseMessage,
    /// Why generation stopped (`stop`, `length`, ...)
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Message returned by the API; content may be null
#[derive(Debug, Deserialize)]
pub struct OpenAIResponseMessage {
    /// Role of the sender
    #[serde(default)]
    pub role: Option<String>,
    /// Text content
    #[serde(default)]
    pub content: Option<String>,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct OpenAIUsage {
    /// Number of prompt tokens
    #[serde(default)]
    pub prompt_tokens: u64,
    /// Number of completion tokens
    #[serde(default)]
    pub completion_tokens: u64,
}

impl OpenAIRequest {
    /// Create a new chat completion request
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

impl OpenAI {
    /// Create a client from the provider settings
    ///
    /// Fails before any request is made when the endpoint or key is missing.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, TranslationError> {
        let needs_key = match config.provider_type {
            TranslationProvider::Azure => true,
            TranslationProvider::OpenAI => config.endpoint.trim().is_empty(),
        };
        if needs_key && config.api_key.trim().is_empty() {
            return Err(TranslationError::MissingCredentials(format!(
                "{} requires an API key (set {})",
                config.provider_type.display_name(),
                ENV_API_KEY
            )));
        }

        let url = Self::completions_url(config)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::ConnectionError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            url,
            flavor: config.provider_type,
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Build the chat-completions URL for the configured provider
    ///
    /// Azure: `{endpoint}/openai/deployments/{model}/chat/completions?api-version=...`
    /// OpenAI: `{endpoint}/chat/completions`
    pub fn completions_url(config: &ProviderConfig) -> Result<Url, TranslationError> {
        let endpoint = config.endpoint.trim();
        let base = match config.provider_type {
            TranslationProvider::Azure if endpoint.is_empty() => {
                return Err(TranslationError::MissingCredentials(format!(
                    "Azure OpenAI requires an endpoint (set {})",
                    ENV_ENDPOINT
                )));
            }
            TranslationProvider::OpenAI if endpoint.is_empty() => DEFAULT_OPENAI_ENDPOINT,
            _ => endpoint,
        };

        let mut url = Url::parse(base)
            .map_err(|e| ProviderError::RequestFailed(format!("Invalid endpoint '{}': {}", base, e)))?;

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ProviderError::RequestFailed(format!("Endpoint '{}' cannot be a base URL", base)))?;
            segments.pop_if_empty();
            if config.provider_type == TranslationProvider::Azure {
                segments.extend(["openai", "deployments", config.model.as_str()]);
            }
            segments.extend(["chat", "completions"]);
        }

        if config.provider_type == TranslationProvider::Azure {
            url.query_pairs_mut().append_pair("api-version", &config.api_version);
        }

        Ok(url)
    }

    fn request_model(&self) -> &str {
        match self.flavor {
            TranslationProvider::Azure => "",
            TranslationProvider::OpenAI => &self.model,
        }
    }

    /// Pull a readable message out of an error body
    fn error_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
            .unwrap_or_else(|| body.to_string())
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let builder = self.client.post(self.url.clone()).json(&request);
        let builder = match self.flavor {
            TranslationProvider::Azure => builder.header("api-key", &self.api_key),
            TranslationProvider::OpenAI if self.api_key.is_empty() => builder,
            TranslationProvider::OpenAI => builder.bearer_auth(&self.api_key),
        };

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                ProviderError::ConnectionError(e.to_string())
            } else {
                ProviderError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            let message = Self::error_message(&body);
            error!("{} API error ({}): {}", self.flavor.display_name(), status, message);

            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimitExceeded(message),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::AuthenticationError(message),
                _ => ProviderError::ApiError {
                    status_code: status.as_u16(),
                    message,
                },
            });
        }

        let parsed = response
            .json::<OpenAIResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        if let Some(usage) = &parsed.usage {
            debug!("Tokens: {} prompt, {} completion", usage.prompt_tokens, usage.completion_tokens);
        }

        Ok(parsed)
    }

    fn extract_text(response: &OpenAIResponse) -> Option<String> {
        response.choices.first().and_then(|c| c.message.content.clone())
    }
}

#[async_trait]
impl Translator for OpenAI {
    async fn translate(&self, instructions: &str, text: &str) -> Result<String, TranslationError> {
        let request = OpenAIRequest::new(self.request_model())
            .add_message("system", instructions)
            .add_message("user", text)
            .temperature(self.temperature);

        let response = self.complete(request).await?;

        if let Some(reason) = response.choices.first().and_then(|c| c.finish_reason.as_deref()) {
            if reason == "length" {
                warn!("Model output was cut off by the token limit; consider enabling chunked translation");
            }
        }

        Self::extract_text(&response)
            .filter(|text| !text.trim().is_empty())
            .ok_or(TranslationError::EmptyResponse)
    }

    fn describe(&self) -> String {
        format!("{} - {}", self.flavor.display_name(), self.model)
    }
}
