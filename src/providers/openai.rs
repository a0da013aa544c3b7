use std::time::Duration;
use async_trait::async_trait;
use serde::{Serialize, Deserialize};
use reqwest::Client;
use log::error;

use crate::errors::ProviderError;
use crate::providers::Provider;

/// OpenAI client for the Responses API
#[derive(Debug)]
pub struct OpenAI {
    /// HTTP client for API requests
    client: Client,
    /// API key for authentication
    api_key: String,
    /// API endpoint URL (optional, defaults to the public API)
    endpoint: String,
}

/// OpenAI Responses API request
#[derive(Debug, Serialize)]
pub struct OpenAIRequest {
    /// The model to use
    model: String,

    /// The conversation input messages
    input: Vec<OpenAIMessage>,

    /// Output text configuration (structured output)
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<TextConfig>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// OpenAI message format
#[derive(Debug, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role of the message sender (system, user, assistant)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Output text configuration for structured responses
#[derive(Debug, Serialize)]
struct TextConfig {
    /// The response format specification
    format: TextFormat,
}

/// JSON-schema response format
#[derive(Debug, Serialize)]
struct TextFormat {
    /// Format type, always "json_schema"
    #[serde(rename = "type")]
    format_type: String,

    /// Schema name
    name: String,

    /// The JSON schema the response must satisfy
    schema: serde_json::Value,

    /// Whether the schema is strictly enforced
    strict: bool,
}

/// Token usage information
#[derive(Debug, Deserialize)]
pub struct TokenUsage {
    /// Number of input tokens
    pub input_tokens: u64,
    /// Number of output tokens
    pub output_tokens: u64,
}

/// OpenAI Responses API response
#[derive(Debug, Deserialize)]
pub struct OpenAIResponse {
    /// The output items of the response
    pub output: Vec<OutputItem>,

    /// Token usage information
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

/// Individual output item in a response
#[derive(Debug, Deserialize)]
pub struct OutputItem {
    /// The type of output item
    #[serde(rename = "type")]
    pub item_type: String,

    /// The content blocks of the item
    #[serde(default)]
    pub content: Vec<OutputContent>,
}

/// Individual content block in an output item
#[derive(Debug, Deserialize)]
pub struct OutputContent {
    /// The type of content
    #[serde(rename = "type")]
    pub content_type: String,

    /// The actual text content
    #[serde(default)]
    pub text: String,
}

impl OpenAIRequest {
    /// Create a new request for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: Vec::new(),
            text: None,
            temperature: None,
            max_output_tokens: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.input.push(OpenAIMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Require the response to satisfy a strict JSON schema
    pub fn json_schema(mut self, name: impl Into<String>, schema: serde_json::Value) -> Self {
        self.text = Some(TextConfig {
            format: TextFormat {
                format_type: "json_schema".to_string(),
                name: name.into(),
                schema,
                strict: true,
            },
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the maximum number of output tokens
    pub fn max_output_tokens(mut self, max_output_tokens: u32) -> Self {
        self.max_output_tokens = Some(max_output_tokens);
        self
    }
}

impl OpenAI {
    /// Create a new OpenAI client
    pub fn new(api_key: impl Into<String>, endpoint: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            endpoint: endpoint.into(),
        }
    }

    fn api_url(&self, path: &str) -> String {
        if self.endpoint.is_empty() {
            format!("https://api.openai.com{}", path)
        } else {
            format!("{}{}", self.endpoint.trim_end_matches('/'), path)
        }
    }

    /// Extract the concatenated output text from a response
    pub fn extract_text_from_response(response: &OpenAIResponse) -> String {
        response
            .output
            .iter()
            .filter(|item| item.item_type == "message")
            .flat_map(|item| item.content.iter())
            .filter(|content| content.content_type == "output_text")
            .map(|content| content.text.as_str())
            .collect()
    }
}

#[async_trait]
impl Provider for OpenAI {
    type Request = OpenAIRequest;
    type Response = OpenAIResponse;

    /// Complete a request against the Responses API
    async fn complete(&self, request: OpenAIRequest) -> Result<OpenAIResponse, ProviderError> {
        let api_url = self.api_url("/v1/responses");

        let response = self.client.post(&api_url)
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(
                format!("Failed to send request to OpenAI API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("OpenAI API error ({}): {}", status, error_text);
            if status.as_u16() == 401 {
                return Err(ProviderError::AuthenticationError(error_text));
            }
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        let openai_response = response.json::<OpenAIResponse>().await
            .map_err(|e| ProviderError::ParseError(
                format!("Failed to parse OpenAI API response: {}", e)))?;

        Ok(openai_response)
    }

    /// Test the connection to the OpenAI API
    async fn test_connection(&self) -> Result<(), ProviderError> {
        let api_url = self.api_url("/v1/models");

        let response = self.client.get(&api_url)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::RequestFailed(
                format!("Failed to connect to OpenAI API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: error_text,
            });
        }

        Ok(())
    }

    fn extract_text(response: &OpenAIResponse) -> String {
        Self::extract_text_from_response(response)
    }
}
