/*!
 * Batch translation service.
 *
 * Sends batches of requirement lines to the remote LLM provider with a
 * strict structured-output contract: a batch of N lines must come back as
 * exactly N translated lines, in the same order. Shape violations are
 * retryable errors, never silently repaired.
 */

use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::app_config::Config;
use crate::errors::{AppError, ProviderError, TranslationError};
use crate::providers::Provider;
use crate::providers::openai::{OpenAI, OpenAIRequest};
use crate::retry::with_retry;

/// System prompt guiding the translation model
const SYSTEM_PROMPT: &str = "You are a professional technical translator for Software Requirements (FR/NFR). \
Translate English software/system requirements into natural, fluent Vietnamese. \
Avoid word-for-word translation; keep scientific/technical accuracy. \
Do NOT add explanations, do NOT add numbering/bullets. \
Preserve meaning, units, constraints, and parentheses. \
Each input line must produce exactly one Vietnamese line.";

/// User prompt template; `{lines_json}` is replaced by the JSON-encoded batch
const USER_PROMPT_TEMPLATE: &str = "Translate the following requirement lines to Vietnamese.

Rules:
- Return exactly N Vietnamese lines for N input lines (same order).
- Do not merge lines. Do not split a line into multiple lines.
- No numbering, no bullets, no extra commentary.
- If an input line has spelling/grammar issues, correct it before translating.
- Keep each translation as a single line.

Input lines (JSON array of strings):
{lines_json}
";

/// Expected shape of the structured reply
#[derive(Debug, Deserialize)]
struct TranslationBatch {
    /// One translated line per input line, same order
    translations: Vec<String>,
}

/// JSON schema the remote service must satisfy
fn translation_batch_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "additionalProperties": false,
        "properties": {
            "translations": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["translations"]
    })
}

/// Collapse internal newlines to spaces and trim surrounding whitespace
pub fn normalize_line(line: &str) -> String {
    line.replace('\n', " ").trim().to_string()
}

/// Whether every line in the batch is blank or whitespace-only
pub fn is_blank_batch(lines: &[String]) -> bool {
    lines.iter().all(|line| line.trim().is_empty())
}

/// Seam between the orchestrator and the translation transport.
///
/// Implementations must return exactly one translated line per input line,
/// in the same order.
#[async_trait]
pub trait BatchTranslator: Send + Sync {
    /// Translate a batch of lines
    async fn translate_batch(&self, lines: &[String]) -> Result<Vec<String>, TranslationError>;
}

/// Translation service backed by the OpenAI provider
#[derive(Debug)]
pub struct TranslationService {
    /// The provider client
    client: OpenAI,
    /// Model name for requests
    model: String,
    /// Maximum attempts per batch, including the first
    max_attempts: u32,
}

impl TranslationService {
    /// Create a new translation service from the application configuration
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            ProviderError::AuthenticationError(
                "No API key configured; set api_key in the config file or OPENAI_API_KEY in the environment".to_string(),
            )
        })?;

        Ok(Self {
            client: OpenAI::new(api_key, &config.endpoint, config.timeout_secs),
            model: config.model.clone(),
            max_attempts: config.max_attempts,
        })
    }

    /// One translation attempt: send the batch, decode the structured reply,
    /// enforce the N-for-N shape contract.
    async fn request_batch(
        &self,
        lines: &[String],
        user_prompt: &str,
    ) -> Result<Vec<String>, TranslationError> {
        let request = OpenAIRequest::new(&self.model)
            .add_message("system", SYSTEM_PROMPT)
            .add_message("user", user_prompt)
            .json_schema("translation_batch", translation_batch_schema());

        let response = self.client.complete(request).await?;

        let raw = OpenAI::extract_text_from_response(&response);
        if raw.is_empty() {
            return Err(TranslationError::EmptyResponse);
        }

        let batch: TranslationBatch = serde_json::from_str(&raw).map_err(|e| {
            ProviderError::ParseError(format!("Reply is not a valid translation batch: {}", e))
        })?;

        if batch.translations.len() != lines.len() {
            return Err(TranslationError::BatchSizeMismatch {
                expected: lines.len(),
                actual: batch.translations.len(),
            });
        }

        Ok(batch
            .translations
            .iter()
            .map(|line| normalize_line(line))
            .collect())
    }
}

#[async_trait]
impl BatchTranslator for TranslationService {
    async fn translate_batch(&self, lines: &[String]) -> Result<Vec<String>, TranslationError> {
        // A batch with no content never reaches the network: it maps to an
        // equal-length sequence of empty lines.
        if is_blank_batch(lines) {
            debug!("Skipping remote call for blank batch of {} lines", lines.len());
            return Ok(vec![String::new(); lines.len()]);
        }

        let lines_json = serde_json::to_string(lines).map_err(|e| {
            ProviderError::RequestFailed(format!("Failed to encode batch as JSON: {}", e))
        })?;
        let user_prompt = USER_PROMPT_TEMPLATE.replace("{lines_json}", &lines_json);
        let prompt = user_prompt.as_str();

        with_retry(self.max_attempts, move || self.request_batch(lines, prompt)).await
    }
}
