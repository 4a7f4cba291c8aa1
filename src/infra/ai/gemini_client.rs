// =============================================================================
// GEMINI CLIENT - Google AI Studio generateContent check
// =============================================================================
//
// Sends a single-turn prompt to the Gemini `generateContent` endpoint
// (https://ai.google.dev/api/generate-content) and hands back the generated
// text. Judging the text is left to the checks.
//
// **Wire format:**
// - Authentication: API key as the `key` query parameter.
// - Request: `{"contents":[{"parts":[{"text": "<prompt>"}]}]}`
// - Response: text at `candidates[0].content.parts[0].text`.
//
// **Environment Variables:**
// - `GEMINI_API_KEY` - Your API key from https://aistudio.google.com/apikey
// - `GEMINI_MODEL` - Model id (default `gemini-1.5-flash`)
// - `GEMINI_BASE_URL` - Override for local mocks

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::GeminiSettings;
use crate::core::harness::CheckError;
use crate::infra::google_api::{self, ApiReply};

// =============================================================================
// GEMINI API DATA STRUCTURES
// =============================================================================

/// A single part of content.
///
/// Responses may include parts without text (function calls, inline data), so
/// `text` is optional.
#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
struct Content {
    /// Omitted on requests; the API defaults single-turn prompts to "user".
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,

    /// Why the model stopped generating (e.g., "STOP", "SAFETY").
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// Text of the first part of the first candidate.
    fn first_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        if let Some(reason) = candidate.finish_reason.as_deref() {
            tracing::debug!("Gemini finish reason: {}", reason);
        }
        candidate
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

// =============================================================================
// GEMINI CLIENT IMPLEMENTATION
// =============================================================================

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings) -> Result<Self, CheckError> {
        Ok(Self {
            client: google_api::build_client(settings.timeout)?,
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            base_url: settings.base_url.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn request_for(prompt: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }

    /// Sends `prompt` and returns the generated text.
    ///
    /// `Success(None)` means the call succeeded but carried no text, which
    /// usually means the prompt was blocked by safety filters.
    pub async fn generate_text(
        &self,
        prompt: &str,
    ) -> Result<ApiReply<Option<String>>, CheckError> {
        let key = google_api::require_key(self.api_key.as_deref(), "GEMINI_API_KEY")?;
        let method = format!("{}:generateContent", self.model);
        let url = google_api::endpoint(&self.base_url, &["v1beta", "models", &method])?;

        // The key goes in the query string; never log the full URL.
        tracing::debug!(
            "Gemini request to model {}: {} prompt chars",
            self.model,
            prompt.chars().count()
        );

        let response = self
            .client
            .post(url)
            .query(&[("key", key)])
            .header("Content-Type", "application/json")
            .json(&Self::request_for(prompt))
            .send()
            .await?;

        let reply = google_api::read_reply::<GenerateContentResponse>(response).await?;

        Ok(match reply {
            ApiReply::Success(body) => {
                let text = body.first_text();
                tracing::debug!(
                    "Gemini response received: {} chars",
                    text.as_ref().map(|t| t.chars().count()).unwrap_or(0)
                );
                ApiReply::Success(text)
            }
            ApiReply::Failure(failure) => ApiReply::Failure(failure),
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
