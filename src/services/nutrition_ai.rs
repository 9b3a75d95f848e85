// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! Natural-language meal analysis backed by a generative-text service.
//!
//! The service is asked for a JSON list of food items with estimated
//! macros. Its reply is treated as untrusted text: code fences are
//! stripped, the JSON is parsed and validated strictly, and totals are
//! always recomputed locally. Any failure yields `None` so callers can
//! report one generic error without leaking service internals.

use crate::error::AppError;
use crate::models::{LoggedFoodItem, MacroTotals};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

const ANALYSIS_INSTRUCTIONS: &str = r#"You are a nutrition analyst. The user describes a meal in plain language.
Identify every food in the description and estimate its portion and macros.

Reply with raw JSON only: no markdown fences, no headings, no commentary.
The reply must be a JSON array with one object per food, each with exactly these keys:
- "name": food name (string)
- "quantity_g": estimated portion in grams (number)
- "calories": estimated kilocalories for that portion (number)
- "protein": grams of protein for that portion (number)
- "carbs": grams of carbohydrate for that portion (number)
- "fat": grams of fat for that portion (number)

Example description: "a banana and a cup of black coffee"
Example reply:
[
  {"name": "Banana", "quantity_g": 118, "calories": 105, "protein": 1.3, "carbs": 27, "fat": 0.4},
  {"name": "Black coffee", "quantity_g": 240, "calories": 2, "protein": 0.3, "carbs": 0, "fat": 0}
]"#;

/// Seam over the external generative-text service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Send one prompt and return the raw reply text.
    async fn generate(&self, prompt: &str) -> Result<String, AppError>;
}

// ─── Gemini client ───────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

/// `generateContent` client for Google's Gemini API.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: GEMINI_API_BASE.to_string(),
            api_key,
            model,
        }
    }

    /// Point the client at a different API root (used for local stubs).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, AppError> {
        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: 0.2,
                response_mime_type: "application/json",
            },
        };

        let response = self
            .http
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            // The endpoint carries the API key; keep it out of error text.
            .map_err(|e| AppError::AiService(format!("Request failed: {}", e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| {
                AppError::AiService(format!("Failed to read response: {}", e.without_url()))
            })?;

        if !status.is_success() {
            return Err(AppError::AiService(format!("HTTP {}: {}", status, body)));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::AiService(format!("Malformed response envelope: {}", e)))?;

        if let Some(error) = parsed.error {
            return Err(AppError::AiService(error.message));
        }

        parsed
            .candidates
            .and_then(|candidates| candidates.into_iter().next())
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| AppError::AiService("No content in response".to_string()))
    }
}

// ─── Analysis ────────────────────────────────────────────────────────────────

/// Analyzer output: the identified items and their locally computed totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct MacroAnalysisResponse {
    pub items: Vec<LoggedFoodItem>,
    pub totals: MacroTotals,
}

/// Accepted reply shapes. A wrapped reply may carry its own totals; they
/// are ignored.
#[derive(Deserialize)]
#[serde(untagged)]
enum ReplyShape {
    Items(Vec<LoggedFoodItem>),
    Wrapped { items: Vec<LoggedFoodItem> },
}

#[derive(Clone)]
pub struct NutritionAnalyzer {
    generator: Arc<dyn TextGenerator>,
    timeout: Duration,
}

impl NutritionAnalyzer {
    pub fn new(generator: Arc<dyn TextGenerator>, timeout: Duration) -> Self {
        Self { generator, timeout }
    }

    /// Estimate the foods and macros in a free-text meal description.
    ///
    /// Returns `None` when the service errors, times out, or replies with
    /// anything that does not parse into at least one valid item.
    pub async fn analyze(&self, query: &str) -> Option<MacroAnalysisResponse> {
        let prompt = build_prompt(query);

        let reply = match tokio::time::timeout(self.timeout, self.generator.generate(&prompt)).await
        {
            Ok(Ok(reply)) => reply,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Meal analysis request failed");
                return None;
            }
            Err(_) => {
                tracing::warn!(timeout_ms = self.timeout.as_millis() as u64, "Meal analysis timed out");
                return None;
            }
        };

        match parse_reply(&reply) {
            Ok(items) => {
                let totals = MacroTotals::from_items(&items);
                tracing::debug!(items = items.len(), "Meal analysis succeeded");
                Some(MacroAnalysisResponse { items, totals })
            }
            Err(reason) => {
                tracing::warn!(%reason, "Rejected meal analysis reply");
                None
            }
        }
    }
}

/// Full prompt sent for one query.
pub fn build_prompt(query: &str) -> String {
    format!("{}\n\nAnalyze this meal: \"{}\"", ANALYSIS_INSTRUCTIONS, query)
}

/// Remove a surrounding markdown code fence (with optional language tag).
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        // JSON starts with `[` or `{`, so any leading letters are the tag.
        text = rest.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    }
    if let Some(rest) = text.trim_end().strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Parse and validate a reply into stored-item shape.
fn parse_reply(raw: &str) -> Result<Vec<LoggedFoodItem>, String> {
    let shape: ReplyShape =
        serde_json::from_str(strip_code_fences(raw)).map_err(|e| format!("not valid JSON items: {}", e))?;

    let mut items = match shape {
        ReplyShape::Items(items) | ReplyShape::Wrapped { items } => items,
    };

    if items.is_empty() {
        return Err("no items identified".to_string());
    }

    for item in &mut items {
        item.validate().map_err(|e| format!("invalid item: {}", e))?;
        // Ids are assigned when entries are logged, never by the service.
        item.log_item_id.clear();
    }

    Ok(items)
}
