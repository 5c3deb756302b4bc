//! Gemini client for video metadata generation.
//!
//! The video is sent inline as base64 data next to the prompt, and the model
//! is asked to answer with a single JSON object.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vtune_models::{parse_data_uri, VideoMetadata};

use crate::error::{GenerationError, GenerationResult};
use crate::generator::{MetadataGenerator, MetadataRequest};

/// Default Gemini API base URL.
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Default model.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Configuration for the Gemini client.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key; `None` when not configured
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// API base URL
    pub api_base: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GeminiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GEMINI_API_KEY")
                .or_else(|_| std::env::var("GOOGLE_API_KEY"))
                .ok(),
            model: std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            api_base: std::env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            timeout: Duration::from_secs(
                std::env::var("GEMINI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        }
    }

    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }
}

/// Gemini API client.
pub struct GeminiClient {
    api_key: String,
    model: String,
    api_base: String,
    client: Client,
}

/// Gemini API request.
#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

/// Gemini API response.
#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl GeminiClient {
    /// Create a new Gemini client.
    pub fn new(config: GeminiConfig) -> GenerationResult<Self> {
        let api_key = config
            .api_key
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| GenerationError::config_error("GEMINI_API_KEY not set"))?;

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            api_key,
            model: config.model,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> GenerationResult<Self> {
        Self::new(GeminiConfig::from_env())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Build prompt for Gemini.
    fn build_prompt(&self, summary: Option<&str>) -> String {
        let summary = summary.unwrap_or("No user summary provided. Rely solely on video content.");
        format!(
            r#"You are an expert in creating engaging and SEO-optimized metadata for YouTube videos.

Analyze the attached video (frames, scenes, and implied narrative or information) as the primary source.
Use the user-provided summary as supplementary context.

User-provided summary:
{summary}

Return ONLY a single JSON object with this schema:
{{
  "title": "A concise, SEO-optimized title",
  "description": "A compelling description (2-3 short paragraphs)",
  "tags": ["10 to 15 relevant keyword tags"]
}}
"#
        )
    }

    /// Call Gemini API.
    async fn call_gemini_api(&self, request: &MetadataRequest) -> GenerationResult<VideoMetadata> {
        let (mime_type, data) = parse_data_uri(&request.video_data_uri)?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.api_base, self.model, self.api_key
        );

        let body = GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: self.build_prompt(request.summary.as_deref()),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: data.to_string(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
            },
        };

        debug!(model = %self.model, mime_type, "Calling Gemini generateContent");

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&error_text)
                .map(|b| b.error.message)
                .unwrap_or(error_text);
            return Err(GenerationError::RequestFailed {
                status: status.as_u16(),
                message,
            });
        }

        let gemini_response: GeminiResponse = response.json().await?;

        let text = gemini_response
            .candidates
            .first()
            .and_then(|c| c.content.parts.iter().find_map(|p| p.text.as_deref()))
            .ok_or_else(|| GenerationError::invalid_response("No content in Gemini response"))?;

        parse_metadata(text)
    }
}

#[async_trait]
impl MetadataGenerator for GeminiClient {
    async fn generate(&self, request: &MetadataRequest) -> GenerationResult<VideoMetadata> {
        info!(
            model = %self.model,
            has_summary = request.summary.is_some(),
            "Generating video metadata"
        );
        match self.call_gemini_api(request).await {
            Ok(metadata) => {
                info!(tags = metadata.tags.len(), "Generated video metadata");
                Ok(metadata)
            }
            Err(e) => {
                warn!("Metadata generation failed: {}", e);
                Err(e)
            }
        }
    }
}

/// Parse the model's JSON answer, handling Markdown code fences.
fn parse_metadata(text: &str) -> GenerationResult<VideoMetadata> {
    let text = strip_code_fences(text);
    let metadata: VideoMetadata = serde_json::from_str(text)?;
    metadata
        .normalized()
        .map_err(|e| GenerationError::invalid_response(e.to_string()))
}

fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
    }

    #[test]
    fn test_parse_metadata_normalizes_tags() {
        let metadata = parse_metadata(
            r#"```json
{"title": "Beach Day", "description": "Sun and sand.", "tags": ["beach", " beach ", "summer", ""]}
```"#,
        )
        .unwrap();
        assert_eq!(metadata.title, "Beach Day");
        assert_eq!(metadata.tags, vec!["beach", "summer"]);
    }

    #[test]
    fn test_parse_metadata_rejects_missing_fields() {
        assert!(matches!(
            parse_metadata(r#"{"title": "T", "description": "", "tags": ["a"]}"#),
            Err(GenerationError::InvalidResponse(_))
        ));
        assert!(matches!(
            parse_metadata("not json"),
            Err(GenerationError::Json(_))
        ));
    }

    #[test]
    fn test_missing_api_key() {
        assert!(matches!(
            GeminiClient::new(GeminiConfig::default()),
            Err(GenerationError::ConfigError(_))
        ));
        assert!(matches!(
            GeminiClient::new(GeminiConfig::default().with_api_key(Some("  ".into()))),
            Err(GenerationError::ConfigError(_))
        ));
    }

    #[test]
    fn test_inline_data_part_shape() {
        let part = Part::InlineData {
            inline_data: InlineData {
                mime_type: "video/mp4".into(),
                data: "AAAA".into(),
            },
        };
        let json = serde_json::to_value(&part).unwrap();
        assert_eq!(json["inlineData"]["mimeType"], "video/mp4");
        assert_eq!(json["inlineData"]["data"], "AAAA");
    }
}
