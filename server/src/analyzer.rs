//! Vision model backends for canvas analysis.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AnalysisError;
use crate::prompt::analysis_prompt;
use crate::snapshot::InlineImage;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

#[async_trait]
pub trait Analyzer: Send + Sync {
    async fn analyze(
        &self,
        image: &InlineImage,
        topic_a: &str,
        topic_b: &str,
    ) -> Result<String, AnalysisError>;
}

/// One non-streaming `generateContent` call per analysis.
pub struct GeminiAnalyzer {
    base_url: String,
    model: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl GeminiAnalyzer {
    pub fn new(api_key: Option<String>, model: impl Into<String>, base_url: Option<&str>) -> Self {
        Self {
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            model: model.into(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            client: reqwest::Client::new(),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self, api_key: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        )
    }
}

// --- generateContent request/response types ---

#[derive(Debug, Serialize)]
pub(crate) struct GenerateContentRequest {
    contents: Vec<Content>,
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
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: Blob,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob {
    mime_type: String,
    data: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

pub(crate) fn build_request(prompt: String, image: &InlineImage) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: prompt },
                Part::InlineData {
                    inline_data: Blob {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
            ],
        }],
    }
}

/// Concatenates the text parts of the first candidate.
pub(crate) fn response_text(response: &GenerateContentResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|candidate| candidate.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|part| part.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default()
}

#[async_trait]
impl Analyzer for GeminiAnalyzer {
    async fn analyze(
        &self,
        image: &InlineImage,
        topic_a: &str,
        topic_b: &str,
    ) -> Result<String, AnalysisError> {
        let api_key = self.api_key.as_deref().ok_or(AnalysisError::MissingApiKey)?;
        let body = build_request(analysis_prompt(topic_a, topic_b), image);

        debug!(model = %self.model, width = image.width, height = image.height, "Calling Gemini API");

        let response = self
            .client
            .post(self.endpoint(api_key))
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(AnalysisError::UpstreamStatus { status, body });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        let text = response_text(&parsed);
        if text.trim().is_empty() {
            debug!(model = %self.model, "Gemini answered without text");
        }
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn image() -> InlineImage {
        InlineImage {
            mime_type: "image/png".into(),
            data: "iVBORw0KGgo=".into(),
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(build_request("look".into(), &image())).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{
                    "parts": [
                        { "text": "look" },
                        { "inlineData": { "mimeType": "image/png", "data": "iVBORw0KGgo=" } }
                    ]
                }]
            })
        );
    }

    #[test]
    fn test_response_text_joins_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "## Executive" }, { "text": " Summary" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response_text(&response), "## Executive Summary");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let response: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response_text(&response), "");
    }

    #[test]
    fn test_blank_api_key_counts_as_missing() {
        let analyzer = GeminiAnalyzer::new(Some("  ".into()), DEFAULT_MODEL, None);
        assert!(!analyzer.has_api_key());
    }

    #[test]
    fn test_endpoint_trims_base_url() {
        let analyzer = GeminiAnalyzer::new(Some("k".into()), "m", Some("http://localhost:9/"));
        assert_eq!(
            analyzer.endpoint("k"),
            "http://localhost:9/v1beta/models/m:generateContent?key=k"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_without_network() {
        let analyzer = GeminiAnalyzer::new(None, DEFAULT_MODEL, Some("http://127.0.0.1:1"));
        let result = analyzer.analyze(&image(), "a", "b").await;
        assert!(matches!(result, Err(AnalysisError::MissingApiKey)));
    }
}
