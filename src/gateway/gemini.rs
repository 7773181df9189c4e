//! Gemini API連携
//!
//! 画像はData URLを分解して `inline_data` として送る。

use super::provider::{
    extract_base64_from_data_url, extract_mime_type_from_data_url, VisionProvider, VisionRequest,
};
use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

/// Gemini APIリクエスト
#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "maxOutputTokens")]
    max_output_tokens: u32,
}

/// Gemini APIレスポンス
#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

pub struct GeminiProvider {
    api_key: Option<String>,
    http_client: HttpClient,
    base_url: String,
    model: String,
}

impl GeminiProvider {
    pub fn new(api_key: Option<String>, base_url: String, model: String) -> Self {
        Self {
            api_key,
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }

    fn build_request(request: &VisionRequest) -> Result<GeminiRequest> {
        let data = extract_base64_from_data_url(&request.image_data_uri)
            .ok_or_else(|| AnalyzerError::ImageLoad("image is not a data URL".into()))?;
        let mime_type = extract_mime_type_from_data_url(&request.image_data_uri);

        Ok(GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text { text: request.prompt.clone() },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: data.to_string(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.4,
                max_output_tokens: request.max_tokens,
            },
        })
    }
}

#[async_trait]
impl VisionProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, request: &VisionRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AnalyzerError::MissingApiKey("GEMINI_API_KEY"))?;

        let body = Self::build_request(request)?;
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalyzerError::ApiCall(format!("Gemini network error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::ApiCall(format!("Gemini HTTP {}: {}", status, text)));
        }

        let parsed: GeminiResponse = response
            .json()
            .await
            .map_err(|e| AnalyzerError::ApiParse(format!("Gemini response: {}", e)))?;

        parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| AnalyzerError::ApiParse("Empty response from Gemini".into()))
    }
}
