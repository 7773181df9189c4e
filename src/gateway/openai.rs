//! OpenAI Chat Completions 連携
//!
//! 画像は `image_url` パートにData URLのまま渡す。

use super::provider::{VisionProvider, VisionRequest};
use crate::error::{AnalyzerError, Result};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct OpenAiProvider {
    api_key: Option<String>,
    http_client: HttpClient,
    base_url: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: Option<String>, base_url: String, model: String) -> Self {
        Self {
            api_key,
            http_client: HttpClient::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model,
        }
    }
}

#[async_trait]
impl VisionProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn complete(&self, request: &VisionRequest) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(AnalyzerError::MissingApiKey("OPENAI_API_KEY"))?;

        let body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: &request.prompt },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: &request.image_data_uri },
                    },
                ],
            }],
            max_tokens: request.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AnalyzerError::ApiCall(format!("OpenAI network error: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AnalyzerError::ApiCall(format!("OpenAI HTTP {}: {}", status, text)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| AnalyzerError::ApiParse(format!("OpenAI response: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.is_empty())
            .ok_or_else(|| AnalyzerError::ApiParse("No response from OpenAI".into()))
    }
}
