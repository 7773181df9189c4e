//! 解析ゲートウェイ
//!
//! 1. ユーザーのコンテキストと学習コンテキストを結合
//! 2. 外部AIプロバイダを1回だけ呼び出す（リトライなし）
//! 3. レスポンスからJSONオブジェクトを抽出してパース
//! 4. 2〜3のどこで失敗しても固定のフォールバック結果を返す
//!
//! 呼び出し側にエラーは返らない。`AnalysisOutcome` にはエラー型が無い。

mod gemini;
mod openai;
mod provider;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use provider::{
    extract_base64_from_data_url, extract_mime_type_from_data_url, VisionProvider, VisionRequest,
};

use crate::ai_provider::AiProvider;
use crate::config::Config;
use crate::error::Result;
use crate::learning::PreferenceStore;
use content_analyzer_common::{
    build_analysis_prompt, compose_context, parse_analysis_response, AnalysisResult,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// 解析結果の出どころ
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnalysisSource {
    Provider,
    Fallback { reason: String },
}

/// ゲートウェイの戻り値（常に描画可能な結果を持つ）
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    pub analysis: AnalysisResult,
    pub source: AnalysisSource,
}

impl AnalysisOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self.source, AnalysisSource::Fallback { .. })
    }

    /// フォールバック時にクライアントへ付ける注記
    pub fn note(&self) -> Option<String> {
        match &self.source {
            AnalysisSource::Provider => None,
            AnalysisSource::Fallback { .. } => Some("Using fallback analysis - AI provider unavailable".to_string()),
        }
    }
}

pub struct AnalysisGateway {
    provider: Arc<dyn VisionProvider>,
    store: Arc<PreferenceStore>,
    max_tokens: u32,
}

impl AnalysisGateway {
    pub fn new(provider: Arc<dyn VisionProvider>, store: Arc<PreferenceStore>, max_tokens: u32) -> Self {
        Self {
            provider,
            store,
            max_tokens,
        }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// 画像を解析
    ///
    /// # Arguments
    /// * `image_data_uri` - "data:image/...;base64,..." 形式の画像
    /// * `filename` - ログ用のファイル名
    /// * `user_context` - ユーザーが入力した自由記述
    pub async fn analyze(
        &self,
        image_data_uri: &str,
        filename: &str,
        user_context: Option<&str>,
    ) -> AnalysisOutcome {
        let store = self.store.clone();
        let personalization = tokio::task::spawn_blocking(move || store.build_personalization_summary())
            .await
            .unwrap_or_else(|e| {
                warn!("personalization lookup failed: {}", e);
                String::new()
            });
        let context = compose_context(user_context, &personalization);
        let request = VisionRequest {
            prompt: build_analysis_prompt(context.as_deref()),
            image_data_uri: image_data_uri.to_string(),
            max_tokens: self.max_tokens,
        };

        debug!(
            "analyzing {} via {} (prompt {} chars, personalized: {})",
            filename,
            self.provider.name(),
            request.prompt.len(),
            !personalization.is_empty()
        );

        match self.try_analyze(&request).await {
            Ok(analysis) => AnalysisOutcome {
                analysis,
                source: AnalysisSource::Provider,
            },
            Err(e) => {
                warn!("{} analysis failed for {}: {}", self.provider.name(), filename, e);
                AnalysisOutcome {
                    analysis: AnalysisResult::fallback(),
                    source: AnalysisSource::Fallback { reason: e.to_string() },
                }
            }
        }
    }

    async fn try_analyze(&self, request: &VisionRequest) -> Result<AnalysisResult> {
        let response = self.provider.complete(request).await?;
        debug!("provider response: {} chars", response.len());
        Ok(parse_analysis_response(&response)?)
    }
}

/// 設定からプロバイダを生成
///
/// APIキーが無くても生成する。その場合は毎回フォールバックになる。
pub fn build_provider(config: &Config) -> Arc<dyn VisionProvider> {
    let api_key = config.api_key();
    match config.provider {
        AiProvider::Openai => Arc::new(OpenAiProvider::new(api_key, config.base_url(), config.model())),
        AiProvider::Gemini => Arc::new(GeminiProvider::new(api_key, config.base_url(), config.model())),
    }
}
