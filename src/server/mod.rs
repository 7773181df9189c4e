//! HTTP API サーバー
//!
//! - POST /api/analyze           画像解析（プロバイダ障害時もフォールバックで200）
//! - POST /api/learning/uploads  解析結果を学習に記録
//! - POST /api/learning/feedback 👍/👎 フィードバック
//! - GET  /api/learning/stats    学習状況
//! - GET  /api/learning/context  現在の学習コンテキスト
//! - GET  /health

use crate::error::AnalyzerError;
use crate::gateway::AnalysisGateway;
use crate::learning::{FeedbackEvent, PreferenceStore, SummaryStats};
use crate::scanner::upload_id;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use content_analyzer_common::AnalysisResult;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<AnalysisGateway>,
    pub store: Arc<PreferenceStore>,
}

/// HTTPエラーレスポンス
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<AnalyzerError> for ApiError {
    fn from(e: AnalyzerError) -> Self {
        error!("request failed: {}", e);
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: e.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/analyze", post(analyze_handler))
        .route("/api/learning/uploads", post(record_upload_handler))
        .route("/api/learning/feedback", post(feedback_handler))
        .route("/api/learning/stats", get(stats_handler))
        .route("/api/learning/context", get(context_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(state: AppState, addr: SocketAddr, max_body_bytes: usize) -> anyhow::Result<()> {
    let router = build_router(state, max_body_bytes);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router).await?;
    Ok(())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeRequest {
    image: Option<String>,
    filename: Option<String>,
    user_context: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeResponse {
    success: bool,
    analysis: AnalysisResult,
    filename: Option<String>,
    user_context: Option<String>,
    upload_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<String>,
}

/// 画像解析
async fn analyze_handler(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let image = req
        .image
        .filter(|image| !image.is_empty())
        .ok_or_else(|| ApiError::bad_request("No image provided"))?;

    let filename = req.filename.unwrap_or_default();
    let user_context = req.user_context.filter(|c| !c.is_empty());

    let outcome = state
        .gateway
        .analyze(&image, &filename, user_context.as_deref())
        .await;

    let note = outcome.note();
    Ok(Json(AnalyzeResponse {
        success: true,
        analysis: outcome.analysis,
        filename: Some(filename).filter(|f| !f.is_empty()),
        user_context,
        upload_id: upload_id(&image),
        note,
    }))
}

/// ストア操作をブロッキング用スレッドで実行
async fn with_store<T, F>(store: &Arc<PreferenceStore>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&PreferenceStore) -> crate::error::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = store.clone();
    tokio::task::spawn_blocking(move || f(&store))
        .await
        .map_err(|e| AnalyzerError::Storage(format!("store task failed: {}", e)))?
        .map_err(ApiError::from)
}

async fn record_upload_handler(
    State(state): State<AppState>,
    Json(analysis): Json<AnalysisResult>,
) -> Result<Json<SummaryStats>, ApiError> {
    let stats = with_store(&state.store, move |store| {
        store.record_upload(&analysis)?;
        Ok(store.summary_stats())
    })
    .await?;
    Ok(Json(stats))
}

async fn feedback_handler(
    State(state): State<AppState>,
    Json(event): Json<FeedbackEvent>,
) -> Result<Json<SummaryStats>, ApiError> {
    let stats = with_store(&state.store, move |store| {
        store.record_feedback(&event)?;
        Ok(store.summary_stats())
    })
    .await?;
    Ok(Json(stats))
}

async fn stats_handler(State(state): State<AppState>) -> Result<Json<SummaryStats>, ApiError> {
    let stats = with_store(&state.store, |store| Ok(store.summary_stats())).await?;
    Ok(Json(stats))
}

async fn context_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let context = with_store(&state.store, |store| Ok(store.build_personalization_summary())).await?;
    Ok(Json(json!({ "context": context })))
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}
