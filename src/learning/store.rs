//! 学習ストア
//!
//! アップロード結果とフィードバックから重みを蓄積し、
//! 次回以降の解析プロンプトに差し込む学習コンテキストを生成する。

use super::profile::{
    add_weight, top_labels, FeedbackEvent, LearningLevel, PreferenceProfile, SummaryStats,
};
use super::storage::KeyValueStorage;
use crate::error::Result;
use chrono::Utc;
use content_analyzer_common::AnalysisResult;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// 永続化キー
pub const STORAGE_KEY: &str = "ai_analyzer_user_learning";

const CATEGORY_UPLOAD_WEIGHT: f64 = 1.0;
const PROJECT_UPLOAD_WEIGHT: f64 = 0.5;
const STORE_UPLOAD_WEIGHT: f64 = 0.3;
const HELPFUL_WEIGHT: f64 = 1.5;
const NOT_HELPFUL_WEIGHT: f64 = -0.5;

/// 学習コンテキストを出すのに必要な最低アップロード数
const MIN_UPLOADS_FOR_CONTEXT: u64 = 3;
const TOP_N: usize = 3;
const DEFAULT_TOP_CATEGORY: &str = "General";

pub struct PreferenceStore {
    storage: Arc<dyn KeyValueStorage>,
    /// 読み込み→更新→保存をプロセス内で直列化する
    write_lock: Mutex<()>,
}

impl PreferenceStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            write_lock: Mutex::new(()),
        }
    }

    /// 保存済みプロファイルを読み込み
    ///
    /// 未保存・読み込み失敗・破損はすべて「履歴なし」としてデフォルトを返す。
    pub fn load(&self) -> PreferenceProfile {
        let raw = match self.storage.get(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return PreferenceProfile::default(),
            Err(e) => {
                warn!("failed to read learning profile, using defaults: {}", e);
                return PreferenceProfile::default();
            }
        };

        match serde_json::from_str(&raw) {
            Ok(profile) => profile,
            Err(e) => {
                warn!("learning profile is corrupted, using defaults: {}", e);
                PreferenceProfile::default()
            }
        }
    }

    /// 解析結果を1回分のアップロードとして記録
    pub fn record_upload(&self, result: &AnalysisResult) -> Result<PreferenceProfile> {
        self.update(|profile| {
            add_weight(&mut profile.category_weights, &result.category, CATEGORY_UPLOAD_WEIGHT);

            for project in &result.project_suggestions {
                add_weight(&mut profile.project_weights, project, PROJECT_UPLOAD_WEIGHT);
            }

            for store in result.stores() {
                add_weight(&mut profile.store_weights, store, STORE_UPLOAD_WEIGHT);
            }

            profile.upload_count += 1;
        })
    }

    /// 👍/👎 フィードバックをカテゴリ重みに反映（下限なし）
    pub fn record_feedback(&self, event: &FeedbackEvent) -> Result<PreferenceProfile> {
        let delta = if event.helpful { HELPFUL_WEIGHT } else { NOT_HELPFUL_WEIGHT };
        debug!(
            "feedback for upload {} ({}): {:+}",
            event.upload_id, event.category, delta
        );

        self.update(|profile| {
            add_weight(&mut profile.category_weights, &event.category, delta);
        })
    }

    /// 学習コンテキスト文字列を生成
    ///
    /// アップロードが3回未満なら空文字列。
    pub fn build_personalization_summary(&self) -> String {
        personalization_summary(&self.load())
    }

    pub fn summary_stats(&self) -> SummaryStats {
        summary_stats(&self.load())
    }

    /// 学習データを削除
    pub fn reset(&self) -> Result<bool> {
        let _guard = self.lock();
        self.storage.remove(STORAGE_KEY)
    }

    /// プロファイル全体の read-modify-write
    fn update<F>(&self, mutate: F) -> Result<PreferenceProfile>
    where
        F: FnOnce(&mut PreferenceProfile),
    {
        let _guard = self.lock();

        let mut profile = self.load();
        mutate(&mut profile);
        profile.last_updated = Utc::now();

        let json = serde_json::to_string(&profile)?;
        self.storage.set(STORAGE_KEY, &json)?;
        Ok(profile)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ()> {
        // ガードは () しか守らないのでポイズンは無視してよい
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// プロファイルから学習コンテキストを組み立てる
pub fn personalization_summary(profile: &PreferenceProfile) -> String {
    if profile.upload_count < MIN_UPLOADS_FOR_CONTEXT {
        return String::new();
    }

    let categories = top_labels(&profile.category_weights, TOP_N).join(", ");
    let stores = top_labels(&profile.store_weights, TOP_N).join(", ");
    let projects = top_labels(&profile.project_weights, TOP_N).join(", ");

    format!(
        "User Learning Context ({count} previous uploads):\n\
         - Frequently interested in: {categories}\n\
         - Preferred stores: {stores}\n\
         - Favorite project types: {projects}\n\
         - Budget preference: {budget}\n\
         \n\
         Please prioritize recommendations that align with these user preferences while still being helpful for the current upload.",
        count = profile.upload_count,
        budget = profile.budget_preference,
    )
}

pub fn summary_stats(profile: &PreferenceProfile) -> SummaryStats {
    let top_category = top_labels(&profile.category_weights, 1)
        .first()
        .map(|c| c.to_string())
        .unwrap_or_else(|| DEFAULT_TOP_CATEGORY.to_string());

    SummaryStats {
        level: LearningLevel::from_upload_count(profile.upload_count),
        top_category,
        total_uploads: profile.upload_count,
        category_count: profile.category_weights.len(),
    }
}
