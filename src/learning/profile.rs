//! 学習プロファイルの型定義
//!
//! 永続化形式（JSON）のキー名は既存データと互換:
//! `categories`, `stores`, `projects`, `budget_preference`,
//! `upload_count`, `last_updated`

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// ラベル → 累積重み（挿入順を保持）
pub type WeightMap = IndexMap<String, f64>;

/// 予算志向（現状どの操作も変更しない予約フィールド）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPreference {
    Budget,
    #[default]
    Moderate,
    Premium,
}

impl std::fmt::Display for BudgetPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BudgetPreference::Budget => write!(f, "budget"),
            BudgetPreference::Moderate => write!(f, "moderate"),
            BudgetPreference::Premium => write!(f, "premium"),
        }
    }
}

/// 学習プロファイル（欠けたキーは既定値）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreferenceProfile {
    #[serde(rename = "categories")]
    pub category_weights: WeightMap,

    #[serde(rename = "stores")]
    pub store_weights: WeightMap,

    #[serde(rename = "projects")]
    pub project_weights: WeightMap,

    pub budget_preference: BudgetPreference,

    pub upload_count: u64,

    pub last_updated: DateTime<Utc>,
}

impl Default for PreferenceProfile {
    fn default() -> Self {
        Self {
            category_weights: WeightMap::new(),
            store_weights: WeightMap::new(),
            project_weights: WeightMap::new(),
            budget_preference: BudgetPreference::Moderate,
            upload_count: 0,
            last_updated: Utc::now(),
        }
    }
}

/// 重みを加算（未登録なら増分で初期化）
pub fn add_weight(weights: &mut WeightMap, label: &str, delta: f64) {
    *weights.entry(label.to_string()).or_insert(0.0) += delta;
}

/// 重みの降順で上位 `n` 件のラベルを返す
///
/// 同率の場合は挿入順（先に記録されたラベルが先）。
pub fn top_labels(weights: &WeightMap, n: usize) -> Vec<&str> {
    let mut entries: Vec<(&String, &f64)> = weights.iter().collect();
    // sort_by は安定ソートなので同率は挿入順のまま
    entries.sort_by(|(_, a), (_, b)| b.total_cmp(a));
    entries
        .into_iter()
        .take(n)
        .map(|(label, _)| label.as_str())
        .collect()
}

/// 学習レベル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LearningLevel {
    Learning,
    Smart,
    Expert,
}

impl LearningLevel {
    pub fn from_upload_count(upload_count: u64) -> Self {
        match upload_count {
            0..=4 => LearningLevel::Learning,
            5..=19 => LearningLevel::Smart,
            _ => LearningLevel::Expert,
        }
    }
}

impl std::fmt::Display for LearningLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LearningLevel::Learning => write!(f, "Learning"),
            LearningLevel::Smart => write!(f, "Smart"),
            LearningLevel::Expert => write!(f, "Expert"),
        }
    }
}

/// 学習状況のサマリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub level: LearningLevel,
    pub top_category: String,
    pub total_uploads: u64,
    pub category_count: usize,
}

/// フィードバックイベント（永続化しない）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEvent {
    #[serde(default)]
    pub upload_id: String,
    pub helpful: bool,
    pub category: String,
    #[serde(default = "Utc::now")]
    pub timestamp: DateTime<Utc>,
}

impl FeedbackEvent {
    pub fn new(upload_id: impl Into<String>, category: impl Into<String>, helpful: bool) -> Self {
        Self {
            upload_id: upload_id.into(),
            helpful,
            category: category.into(),
            timestamp: Utc::now(),
        }
    }
}
