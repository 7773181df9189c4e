//! 解析結果の型定義
//!
//! CLIとHTTPサーバーで共有される型:
//! - DetectedItem: 画像内で検出されたアイテム
//! - PriceQuote: 小売店ごとの価格見積り
//! - AnalysisResult: AIプロバイダの出力（またはフォールバック）

use serde::{Deserialize, Deserializer, Serialize};

/// 検出アイテム
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectedItem {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// 推定数量（"1", "a dozen" など自由形式）
    #[serde(deserialize_with = "string_or_number")]
    pub quantity: String,
    /// 識別の確信度 (0-1)
    #[serde(deserialize_with = "number_or_numeric_string")]
    pub confidence: f64,
}

/// 価格比較の1行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceQuote {
    #[serde(deserialize_with = "null_as_default")]
    pub store: String,
    #[serde(deserialize_with = "null_as_default")]
    pub price: String,
    #[serde(deserialize_with = "null_as_default")]
    pub per: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total: String,
    #[serde(deserialize_with = "null_as_default")]
    pub availability: String,
}

/// AI解析結果
///
/// ワイヤ形式はプロバイダへ要求するJSONと同じ snake_case。
/// 欠けたフィールドと `null` は空値として扱う。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub items: Vec<DetectedItem>,
    #[serde(deserialize_with = "null_as_default")]
    pub project_suggestions: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub price_comparison: Vec<PriceQuote>,
    #[serde(deserialize_with = "null_as_default")]
    pub recommendations: Vec<String>,
}

/// フォールバック時のカテゴリ名
pub const FALLBACK_CATEGORY: &str = "General Content";

impl AnalysisResult {
    /// プロバイダ障害時に返す固定の解析結果
    ///
    /// 部分的なレスポンスからは一切組み立てない。常に同じ値を返す。
    pub fn fallback() -> Self {
        Self {
            category: FALLBACK_CATEGORY.to_string(),
            items: vec![DetectedItem {
                name: "Detected Item".to_string(),
                quantity: "1".to_string(),
                confidence: 0.75,
            }],
            project_suggestions: vec![
                "Explore creative uses for this item".to_string(),
                "Research similar products or alternatives".to_string(),
            ],
            price_comparison: vec![
                PriceQuote {
                    store: "Amazon".to_string(),
                    price: "Varies".to_string(),
                    per: "each".to_string(),
                    total: "Contact for pricing".to_string(),
                    availability: "Available".to_string(),
                },
                PriceQuote {
                    store: "Local Retailers".to_string(),
                    price: "Varies".to_string(),
                    per: "each".to_string(),
                    total: "Visit store".to_string(),
                    availability: "Check locally".to_string(),
                },
            ],
            recommendations: vec![
                "Research the item online for more information".to_string(),
                "Compare prices across multiple sources".to_string(),
                "Consider your specific needs and budget".to_string(),
            ],
        }
    }

    /// 価格比較に登場する店舗名（出現順）
    pub fn stores(&self) -> impl Iterator<Item = &str> {
        self.price_comparison.iter().map(|p| p.store.as_str())
    }
}

/// 数量は文字列で要求しているが、数値で返すモデルもあるため両方受け付ける
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}

/// 確信度は数値で要求しているが、"0.9" のように文字列で返すモデルもある
///
/// 解釈できない値は 0 とし、範囲外は [0, 1] に丸める。
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let confidence = match value {
        serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
        serde_json::Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    Ok(if confidence.is_finite() {
        confidence.clamp(0.0, 1.0)
    } else {
        0.0
    })
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
