//! APIレスポンスパーサー
//!
//! AIプロバイダの自由形式テキストからJSONオブジェクトを抽出し、
//! AnalysisResultとしてパースする

use crate::error::{Error, Result};
use crate::types::AnalysisResult;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// 最初の `{` から最後の `}` まで（改行を含む）
    static ref JSON_OBJECT: Regex = Regex::new(r"(?s)\{.*\}").expect("valid regex");
}

/// APIレスポンスからJSONオブジェクト部分を抽出
///
/// プロバイダは純粋なJSONを返すとは限らないため、前後の説明文や
/// ```json フェンスは無視し、最初の `{` から最後の `}` までを返す。
///
/// # Examples
/// ```
/// use content_analyzer_common::extract_json_object;
///
/// let response = "Sure! {\"category\": \"Food\"} Hope this helps.";
/// assert_eq!(extract_json_object(response).unwrap(), "{\"category\": \"Food\"}");
/// ```
pub fn extract_json_object(response: &str) -> Result<&str> {
    JSON_OBJECT
        .find(response)
        .map(|m| m.as_str())
        .ok_or_else(|| Error::Parse("No valid JSON found in response".into()))
}

/// 解析レスポンスをパース
///
/// # Returns
/// * `Ok(AnalysisResult)` - パース成功
/// * `Err` - JSONが見つからないかパース失敗
pub fn parse_analysis_response(response: &str) -> Result<AnalysisResult> {
    let json_str = extract_json_object(response)?;
    serde_json::from_str(json_str)
        .map_err(|e| Error::Parse(format!("Analysis JSON parse error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // =============================================
    // extract_json_object テスト
    // =============================================

    #[test]
    fn test_extract_json_with_surrounding_text() {
        let response = r#"Here is the result: {"key": "value"} and some more text."#;
        assert_eq!(extract_json_object(response).unwrap(), r#"{"key": "value"}"#);
    }

    #[test]
    fn test_extract_json_with_fence() {
        let response = "```json\n{\n  \"category\": \"Electronics\"\n}\n```";
        let json = extract_json_object(response).unwrap();
        assert!(json.starts_with('{'));
        assert!(json.ends_with('}'));
        assert!(json.contains("Electronics"));
    }

    #[test]
    fn test_extract_json_nested_objects() {
        let response = r#"{"items": [{"name": "a"}], "nested": {"k": "v"}} trailing"#;
        let json = extract_json_object(response).unwrap();
        assert_eq!(json, r#"{"items": [{"name": "a"}], "nested": {"k": "v"}}"#);
    }

    #[test]
    fn test_extract_json_error() {
        let result = extract_json_object("No JSON here, just plain text.");
        match result {
            Err(Error::Parse(msg)) => assert!(msg.contains("No valid JSON")),
            _ => panic!("Expected Parse error"),
        }
    }

    #[test]
    fn test_extract_json_empty_response() {
        assert!(extract_json_object("").is_err());
    }

    // =============================================
    // parse_analysis_response テスト
    // =============================================

    #[test]
    fn test_parse_embedded_object_unchanged() {
        let response = r#"prefix-noise {"category":"Food","items":[],"project_suggestions":[],"price_comparison":[],"recommendations":[]} suffix-noise"#;
        let result = parse_analysis_response(response).unwrap();
        assert_eq!(
            result,
            AnalysisResult {
                category: "Food".to_string(),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_parse_full_response() {
        let response = r#"Analysis:
```json
{
  "category": "Produce",
  "items": [{"name": "Tomato", "quantity": "4", "confidence": 0.92}],
  "project_suggestions": ["Fresh salsa"],
  "price_comparison": [
    {"store": "Whole Foods", "price": "$0.99", "per": "each", "total": "$3.96", "availability": "In stock"}
  ],
  "recommendations": ["Store at room temperature"]
}
```"#;
        let result = parse_analysis_response(response).unwrap();
        assert_eq!(result.category, "Produce");
        assert_eq!(result.items[0].name, "Tomato");
        assert_eq!(result.items[0].confidence, 0.92);
        assert_eq!(result.project_suggestions, vec!["Fresh salsa"]);
        assert_eq!(result.price_comparison[0].store, "Whole Foods");
    }

    #[test]
    fn test_parse_string_confidence() {
        let response = r#"{"category":"Food","items":[{"name":"Apple","quantity":"3","confidence":"0.9"}],"project_suggestions":["Pie"],"price_comparison":[],"recommendations":[]}"#;
        let result = parse_analysis_response(response).unwrap();
        assert_eq!(result.category, "Food");
        assert_eq!(result.items[0].name, "Apple");
        assert_eq!(result.items[0].confidence, 0.9);
    }

    #[test]
    fn test_parse_null_lists_keep_other_fields() {
        let response = r#"Result: {"category":"Tools","items":[{"name":"Hammer","quantity":1,"confidence":0.8}],"project_suggestions":null,"price_comparison":null,"recommendations":["Check the handle"]}"#;
        let result = parse_analysis_response(response).unwrap();
        assert_eq!(result.category, "Tools");
        assert_eq!(result.items[0].quantity, "1");
        assert!(result.project_suggestions.is_empty());
        assert!(result.price_comparison.is_empty());
        assert_eq!(result.recommendations, vec!["Check the handle"]);
    }

    #[test]
    fn test_parse_malformed_json() {
        let response = r#"{"category": "Food", "items": [}"#;
        assert!(matches!(parse_analysis_response(response), Err(Error::Parse(_))));
    }

    #[test]
    fn test_parse_no_json() {
        assert!(parse_analysis_response("I cannot analyze this image.").is_err());
    }
}
