//! プロンプト生成モジュール
//!
//! - ANALYSIS_INSTRUCTIONS: 画像解析の固定指示文
//! - compose_context: ユーザー入力と学習コンテキストの結合
//! - build_analysis_prompt: プロバイダへ送る最終テキスト

/// 画像解析の固定指示文（AnalysisResultのJSON形式を要求）
pub const ANALYSIS_INSTRUCTIONS: &str = r#"Analyze this image and provide a detailed JSON response with the following structure:
{
  "category": "string (categorize based on what you see - could be anything: food, clothing, electronics, tools, furniture, plants, vehicles, art, etc.)",
  "items": [
    {
      "name": "string (specific item name)",
      "quantity": "string (estimated quantity if applicable)",
      "confidence": "number (0-1 confidence in identification)"
    }
  ],
  "project_suggestions": ["array of relevant project ideas, activities, or use cases based on detected items and user context"],
  "price_comparison": [
    {
      "store": "string (relevant retailers/suppliers for this category)",
      "price": "string (estimated price per unit)",
      "per": "string (each, pound, bundle, etc.)",
      "total": "string (estimated total cost)",
      "availability": "string (availability status)"
    }
  ],
  "recommendations": ["array of helpful recommendations based on the content and user context"]
}

Instructions:
1. Identify ALL visible items accurately, regardless of category
2. Provide relevant price estimates from appropriate retailers (not just home improvement stores)
3. Suggest practical projects, recipes, activities, or use cases based on what you see
4. Offer helpful recommendations that match the user's apparent intent
5. Consider the user context if provided to tailor suggestions
6. For different categories, suggest relevant retailers:
   - Food: grocery stores, specialty markets, online food retailers
   - Electronics: Best Buy, Amazon, specialty tech stores
   - Clothing: department stores, online retailers, specialty shops
   - Home items: Home Depot, Target, IKEA, Amazon
   - Art supplies: art stores, craft stores, online suppliers
   - etc.

Be specific, practical, and tailor your response to what the user actually uploaded and their stated goals."#;

/// ユーザー入力のコンテキストと学習サマリを結合
///
/// 順序は ユーザー入力 → 学習サマリ。間は空行で区切る。
/// どちらも空なら `None`。
pub fn compose_context(user_context: Option<&str>, personalization: &str) -> Option<String> {
    let user_context = user_context.map(str::trim).filter(|c| !c.is_empty());
    let personalization = Some(personalization.trim()).filter(|p| !p.is_empty());

    match (user_context, personalization) {
        (Some(user), Some(learned)) => Some(format!("{}\n\n{}", user, learned)),
        (Some(user), None) => Some(user.to_string()),
        (None, Some(learned)) => Some(learned.to_string()),
        (None, None) => None,
    }
}

/// 解析プロンプト生成
///
/// コンテキストがある場合は指示文の前に `User context: "..."` を置く。
pub fn build_analysis_prompt(context: Option<&str>) -> String {
    match context {
        Some(ctx) if !ctx.is_empty() => {
            format!("User context: \"{}\"\n\n{}", ctx, ANALYSIS_INSTRUCTIONS)
        }
        _ => ANALYSIS_INSTRUCTIONS.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_context_both() {
        let ctx = compose_context(Some("planning a garden"), "User Learning Context (3 previous uploads):");
        assert_eq!(
            ctx.as_deref(),
            Some("planning a garden\n\nUser Learning Context (3 previous uploads):")
        );
    }

    #[test]
    fn test_compose_context_user_only() {
        assert_eq!(compose_context(Some("dinner ideas"), "").as_deref(), Some("dinner ideas"));
    }

    #[test]
    fn test_compose_context_learned_only() {
        assert_eq!(compose_context(None, "learned").as_deref(), Some("learned"));
        assert_eq!(compose_context(Some("   "), "learned").as_deref(), Some("learned"));
    }

    #[test]
    fn test_compose_context_empty() {
        assert!(compose_context(None, "").is_none());
    }

    #[test]
    fn test_build_prompt_without_context() {
        let prompt = build_analysis_prompt(None);
        assert!(prompt.starts_with("Analyze this image"));
        assert!(prompt.contains("\"project_suggestions\""));
    }

    #[test]
    fn test_build_prompt_with_context() {
        let prompt = build_analysis_prompt(Some("birthday party"));
        assert!(prompt.starts_with("User context: \"birthday party\"\n\nAnalyze this image"));
    }
}
