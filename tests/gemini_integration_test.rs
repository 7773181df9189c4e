use content_analyzer::ai_provider::AiProvider;
use content_analyzer::gateway::{GeminiProvider, VisionProvider, VisionRequest};
use content_analyzer_common::{build_analysis_prompt, parse_analysis_response};

// 1x1 の白いPNG
const WHITE_PIXEL: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8/5+hHgAHggJ/PchI7wAAAABJRU5ErkJggg==";

#[tokio::test]
async fn gemini_analysis_integration() {
    let api_key = match std::env::var("GEMINI_API_KEY") {
        Ok(key) if !key.trim().is_empty() => key,
        _ => {
            eprintln!("GEMINI_API_KEY not set; skipping integration test");
            return;
        }
    };

    let provider = GeminiProvider::new(
        Some(api_key),
        AiProvider::Gemini.default_base_url().to_string(),
        AiProvider::Gemini.default_model().to_string(),
    );

    let request = VisionRequest {
        prompt: build_analysis_prompt(Some("integration test: a blank white image")),
        image_data_uri: WHITE_PIXEL.to_string(),
        max_tokens: 1500,
    };

    let text = provider.complete(&request).await.expect("gemini request failed");
    let result = parse_analysis_response(&text).expect("failed to parse analysis response");
    assert!(!result.category.is_empty());
}
