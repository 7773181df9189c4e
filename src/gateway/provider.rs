use crate::error::Result;
use async_trait::async_trait;

/// プロバイダへ送る1回分のリクエスト
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// 指示文（コンテキスト込み）
    pub prompt: String,
    /// "data:image/jpeg;base64,..." 形式の画像
    pub image_data_uri: String,
    pub max_tokens: u32,
}

/// 画像解析を行う外部AIプロバイダ
///
/// 戻り値はモデルの自由形式テキスト。JSON抽出は呼び出し側で行う。
#[async_trait]
pub trait VisionProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, request: &VisionRequest) -> Result<String>;
}

/// Data URLからBase64データ部分を抽出
///
/// # Arguments
/// * `data_url` - "data:image/jpeg;base64,/9j/4AAQ..." 形式のData URL
pub fn extract_base64_from_data_url(data_url: &str) -> Option<&str> {
    data_url.split_once(',').map(|(_, data)| data)
}

/// Data URLからMIMEタイプを抽出（不明なら "image/jpeg"）
pub fn extract_mime_type_from_data_url(data_url: &str) -> &str {
    data_url
        .strip_prefix("data:")
        .and_then(|s| s.split(';').next())
        .filter(|m| !m.is_empty())
        .unwrap_or("image/jpeg")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_base64() {
        assert_eq!(
            extract_base64_from_data_url("data:image/png;base64,iVBORw0KGgo="),
            Some("iVBORw0KGgo=")
        );
        assert_eq!(extract_base64_from_data_url("not a data url"), None);
    }

    #[test]
    fn test_extract_mime_type() {
        assert_eq!(extract_mime_type_from_data_url("data:image/png;base64,AAAA"), "image/png");
        assert_eq!(extract_mime_type_from_data_url("data:image/webp;base64,AAAA"), "image/webp");
        assert_eq!(extract_mime_type_from_data_url("garbage"), "image/jpeg");
    }
}
