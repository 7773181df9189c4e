use crate::ai_provider::AiProvider;
use crate::error::{AnalyzerError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: AiProvider,
    pub api_key: Option<String>,
    /// 省略時はプロバイダごとの既定モデル
    pub model: Option<String>,
    /// 省略時はプロバイダごとの公式エンドポイント
    pub base_url: Option<String>,
    pub max_tokens: u32,
    /// 長辺がこれを超える画像は縮小してから送信
    pub max_image_size: u32,
    pub bind_addr: String,
    /// 学習データの保存先（省略時はデータディレクトリ）
    pub storage_dir: Option<PathBuf>,
    /// アップロードJSONの最大サイズ
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default_config())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| AnalyzerError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("content-analyzer").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            provider: AiProvider::Openai,
            api_key: None,
            model: None,
            base_url: None,
            max_tokens: 1500,
            max_image_size: 2048,
            bind_addr: "127.0.0.1:3000".into(),
            storage_dir: None,
            max_body_bytes: 20 * 1024 * 1024,
        }
    }

    /// APIキー取得（環境変数を優先）
    pub fn api_key(&self) -> Option<String> {
        std::env::var(self.provider.api_key_env())
            .ok()
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone())
    }

    pub fn model(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }

    pub fn base_url(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| self.provider.default_base_url().to_string())
    }

    /// 学習データの保存ディレクトリ
    pub fn storage_dir(&self) -> PathBuf {
        self.storage_dir.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("content-analyzer")
        })
    }

    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        self.api_key = Some(key);
        self.save()
    }

    pub fn set_provider(&mut self, provider: AiProvider) -> Result<()> {
        self.provider = provider;
        self.save()
    }
}
