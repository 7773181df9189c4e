use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Openai,
    Gemini,
}

impl AiProvider {
    pub fn name(&self) -> &'static str {
        match self {
            AiProvider::Openai => "openai",
            AiProvider::Gemini => "gemini",
        }
    }

    /// APIキーを読む環境変数名
    pub fn api_key_env(&self) -> &'static str {
        match self {
            AiProvider::Openai => "OPENAI_API_KEY",
            AiProvider::Gemini => "GEMINI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            AiProvider::Openai => "gpt-4o",
            AiProvider::Gemini => "gemini-2.0-flash-exp",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            AiProvider::Openai => "https://api.openai.com/v1",
            AiProvider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        }
    }
}

impl std::fmt::Display for AiProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
