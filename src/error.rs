use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyzerError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("API key is not set. Export {0} or run `content-analyzer config --set-api-key YOUR_KEY`")]
    MissingApiKey(&'static str),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Folder not found: {0}")]
    FolderNotFound(String),

    #[error("Image load error: {0}")]
    ImageLoad(String),

    #[error("API call failed: {0}")]
    ApiCall(String),

    #[error("Failed to parse API response: {0}")]
    ApiParse(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No images found: {0}")]
    NoImagesFound(String),
}

impl From<content_analyzer_common::Error> for AnalyzerError {
    fn from(e: content_analyzer_common::Error) -> Self {
        match e {
            content_analyzer_common::Error::Parse(msg) => AnalyzerError::ApiParse(msg),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;
